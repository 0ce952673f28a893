use std::cmp::min;
use std::fmt::Debug;

// Heap intrinsic operations.
//
// A heap is a tree-like structure where every subtree's root has a better score
// than all the other nodes in the subtree.
//
// With arity 2 the array indices look like,
//
// ```text
//                           0
//              1                         2
//       3            4            5             6
//   7      8      9     10    11     12     13     14
// 15 16  17 18  19 20  21 22 23 24  25
// ```
//
// The last level will often be incomplete
//
//   - Up:         `(i-1)/A`
//   - First child: `(A*i) + 1`
//   - Last child:  `A(i+1)`

const HEAP_ARITY: usize = 4usize;

#[inline(always)]
#[must_use]
fn up(i: usize) -> usize {
    (i - 1) / HEAP_ARITY
}
#[inline(always)]
#[must_use]
fn down_first(i: usize) -> usize {
    (HEAP_ARITY * i) + 1
}
#[inline(always)]
#[must_use]
fn down_last(i: usize) -> usize {
    HEAP_ARITY * (i + 1)
}

/// Index of the smallest element. Ties go to the leftmost one.
#[inline(always)]
#[must_use]
fn argmin<T: Ord>(a: &[T]) -> usize {
    debug_assert!(!a.is_empty());
    let mut best = 0;
    for i in 1..a.len() {
        if a[i] < a[best] {
            best = i;
        }
    }
    best
}

/// A d-ary min-heap backed by a vector.
#[derive(Debug)]
pub struct Heap<N>
where
    N: Debug + Ord,
{
    heap: Vec<N>,
}

impl<N> Heap<N>
where
    N: Debug + Ord,
{
    pub fn new() -> Self {
        Self { heap: vec![] }
    }
    pub fn with_capacity(s: usize) -> Self {
        Self {
            heap: Vec::with_capacity(s),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn peek(&self) -> Option<&N> {
        self.heap.first()
    }

    /// Pushes a node and returns where it landed.
    pub fn push(&mut self, n: N) -> usize {
        self.verify_heap();
        let heap_index = self.heap.len();

        self.heap.push(n);
        let heap_index = self.sift_up(heap_index);

        self.verify_heap();
        heap_index
    }

    pub fn pop(&mut self) -> Option<N> {
        self.verify_heap();

        if self.heap.len() <= 1 {
            return self.heap.pop();
        }

        let n = self.pop_non_trivial_heap();
        self.verify_heap();
        Some(n)
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        // Every node goes after its parent node, if any.
        for i in 1..self.heap.len() {
            let p = up(i);
            debug_assert!(
                self.heap[p] <= self.heap[i],
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
    }

    // Implementation details

    /// Pops the top node from a Heap with at least 2 elements.
    ///
    /// Works by unfairly sifting down the top-node to the last level, where it
    /// can be swapped with the very last element of the array and popped.
    /// Temporarily breaks invariants around the node sifting down unfairly.
    fn pop_non_trivial_heap(&mut self) -> N {
        debug_assert!(
            self.heap.len() >= 2,
            "It doesn't get easier. Why are you calling this?"
        );

        // 1. Pretend there's a hole at the root, and bubble the best child up
        //    till the hole reaches the bottom.
        // 2. If the hole is not the last element, swap it for the last one and
        //    sift that one up.
        // 3. The last element is now the old top of the heap, pop it.
        let len = self.heap.len();
        let last = len - 1;

        let mut hole = 0;
        loop {
            let first = down_first(hole);
            if first >= len {
                break;
            }
            debug_assert_eq!(first + HEAP_ARITY, down_last(hole) + 1);
            let child = first + argmin(&self.heap[first..min(first + HEAP_ARITY, len)]);

            self.heap.swap(hole, child);
            hole = child;
        }

        // NOTE: The hole made it to the last level, but it may not be at the
        // end of the array.
        debug_assert!(hole <= last, "The hole={hole} is past last={last}");
        if hole != last {
            self.heap.swap(hole, last);
            self.sift_up(hole);
        }

        match self.heap.pop() {
            Some(n) => n,
            None => unreachable!("Heap had at least 2 nodes"),
        }
    }

    /// Raises a node
    /// Returns it's new index
    #[inline(always)]
    fn sift_up(&mut self, index: usize) -> usize {
        debug_assert!(index < self.heap.len(), "Index out of bounds...");

        let mut pos = index;
        while pos > 0 {
            let parent = up(pos);
            if self.heap[parent] <= self.heap[pos] {
                break;
            }
            self.heap.swap(parent, pos);
            pos = parent;
        }
        pos
    }
}

impl<N> Default for Heap<N>
where
    N: Debug + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}
