use std::marker::PhantomData;

use crate::data_structures::heap::Heap;
use crate::frontier::EmptyFrontierError;
use crate::frontier::Frontier;
use crate::frontier::ResidentStates;
use crate::problem::ObjectiveHeuristic;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Cost;
use crate::space::State;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h.
///
/// Intuition around higher g-value might be slightly easier, but keeping the
/// raw h value helps to avoid recomputing it later.
///
/// ```
/// use maze_search::algorithms::astar::AStarRank;
///
/// // Same f, lower h wins.
/// assert!(AStarRank::new(2, 0) < AStarRank::new(0, 2));
/// assert!(AStarRank::new(1, 1) < AStarRank::new(1, 2));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank {
    f: Cost,
    h: Cost,
}
impl AStarRank {
    pub fn new(g: Cost, h: Cost) -> Self {
        Self {
            f: g.saturating_add(h),
            h,
        }
    }
    pub fn f(&self) -> Cost {
        self.f
    }
    pub fn h(&self) -> Cost {
        self.h
    }
}

#[derive(Debug)]
pub struct AStarHeapNode<St>
where
    St: State,
{
    /// The rank of this node that defines how good it is.
    pub rank: AStarRank,
    /// Insertion order, breaks ties between equal ranks.
    pub sequence: u64,
    /// The index of this node in the Search Tree
    pub node_index: SearchTreeIndex,
    state: St,
}

impl<St: State> PartialEq for AStarHeapNode<St> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        (self.rank, self.sequence) == (other.rank, other.sequence)
    }
}
impl<St: State> Eq for AStarHeapNode<St> {}

impl<St: State> PartialOrd for AStarHeapNode<St> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<St: State> Ord for AStarHeapNode<St> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.rank, self.sequence).cmp(&(other.rank, other.sequence))
    }
}

/// Cost-priority frontier.
///
/// Removes a node with the least `f = g + h`, where `g` is the node's depth
/// and `h = H::h(state, goal)`. Ties go to lower `h`, then to the node added
/// first. Callers shouldn't rely on the tie-break.
///
/// A resident state is admitted again through a strictly shorter path. Nodes
/// of one state share `h`, so the shallowest one is always removed first and
/// the nodes it supersedes surface after their state was expanded.
#[derive(Debug)]
pub struct PriorityFrontier<H, St, A>
where
    H: ObjectiveHeuristic<St>,
    St: State,
    A: Action,
{
    goal: St,
    open: Heap<AStarHeapNode<St>>,
    resident: ResidentStates<St>,
    next_sequence: u64,

    _phantom_heuristic: PhantomData<H>,
    _phantom_action: PhantomData<A>,
}

impl<H, St, A> PriorityFrontier<H, St, A>
where
    H: ObjectiveHeuristic<St>,
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new(goal: St) -> Self {
        Self {
            goal,
            open: Heap::with_capacity(2048),
            resident: ResidentStates::new(),
            next_sequence: 0,

            _phantom_heuristic: PhantomData,
            _phantom_action: PhantomData,
        }
    }

    /// The rank of the node `remove` would return next.
    pub fn peek_rank(&self) -> Option<AStarRank> {
        self.open.peek().map(|n| n.rank)
    }
}

impl<H, St, A> Frontier<St, A> for PriorityFrontier<H, St, A>
where
    H: ObjectiveHeuristic<St>,
    St: State,
    A: Action,
{
    fn add(&mut self, node_index: SearchTreeIndex, node: &SearchTreeNode<St, A>) {
        let s = *node.state();
        let g = node.g();
        let rank = AStarRank::new(g, H::h(&s, &self.goal));
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.resident.insert(s, g);
        self.open.push(AStarHeapNode {
            rank,
            sequence,
            node_index,
            state: s,
        });
    }

    fn contains_state(&self, s: &St) -> bool {
        self.resident.contains(s)
    }

    fn admits(&self, s: &St, g: Cost) -> bool {
        self.resident.best_g(s).is_none_or(|best_g| g < best_g)
    }

    fn len(&self) -> usize {
        self.open.len()
    }

    fn remove(&mut self) -> Result<SearchTreeIndex, EmptyFrontierError> {
        let heap_node = self.open.pop().ok_or(EmptyFrontierError)?;
        self.resident.remove(&heap_node.state);
        Ok(heap_node.node_index)
    }
}
