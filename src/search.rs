use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::State;

/// A reference to a `SearchTreeNode<St, A>` within its `SearchTree`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTreeIndex {
    index: usize,
}

impl SearchTreeIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        Self { index }
    }
}

#[derive(Clone, Debug)]
pub struct SearchTreeNode<St, A>
where
    St: State,
    A: Action,
{
    pub(crate) parent: Option<(SearchTreeIndex, A)>,
    pub(crate) state: St,
    /// Number of edges to the root, cached from the parent.
    pub(crate) g: Cost,
}

impl<St, A> SearchTreeNode<St, A>
where
    St: State,
    A: Action,
{
    pub fn new_root(s: St) -> Self {
        Self {
            parent: None,
            state: s,
            g: 0,
        }
    }

    pub fn state(&self) -> &St {
        &self.state
    }
    pub fn parent(&self) -> Option<SearchTreeIndex> {
        self.parent.map(|(p, _)| p)
    }
    /// The action that generated this node. `None` for roots.
    pub fn action(&self) -> Option<A> {
        self.parent.map(|(_, a)| a)
    }
    pub fn g(&self) -> Cost {
        self.g
    }
}

/// All the nodes of a search.
///
/// Nodes only point upwards to their parents, and only ever get appended, so
/// parent links can't form cycles.
pub struct SearchTree<St, A>
where
    St: State,
    A: Action,
{
    nodes: Vec<SearchTreeNode<St, A>>,
}

impl<St, A> SearchTree<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    pub fn push_root(&mut self, s: St) -> SearchTreeIndex {
        self.push(SearchTreeNode::new_root(s))
    }

    /// Adds a node one step below `parent`.
    #[inline(always)]
    pub fn push_child(&mut self, parent: SearchTreeIndex, s: St, a: A) -> SearchTreeIndex {
        let g = self[parent].g + 1;
        let child = self.push(SearchTreeNode {
            parent: Some((parent, a)),
            state: s,
            g,
        });
        self.verify_g(child);
        child
    }

    #[inline(always)]
    fn push(&mut self, node: SearchTreeNode<St, A>) -> SearchTreeIndex {
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counts the parent links between a node and its root.
    #[must_use]
    pub fn depth(&self, mut node_index: SearchTreeIndex) -> Cost {
        let mut steps = 0;
        while let Some(parent_index) = self[node_index].parent() {
            debug_assert!(parent_index < node_index);
            steps += 1;
            node_index = parent_index;
        }
        steps
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify_g(&self, _node_index: SearchTreeIndex) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify_g(&self, node_index: SearchTreeIndex) {
        debug_assert_eq!(
            self[node_index].g,
            self.depth(node_index),
            "Cached g of {:?} disagrees with its parent links",
            self[node_index],
        );
    }

    /// Reconstructs the path from the root to `node_index`.
    #[must_use]
    pub fn path(&self, mut node_index: SearchTreeIndex) -> Path<St, A> {
        let mut steps = Vec::with_capacity(self[node_index].g as usize);

        while let Some((parent_index, a)) = self[node_index].parent {
            steps.push((self[node_index].state, a));
            debug_assert!(node_index != parent_index);
            node_index = parent_index;
        }

        Path::from_reversed_steps(self[node_index].state, steps)
    }
}

impl<St, A> Default for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> std::ops::Index<SearchTreeIndex> for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    type Output = SearchTreeNode<St, A>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.index]
    }
}

impl<St, A> std::fmt::Debug for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
