//! The pending-node collection of a search.
//!
//! A `Frontier` decides which node gets expanded next. Deduplication is up to
//! the search, through `Frontier::admits` and its explored set. A frontier may
//! hand back a node whose state was expanded through a shorter path since it
//! was added, and the search skips it.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Cost;
use crate::space::State;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Tried to remove a node from an empty frontier")]
pub struct EmptyFrontierError;

pub trait Frontier<St, A>: std::fmt::Debug
where
    St: State,
    A: Action,
{
    /// Adds a node that lives in the search tree at `node_index`.
    ///
    /// Nodes are never dropped, even when their state is already resident.
    fn add(&mut self, node_index: SearchTreeIndex, node: &SearchTreeNode<St, A>);

    /// Whether some resident node has this state.
    fn contains_state(&self, s: &St) -> bool;

    /// Whether a node for `s` at depth `g` is worth adding.
    ///
    /// By default a state is only queued once. Frontiers that may reach a
    /// resident state through a shorter path later on override this.
    fn admits(&self, s: &St, _g: Cost) -> bool {
        !self.contains_state(s)
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes exactly one node, chosen by the frontier's policy.
    fn remove(&mut self) -> Result<SearchTreeIndex, EmptyFrontierError>;
}

/// Multiset of the states resident in a frontier, with the lowest `g` each
/// one was added at since it became resident.
#[derive(Debug)]
pub(crate) struct ResidentStates<St>
where
    St: State,
{
    counts: FxHashMap<St, (usize, Cost)>,
}

impl<St> ResidentStates<St>
where
    St: State,
{
    pub(crate) fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }

    pub(crate) fn insert(&mut self, s: St, g: Cost) {
        let (count, best_g) = self.counts.entry(s).or_insert((0, g));
        *count += 1;
        *best_g = (*best_g).min(g);
    }

    pub(crate) fn remove(&mut self, s: &St) {
        match self.counts.get_mut(s) {
            Some((1, _)) => {
                self.counts.remove(s);
            }
            Some((count, _)) => *count -= 1,
            None => unreachable!("Removed state {s:?} that was never resident"),
        }
    }

    pub(crate) fn contains(&self, s: &St) -> bool {
        self.counts.contains_key(s)
    }

    pub(crate) fn best_g(&self, s: &St) -> Option<Cost> {
        self.counts.get(s).map(|&(_, g)| g)
    }
}
