use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::frontier::EmptyFrontierError;
use crate::frontier::Frontier;
use crate::frontier::ResidentStates;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::State;

/// First-in-first-out frontier.
///
/// Every node at depth `d` is removed before any node at depth `d+1`, so the
/// first goal removed is at minimum edge count.
#[derive(Debug)]
pub struct QueueFrontier<St, A>
where
    St: State,
    A: Action,
{
    queue: VecDeque<(St, SearchTreeIndex)>,
    resident: ResidentStates<St>,

    _phantom_action: PhantomData<A>,
}

impl<St, A> QueueFrontier<St, A>
where
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            resident: ResidentStates::new(),
            _phantom_action: PhantomData,
        }
    }
}

impl<St, A> Default for QueueFrontier<St, A>
where
    St: State,
    A: Action,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> Frontier<St, A> for QueueFrontier<St, A>
where
    St: State,
    A: Action,
{
    fn add(&mut self, node_index: SearchTreeIndex, node: &SearchTreeNode<St, A>) {
        let s = *node.state();
        self.resident.insert(s, node.g());
        self.queue.push_back((s, node_index));
    }

    fn contains_state(&self, s: &St) -> bool {
        self.resident.contains(s)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn remove(&mut self) -> Result<SearchTreeIndex, EmptyFrontierError> {
        let (s, node_index) = self.queue.pop_front().ok_or(EmptyFrontierError)?;
        self.resident.remove(&s);
        Ok(node_index)
    }
}
