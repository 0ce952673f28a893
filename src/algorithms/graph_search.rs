use std::marker::PhantomData;

use derive_more::Display;
use rustc_hash::FxHashSet;

use crate::frontier::Frontier;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    /// The goal was removed from the frontier.
    Succeeded,
    /// The frontier ran out of nodes, the goal is unreachable.
    Failed,
}

/// What a finished search leaves behind.
#[derive(Debug)]
pub struct SearchOutcome<St, A>
where
    St: State,
    A: Action,
{
    pub path: Option<Path<St, A>>,
    /// Nodes removed from the frontier, the goal included.
    pub expansions: usize,
    /// Nodes created, the root included.
    pub generated: usize,
    /// States that were expanded. The goal is never in here.
    pub explored: FxHashSet<St>,
}

impl<St, A> SearchOutcome<St, A>
where
    St: State,
    A: Action,
{
    pub fn is_solved(&self) -> bool {
        self.path.is_some()
    }
}

/// Graph search over a Problem, with the expansion order left to a Frontier.
///
/// States are expanded at most once. A successor is only queued when it's
/// not explored and the frontier admits it, which also keeps the search from
/// bouncing between a move and its inverse.
#[derive(Debug)]
pub struct GraphSearch<'p, P, F, Sp, St, A>
where
    P: Problem<Sp, St, A>,
    F: Frontier<St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    problem: &'p P,

    /// All the Search Nodes, linked to their parents.
    search_tree: SearchTree<St, A>,

    /// Nodes waiting to be expanded.
    frontier: F,

    /// The "Closed Set".
    explored: FxHashSet<St>,

    status: SearchStatus,
    goal_node: Option<SearchTreeIndex>,
    expansions: usize,

    _phantom_space: PhantomData<Sp>,
}

impl<'p, P, F, Sp, St, A> GraphSearch<'p, P, F, Sp, St, A>
where
    P: Problem<Sp, St, A>,
    F: Frontier<St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    /// Seeds `frontier` with the problem's start.
    ///
    /// The frontier must be empty.
    #[must_use]
    pub fn new(problem: &'p P, mut frontier: F) -> Self {
        debug_assert!(frontier.is_empty(), "Searches need a fresh frontier");

        let mut search_tree = SearchTree::<St, A>::new();
        let root = search_tree.push_root(problem.start());
        frontier.add(root, &search_tree[root]);

        log::debug!(
            "Searching from {:?} to {:?} on {:?}",
            problem.start(),
            problem.goal(),
            problem.space()
        );

        Self {
            problem,
            search_tree,
            frontier,
            explored: FxHashSet::default(),

            status: SearchStatus::Running,
            goal_node: None,
            expansions: 0,

            _phantom_space: PhantomData,
        }
    }

    /// Runs one iteration of the search loop.
    ///
    /// Once the search has succeeded or failed this does nothing.
    pub fn step(&mut self) -> SearchStatus {
        if self.status != SearchStatus::Running {
            return self.status;
        }

        let Some(node_index) = self.next_unexplored() else {
            log::debug!(
                "No path after {} expansions ({} nodes)",
                self.expansions,
                self.search_tree.len()
            );
            self.status = SearchStatus::Failed;
            return self.status;
        };
        self.expansions += 1;

        let node: &SearchTreeNode<St, A> = &self.search_tree[node_index];
        let state = *node.state();
        log::trace!("Expanding {state:?} (g={})", node.g());

        if self.problem.is_goal(&state) {
            log::debug!(
                "Reached {state:?} at g={} after {} expansions",
                node.g(),
                self.expansions
            );
            self.goal_node = Some(node_index);
            self.status = SearchStatus::Succeeded;
            return self.status;
        }

        self.explored.insert(state);

        let child_g = node.g() + 1;
        for (s, a) in self.problem.space().neighbours(&state) {
            if self.explored.contains(&s) || !self.frontier.admits(&s, child_g) {
                continue;
            }
            let child = self.search_tree.push_child(node_index, s, a);
            self.frontier.add(child, &self.search_tree[child]);
        }

        self.status
    }

    /// Removes frontier nodes until one has a state that wasn't expanded yet.
    ///
    /// The others were superseded by a shorter path to their state, and
    /// don't count as expansions.
    fn next_unexplored(&mut self) -> Option<SearchTreeIndex> {
        while !self.frontier.is_empty() {
            let node_index = match self.frontier.remove() {
                Ok(node_index) => node_index,
                Err(e) => unreachable!("{e} right after checking it had nodes"),
            };
            let s = self.search_tree[node_index].state();
            if !self.explored.contains(s) {
                return Some(node_index);
            }
            log::trace!("Skipping superseded node for {s:?}");
        }
        None
    }

    /// Steps until the search succeeds or fails.
    pub fn run(&mut self) -> Option<Path<St, A>> {
        while self.step() == SearchStatus::Running {}
        self.solution()
    }

    /// The path to the goal, once it was found.
    #[must_use]
    pub fn solution(&self) -> Option<Path<St, A>> {
        self.goal_node.map(|i| self.search_tree.path(i))
    }

    /// Runs the search to completion and keeps its results.
    #[must_use]
    pub fn into_outcome(mut self) -> SearchOutcome<St, A> {
        let path = self.run();
        SearchOutcome {
            path,
            expansions: self.expansions,
            generated: self.search_tree.len(),
            explored: self.explored,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }
    pub fn expansions(&self) -> usize {
        self.expansions
    }
    pub fn generated(&self) -> usize {
        self.search_tree.len()
    }
    pub fn explored(&self) -> &FxHashSet<St> {
        &self.explored
    }
    pub fn frontier(&self) -> &F {
        &self.frontier
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "GraphSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, A>>();
        let l = self.search_tree.len();
        writeln!(
            out,
            "  - |Nodes|:    {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let l = self.frontier.len();
        writeln!(out, "  - |Frontier|: {}", l.separate_with_commas())?;

        let s = size_of::<St>();
        let l = self.explored.len();
        let c = self.explored.capacity();
        writeln!(
            out,
            "  - |Explored|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Explored|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.expansions.separate_with_commas()
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::algorithms::astar::PriorityFrontier;
    use crate::algorithms::breadth_first::QueueFrontier;
    use crate::problems::grid::Grid;
    use crate::problems::grid::GridAction;
    use crate::problems::grid::GridManhattanDistance;
    use crate::problems::grid::GridState;

    fn s(row: u32, col: u32) -> GridState {
        GridState::new(row, col)
    }

    #[test]
    fn step_walks_through_statuses() {
        let grid = Grid::new_open(1, 3, s(0, 0), s(0, 2)).unwrap();
        let mut search = GraphSearch::new(&grid, QueueFrontier::new());

        assert_eq!(search.status(), SearchStatus::Running);
        assert_eq!(search.solution(), None);
        assert_eq!(search.step(), SearchStatus::Running);
        assert_eq!(search.frontier().len(), 1);
        assert_eq!(search.step(), SearchStatus::Running);
        assert_eq!(search.step(), SearchStatus::Succeeded);
        assert_eq!(search.expansions(), 3);
        assert_eq!(search.explored().len(), 2);
        assert_eq!(search.generated(), 3);

        // Terminal states stick.
        assert_eq!(search.step(), SearchStatus::Succeeded);
        assert_eq!(search.expansions(), 3);

        let path = search.solution().unwrap();
        assert_eq!(path.actions(), &[GridAction::Right, GridAction::Right]);
    }

    #[test]
    fn exhaustion_fails() {
        let grid = Grid::new(vec![vec![false, true, false]], s(0, 0), s(0, 2)).unwrap();
        let mut search = GraphSearch::new(
            &grid,
            PriorityFrontier::<GridManhattanDistance, _, _>::new(grid.goal()),
        );

        assert_eq!(search.run(), None);
        assert_eq!(search.status(), SearchStatus::Failed);
        assert_eq!(search.expansions(), 1);
        assert_eq!(search.step(), SearchStatus::Failed);
    }

    #[test]
    fn start_on_goal_is_an_empty_path() {
        let grid = Grid::new_open(2, 2, s(1, 1), s(1, 1)).unwrap();
        let outcome = GraphSearch::new(&grid, QueueFrontier::new()).into_outcome();

        let path = outcome.path.unwrap();
        assert!(path.is_empty());
        assert_eq!(path.end(), s(1, 1));
        assert_eq!(outcome.expansions, 1);
        assert_eq!(outcome.generated, 1);
        assert!(outcome.explored.is_empty());
    }

    #[test]
    fn never_queues_a_state_twice() {
        let grid = Grid::new_open(6, 6, s(0, 0), s(5, 5)).unwrap();
        let outcome = GraphSearch::new(&grid, QueueFrontier::new()).into_outcome();

        // Every cell gets at most one node.
        assert!(outcome.generated <= 36);
        assert_eq!(outcome.explored.len() + 1, outcome.expansions);
    }

    #[test]
    fn outcome_of_a_finished_search_keeps_its_counts() {
        let grid = Grid::new_open(4, 4, s(0, 0), s(3, 3)).unwrap();
        let fresh = GraphSearch::new(&grid, QueueFrontier::new()).into_outcome();

        let mut search = GraphSearch::new(&grid, QueueFrontier::new());
        while search.step() == SearchStatus::Running {}
        let expansions = search.expansions();
        let generated = search.generated();
        let outcome = search.into_outcome();

        assert_eq!(outcome.expansions, expansions);
        assert_eq!(outcome.generated, generated);
        assert_eq!(outcome.expansions, fresh.expansions);
        assert_eq!(outcome.path, fresh.path);
    }

    #[test]
    fn memory_stats_report_expansions() {
        let grid = Grid::new_open(3, 3, s(0, 0), s(2, 2)).unwrap();
        let mut search = GraphSearch::new(&grid, QueueFrontier::new());
        let _ = search.run();

        let mut out = Vec::<u8>::new();
        search.write_memory_stats(&mut out).unwrap();
        let stats = String::from_utf8(out).unwrap();
        assert!(stats.starts_with("GraphSearch Stats:"));
        assert!(stats.contains(&format!("Expanded nodes: {}", search.expansions())));
    }
}
