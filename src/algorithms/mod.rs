//! Implementation of search algorithms.
//!
//! Both strategies share `GraphSearch` and only differ on the `Frontier` they
//! hand it, so they can do path-finding on any search problem.

use derive_more::Display;

use crate::problem::Problem;
use crate::problems::grid::Grid;
use crate::problems::grid::GridAction;
use crate::problems::grid::GridManhattanDistance;
use crate::problems::grid::GridState;

pub mod astar;
pub mod breadth_first;
pub mod graph_search;

pub use graph_search::GraphSearch;
pub use graph_search::SearchOutcome;
pub use graph_search::SearchStatus;

pub type GridOutcome = SearchOutcome<GridState, GridAction>;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[display("BFS")]
    BreadthFirst,
    #[display("A*")]
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::BreadthFirst, Strategy::AStar];
}

/// Solves `grid` to completion with the given strategy.
///
/// The grid is only read, so a single grid can be solved from many threads.
pub fn solve(grid: &Grid, strategy: Strategy) -> GridOutcome {
    match strategy {
        Strategy::BreadthFirst => {
            GraphSearch::new(grid, breadth_first::QueueFrontier::new()).into_outcome()
        }
        Strategy::AStar => GraphSearch::new(
            grid,
            astar::PriorityFrontier::<GridManhattanDistance, _, _>::new(grid.goal()),
        )
        .into_outcome(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::frontier::EmptyFrontierError;
    use crate::frontier::Frontier;
    use crate::search::SearchTreeIndex;
    use crate::search::SearchTreeNode;
    use crate::space::Space;

    fn s(row: u32, col: u32) -> GridState {
        GridState::new(row, col)
    }

    /// Edge count from start to goal, worked out without the search engine.
    fn shortest_distance(grid: &Grid) -> Option<usize> {
        let mut distance = FxHashMap::<GridState, usize>::default();
        let mut queue = VecDeque::from([grid.start()]);
        distance.insert(grid.start(), 0);

        while let Some(s) = queue.pop_front() {
            let d = distance[&s];
            if s == grid.goal() {
                return Some(d);
            }
            for (n, _) in grid.neighbours(&s) {
                distance.entry(n).or_insert_with(|| {
                    queue.push_back(n);
                    d + 1
                });
            }
        }
        None
    }

    fn assert_solves(grid: &Grid, outcome: &GridOutcome) {
        let path = outcome.path.as_ref().unwrap();
        assert!(grid.is_solution(path), "{path} doesn't solve {grid}");
        assert!(path.states().iter().all(|s| !grid.is_wall(s)));
    }

    #[test]
    fn open_grid_is_solved_optimally() {
        let grid = Grid::new_open(3, 3, s(0, 0), s(2, 2)).unwrap();

        for strategy in Strategy::ALL {
            let outcome = solve(&grid, strategy);
            assert_solves(&grid, &outcome);
            assert_eq!(outcome.path.unwrap().len(), 4, "{strategy}");
        }
    }

    #[test]
    fn walled_off_goal_has_no_solution() {
        #[rustfmt::skip]
        let walls = vec![
            vec![false, false, false],
            vec![true,  true,  true],
            vec![false, false, false],
        ];
        let grid = Grid::new(walls, s(0, 0), s(2, 2)).unwrap();

        for strategy in Strategy::ALL {
            let outcome = solve(&grid, strategy);
            assert!(!outcome.is_solved());
            // The whole top row gets expanded.
            assert_eq!(outcome.expansions, 3, "{strategy}");
            assert_eq!(outcome.explored.len(), 3, "{strategy}");
        }
    }

    #[test]
    fn corridor_is_walked_straight() {
        let grid = Grid::new_open(1, 5, s(0, 0), s(0, 4)).unwrap();

        let bfs = solve(&grid, Strategy::BreadthFirst);
        let astar = solve(&grid, Strategy::AStar);
        for outcome in [&bfs, &astar] {
            assert_solves(&grid, outcome);
            assert_eq!(
                outcome.path.as_ref().unwrap().actions(),
                &[GridAction::Right; 4]
            );
            assert_eq!(outcome.expansions, 5);
            assert_eq!(outcome.explored.len(), 4);
        }
    }

    #[test]
    fn astar_expands_less_on_open_grids() {
        let grid = Grid::new_open(5, 5, s(0, 0), s(4, 4)).unwrap();

        let bfs = solve(&grid, Strategy::BreadthFirst);
        let astar = solve(&grid, Strategy::AStar);
        assert_eq!(bfs.path.as_ref().map(|p| p.len()), Some(8));
        assert_eq!(astar.path.as_ref().map(|p| p.len()), Some(8));
        assert_eq!(bfs.expansions, 25);
        assert!(astar.expansions < bfs.expansions);
    }

    #[test]
    fn random_grids_agree_with_reference_distance() {
        for seed in 0..200u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let Some(grid) = Grid::new_random(&mut rng, 12, 15, 0.3) else {
                continue;
            };
            let expected = shortest_distance(&grid);

            let bfs = solve(&grid, Strategy::BreadthFirst);
            let astar = solve(&grid, Strategy::AStar);
            assert_eq!(bfs.path.as_ref().map(|p| p.len()), expected, "seed {seed}");
            assert_eq!(astar.path.as_ref().map(|p| p.len()), expected, "seed {seed}");

            if expected.is_some() {
                assert_solves(&grid, &bfs);
                assert_solves(&grid, &astar);
                assert!(astar.expansions <= bfs.expansions, "seed {seed}");
            }
        }
    }

    #[test]
    fn solving_is_repeatable_and_read_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = Grid::new_random(&mut rng, 20, 20, 0.25).unwrap();
        let before = grid.clone();

        for strategy in Strategy::ALL {
            let a = solve(&grid, strategy);
            let b = solve(&grid, strategy);
            assert_eq!(a.path, b.path);
            assert_eq!(a.expansions, b.expansions);
            assert_eq!(a.explored, b.explored);
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn shared_grid_solves_across_threads() {
        let grid = Grid::new_open(8, 8, s(0, 0), s(7, 7)).unwrap();

        let lengths: Vec<Option<usize>> = std::thread::scope(|scope| {
            let handles: Vec<_> = Strategy::ALL
                .into_iter()
                .map(|strategy| {
                    let grid = &grid;
                    scope.spawn(move || solve(grid, strategy).path.map(|p| p.len()))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(lengths, vec![Some(14), Some(14)]);
    }

    #[test]
    fn start_on_goal_expands_once() {
        let grid = Grid::new_open(3, 3, s(1, 1), s(1, 1)).unwrap();

        for strategy in Strategy::ALL {
            let outcome = solve(&grid, strategy);
            assert_eq!(outcome.path.map(|p| p.len()), Some(0));
            assert_eq!(outcome.expansions, 1);
        }
    }

    #[test]
    fn fixtures_solve_to_known_lengths() {
        use crate::problems::grid_loader::load_grid;

        let expected = [("maze1.txt", Some(10)), ("maze2.txt", Some(19)), ("maze3.txt", None)];
        for (name, length) in expected {
            let grid = load_grid(&std::path::Path::new("data/mazes").join(name)).unwrap();
            for strategy in Strategy::ALL {
                let outcome = solve(&grid, strategy);
                assert_eq!(outcome.path.map(|p| p.len()), length, "{strategy} on {name}");
            }
        }

        for entry in glob::glob("data/mazes/*.txt").unwrap() {
            let grid = load_grid(&entry.unwrap()).unwrap();
            let bfs = solve(&grid, Strategy::BreadthFirst);
            let astar = solve(&grid, Strategy::AStar);
            assert_eq!(bfs.path.map(|p| p.len()), astar.path.map(|p| p.len()));
        }
    }

    /// A* that never re-queues a resident state, even through a shorter path.
    #[derive(Debug)]
    struct FirstVisitFrontier(astar::PriorityFrontier<GridManhattanDistance, GridState, GridAction>);

    impl Frontier<GridState, GridAction> for FirstVisitFrontier {
        fn add(&mut self, node_index: SearchTreeIndex, node: &SearchTreeNode<GridState, GridAction>) {
            self.0.add(node_index, node);
        }
        fn contains_state(&self, s: &GridState) -> bool {
            self.0.contains_state(s)
        }
        fn len(&self) -> usize {
            self.0.len()
        }
        fn remove(&mut self) -> Result<SearchTreeIndex, EmptyFrontierError> {
            self.0.remove()
        }
    }

    #[test]
    fn astar_requeues_states_reached_through_shorter_paths() {
        let grid = Grid::try_from(indoc::indoc! {"
            ......##B
            .......#.
            ...#.....
            .A..#....
        "})
        .unwrap();
        assert_eq!(shortest_distance(&grid), Some(12));

        let bfs = solve(&grid, Strategy::BreadthFirst);
        let astar = solve(&grid, Strategy::AStar);
        assert_eq!(bfs.path.as_ref().map(|p| p.len()), Some(12));
        assert_eq!(astar.path.as_ref().map(|p| p.len()), Some(12));
        assert_solves(&grid, &astar);
        assert_eq!(bfs.expansions, 31);
        assert_eq!(astar.expansions, 21);

        // Queuing each resident state once locks in a detour.
        let first_visit = GraphSearch::new(
            &grid,
            FirstVisitFrontier(astar::PriorityFrontier::new(grid.goal())),
        )
        .into_outcome();
        assert_eq!(first_visit.path.map(|p| p.len()), Some(14));
    }
}
