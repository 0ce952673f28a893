#![no_main]

use libfuzzer_sys::fuzz_target;

use maze_search::algorithms::Strategy;
use maze_search::algorithms::solve;
use maze_search::problem::Problem;
use maze_search::problems::grid::Grid;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Keep mazes small enough for BFS to finish quickly.
    if text.len() > 4096 {
        return;
    }
    let Ok(grid) = Grid::try_from(text) else {
        return;
    };

    let bfs = solve(&grid, Strategy::BreadthFirst);
    let astar = solve(&grid, Strategy::AStar);
    assert_eq!(
        bfs.path.as_ref().map(|p| p.len()),
        astar.path.as_ref().map(|p| p.len())
    );
    assert!(astar.expansions <= bfs.expansions);
    for path in [bfs.path, astar.path].into_iter().flatten() {
        assert!(grid.is_solution(&path));
    }
});
