use std::path::PathBuf;
use std::process::ExitCode;

use anstream::println;
use clap::Parser;
use indoc::indoc;
use owo_colors::OwoColorize;
use tracing_subscriber::filter::LevelFilter;

use maze_search::algorithms::GraphSearch;
use maze_search::algorithms::GridOutcome;
use maze_search::algorithms::SearchStatus;
use maze_search::algorithms::Strategy;
use maze_search::algorithms::astar::PriorityFrontier;
use maze_search::algorithms::breadth_first::QueueFrontier;
use maze_search::frontier::Frontier;
use maze_search::problem::Problem;
use maze_search::problems::grid::Grid;
use maze_search::problems::grid::GridAction;
use maze_search::problems::grid::GridManhattanDistance;
use maze_search::problems::grid::GridState;
use maze_search::problems::grid_loader::load_grid;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const EXIT_NO_SOLUTION: u8 = 1;
const EXIT_LOAD_FAILURE: u8 = 2;

const DEMO_MAZE: &str = indoc! {"
    #####B#
    ##### #
    ####  #
    #### ##
         ##
    A######
"};

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum StrategyChoice {
    /// Breadth-first search
    Bfs,
    /// A* with the Manhattan distance
    Astar,
    /// Both, checking they agree
    Both,
}

impl StrategyChoice {
    fn strategies(self) -> &'static [Strategy] {
        match self {
            StrategyChoice::Bfs => &[Strategy::BreadthFirst],
            StrategyChoice::Astar => &[Strategy::AStar],
            StrategyChoice::Both => &Strategy::ALL,
        }
    }
}

/// Solves mazes
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Maze files, either text (`.txt`) or images
    #[arg(required_unless_present = "demo")]
    mazes: Vec<PathBuf>,

    #[arg(
        short,
        long,
        env = "MAZE_STRATEGY",
        value_enum,
        default_value_t = StrategyChoice::Both
    )]
    strategy: StrategyChoice,

    /// Prints memory stats after each search
    #[arg(long)]
    stats: bool,

    /// Also solves a built-in maze
    #[arg(long)]
    demo: bool,

    /// More logs, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Fewer logs, repeat for less
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match (self.verbose, self.quiet) {
            (0, 0) => LevelFilter::WARN,
            (1, _) => LevelFilter::INFO,
            (2, _) => LevelFilter::DEBUG,
            (_, 0) => LevelFilter::TRACE,
            (_, 1) => LevelFilter::ERROR,
            (_, _) => LevelFilter::OFF,
        }
    }
}

fn run_search<F>(grid: &Grid, frontier: F, stats: bool) -> std::io::Result<GridOutcome>
where
    F: Frontier<GridState, GridAction>,
{
    let mut search = GraphSearch::new(grid, frontier);
    while search.step() == SearchStatus::Running {}
    if stats {
        search.write_memory_stats(anstream::stdout().lock())?;
    }
    Ok(search.into_outcome())
}

fn solve(grid: &Grid, strategy: Strategy, stats: bool) -> std::io::Result<GridOutcome> {
    match strategy {
        Strategy::BreadthFirst => run_search(grid, QueueFrontier::new(), stats),
        Strategy::AStar => run_search(
            grid,
            PriorityFrontier::<GridManhattanDistance, _, _>::new(grid.goal()),
            stats,
        ),
    }
}

/// Solves one maze and reports it, returning whether every strategy found a
/// path.
fn report(name: &str, grid: &Grid, args: &Args) -> std::io::Result<bool> {
    println!("{} {}", "Maze".bold(), name.cyan());
    println!("{grid}");

    let mut lengths = vec![];
    for &strategy in args.strategy.strategies() {
        let outcome = solve(grid, strategy, args.stats)?;
        let explored = outcome.explored.len();
        match outcome.path {
            Some(path) => {
                println!(
                    "{}: {} moves, {} states explored",
                    strategy.green(),
                    path.len(),
                    explored
                );
                let moves: Vec<&str> = path.actions().iter().map(GridAction::name).collect();
                println!("  {}", moves.join(", "));
                println!("{}", grid.with_path(&path));
                lengths.push(Some(path.len()));
            }
            None => {
                println!(
                    "{}: {} ({} states explored)",
                    strategy.yellow(),
                    "No solution.".red(),
                    explored
                );
                lengths.push(None);
            }
        }
    }

    if lengths.windows(2).any(|w| w[0] != w[1]) {
        log::error!("Strategies disagree on {name}: {lengths:?}");
    }

    Ok(lengths.iter().all(Option::is_some))
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.color.write_global();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    let mut mazes = vec![];
    if args.demo {
        mazes.push(("demo".to_string(), Grid::try_from(DEMO_MAZE)));
    }
    for p in &args.mazes {
        mazes.push((p.display().to_string(), load_grid(p)));
    }

    let mut exit_code = 0u8;
    for (name, grid) in &mazes {
        let grid = match grid {
            Ok(grid) => grid,
            Err(e) => {
                log::error!("Couldn't load {name}: {e}");
                exit_code = exit_code.max(EXIT_LOAD_FAILURE);
                continue;
            }
        };

        match report(name, grid, &args) {
            Ok(true) => {}
            Ok(false) => exit_code = exit_code.max(EXIT_NO_SOLUTION),
            Err(e) => {
                log::error!("Couldn't write the report for {name}: {e}");
                exit_code = exit_code.max(EXIT_LOAD_FAILURE);
            }
        }
    }

    ExitCode::from(exit_code)
}
