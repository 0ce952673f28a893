use derive_more::Display;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::problem::ObjectiveHeuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 40;
const RANDOM_STATE_MAX_TRIES: usize = 10_000;

pub type Coord = u32;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({row},{col})")]
pub struct GridState {
    pub row: Coord,
    pub col: Coord,
}

impl GridState {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }
    pub fn new_from_usize(row: usize, col: usize) -> Option<Self> {
        Some(Self {
            row: Coord::try_from(row).ok()?,
            col: Coord::try_from(col).ok()?,
        })
    }
}
impl State for GridState {}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridAction {
    #[display("↑")]
    Up = 0, // row--
    #[display("↓")]
    Down = 1, // row++
    #[display("←")]
    Left = 2, // col--
    #[display("→")]
    Right = 3, // col++
}
impl Action for GridAction {}

impl GridAction {
    /// All moves, in expansion order.
    pub const ALL: [GridAction; 4] = [
        GridAction::Up,
        GridAction::Down,
        GridAction::Left,
        GridAction::Right,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GridAction::Up => "up",
            GridAction::Down => "down",
            GridAction::Left => "left",
            GridAction::Right => "right",
        }
    }

    pub fn inverse(&self) -> GridAction {
        match self {
            GridAction::Up => GridAction::Down,
            GridAction::Down => GridAction::Up,
            GridAction::Left => GridAction::Right,
            GridAction::Right => GridAction::Left,
        }
    }

    /// Offsets as wrapping deltas, so moving off the top or left edge lands
    /// on `Coord::MAX` and fails the bounds check.
    #[inline(always)]
    fn delta(&self) -> (Coord, Coord) {
        let prev = Coord::MAX;
        let same = 0 as Coord;
        let next = 1 as Coord;

        #[rustfmt::skip]
        let d = match self {
            GridAction::Up    => (prev, same),
            GridAction::Down  => (next, same),
            GridAction::Left  => (same, prev),
            GridAction::Right => (same, next),
        };
        d
    }

    /// The cell one move away, ignoring grid bounds.
    #[inline(always)]
    fn step(&self, s: &GridState) -> GridState {
        let (dr, dc) = self.delta();
        GridState {
            row: s.row.wrapping_add(dr),
            col: s.col.wrapping_add(dc),
        }
    }
}

/// `|Δrow| + |Δcol|`
#[inline(always)]
pub fn manhattan_distance(a: &GridState, b: &GridState) -> Cost {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grids need at least one row and one column")]
    Empty,
    #[error("Row {row} has {len} cells, expected {width}")]
    Ragged { row: usize, len: usize, width: usize },
    #[error("Grid of {height}x{width} is too large")]
    TooLarge { height: usize, width: usize },
    #[error("Start {0} is out of bounds")]
    StartOutOfBounds(GridState),
    #[error("Goal {0} is out of bounds")]
    GoalOutOfBounds(GridState),
    #[error("Start {0} is a wall")]
    StartOnWall(GridState),
    #[error("Goal {0} is a wall")]
    GoalOnWall(GridState),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Moving {action:?} from {from} leaves the grid")]
    OutOfBounds { from: GridState, action: GridAction },
    #[error("Moving {action:?} from {from} runs into a wall at {to}")]
    Blocked {
        from: GridState,
        action: GridAction,
        to: GridState,
    },
}

/// A rectangular maze with a single start and goal.
///
/// `walls[row][col]` is `true` for blocked cells. Grids are validated on
/// construction and never change afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    height: Coord,
    width: Coord,
    walls: Vec<Vec<bool>>,
    start: GridState,
    goal: GridState,
}

impl Grid {
    pub fn new(walls: Vec<Vec<bool>>, start: GridState, goal: GridState) -> Result<Self, GridError> {
        let height = walls.len();
        let width = walls.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, line)) = walls.iter().enumerate().find(|(_, l)| l.len() != width) {
            return Err(GridError::Ragged {
                row,
                len: line.len(),
                width,
            });
        }
        let (Ok(h), Ok(w)) = (Coord::try_from(height), Coord::try_from(width)) else {
            return Err(GridError::TooLarge { height, width });
        };
        // Moves off the top/left edge wrap to `Coord::MAX`, keep it out of bounds.
        if h == Coord::MAX || w == Coord::MAX {
            return Err(GridError::TooLarge { height, width });
        }

        let grid = Self {
            height: h,
            width: w,
            walls,
            start,
            goal,
        };
        if !grid.valid(&start) {
            return Err(GridError::StartOutOfBounds(start));
        }
        if !grid.valid(&goal) {
            return Err(GridError::GoalOutOfBounds(goal));
        }
        if grid.is_wall(&start) {
            return Err(GridError::StartOnWall(start));
        }
        if grid.is_wall(&goal) {
            return Err(GridError::GoalOnWall(goal));
        }

        Ok(grid)
    }

    /// A grid without walls.
    pub fn new_open(height: usize, width: usize, start: GridState, goal: GridState) -> Result<Self, GridError> {
        Self::new(vec![vec![false; width]; height], start, goal)
    }

    /// A random grid where each cell is a wall with probability
    /// `wall_probability`, and start and goal are distinct open cells.
    ///
    /// Start and goal may end up disconnected. `None` when `wall_probability`
    /// isn't within `[0, 1]`.
    pub fn new_random<R: rand::Rng>(
        r: &mut R,
        height: usize,
        width: usize,
        wall_probability: f64,
    ) -> Option<Self> {
        let wall = rand::distr::Bernoulli::new(wall_probability).ok()?;
        let walls: Vec<Vec<bool>> = (0..height)
            .map(|_| (0..width).map(|_| r.sample(wall)).collect())
            .collect();

        let start = Self::random_open_cell(r, &walls)?;
        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let goal = Self::random_open_cell(r, &walls)?;
            if goal != start {
                return Self::new(walls, start, goal).ok();
            }
        }

        None
    }

    fn random_open_cell<R: rand::Rng>(r: &mut R, walls: &[Vec<bool>]) -> Option<GridState> {
        let height = walls.len();
        let width = walls.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return None;
        }

        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let row = r.random_range(0..height);
            let col = r.random_range(0..width);
            if !walls[row][col] {
                return GridState::new_from_usize(row, col);
            }
        }

        None
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }
    pub fn width(&self) -> usize {
        self.width as usize
    }
    /// `(height, width)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height(), self.width())
    }
    pub fn walls(&self) -> &[Vec<bool>] {
        &self.walls
    }

    /// Whether `s` is blocked. Out-of-bounds states count as walls.
    #[inline(always)]
    pub fn is_wall(&self, s: &GridState) -> bool {
        if !self.valid(s) {
            return true;
        }
        self.walls[s.row as usize][s.col as usize]
    }

    /// Applies a move requested from outside the search.
    ///
    /// Illegal moves are errors so misuse isn't silently clamped.
    pub fn try_apply(&self, from: &GridState, action: GridAction) -> Result<GridState, ActionError> {
        let to = action.step(from);
        if !self.valid(from) || !self.valid(&to) {
            return Err(ActionError::OutOfBounds {
                from: *from,
                action,
            });
        }
        if self.is_wall(&to) {
            return Err(ActionError::Blocked {
                from: *from,
                action,
                to,
            });
        }
        Ok(to)
    }
}

impl Space<GridState, GridAction> for Grid {
    #[inline(always)]
    fn apply(&self, s: &GridState, a: &GridAction) -> Option<GridState> {
        self.try_apply(s, *a).ok()
    }

    #[inline(always)]
    fn valid(&self, s: &GridState) -> bool {
        s.row < self.height && s.col < self.width
    }

    /// Gets the open neighbours of a given position, in `GridAction::ALL`
    /// order.
    fn neighbours(&self, s: &GridState) -> Vec<(GridState, GridAction)> {
        let mut v = Vec::<(GridState, GridAction)>::with_capacity(GridAction::ALL.len());

        for action in GridAction::ALL {
            let n = action.step(s);
            if self.valid(&n) && !self.is_wall(&n) {
                v.push((n, action));
            }
        }
        v
    }

    fn size(&self) -> Option<usize> {
        Some(self.height() * self.width())
    }
}

impl Problem<Grid, GridState, GridAction> for Grid {
    fn space(&self) -> &Grid {
        self
    }
    fn start(&self) -> GridState {
        self.start
    }
    fn goal(&self) -> GridState {
        self.goal
    }
}

impl Grid {
    /// Draws the grid with the states on `path` marked.
    pub fn with_path<'g>(&'g self, path: &Path<GridState, GridAction>) -> GridWithPath<'g> {
        GridWithPath {
            grid: self,
            on_path: path.states().iter().copied().collect(),
        }
    }

    fn write_cells<F>(&self, f: &mut std::fmt::Formatter, on_path: F) -> std::fmt::Result
    where
        F: Fn(&GridState) -> bool,
    {
        writeln!(
            f,
            "Grid({}x{}) (s:{}, g:{}):",
            self.height, self.width, self.start, self.goal
        )?;
        for (row, line) in self.walls.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (col, wall) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let s = GridState::new(row as Coord, col as Coord);
                if s == self.start {
                    write!(f, "A")?;
                } else if s == self.goal {
                    write!(f, "B")?;
                } else if *wall {
                    write!(f, "█")?;
                } else if on_path(&s) {
                    write!(f, "*")?;
                } else {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.write_cells(f, |_| false)
    }
}

/// A Grid drawn with a path over it, see [`Grid::with_path`].
#[derive(Debug)]
pub struct GridWithPath<'g> {
    grid: &'g Grid,
    on_path: FxHashSet<GridState>,
}

impl std::fmt::Display for GridWithPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.grid.write_cells(f, |s| self.on_path.contains(s))
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid{:?}", self.dimensions())
    }
}

#[derive(Debug)]
pub struct GridManhattanDistance;

impl ObjectiveHeuristic<GridState> for GridManhattanDistance {
    #[inline(always)]
    fn h(s: &GridState, goal: &GridState) -> Cost {
        manhattan_distance(s, goal)
    }
}
