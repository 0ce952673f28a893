//! Loads mazes from disk into a `Grid`.
//!
//! Text mazes use `A` for the start, `B` for the goal and `#` for walls. Any
//! other character is open, and short lines are padded with open cells.
//!
//! Image mazes use black walls, a blue start and a green goal.

use std::path::Path;
use std::path::PathBuf;

use derive_more::Display;
use thiserror::Error;

use crate::problems::grid::Grid;
use crate::problems::grid::GridError;
use crate::problems::grid::GridState;

// Simple colours
const BLACK: [u8; 3] = [u8::MIN, u8::MIN, u8::MIN];
const GREEN: [u8; 3] = [u8::MIN, u8::MAX, u8::MIN];
const BLUE: [u8; 3] = [u8::MIN, u8::MIN, u8::MAX];

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum GridCell {
    #[display(" ")]
    Empty,
    #[display("█")]
    Wall,
    #[display("A")]
    Start,
    #[display("B")]
    Goal,
}

impl std::convert::From<char> for GridCell {
    fn from(ch: char) -> Self {
        match ch {
            'A' => GridCell::Start,
            'B' => GridCell::Goal,
            '#' | '█' => GridCell::Wall,
            _ => GridCell::Empty,
        }
    }
}

impl std::convert::From<[u8; 3]> for GridCell {
    fn from(px: [u8; 3]) -> Self {
        match px {
            BLACK => GridCell::Wall,
            BLUE => GridCell::Start,
            GREEN => GridCell::Goal,
            _ => GridCell::Empty,
        }
    }
}

#[derive(Debug, Error)]
pub enum GridParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Maze must have exactly one start point, found {0}")]
    StartCount(usize),
    #[error("Maze must have exactly one goal, found {0}")]
    GoalCount(usize),
    #[error("Invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
    #[error("Extension not supported: '{p}'")]
    UnsupportedExtension { p: PathBuf },
    #[error("I/O error when loading '{p}': {e}")]
    IOError { p: PathBuf, e: std::io::Error },
    #[error("Image error when loading '{p}': {e}")]
    ImageError { p: PathBuf, e: image::ImageError },
}

/// Collects cells row by row, tracking where starts and goals were seen.
struct GridBuilder {
    walls: Vec<Vec<bool>>,
    starts: Vec<GridState>,
    goals: Vec<GridState>,
}

impl GridBuilder {
    fn new(height: usize, width: usize) -> Self {
        Self {
            walls: vec![vec![false; width]; height],
            starts: vec![],
            goals: vec![],
        }
    }

    fn set(&mut self, row: usize, col: usize, cell: GridCell) -> Result<(), GridParseError> {
        let s = || {
            GridState::new_from_usize(row, col).ok_or(GridError::TooLarge {
                height: row + 1,
                width: col + 1,
            })
        };
        match cell {
            GridCell::Wall => self.walls[row][col] = true,
            GridCell::Empty => {}
            GridCell::Start => self.starts.push(s()?),
            GridCell::Goal => self.goals.push(s()?),
        }
        Ok(())
    }

    fn build(self) -> Result<Grid, GridParseError> {
        let [start] = self.starts[..] else {
            return Err(GridParseError::StartCount(self.starts.len()));
        };
        let [goal] = self.goals[..] else {
            return Err(GridParseError::GoalCount(self.goals.len()));
        };
        Ok(Grid::new(self.walls, start, goal)?)
    }
}

impl std::convert::TryFrom<&str> for Grid {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().collect();
        let max_x = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max_y = lines.len();
        if max_x == 0 {
            return Err(GridParseError::EmptyInput);
        }

        let mut builder = GridBuilder::new(max_y, max_x);
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                builder.set(y, x, GridCell::from(ch))?;
            }
        }

        builder.build()
    }
}

impl std::str::FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::try_from(s)
    }
}

impl std::convert::TryFrom<&Path> for Grid {
    type Error = GridParseError;

    /// Loads an image maze.
    fn try_from(p: &Path) -> Result<Self, Self::Error> {
        use image::ImageReader;
        use image::Rgb;

        let img = ImageReader::open(p)
            .map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| GridParseError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .into_rgb8();

        let max_x = img.width() as usize;
        let max_y = img.height() as usize;
        if max_x == 0 || max_y == 0 {
            return Err(GridParseError::EmptyInput);
        }

        let mut builder = GridBuilder::new(max_y, max_x);
        for (x, y, px) in img.enumerate_pixels() {
            let px: &Rgb<u8> = px;
            builder.set(y as usize, x as usize, GridCell::from(px.0))?;
        }

        builder.build()
    }
}

/// Loads a maze, picking the format from the file extension.
pub fn load_grid(p: &Path) -> Result<Grid, GridParseError> {
    let extension = p.extension().and_then(|e| e.to_str()).map(str::to_lowercase);

    match extension.as_deref() {
        Some("txt") => {
            let contents = std::fs::read_to_string(p).map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?;
            Grid::try_from(contents.as_str())
        }
        Some(ext) if image::ImageFormat::from_extension(ext).is_some() => Grid::try_from(p),
        _ => Err(GridParseError::UnsupportedExtension { p: p.to_path_buf() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::problem::Problem;

    #[test]
    fn parses_text_maze() {
        let grid = Grid::try_from(indoc! {"
            ##B
            A #
        "})
        .unwrap();

        assert_eq!(grid.dimensions(), (2, 3));
        assert_eq!(grid.start(), GridState::new(1, 0));
        assert_eq!(grid.goal(), GridState::new(0, 2));
        assert_eq!(
            grid.walls(),
            &[vec![true, true, false], vec![false, false, true]]
        );
    }

    #[test]
    fn pads_short_lines_with_open_cells() {
        let grid: Grid = "A\n  #\n B".parse().unwrap();

        assert_eq!(grid.dimensions(), (3, 3));
        assert_eq!(grid.walls()[0], vec![false, false, false]);
        assert_eq!(grid.walls()[1], vec![false, false, true]);
        assert_eq!(grid.goal(), GridState::new(2, 1));
    }

    #[test]
    fn rejects_bad_markers() {
        assert!(matches!(
            Grid::try_from(""),
            Err(GridParseError::EmptyInput)
        ));
        assert!(matches!(
            Grid::try_from("\n\n"),
            Err(GridParseError::EmptyInput)
        ));
        assert!(matches!(
            Grid::try_from("  B"),
            Err(GridParseError::StartCount(0))
        ));
        assert!(matches!(
            Grid::try_from("A A B"),
            Err(GridParseError::StartCount(2))
        ));
        assert!(matches!(
            Grid::try_from("A  "),
            Err(GridParseError::GoalCount(0))
        ));
        assert!(matches!(
            Grid::try_from("AB\nB#"),
            Err(GridParseError::GoalCount(2))
        ));
    }

    #[test]
    fn display_round_trips_markers() {
        let text = "A #\n  B\n";
        let grid = Grid::try_from(text).unwrap();
        let shown = grid.to_string();
        let body: String = shown.lines().skip(1).map(|l| format!("{l}\n")).collect();

        let again = Grid::try_from(body.as_str()).unwrap();
        assert_eq!(again, grid);
    }

    #[test]
    fn loads_fixtures() {
        let grid = load_grid(Path::new("data/mazes/maze1.txt")).unwrap();
        assert!(!grid.is_wall(&grid.start()));
        assert!(!grid.is_wall(&grid.goal()));

        assert!(matches!(
            load_grid(Path::new("data/mazes/missing.txt")),
            Err(GridParseError::IOError { .. })
        ));
        assert!(matches!(
            load_grid(Path::new("data/mazes/maze1.maze")),
            Err(GridParseError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn loads_image_mazes() {
        use image::Rgb;
        use image::RgbImage;

        let mut img = RgbImage::from_pixel(4, 2, Rgb([u8::MAX; 3]));
        img.put_pixel(0, 0, Rgb(BLUE));
        img.put_pixel(1, 0, Rgb(BLACK));
        img.put_pixel(3, 1, Rgb(GREEN));

        let dir = std::env::temp_dir().join(format!("maze-search-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let p = dir.join("tiny.png");
        img.save(&p).unwrap();

        let grid = load_grid(&p).unwrap();
        assert_eq!(grid.dimensions(), (2, 4));
        assert_eq!(grid.start(), GridState::new(0, 0));
        assert_eq!(grid.goal(), GridState::new(1, 3));
        assert!(grid.is_wall(&GridState::new(0, 1)));
        assert!(!grid.is_wall(&GridState::new(1, 1)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
