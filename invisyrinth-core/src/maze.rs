//! The authoritative maze: grid, player position, goal test.
//!
//! [`Maze`] is the only place that decides whether a move is legal. It is a
//! plain state machine with no I/O; the maze session renders it after every
//! operation.

use crate::config::{GOAL, GRID_COLS, GRID_ROWS, MAZE_LAYOUT, START};
use crate::output::{OutputError, PixelMatrix};
use heapless::String;
use invisyrinth_proto::{MoveVector, Status};

/// Glyph for a wall in layouts and text renderings.
pub const WALL_GLYPH: u8 = b'#';

/// One grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cell {
    Open,
    Wall,
}

/// Grid coordinates, row 0 at the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shift by a move vector; `None` if either coordinate would go negative.
    #[must_use]
    pub fn offset(self, vector: MoveVector) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(vector.dr() as isize)?,
            col: self.col.checked_add_signed(vector.dc() as isize)?,
        })
    }
}

/// Errors building a maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridError {
    /// A layout row does not have exactly [`GRID_COLS`] cells.
    RowLength { row: usize },
    /// The start cell is outside the grid or a wall.
    StartBlocked,
    /// The goal cell is outside the grid or a wall.
    GoalBlocked,
}

/// Fixed-size rectangular wall map. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    cells: [[Cell; GRID_COLS]; GRID_ROWS],
}

impl MazeGrid {
    /// Parse a layout of `#` (wall) and any other byte (open).
    pub const fn parse(layout: &[&str; GRID_ROWS]) -> Result<Self, GridError> {
        let mut cells = [[Cell::Open; GRID_COLS]; GRID_ROWS];

        let mut row = 0;
        while row < GRID_ROWS {
            let bytes = layout[row].as_bytes();
            if bytes.len() != GRID_COLS {
                return Err(GridError::RowLength { row });
            }
            let mut col = 0;
            while col < GRID_COLS {
                if bytes[col] == WALL_GLYPH {
                    cells[row][col] = Cell::Wall;
                }
                col += 1;
            }
            row += 1;
        }

        Ok(Self { cells })
    }

    /// Cell at `pos`, `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    /// True if the player may stand on `pos`.
    #[inline]
    #[must_use]
    pub const fn is_open(&self, pos: Position) -> bool {
        pos.row < GRID_ROWS
            && pos.col < GRID_COLS
            && matches!(self.cells[pos.row][pos.col], Cell::Open)
    }
}

/// The built-in layout, checked at compile time.
pub const STANDARD_GRID: MazeGrid = match MazeGrid::parse(&MAZE_LAYOUT) {
    Ok(grid) => grid,
    Err(_) => panic!("MAZE_LAYOUT rows must be GRID_COLS wide"),
};

// `Maze::standard` relies on these instead of the checks in `Maze::new`.
const _: () = {
    assert!(STANDARD_GRID.is_open(START), "START must be an open cell");
    assert!(STANDARD_GRID.is_open(GOAL), "GOAL must be an open cell");
};

/// Maze state machine: the grid, a fixed start and goal, and the player.
///
/// Reaching the goal is not terminal. Further steps are applied as usual
/// and the goal test runs again after every successful move.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: MazeGrid,
    start: Position,
    goal: Position,
    position: Position,
}

impl Maze {
    /// Build a maze; start and goal must be open cells.
    pub fn new(grid: MazeGrid, start: Position, goal: Position) -> Result<Self, GridError> {
        if !grid.is_open(start) {
            return Err(GridError::StartBlocked);
        }
        if !grid.is_open(goal) {
            return Err(GridError::GoalBlocked);
        }
        Ok(Self {
            grid,
            start,
            goal,
            position: start,
        })
    }

    /// The built-in layout with its start and goal.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            grid: STANDARD_GRID,
            start: START,
            goal: GOAL,
            position: START,
        }
    }

    /// Try to move the player.
    ///
    /// Blocked moves (wall or off the grid) leave the position unchanged and
    /// echo the vector back in [`Status::Wall`].
    pub fn apply_step(&mut self, vector: MoveVector) -> Status {
        let target = match self.position.offset(vector) {
            Some(target) if self.grid.is_open(target) => target,
            _ => return Status::Wall(vector),
        };

        self.position = target;

        if self.is_at_goal() {
            Status::Goal
        } else {
            Status::Ok
        }
    }

    /// Put the player back on the start cell.
    pub fn reset(&mut self) {
        self.position = self.start;
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn goal(&self) -> Position {
        self.goal
    }

    #[inline]
    #[must_use]
    pub fn is_at_goal(&self) -> bool {
        self.position == self.goal
    }

    /// Whether the matrix pixel for `pos` is lit.
    ///
    /// Walls and the player are lit; the goal is always dark so it reads as
    /// a gap in the outer wall.
    #[must_use]
    pub fn pixel(&self, pos: Position) -> bool {
        if pos == self.goal {
            return false;
        }
        pos == self.position || self.grid.cell(pos) == Some(Cell::Wall)
    }

    /// Draw the maze onto a pixel matrix (x = column, y = row) and present it.
    pub fn draw<M: PixelMatrix>(&self, matrix: &mut M) -> Result<(), OutputError> {
        matrix.clear()?;
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                matrix.set_pixel(col, row, self.pixel(Position::new(row, col)))?;
            }
        }
        matrix.present()
    }

    /// One row as text: `#` walls, `P` player, `G` goal.
    ///
    /// The goal glyph wins when the player stands on it.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String<GRID_COLS> {
        let mut text = String::new();
        for col in 0..GRID_COLS {
            let pos = Position::new(row, col);
            let glyph = if pos == self.goal {
                'G'
            } else if pos == self.position {
                'P'
            } else if self.grid.cell(pos) == Some(Cell::Wall) {
                '#'
            } else {
                ' '
            };
            // GRID_COLS single-byte glyphs always fit.
            let _ = text.push(glyph);
        }
        text
    }
}

impl core::fmt::Display for Maze {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for row in 0..GRID_ROWS {
            writeln!(f, "{}", self.row_text(row))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;
    use crate::mock::MockMatrix;

    fn maze_at(row: usize, col: usize) -> Maze {
        let mut maze = Maze::standard();
        maze.position = Position::new(row, col);
        maze
    }

    #[test]
    fn test_standard_layout() {
        let grid = &STANDARD_GRID;
        assert_eq!(grid.cell(Position::new(0, 0)), Some(Cell::Wall));
        assert_eq!(grid.cell(Position::new(1, 1)), Some(Cell::Open));
        assert_eq!(grid.cell(Position::new(2, 1)), Some(Cell::Wall));
        assert_eq!(grid.cell(Position::new(2, 5)), Some(Cell::Open));
        assert_eq!(grid.cell(Position::new(7, 1)), Some(Cell::Open));
        assert_eq!(grid.cell(Position::new(8, 0)), None);
        assert_eq!(grid.cell(Position::new(0, 8)), None);
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let mut layout = MAZE_LAYOUT;
        layout[3] = "#  #";
        assert_eq!(MazeGrid::parse(&layout), Err(GridError::RowLength { row: 3 }));
    }

    #[test]
    fn test_new_rejects_blocked_start_and_goal() {
        assert_eq!(
            Maze::new(STANDARD_GRID, Position::new(0, 0), GOAL).err(),
            Some(GridError::StartBlocked)
        );
        assert_eq!(
            Maze::new(STANDARD_GRID, START, Position::new(9, 9)).err(),
            Some(GridError::GoalBlocked)
        );
    }

    #[test]
    fn test_standard_matches_checked_constructor() {
        assert!(STANDARD_GRID.is_open(START));
        assert!(STANDARD_GRID.is_open(GOAL));
        assert!(!STANDARD_GRID.is_open(Position::new(GRID_ROWS, 0)));
        assert!(!STANDARD_GRID.is_open(Position::new(0, GRID_COLS)));

        let checked = Maze::new(STANDARD_GRID, START, GOAL).unwrap();
        let standard = Maze::standard();
        assert_eq!(checked.start(), standard.start());
        assert_eq!(checked.goal(), standard.goal());
        assert_eq!(checked.position(), standard.position());
    }

    #[test]
    fn test_starts_on_start_cell() {
        let maze = Maze::standard();
        assert_eq!(maze.position(), Position::new(1, 1));
        assert_eq!(maze.goal(), Position::new(7, 1));
        assert!(!maze.is_at_goal());
    }

    #[test]
    fn test_step_into_wall() {
        let mut maze = Maze::standard();
        assert_eq!(maze.apply_step(MoveVector::DOWN), Status::Wall(MoveVector::DOWN));
        assert_eq!(maze.position(), Position::new(1, 1));
    }

    #[test]
    fn test_step_into_open_cell() {
        let mut maze = Maze::standard();
        assert_eq!(maze.apply_step(MoveVector::RIGHT), Status::Ok);
        assert_eq!(maze.position(), Position::new(1, 2));
    }

    #[test]
    fn test_step_onto_goal() {
        let mut maze = maze_at(6, 1);
        assert_eq!(maze.apply_step(MoveVector::DOWN), Status::Goal);
        assert!(maze.is_at_goal());
    }

    #[test]
    fn test_step_off_the_grid_is_a_wall() {
        let mut maze = maze_at(7, 1);
        assert_eq!(maze.apply_step(MoveVector::DOWN), Status::Wall(MoveVector::DOWN));
        assert_eq!(maze.position(), Position::new(7, 1));
    }

    #[test]
    fn test_negative_offset_is_a_wall() {
        let grid = MazeGrid::parse(&[
            "        ", "        ", "        ", "        ", "        ", "        ",
            "        ", "        ",
        ])
        .unwrap();
        let mut maze = Maze::new(grid, Position::new(0, 0), Position::new(7, 7)).unwrap();
        assert_eq!(maze.apply_step(MoveVector::UP), Status::Wall(MoveVector::UP));
        assert_eq!(maze.apply_step(MoveVector::LEFT), Status::Wall(MoveVector::LEFT));
        assert_eq!(maze.position(), Position::new(0, 0));
    }

    #[test]
    fn test_goal_is_not_terminal() {
        let mut maze = maze_at(6, 1);
        assert_eq!(maze.apply_step(MoveVector::DOWN), Status::Goal);
        assert_eq!(maze.apply_step(MoveVector::UP), Status::Ok);
        assert_eq!(maze.position(), Position::new(6, 1));
        assert_eq!(maze.apply_step(MoveVector::DOWN), Status::Goal);
    }

    #[test]
    fn test_zero_step_stays_put() {
        let mut maze = Maze::standard();
        assert_eq!(maze.apply_step(MoveVector::NONE), Status::Ok);
        assert_eq!(maze.position(), START);

        let mut maze = maze_at(7, 1);
        assert_eq!(maze.apply_step(MoveVector::NONE), Status::Goal);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut maze = maze_at(6, 4);
        maze.reset();
        assert_eq!(maze.position(), START);
        maze.reset();
        assert_eq!(maze.position(), START);
    }

    #[test]
    fn test_step_property_over_all_open_cells() {
        let vectors = [
            MoveVector::UP,
            MoveVector::DOWN,
            MoveVector::LEFT,
            MoveVector::RIGHT,
            MoveVector::NONE,
        ];
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let from = Position::new(row, col);
                if !STANDARD_GRID.is_open(from) {
                    continue;
                }
                for v in vectors {
                    let mut maze = maze_at(row, col);
                    let status = maze.apply_step(v);
                    match from.offset(v).filter(|t| STANDARD_GRID.is_open(*t)) {
                        None => {
                            assert_eq!(status, Status::Wall(v));
                            assert_eq!(maze.position(), from);
                        }
                        Some(target) => {
                            assert_eq!(maze.position(), target);
                            let expected = if target == GOAL { Status::Goal } else { Status::Ok };
                            assert_eq!(status, expected);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_walk_to_goal() {
        let mut maze = Maze::standard();
        let path = [
            MoveVector::RIGHT,
            MoveVector::RIGHT,
            MoveVector::RIGHT,
            MoveVector::RIGHT,
            MoveVector::DOWN,
            MoveVector::DOWN,
            MoveVector::LEFT,
            MoveVector::LEFT,
            MoveVector::LEFT,
            MoveVector::DOWN,
            MoveVector::DOWN,
            MoveVector::DOWN,
            MoveVector::LEFT,
        ];
        for v in path {
            assert_eq!(maze.apply_step(v), Status::Ok, "at {:?}", maze.position());
        }
        assert_eq!(maze.position(), Position::new(6, 1));
        assert_eq!(maze.apply_step(MoveVector::DOWN), Status::Goal);
    }

    #[test]
    fn test_row_text() {
        let maze = Maze::standard();
        assert_eq!(maze.row_text(0).as_str(), "########");
        assert_eq!(maze.row_text(1).as_str(), "#P     #");
        assert_eq!(maze.row_text(7).as_str(), "#G######");
    }

    #[test]
    fn test_row_text_goal_glyph_over_player() {
        let maze = maze_at(7, 1);
        assert_eq!(maze.row_text(7).as_str(), "#G######");
        assert!(!maze.row_text(1).contains('P'));
    }

    #[test]
    fn test_display_renders_all_rows() {
        let text = Maze::standard().to_string();
        assert_eq!(text.lines().count(), GRID_ROWS);
        assert!(text.starts_with("########\n#P     #\n"));
    }

    #[test]
    fn test_pixels() {
        let maze = Maze::standard();
        assert!(maze.pixel(Position::new(0, 0)));
        assert!(maze.pixel(START));
        assert!(!maze.pixel(Position::new(1, 2)));
        assert!(!maze.pixel(GOAL));

        let on_goal = maze_at(7, 1);
        assert!(!on_goal.pixel(GOAL));
    }

    #[test]
    fn test_draw_presents_projection() {
        let maze = Maze::standard();
        let mut matrix = MockMatrix::new();
        maze.draw(&mut matrix).unwrap();
        assert_eq!(matrix.presented, 1);
        assert!(matrix.shown[1][1]);
        assert!(!matrix.shown[1][2]);
        assert!(matrix.shown[2][1]);
        assert!(!matrix.shown[7][1]);
        assert!(matrix.shown[7][0]);
    }
}
