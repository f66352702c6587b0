use std::path::Path;

use crate::constants::{PELLET_POINTS, POWER_PELLET_POINTS};
use crate::error::GridError;
use crate::mover::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    Empty,
    Pellet,
    PowerPellet,
}

impl CellKind {
    pub fn from_code(code: u8) -> Option<CellKind> {
        match code {
            0 => Some(CellKind::Empty),
            1 => Some(CellKind::Wall),
            2 => Some(CellKind::Pellet),
            3 => Some(CellKind::PowerPellet),
            _ => None,
        }
    }

    pub fn is_walkable(self) -> bool {
        self != CellKind::Wall
    }
}

/// Grid indices. Signed so that a step off the map is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbor(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance_sq(self, other: Cell) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(usize, usize)> for Cell {
    fn from((x, y): (usize, usize)) -> Self {
        Cell {
            x: x as i32,
            y: y as i32,
        }
    }
}

/// What eating a cell produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumed {
    None,
    Pellet,
    PowerPellet,
}

impl Consumed {
    pub fn points(self) -> u32 {
        match self {
            Consumed::None => 0,
            Consumed::Pellet => PELLET_POINTS,
            Consumed::PowerPellet => POWER_PELLET_POINTS,
        }
    }
}

/// Maze topology plus the pellets still on the board.
///
/// Dimensions never change after load. The only mutation is
/// [`Grid::consume`], which turns a pellet cell into an empty one, and
/// [`Grid::reset`], which puts the load-time pellets back for a new game.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<CellKind>>,
    layout: Vec<Vec<CellKind>>,
}

impl Grid {
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Grid, GridError> {
        let width = match rows.first() {
            Some(row) if !row.as_ref().is_empty() => row.as_ref().len(),
            _ => return Err(GridError::Empty),
        };

        let mut cells = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            let mut line = Vec::with_capacity(width);
            for (x, &code) in row.iter().enumerate() {
                let kind =
                    CellKind::from_code(code).ok_or(GridError::UnknownCell { x, y, code })?;
                line.push(kind);
            }
            cells.push(line);
        }

        let grid = Grid {
            width,
            height: cells.len(),
            layout: cells.clone(),
            cells,
        };
        grid.check_exits()?;
        Ok(grid)
    }

    /// Reads the text form of a layout: one row per line, codes separated by
    /// commas and/or whitespace. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Grid, GridError> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut row = Vec::new();
            for token in line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                let code = token.parse::<u8>().map_err(|_| GridError::BadToken {
                    line: idx + 1,
                    token: token.to_string(),
                })?;
                row.push(code);
            }
            rows.push(row);
        }
        Grid::from_rows(&rows)
    }

    pub fn load(path: impl AsRef<Path>) -> crate::error::Result<Grid> {
        let text = std::fs::read_to_string(path)?;
        Ok(Grid::parse(&text)?)
    }

    pub fn classic() -> Grid {
        Grid::from_rows(&crate::constants::CLASSIC_MAZE).expect("built-in maze is well formed")
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    pub fn cell_kind(&self, x: i32, y: i32) -> Result<CellKind, GridError> {
        if !self.contains(Cell { x, y }) {
            return Err(GridError::OutOfBounds { x, y });
        }
        Ok(self.cells[y as usize][x as usize])
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        matches!(self.cell_kind(cell.x, cell.y), Ok(kind) if kind.is_walkable())
    }

    /// Whether stepping one whole cell from `cell` in `dir` lands on a
    /// walkable, in-bounds cell.
    pub fn neighbor_open(&self, cell: Cell, dir: Direction) -> bool {
        dir != Direction::None && self.is_walkable(cell.neighbor(dir))
    }

    /// Eats whatever is at `(x, y)`. A cell yields its pellet once; every
    /// later call on it returns [`Consumed::None`].
    pub fn consume(&mut self, x: i32, y: i32) -> Consumed {
        if !self.contains(Cell { x, y }) {
            return Consumed::None;
        }
        let slot = &mut self.cells[y as usize][x as usize];
        let eaten = match *slot {
            CellKind::Pellet => Consumed::Pellet,
            CellKind::PowerPellet => Consumed::PowerPellet,
            _ => return Consumed::None,
        };
        *slot = CellKind::Empty;
        eaten
    }

    pub fn reset(&mut self) {
        self.cells.clone_from(&self.layout);
    }

    pub fn pellets_remaining(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|k| matches!(k, CellKind::Pellet | CellKind::PowerPellet))
            .count()
    }

    pub fn rows(&self) -> &[Vec<CellKind>] {
        &self.cells
    }

    pub fn check_spawn(&self, what: &'static str, cell: Cell) -> Result<(), GridError> {
        if self.is_walkable(cell) {
            Ok(())
        } else {
            Err(GridError::SpawnBlocked {
                what,
                x: cell.x.max(0) as usize,
                y: cell.y.max(0) as usize,
            })
        }
    }

    fn check_exits(&self) -> Result<(), GridError> {
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.cells[y][x].is_walkable() {
                    continue;
                }
                let cell = Cell::from((x, y));
                if !Direction::ALL.iter().any(|&d| self.neighbor_open(cell, d)) {
                    return Err(GridError::NoExit { x, y });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small() -> Grid {
        Grid::from_rows(&[
            vec![1u8, 1, 1, 1, 1],
            vec![1, 2, 3, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn classic_maze_loads() {
        let grid = Grid::classic();
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 20);
        assert_eq!(grid.pellets_remaining(), 188);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Grid::from_rows(&[vec![1u8, 1, 1], vec![1, 2]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = Grid::from_rows(&[vec![1u8, 1, 1], vec![1, 7, 1]]).unwrap_err();
        assert_eq!(err, GridError::UnknownCell { x: 1, y: 1, code: 7 });
    }

    #[test]
    fn rejects_empty_layout() {
        let rows: [Vec<u8>; 0] = [];
        assert_eq!(Grid::from_rows(&rows).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn rejects_sealed_cell() {
        let err = Grid::from_rows(&[
            vec![1u8, 1, 1, 1],
            vec![1, 2, 1, 1],
            vec![1, 1, 1, 1],
        ])
        .unwrap_err();
        assert_eq!(err, GridError::NoExit { x: 1, y: 1 });
    }

    #[test]
    fn parses_text_layout() {
        let grid = Grid::parse("# tiny\n1,1,1,1\n1, 2, 0, 1\n\n1 1 1 1\n").unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell_kind(1, 1), Ok(CellKind::Pellet));
    }

    #[test]
    fn shipped_maze_file_matches_builtin() {
        let parsed = Grid::parse(include_str!("../mazes/classic.txt")).unwrap();
        assert_eq!(parsed.rows(), Grid::classic().rows());
    }

    #[test]
    fn missing_maze_file_is_an_io_error() {
        let err = Grid::load("mazes/does-not-exist.txt").unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn parse_reports_bad_tokens() {
        let err = Grid::parse("1,1,1\n1,x,1\n").unwrap_err();
        assert_eq!(
            err,
            GridError::BadToken {
                line: 2,
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn out_of_bounds_is_not_wall() {
        let grid = small();
        assert_eq!(grid.cell_kind(0, 0), Ok(CellKind::Wall));
        assert_eq!(grid.cell_kind(-1, 0), Err(GridError::OutOfBounds { x: -1, y: 0 }));
        assert_eq!(grid.cell_kind(5, 1), Err(GridError::OutOfBounds { x: 5, y: 1 }));
    }

    #[test]
    fn consume_pays_once() {
        let mut grid = small();
        assert_eq!(grid.consume(1, 1), Consumed::Pellet);
        assert_eq!(grid.cell_kind(1, 1), Ok(CellKind::Empty));
        assert_eq!(grid.consume(1, 1), Consumed::None);
        assert_eq!(grid.consume(2, 1), Consumed::PowerPellet);
        assert_eq!(grid.consume(2, 1), Consumed::None);
        assert_eq!(grid.consume(0, 0), Consumed::None);
        assert_eq!(grid.cell_kind(0, 0), Ok(CellKind::Wall));
    }

    #[test]
    fn reset_restores_pellets() {
        let mut grid = small();
        grid.consume(1, 1);
        grid.consume(2, 1);
        assert_eq!(grid.pellets_remaining(), 0);
        grid.reset();
        assert_eq!(grid.pellets_remaining(), 2);
        assert_eq!(grid.cell_kind(2, 1), Ok(CellKind::PowerPellet));
    }

    proptest! {
        #[test]
        fn consumption_is_idempotent(x in -2i32..22, y in -2i32..22, repeats in 1usize..5) {
            let mut grid = Grid::classic();
            let first = grid.consume(x, y);
            for _ in 0..repeats {
                prop_assert_eq!(grid.consume(x, y), Consumed::None);
            }
            if first != Consumed::None {
                prop_assert_eq!(grid.cell_kind(x, y), Ok(CellKind::Empty));
            }
        }
    }
}
