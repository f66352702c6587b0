use crate::grid::{Cell, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four moving directions in tie-break order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Continuous position in sub-cell units. The owning cell is the one whose
/// top-left corner the position falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn from_cell(cell: Cell, cell_size: i32) -> Self {
        Self {
            x: cell.x * cell_size,
            y: cell.y * cell_size,
        }
    }

    pub fn cell(self, cell_size: i32) -> Cell {
        Cell {
            x: self.x.div_euclid(cell_size),
            y: self.y.div_euclid(cell_size),
        }
    }

    pub fn is_aligned(self, cell_size: i32) -> bool {
        self.x.rem_euclid(cell_size) == 0 && self.y.rem_euclid(cell_size) == 0
    }

    pub fn offset(self, dir: Direction, speed: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * speed,
            y: self.y + dy * speed,
        }
    }

    pub fn distance_sq(self, other: Position) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    Stationary,
    Wall,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved { to: Position, crossed_cell: bool },
    Rejected(Blocked),
}

impl MoveResult {
    pub fn is_moved(self) -> bool {
        matches!(self, MoveResult::Moved { .. })
    }
}

/// Shared movement rule for every agent. A move is legal when the cell that
/// owns the destination is on the map and not a wall.
#[derive(Debug, Clone, Copy)]
pub struct Mover {
    cell_size: i32,
}

impl Mover {
    pub fn new(cell_size: i32) -> Self {
        Self { cell_size }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn step(&self, grid: &Grid, from: Position, dir: Direction, speed: i32) -> MoveResult {
        if dir == Direction::None || speed == 0 {
            return MoveResult::Rejected(Blocked::Stationary);
        }
        let to = from.offset(dir, speed);
        let cell = to.cell(self.cell_size);
        match grid.cell_kind(cell.x, cell.y) {
            Err(_) => MoveResult::Rejected(Blocked::OutOfBounds),
            Ok(kind) if !kind.is_walkable() => MoveResult::Rejected(Blocked::Wall),
            Ok(_) => MoveResult::Moved {
                to,
                crossed_cell: cell != from.cell(self.cell_size),
            },
        }
    }

    pub fn can_step(&self, grid: &Grid, from: Position, dir: Direction, speed: i32) -> bool {
        self.step(grid, from, dir, speed).is_moved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CS: i32 = 30;

    fn corridor() -> Grid {
        Grid::from_rows(&[
            vec![1u8, 1, 1, 1, 1],
            vec![1, 2, 2, 2, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    fn at(x: i32, y: i32) -> Position {
        Position::from_cell(Cell::new(x, y), CS)
    }

    #[test]
    fn moves_within_open_cells() {
        let grid = corridor();
        let mover = Mover::new(CS);
        let from = at(1, 1);
        assert_eq!(
            mover.step(&grid, from, Direction::Right, 5),
            MoveResult::Moved {
                to: Position { x: 35, y: 30 },
                crossed_cell: false
            }
        );
        assert_eq!(
            mover.step(&grid, Position { x: 55, y: 30 }, Direction::Right, 5),
            MoveResult::Moved {
                to: Position { x: 60, y: 30 },
                crossed_cell: true
            }
        );
    }

    #[test]
    fn destination_cell_decides_legality() {
        let grid = corridor();
        let mover = Mover::new(CS);
        // Leftward steps leave the owning cell at once.
        assert_eq!(
            mover.step(&grid, at(1, 1), Direction::Left, 5),
            MoveResult::Rejected(Blocked::Wall)
        );
        // Rightward steps stay in the owning cell until they cross its far edge.
        assert!(mover.can_step(&grid, at(3, 1), Direction::Right, 5));
        assert_eq!(
            mover.step(&grid, Position { x: 115, y: 30 }, Direction::Right, 5),
            MoveResult::Rejected(Blocked::Wall)
        );
        assert_eq!(
            mover.step(&grid, at(1, 1), Direction::Up, 5),
            MoveResult::Rejected(Blocked::Wall)
        );
    }

    #[test]
    fn off_map_is_distinct_from_wall() {
        let grid = corridor();
        let mover = Mover::new(CS);
        assert_eq!(
            mover.step(&grid, at(0, 0), Direction::Up, 5),
            MoveResult::Rejected(Blocked::OutOfBounds)
        );
        assert_eq!(
            mover.step(&grid, at(0, 0), Direction::Left, 5),
            MoveResult::Rejected(Blocked::OutOfBounds)
        );
        assert_eq!(
            mover.step(&grid, at(1, 0), Direction::Left, 5),
            MoveResult::Rejected(Blocked::Wall)
        );
    }

    #[test]
    fn no_direction_never_moves() {
        let grid = corridor();
        let mover = Mover::new(CS);
        assert_eq!(
            mover.step(&grid, at(1, 1), Direction::None, 5),
            MoveResult::Rejected(Blocked::Stationary)
        );
    }

    #[test]
    fn alignment_and_cells() {
        assert!(at(3, 4).is_aligned(CS));
        assert!(!Position { x: 91, y: 120 }.is_aligned(CS));
        assert_eq!(Position { x: 59, y: 30 }.cell(CS), Cell::new(1, 1));
        assert_eq!(Position { x: -1, y: 0 }.cell(CS), Cell::new(-1, 0));
    }

    proptest! {
        #[test]
        fn step_accepts_exactly_walkable_destinations(
            x in -40i32..640,
            y in -40i32..640,
            dir in 0usize..4,
            speed in 1i32..15,
        ) {
            let grid = Grid::classic();
            let mover = Mover::new(CS);
            let from = Position { x, y };
            let dir = Direction::ALL[dir];
            match mover.step(&grid, from, dir, speed) {
                MoveResult::Moved { to, .. } => {
                    let cell = to.cell(CS);
                    prop_assert!(grid.is_walkable(cell));
                    prop_assert_eq!(from.distance_sq(to), i64::from(speed * speed));
                }
                MoveResult::Rejected(_) => {
                    let cell = from.offset(dir, speed).cell(CS);
                    prop_assert!(!grid.is_walkable(cell));
                }
            }
        }
    }
}
