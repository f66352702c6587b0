use crate::grid::{Consumed, Grid};
use crate::mover::{Direction, MoveResult, Mover, Position};

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Position,
    pub direction: Direction,
    pub score: u32,
    intent: Option<Direction>,
    speed: i32,
    spawn: Position,
}

impl Player {
    pub fn new(spawn: Position, speed: i32) -> Self {
        Self {
            position: spawn,
            direction: Direction::None,
            score: 0,
            intent: None,
            speed,
            spawn,
        }
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn intent(&self) -> Option<Direction> {
        self.intent
    }

    /// Buffers a turn. Only the latest request before a tick is kept;
    /// `Direction::None` clears it.
    pub fn set_intent(&mut self, dir: Direction) {
        self.intent = match dir {
            Direction::None => None,
            dir => Some(dir),
        };
    }

    /// One frame of player movement. Returns what was eaten, if anything.
    pub fn tick(&mut self, grid: &mut Grid, mover: &Mover) -> Consumed {
        self.apply_intent(grid, mover);
        if !self.advance(grid, mover) {
            return Consumed::None;
        }
        self.eat(grid, mover.cell_size())
    }

    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.direction = Direction::None;
        self.intent = None;
        self.score = 0;
    }

    fn apply_intent(&mut self, grid: &Grid, mover: &Mover) {
        if let Some(dir) = self.intent {
            if mover.can_step(grid, self.position, dir, self.speed) {
                self.direction = dir;
                self.intent = None;
            }
        }
    }

    fn advance(&mut self, grid: &Grid, mover: &Mover) -> bool {
        match mover.step(grid, self.position, self.direction, self.speed) {
            MoveResult::Moved { to, .. } => {
                self.position = to;
                true
            }
            MoveResult::Rejected(_) => false,
        }
    }

    fn eat(&mut self, grid: &mut Grid, cell_size: i32) -> Consumed {
        let cell = self.position.cell(cell_size);
        let eaten = grid.consume(cell.x, cell.y);
        self.score += eaten.points();
        eaten
    }
}
