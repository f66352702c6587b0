use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::CHASE_BIAS;
use crate::grid::{Cell, Grid};
use crate::mover::{Direction, MoveResult, Mover, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostId {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostId {
    pub const ALL: [GhostId; 4] = [
        GhostId::Blinky,
        GhostId::Pinky,
        GhostId::Inky,
        GhostId::Clyde,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GhostId::Blinky => "blinky",
            GhostId::Pinky => "pinky",
            GhostId::Inky => "inky",
            GhostId::Clyde => "clyde",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    Chase,
    Scared,
}

#[derive(Debug, Clone)]
pub struct Ghost {
    pub id: GhostId,
    pub position: Position,
    pub direction: Direction,
    speed: i32,
    scared: bool,
    scare_ticks: u32,
    spawn: Position,
    home: Position,
}

impl Ghost {
    pub fn new(id: GhostId, spawn: Position, home: Position, speed: i32) -> Self {
        Self {
            id,
            position: spawn,
            direction: Direction::None,
            speed,
            scared: false,
            scare_ticks: 0,
            spawn,
            home,
        }
    }

    pub fn mode(&self) -> GhostMode {
        if self.scared {
            GhostMode::Scared
        } else {
            GhostMode::Chase
        }
    }

    pub fn is_scared(&self) -> bool {
        self.scared
    }

    pub fn scare_ticks(&self) -> u32 {
        self.scare_ticks
    }

    /// Enter (or stay in) scared mode with a fresh countdown.
    pub fn scare(&mut self, ticks: u32) {
        self.scared = ticks > 0;
        self.scare_ticks = ticks;
    }

    /// One frame: re-decide at cell corners, step, then run the scare clock.
    pub fn tick(&mut self, grid: &Grid, mover: &Mover, target: Position, rng: &mut impl Rng) {
        let cell_size = mover.cell_size();
        if self.position.is_aligned(cell_size) {
            let here = self.position.cell(cell_size);
            if let Some(dir) = self.decide(grid, here, target.cell(cell_size), rng) {
                self.direction = dir;
            }
        }

        if let MoveResult::Moved { to, .. } =
            mover.step(grid, self.position, self.direction, self.speed)
        {
            self.position = to;
        }

        if self.scared {
            self.scare_ticks = self.scare_ticks.saturating_sub(1);
            if self.scare_ticks == 0 {
                self.scared = false;
                tracing::debug!(ghost = self.id.name(), "scare expired");
            }
        }
    }

    /// Picks an exit from the aligned cell `here`. Chasing ghosts usually
    /// take the exit nearest `target`; scared ones take the farthest.
    pub fn decide(
        &self,
        grid: &Grid,
        here: Cell,
        target: Cell,
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        let exits: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|&d| grid.neighbor_open(here, d))
            .collect();
        if exits.is_empty() {
            return None;
        }

        let distance = |d: Direction| here.neighbor(d).distance_sq(target);
        if self.scared {
            return first_best(&exits, distance, |a, b| a > b);
        }

        let nearest = first_best(&exits, distance, |a, b| a < b)?;
        if rng.gen_bool(CHASE_BIAS) {
            Some(nearest)
        } else {
            exits.choose(rng).copied()
        }
    }

    /// Eaten: back to the home cell, calm, with no heading.
    pub fn reset_to_home(&mut self) {
        self.position = self.home;
        self.direction = Direction::None;
        self.scared = false;
        self.scare_ticks = 0;
    }

    /// New life: back to the spawn cell.
    pub fn reset(&mut self) {
        self.reset_to_home();
        self.position = self.spawn;
    }
}

// Earliest direction in enumeration order whose score beats all others.
fn first_best(
    exits: &[Direction],
    score: impl Fn(Direction) -> i32,
    better: impl Fn(i32, i32) -> bool,
) -> Option<Direction> {
    let mut best: Option<(Direction, i32)> = None;
    for &dir in exits {
        let s = score(dir);
        match best {
            Some((_, b)) if !better(s, b) => {}
            _ => best = Some((dir, s)),
        }
    }
    best.map(|(dir, _)| dir)
}
