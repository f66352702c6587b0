use rand::Rng;

use crate::collision::{self, CollisionEvent};
use crate::config::SimConfig;
use crate::constants::{GHOST_HOME, GHOST_SPAWNS, PLAYER_SPAWN};
use crate::error::Result;
use crate::ghost::{Ghost, GhostId};
use crate::grid::{Cell, CellKind, Consumed, Grid};
use crate::mover::{Direction, Mover, Position};
use crate::player::Player;
use crate::scare::ScareController;

/// Where agents start, and where eaten ghosts go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawns {
    pub player: Cell,
    pub ghosts: [Cell; 4],
    pub ghost_home: Cell,
}

impl Default for Spawns {
    fn default() -> Self {
        Self {
            player: PLAYER_SPAWN.into(),
            ghosts: GHOST_SPAWNS.map(Cell::from),
            ghost_home: GHOST_HOME.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver { final_score: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Waiting for [`Simulation::restart`] after a catch.
    Halted,
    Running {
        consumed: Consumed,
        ghosts_eaten: Vec<GhostId>,
    },
    GameOver {
        final_score: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerView {
    pub position: Position,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostView {
    pub id: GhostId,
    pub position: Position,
    pub direction: Direction,
    pub scared: bool,
    pub scare_ticks: u32,
}

/// Read-only view handed to whoever draws the game.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub cells: &'a [Vec<CellKind>],
    pub cell_size: i32,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub score: u32,
    pub pellets_remaining: usize,
    pub tick: u64,
    pub phase: Phase,
}

/// Owns the maze and every agent, and advances them one frame at a time.
///
/// Per tick: buffered input, player move, pellet consumption, scare
/// broadcast, ghost decisions and moves against the player's new position,
/// then collisions. The ordering is fixed so that a seeded run replays
/// exactly.
pub struct Simulation<R: Rng> {
    grid: Grid,
    mover: Mover,
    player: Player,
    ghosts: Vec<Ghost>,
    scare: ScareController,
    rng: R,
    phase: Phase,
    tick: u64,
}

impl<R: Rng> Simulation<R> {
    pub fn new(grid: Grid, spawns: Spawns, config: SimConfig, rng: R) -> Result<Self> {
        config.validate()?;
        grid.check_spawn("player", spawns.player)?;
        grid.check_spawn("ghost home", spawns.ghost_home)?;
        for cell in spawns.ghosts {
            grid.check_spawn("ghost", cell)?;
        }

        let at = |cell: Cell| Position::from_cell(cell, config.cell_size);
        let player = Player::new(at(spawns.player), config.player_speed);
        let ghosts: Vec<Ghost> = GhostId::ALL
            .iter()
            .zip(spawns.ghosts)
            .map(|(&id, cell)| Ghost::new(id, at(cell), at(spawns.ghost_home), config.ghost_speed))
            .collect();

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            pellets = grid.pellets_remaining(),
            "maze loaded"
        );

        Ok(Self {
            grid,
            mover: Mover::new(config.cell_size),
            player,
            ghosts,
            scare: ScareController::new(config.scare_ticks),
            rng,
            phase: Phase::Running,
            tick: 0,
        })
    }

    pub fn classic(rng: R) -> Result<Self> {
        Self::new(Grid::classic(), Spawns::default(), SimConfig::default(), rng)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn set_intent(&mut self, dir: Direction) {
        self.player.set_intent(dir);
    }

    pub fn tick(&mut self) -> TickOutcome {
        if let Phase::GameOver { .. } = self.phase {
            return TickOutcome::Halted;
        }
        self.tick += 1;

        let consumed = self.player.tick(&mut self.grid, &self.mover);
        if consumed == Consumed::PowerPellet {
            tracing::info!(score = self.player.score, "power pellet eaten");
            self.scare.trigger(&mut self.ghosts);
        }

        let target = self.player.position;
        for ghost in self.ghosts.iter_mut() {
            ghost.tick(&self.grid, &self.mover, target, &mut self.rng);
        }

        let events = collision::resolve(
            &mut self.player,
            &mut self.ghosts,
            self.mover.cell_size(),
        );
        let mut ghosts_eaten = Vec::new();
        for event in events {
            match event {
                CollisionEvent::GhostEaten(id) => {
                    tracing::info!(ghost = id.name(), score = self.player.score, "ghost eaten");
                    ghosts_eaten.push(id);
                }
                CollisionEvent::PlayerCaught => {
                    let final_score = self.player.score;
                    tracing::info!(final_score, tick = self.tick, "player caught");
                    self.phase = Phase::GameOver { final_score };
                    return TickOutcome::GameOver { final_score };
                }
            }
        }

        TickOutcome::Running {
            consumed,
            ghosts_eaten,
        }
    }

    /// Starts a new game: pellets back, score cleared, everyone on spawn.
    pub fn restart(&mut self) {
        self.grid.reset();
        self.player.reset();
        for ghost in self.ghosts.iter_mut() {
            ghost.reset();
        }
        self.phase = Phase::Running;
        tracing::info!(tick = self.tick, "game restarted");
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            cells: self.grid.rows(),
            cell_size: self.mover.cell_size(),
            player: PlayerView {
                position: self.player.position,
                direction: self.player.direction,
            },
            ghosts: self
                .ghosts
                .iter()
                .map(|g| GhostView {
                    id: g.id,
                    position: g.position,
                    direction: g.direction,
                    scared: g.is_scared(),
                    scare_ticks: g.scare_ticks(),
                })
                .collect(),
            score: self.player.score,
            pellets_remaining: self.grid.pellets_remaining(),
            tick: self.tick,
            phase: self.phase,
        }
    }
}
