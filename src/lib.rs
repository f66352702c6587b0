//! Grid pursuit core of a Pac-Man style game: the maze, the shared movement
//! rule, the player with a buffered turn, four ghosts that chase or flee,
//! the power-pellet scare, and collision outcomes.
//!
//! Nothing here draws or reads the keyboard; the `pacman` binary does that
//! on top of [`sim::Simulation`].

pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod ghost;
pub mod grid;
pub mod mover;
pub mod player;
pub mod scare;
pub mod sim;

pub use config::{Config, SimConfig};
pub use error::{ConfigError, Error, GridError, Result};
pub use ghost::{Ghost, GhostId, GhostMode};
pub use grid::{Cell, CellKind, Consumed, Grid};
pub use mover::{Direction, Position};
pub use sim::{Phase, Simulation, Snapshot, Spawns, TickOutcome};
