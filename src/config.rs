use std::path::PathBuf;

use crate::constants::{
    CELL_SIZE, DEFAULT_RENDER_FPS, DEFAULT_TICK_MS, GHOST_SPEED, PLAYER_SPEED, SCARE_TICKS,
};
use crate::error::ConfigError;

/// Movement and timing parameters of the simulation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub cell_size: i32,
    pub player_speed: i32,
    pub ghost_speed: i32,
    pub scare_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            player_speed: PLAYER_SPEED,
            ghost_speed: GHOST_SPEED,
            scare_ticks: SCARE_TICKS,
        }
    }
}

impl SimConfig {
    /// Ghosts must be slower than the player and both speeds must divide the
    /// cell size, or a ghost would never land on a cell corner again.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::NotPositive("cell size"));
        }
        if self.player_speed <= 0 {
            return Err(ConfigError::NotPositive("player speed"));
        }
        if self.ghost_speed <= 0 {
            return Err(ConfigError::NotPositive("ghost speed"));
        }
        if self.scare_ticks == 0 {
            return Err(ConfigError::NotPositive("scare duration"));
        }
        if self.ghost_speed >= self.player_speed {
            return Err(ConfigError::GhostTooFast {
                ghost: self.ghost_speed,
                player: self.player_speed,
            });
        }
        for (what, speed) in [("player", self.player_speed), ("ghost", self.ghost_speed)] {
            if self.cell_size % speed != 0 {
                return Err(ConfigError::Misaligned {
                    what,
                    speed,
                    cell_size: self.cell_size,
                });
            }
        }
        Ok(())
    }
}

/// Runtime settings for the terminal binary, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tick_ms: u64,
    pub render_fps: u64,
    pub seed: Option<u64>,
    pub maze_path: Option<PathBuf>,
    pub sim: SimConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
            maze_path: None,
            sim: SimConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `PACMAN_TICK_MS`, `PACMAN_FPS`, `PACMAN_SEED` and `PACMAN_MAZE`.
    /// Unusable numbers fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let tick_ms = positive(&lookup, "PACMAN_TICK_MS").unwrap_or(defaults.tick_ms);
        let render_fps = positive(&lookup, "PACMAN_FPS").unwrap_or(defaults.render_fps);
        let seed = lookup("PACMAN_SEED").and_then(|v| match v.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = %v, "ignoring unreadable PACMAN_SEED");
                None
            }
        });
        let maze_path = lookup("PACMAN_MAZE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            tick_ms,
            render_fps,
            seed,
            maze_path,
            sim: defaults.sim,
        }
    }
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring non-positive or unreadable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_ms, 16);
        assert!(config.sim.validate().is_ok());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PACMAN_TICK_MS", "33"),
            ("PACMAN_FPS", "120"),
            ("PACMAN_SEED", "42"),
            ("PACMAN_MAZE", "mazes/small.txt"),
        ]));
        assert_eq!(config.tick_ms, 33);
        assert_eq!(config.render_fps, 120);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.maze_path, Some(PathBuf::from("mazes/small.txt")));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PACMAN_TICK_MS", "0"),
            ("PACMAN_FPS", "fast"),
            ("PACMAN_SEED", "-3"),
        ]));
        assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(config.render_fps, DEFAULT_RENDER_FPS);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn rejects_fast_ghosts() {
        let sim = SimConfig {
            ghost_speed: 5,
            ..SimConfig::default()
        };
        assert_eq!(
            sim.validate(),
            Err(ConfigError::GhostTooFast {
                ghost: 5,
                player: 5
            })
        );
    }

    #[test]
    fn rejects_speeds_that_skip_corners() {
        let sim = SimConfig {
            ghost_speed: 4,
            ..SimConfig::default()
        };
        assert_eq!(
            sim.validate(),
            Err(ConfigError::Misaligned {
                what: "ghost",
                speed: 4,
                cell_size: 30
            })
        );
    }
}
