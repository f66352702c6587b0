use thiserror::Error;

/// Problems with maze layout data. All of them are fatal at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("maze layout has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell code {code} at ({x}, {y})")]
    UnknownCell { x: usize, y: usize, code: u8 },
    #[error("unreadable token {token:?} on line {line}")]
    BadToken { line: usize, token: String },
    #[error("walkable cell ({x}, {y}) has no walkable neighbour")]
    NoExit { x: usize, y: usize },
    #[error("{what} spawn ({x}, {y}) is not a walkable cell")]
    SpawnBlocked {
        what: &'static str,
        x: usize,
        y: usize,
    },
    #[error("cell ({x}, {y}) is outside the maze")]
    OutOfBounds { x: i32, y: i32 },
}

/// Rejected movement or timing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    NotPositive(&'static str),
    #[error("ghost speed {ghost} must be slower than player speed {player}")]
    GhostTooFast { ghost: i32, player: i32 },
    #[error("{what} speed {speed} does not divide cell size {cell_size}")]
    Misaligned {
        what: &'static str,
        speed: i32,
        cell_size: i32,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
