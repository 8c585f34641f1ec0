//! Error types for batwalk

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// batwalk error types
///
/// Geometry queries never produce these; a missed intersection is an
/// ordinary `None`. Errors only appear where a caller has to decide that a
/// missing value is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sensor ray hit no wall
    #[error("Sensor at {angle} deg hit no wall from ({x}, {y}); wall set does not enclose the room")]
    MisconfiguredWalls {
        /// Sensor angle in degrees
        angle: f64,
        /// Agent x position
        x: f64,
        /// Agent y position
        y: f64,
    },

    /// Not enough rows to train a node
    #[error("Insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples {
        /// Minimum number of samples
        required: usize,
        /// Number of samples supplied
        actual: usize,
    },

    /// Input column count differs from the trained dimension
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch {
        /// Trained input dimension
        expected: usize,
        /// Supplied input dimension
        actual: usize,
    },

    /// More output components requested than the data supports
    #[error("Requested {requested} output components but only {available} are available")]
    OutputDim {
        /// Requested output dimension
        requested: usize,
        /// Dimension left after dropping degenerate directions
        available: usize,
    },

    /// Node executed before training
    #[error("Node not trained: {0}")]
    NotTrained(&'static str),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
