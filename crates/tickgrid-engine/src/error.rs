//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: tickgrid_core::ConfigError,
    },

    /// The world could not be built from the configuration.
    #[error("factory error: {source}")]
    Factory {
        /// The underlying factory error.
        #[from]
        source: tickgrid_core::FactoryError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: tickgrid_core::RunnerError,
    },

    /// Writing the action log failed.
    #[error("failed to write action log to {path}: {source}")]
    ActionLog {
        /// Destination path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
