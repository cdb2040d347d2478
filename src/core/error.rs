//! Error types for the worker pool

/// Result type for worker pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur in the worker pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// The pool has begun or finished shutting down
    #[error("worker pool closed")]
    Closed,

    /// A remove request found the registry empty
    #[error("no workers to remove")]
    NoWorkers,

    /// Failed to spawn a worker or controller thread
    #[error("Failed to spawn thread for worker #{worker_id}: {message}")]
    SpawnError {
        /// ID the worker would have received (0 for the controller)
        worker_id: u64,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// The controller thread could not be joined cleanly
    #[error("Failed to join controller thread of pool '{pool_name}': {message}")]
    JoinError {
        /// Name of the pool
        pool_name: String,
        /// Error message
        message: String,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// Job-defined failure
    #[error("{0}")]
    Other(String),
}

impl PoolError {
    /// Create a spawn error with source
    pub fn spawn_with_source(worker_id: u64, source: std::io::Error) -> Self {
        PoolError::SpawnError {
            worker_id,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(pool_name: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::JoinError {
            pool_name: pool_name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PoolError::Other(msg.into())
    }

    /// Returns true for [`PoolError::Closed`]
    pub fn is_closed(&self) -> bool {
        matches!(self, PoolError::Closed)
    }
}
