use std::path::PathBuf;

/// All domain errors for oversee-view.
///
/// Fetch-related variants (`Transport`, `Service`, `Schema`) never escape the
/// query cache as errors: they are captured into `QueryResult::Error`.
/// `Configuration` is raised eagerly when a table or config is built.
#[derive(Debug, thiserror::Error)]
pub enum OverseeError {
    #[error(
        "Could not reach the query service: {reason}\n\n  \
         Check that the collector is running and the endpoint is correct.\n  \
         Set it with --endpoint, OVERSEE_ENDPOINT, or [server] endpoint in oversee.toml."
    )]
    Transport { reason: String },

    #[error("Query service reported an error: {message}")]
    Service { message: String },

    #[error(
        "Unexpected response shape: {detail}\n\n  \
         Each audit log entry must carry id (string), timestamp (number),\n  \
         service_name (string) and operation (string)."
    )]
    Schema { detail: String },

    #[error("Invalid configuration: {detail}")]
    Configuration { detail: String },

    #[error(
        "Config file not found: {path}\n\n  \
         Check the path passed to --config, or remove the flag to use defaults."
    )]
    ConfigNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OverseeError>;
