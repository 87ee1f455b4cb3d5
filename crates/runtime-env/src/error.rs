use std::path::PathBuf;

/// Error type for environment info operations.
#[derive(Debug, thiserror::Error)]
pub enum EnvInfoError {
    /// A synchronous cached accessor ran before `set_resolver`.
    #[error("Environment resolver has not been initialized")]
    Uninitialized,

    #[error("Environment API error: {0}")]
    Api(#[from] anyhow::Error),

    #[error("Failed to load config from {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, EnvInfoError>;
