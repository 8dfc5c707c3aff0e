use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// A window kind was missing one of its required parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KindError {
    #[error("unknown window kind: {0}")]
    UnknownKind(String),

    #[error("window kind '{kind}' requires parameter '{param}'")]
    MissingParam {
        kind: &'static str,
        param: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("mirror write failed for {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mirror encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("hub connection failed: {0}")]
    ConnectFailed(String),

    #[error("hub connection timed out after {0}s")]
    ConnectTimeout(u64),
}

#[derive(Debug, thiserror::Error)]
pub enum TetherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Kind(#[from] KindError),

    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("registry error: {0}")]
    Registry(String),
}
