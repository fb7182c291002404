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

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("tool error: {0}")]
    Tool(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("message is empty")]
    EmptyInput,

    #[error("session is busy with another request")]
    Busy,

    #[error("{0}")]
    Other(String),
}
