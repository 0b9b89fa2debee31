use std::path::PathBuf;

/// Errors raised by the pour engine when the caller breaks its contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors that can occur when reading the text representation of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown token '{token}' in container {container}")]
    UnknownToken { container: usize, token: String },

    #[error("container {container} has an empty slot below liquid")]
    Gap { container: usize },

    #[error("container {container} has no slots")]
    NoSlots { container: usize },

    #[error("puzzle has no containers")]
    Empty,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
