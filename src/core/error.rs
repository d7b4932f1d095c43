use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Board setup failed: {0}")]
    Setup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
