//! Runner errors.

use std::io;
use std::path::PathBuf;

use life_engine::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("cannot read {}: {source}", path.display())]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error("invalid config file {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("pixel clock must be a positive frequency, got {0} MHz")]
    PixelClock(f64),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("report serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
}
