use std::result;

use enricher::error::EnricherError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("enricher: {0}")]
    Enricher(#[from] EnricherError),
    #[error("config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("json: {0:?}")]
    Json(#[from] serde_json::Error),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
    #[error("convert: {0}")]
    Convert(String),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),
}
