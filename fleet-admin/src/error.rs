use std::io;

use thiserror::Error;

use crate::settings::SettingsError;
use crate::source::SourceError;

/// Top-level error for the admin front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
