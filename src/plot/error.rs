use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Cannot plot a meteogram without observations")]
    EmptyData,

    #[error("No non-missing values to plot for '{0}'")]
    NoValues(String),

    #[error("Failed to draw meteogram: {0}")]
    Drawing(String),

    #[error("Failed to write meteogram to '{0}'")]
    Write(PathBuf, #[source] std::io::Error),
}
