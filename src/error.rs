use thiserror::Error;

/// Errors surfaced by the plot. Malformed geometry and unknown element types
/// are absorbed while loading, so only the JSON layer can fail.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid plot data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PlotResult<T> = Result<T, PlotError>;
