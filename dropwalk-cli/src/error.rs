use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No paths were dropped")]
    NothingDropped,

    #[error("Couldn't load config: {0}")]
    ConfigLoadError(String),

    #[error("Failed to print the dropped files: {0}")]
    OutputError(String),
}
