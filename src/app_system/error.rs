use thiserror::Error;

/// Errors that stop the console itself, as opposed to failed record operations.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("console I/O error: {0}")]
    Console(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
