use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Election(#[from] ring_election::ElectionError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Whether the run failed before any node started
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Election(e) => e.is_configuration(),
            _ => false,
        }
    }
}
