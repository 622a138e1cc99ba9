use thiserror::Error;

/// Failures surfaced by the core. The `Display` text doubles as the notice
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Not signed in. Run `doseline init` first.")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<anyhow::Error> for CoreError {
    fn from(e: anyhow::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
