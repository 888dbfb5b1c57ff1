use thiserror::Error;

/// The error taxonomy every core operation reports through. All variants
/// except `Internal` are expected, recoverable outcomes that carry a
/// message fit for rendering to the user.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    PermissionDenied(&'static str),

    #[error("{0}")]
    InvalidInput(&'static str),

    /// Benign rejection of a duplicate (rating, chat pair, email) — the
    /// existing row stands.
    #[error("{0}")]
    AlreadyExists(&'static str),

    /// The external advice backend is down or misconfigured.
    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
