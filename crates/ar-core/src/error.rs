use crate::session::SessionKind;
use thiserror::Error;

/// Failure to establish or run a single AR session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0} is not supported on this device")]
    Unsupported(SessionKind),
    #[error("session request failed: {0}")]
    RequestFailed(String),
    #[error("hit-test source unavailable: {0}")]
    HitTestUnavailable(String),
    #[error("hit-test source not ready after {0}ms")]
    HitTestTimeout(u32),
    #[error("a session is already active")]
    AlreadyActive,
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("invalid model url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArError {
    #[error("no AR session could be entered")]
    NoSessionEntered,
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown ar mode `{0}`")]
    UnknownMode(String),
    #[error("unknown ar placement `{0}`")]
    UnknownPlacement(String),
    #[error("unknown ar scale `{0}`")]
    UnknownScale(String),
    #[error("invalid scale range {min}..{max}")]
    InvalidScale { min: f32, max: f32 },
}
