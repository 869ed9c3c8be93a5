use thiserror::Error;

/// A rule the submitted match breaks. Validators stop at the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("mode is invalid")]
    InvalidMode,
    #[error("teams are invalid")]
    InvalidTeams,
    #[error("country is invalid")]
    InvalidCountry,
    #[error("name is invalid")]
    InvalidName,
    #[error("times are invalid")]
    InvalidTimes,
    #[error("point is invalid")]
    InvalidPoint,
    #[error("game is invalid")]
    InvalidGame,
}

/// Failure of [`crate::parse`]: either the document is malformed, or it is
/// well-formed but describes an illegal match.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("match is invalid: {0}")]
    InvalidMatch(#[from] ValidationError),
}

impl ParseError {
    /// The violated rule, if the document decoded.
    pub fn violation(&self) -> Option<ValidationError> {
        match self {
            ParseError::InvalidJson(_) => None,
            ParseError::InvalidMatch(cause) => Some(*cause),
        }
    }
}
