// src/error.rs
use thiserror::Error;

/// Failures talking to the upstream news provider.
///
/// Zero articles and an unfit similarity index are *not* represented here;
/// both surface as an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    #[error("request timeout")]
    Timeout,

    #[error("connection error - check internet connection")]
    Unreachable,

    #[error("provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    Decode(String),

    #[error("http client error: {0}")]
    Client(String),
}

impl NewsError {
    /// HTTP status the service layer answers with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            NewsError::Timeout => 408,
            NewsError::Unreachable => 503,
            NewsError::Rejected { status, .. } => *status,
            NewsError::Decode(_) => 502,
            NewsError::Client(_) => 500,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            NewsError::Timeout => "timeout",
            NewsError::Unreachable => "unreachable",
            NewsError::Rejected { .. } => "rejected",
            NewsError::Decode(_) => "decode",
            NewsError::Client(_) => "client",
        }
    }
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NewsError::Timeout
        } else if e.is_connect() {
            NewsError::Unreachable
        } else if e.is_decode() {
            NewsError::Decode(e.to_string())
        } else {
            NewsError::Client(e.to_string())
        }
    }
}

impl From<serde_json::Error> for NewsError {
    fn from(e: serde_json::Error) -> Self {
        NewsError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_distinct_per_transport_kind() {
        assert_eq!(NewsError::Timeout.http_status(), 408);
        assert_eq!(NewsError::Unreachable.http_status(), 503);
        let r = NewsError::Rejected {
            status: 401,
            message: "apiKeyInvalid".into(),
        };
        assert_eq!(r.http_status(), 401);
        assert!(r.to_string().contains("apiKeyInvalid"));
    }
}
