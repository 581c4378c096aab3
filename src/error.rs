//! Failure taxonomy for generation and transcription calls.
//!
//! Every tutor operation funnels into one of these variants so transports
//! can map them uniformly: views swap in a fixed localized banner, the HTTP
//! surface picks a status code, and logs keep the underlying cause.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TutorError {
    /// Transport-level failure: DNS, TLS, connect, or the 20s request timeout.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation service answered with a non-success status.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The reply body did not match the declared response shape.
    #[error("response did not match expected shape: {0}")]
    Parse(#[from] serde_json::Error),

    /// No API key configured; the client was never constructed.
    #[error("generation service is not configured")]
    Unavailable,
}

impl TutorError {
    /// True when the failure is "service not configured" rather than a
    /// failed call. Transports report 503 instead of 502 for this case.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TutorError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_status_and_message() {
        let err = TutorError::Api { status: 429, message: "quota exceeded".into() };
        assert_eq!(err.to_string(), "api error (status 429): quota exceeded");
        assert!(!err.is_unavailable());
    }

    #[test]
    fn parse_errors_convert_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = TutorError::from(parse);
        assert!(matches!(err, TutorError::Parse(_)));
    }

    #[test]
    fn unavailable_is_flagged() {
        assert!(TutorError::Unavailable.is_unavailable());
    }
}
