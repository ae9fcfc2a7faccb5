use thiserror::Error;

/// Banner shown when a query could not be answered.
pub const QUERY_FAILED_MESSAGE: &str = "Error processing your message. Please try again.";

/// Banner shown when a recording could not be turned into text.
pub const TRANSCRIPTION_FAILED_MESSAGE: &str =
    "Could not transcribe your recording. Please try again.";

const UNSUPPORTED_MESSAGE: &str = "Voice input is not available here.";

/// Error types that can occur while talking to the webhook or driving a conversation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Transport failure (connection refused, DNS, TLS, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// The webhook answered with a non-2xx status
    #[error("{context} returned error status {status}: {body}")]
    StatusError {
        context: String,
        status: u16,
        body: String,
    },
    /// The webhook answered 2xx but without the expected field
    #[error("Invalid response: {message}. Raw response: {raw_response}")]
    InvalidResponse {
        message: String,
        raw_response: String,
    },
    /// Captured audio is too small to contain speech
    #[error("Recording too short: {size} bytes (minimum {min})")]
    RecordingTooShort { size: usize, min: usize },
    /// A capability the flow needs is not available
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),
    /// A query or transcription is already in flight
    #[error("A request is already in progress")]
    Busy,
    /// Nothing to send after trimming
    #[error("Message is empty")]
    EmptyInput,
    /// Message exceeds the configured character limit
    #[error("Message has {len} characters (maximum {max})")]
    InputTooLong { len: usize, max: usize },
    /// Client construction errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatError {
    pub(crate) fn invalid_response(raw_response: impl Into<String>) -> Self {
        ChatError::InvalidResponse {
            message: "empty or invalid response".to_string(),
            raw_response: raw_response.into(),
        }
    }

    /// True for transport failures and non-2xx statuses.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, ChatError::HttpError(_) | ChatError::StatusError { .. })
    }

    /// True for errors raised before anything was sent, which leave the
    /// conversation untouched and show no banner.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ChatError::Busy
                | ChatError::EmptyInput
                | ChatError::InputTooLong { .. }
                | ChatError::RecordingTooShort { .. }
        )
    }

    /// The single user-visible message for a failed query attempt.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::UnsupportedEnvironment(_) => UNSUPPORTED_MESSAGE,
            _ => QUERY_FAILED_MESSAGE,
        }
    }
}

/// Converts reqwest HTTP errors into ChatErrors
impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::HttpError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_count_as_network_failures() {
        let err = ChatError::StatusError {
            context: "webhook query".into(),
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(err.is_network_failure());
        assert!(!err.is_rejection());
        assert_eq!(
            err.to_string(),
            "webhook query returned error status 502: bad gateway"
        );
    }

    #[test]
    fn invalid_response_keeps_raw_body() {
        let err = ChatError::invalid_response("{}");
        match err {
            ChatError::InvalidResponse {
                message,
                raw_response,
            } => {
                assert_eq!(message, "empty or invalid response");
                assert_eq!(raw_response, "{}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn preflight_errors_are_rejections() {
        assert!(ChatError::Busy.is_rejection());
        assert!(ChatError::EmptyInput.is_rejection());
        assert!(ChatError::RecordingTooShort { size: 10, min: 1024 }.is_rejection());
        assert!(!ChatError::UnsupportedEnvironment("x".into()).is_rejection());
    }
}
