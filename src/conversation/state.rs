use super::message::Message;

/// Request lifecycle of a conversation.
///
/// `Idle → Sending → Idle | Error` for text, with `Transcribing` ahead of
/// `Sending` for voice input. Only one request runs at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Transcribing,
    Sending,
    /// Last attempt failed; holds the banner text
    Error(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Sending | RequestState::Transcribing)
    }

    /// Whether a new request may start from this state.
    pub fn accepts_request(&self) -> bool {
        !self.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Snapshot of a conversation: its messages in append order plus the
/// request state.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub request: RequestState,
}

impl ConversationState {
    pub fn is_loading(&self) -> bool {
        self.request.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.request.error()
    }
}
