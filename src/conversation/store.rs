use std::sync::Arc;

use parking_lot::Mutex;

use super::message::{Message, MessageIdGenerator, Role};
use super::state::{ConversationState, RequestState};
use crate::annotate::{self, Segment};
use crate::client::{AudioClip, ChatBackend};
use crate::config::InputConfig;
use crate::error::{ChatError, TRANSCRIPTION_FAILED_MESSAGE};

/// Holds one session's messages and drives requests against a [`ChatBackend`].
///
/// Text and voice input share a single guard: while a query or a
/// transcription is in flight every new request fails with
/// [`ChatError::Busy`]. Requests are never retried. Dropping a request's
/// future releases the guard and leaves the store `Idle`.
pub struct ConversationStore {
    backend: Arc<dyn ChatBackend>,
    limits: InputConfig,
    ids: MessageIdGenerator,
    state: Mutex<ConversationState>,
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_limits(backend, InputConfig::default())
    }

    pub fn with_limits(backend: Arc<dyn ChatBackend>, limits: InputConfig) -> Self {
        Self {
            backend,
            limits,
            ids: MessageIdGenerator::default(),
            state: Mutex::new(ConversationState::default()),
        }
    }

    pub fn limits(&self) -> InputConfig {
        self.limits
    }

    pub fn snapshot(&self) -> ConversationState {
        self.state.lock().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().messages.clone()
    }

    pub fn request_state(&self) -> RequestState {
        self.state.lock().request.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error().map(str::to_string)
    }

    /// Sends a typed message and returns the rendered reply.
    ///
    /// The user's message is recorded as soon as the request is admitted, so
    /// a failed query keeps it; only the reply is withheld and the error
    /// banner set.
    pub async fn send_message(&self, text: &str) -> Result<Vec<Segment>, ChatError> {
        let text = self.validate_text(text)?;
        let request = self.admit(RequestState::Sending)?;
        self.exchange(request, text).await
    }

    /// Transcribes a recording and sends the recognized text as a message.
    ///
    /// Clips below the configured minimum size are rejected before any
    /// network call. A blank transcript ends the flow with
    /// [`ChatError::EmptyInput`] and records nothing.
    pub async fn send_voice(&self, clip: AudioClip) -> Result<Vec<Segment>, ChatError> {
        if clip.len() < self.limits.min_audio_bytes {
            log::debug!(
                "discarding {} byte recording (minimum {})",
                clip.len(),
                self.limits.min_audio_bytes
            );
            return Err(ChatError::RecordingTooShort {
                size: clip.len(),
                min: self.limits.min_audio_bytes,
            });
        }
        let request = self.admit(RequestState::Transcribing)?;

        let transcript = match self.backend.transcribe(&clip).await {
            Ok(transcript) => transcript,
            Err(err) => {
                let banner = match &err {
                    ChatError::UnsupportedEnvironment(_) => err.user_message(),
                    _ => TRANSCRIPTION_FAILED_MESSAGE,
                };
                log::warn!("transcription failed: {err}");
                request.finish(RequestState::Error(banner.to_string()));
                return Err(err);
            }
        };

        let text = match self.validate_text(&transcript) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("transcript rejected: {err}");
                request.finish(RequestState::Idle);
                return Err(err);
            }
        };
        request.advance(RequestState::Sending);
        self.exchange(request, text).await
    }

    /// Clears messages and any error. Identifiers keep increasing afterwards.
    ///
    /// Fails with [`ChatError::Busy`] while a request is in flight, so a late
    /// reply never lands in a cleared history.
    pub fn reset(&self) -> Result<(), ChatError> {
        let mut state = self.state.lock();
        if state.is_loading() {
            return Err(ChatError::Busy);
        }
        state.messages.clear();
        state.request = RequestState::Idle;
        Ok(())
    }

    /// Hides the error banner without touching history.
    pub fn dismiss_error(&self) {
        let mut state = self.state.lock();
        if state.request.error().is_some() {
            state.request = RequestState::Idle;
        }
    }

    fn validate_text<'a>(&self, text: &'a str) -> Result<&'a str, ChatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let len = text.chars().count();
        if len > self.limits.max_chars {
            return Err(ChatError::InputTooLong {
                len,
                max: self.limits.max_chars,
            });
        }
        Ok(text)
    }

    /// Moves into an in-flight state unless another request holds it.
    fn admit(&self, next: RequestState) -> Result<InFlight<'_>, ChatError> {
        let mut state = self.state.lock();
        if !state.request.accepts_request() {
            log::debug!("rejecting request while {:?}", state.request);
            return Err(ChatError::Busy);
        }
        state.request = next;
        Ok(InFlight {
            store: self,
            finished: false,
        })
    }

    fn append(&self, role: Role, text: &str) {
        let mut state = self.state.lock();
        let message = Message::new(self.ids.next_id(), role, text);
        state.messages.push(message);
    }

    async fn exchange(
        &self,
        request: InFlight<'_>,
        text: &str,
    ) -> Result<Vec<Segment>, ChatError> {
        self.append(Role::User, text);

        match self.backend.ask(text).await {
            Ok(reply) => {
                let segments = annotate::render(&reply);
                self.append(Role::Assistant, &reply);
                request.finish(RequestState::Idle);
                Ok(segments)
            }
            Err(err) => {
                log::warn!("query failed: {err}");
                request.finish(RequestState::Error(err.user_message().to_string()));
                Err(err)
            }
        }
    }
}

/// Ownership of the store's single request slot.
///
/// Dropped without [`InFlight::finish`], e.g. when the caller's future is
/// cancelled by a timeout, it moves the store back to `Idle`.
struct InFlight<'a> {
    store: &'a ConversationStore,
    finished: bool,
}

impl InFlight<'_> {
    fn advance(&self, next: RequestState) {
        self.store.state.lock().request = next;
    }

    fn finish(mut self, next: RequestState) {
        self.finished = true;
        self.store.state.lock().request = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.store.state.lock();
        if state.request.is_loading() {
            log::debug!("request abandoned while {:?}", state.request);
            state.request = RequestState::Idle;
        }
    }
}
