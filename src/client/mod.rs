//! Remote client for the external webhook that answers queries and
//! transcribes voice recordings.

mod audio;
mod webhook;

use async_trait::async_trait;

use crate::error::ChatError;

pub use audio::{AudioClip, AudioFormat};
pub use webhook::{
    WebhookClient, WebhookClientBuilder, DEFAULT_QUERY_PATH, DEFAULT_TRANSCRIBE_PATH,
};

/// Answers a user query with the assistant's reply text.
#[async_trait]
pub trait QueryProvider: Send + Sync {
    async fn ask(&self, query: &str) -> Result<String, ChatError>;
}

/// Turns recorded audio into text.
#[async_trait]
pub trait SpeechToTextProvider: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, ChatError>;
}

/// Everything a conversation needs from the remote side.
pub trait ChatBackend: QueryProvider + SpeechToTextProvider {}

impl<T> ChatBackend for T where T: QueryProvider + SpeechToTextProvider {}
