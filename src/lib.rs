//! Conversation core for a webhook-backed chat widget.
//!
//! The crate turns assistant replies into renderable segments (plain text,
//! bold emphasis, links and book/news cards), talks to the external webhook
//! that answers queries and transcribes recordings, and keeps the message
//! history together with the request lifecycle of one chat session.
//!
//! ```no_run
//! use std::sync::Arc;
//! use webchat::{ConversationStore, WebhookClient};
//!
//! # async fn run() -> Result<(), webchat::ChatError> {
//! let client = WebhookClient::builder()
//!     .base_url("https://hooks.example.com/webhook/")
//!     .build()?;
//! let store = ConversationStore::new(Arc::new(client));
//! let reply = store.send_message("Recommend me a science fiction book").await?;
//! println!("{}", webchat::annotate::plain_text(&reply));
//! # Ok(())
//! # }
//! ```

pub mod annotate;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod preferences;
pub mod theme;

pub use annotate::{render, CardKind, Segment, StructuredBlock};
pub use client::{
    AudioClip, AudioFormat, ChatBackend, QueryProvider, SpeechToTextProvider, WebhookClient,
    WebhookClientBuilder,
};
pub use conversation::{
    ConversationState, ConversationStore, Message, MessageId, RequestState, Role,
};
pub use error::ChatError;
pub use theme::{ResolvedTheme, ThemeContext, ThemePreference};
