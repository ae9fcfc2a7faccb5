//! Message history and request lifecycle of a chat session.

mod message;
mod state;
mod store;

pub use message::{Message, MessageId, Role};
pub use state::{ConversationState, RequestState};
pub use store::ConversationStore;
