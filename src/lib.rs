//! Streaming chat client
//!
//! Sends a chat message to a backend that answers with Server-Sent Events
//! and renders the reply incrementally as `data:` lines arrive.

pub mod chat;
pub mod config;
pub mod error;
pub mod message;
pub mod streaming;
pub mod transport;

pub use chat::{ChatDisplay, SendOutcome, StreamingChatClient, Transcript};
pub use config::Config;
pub use error::{ChatError, Result};
