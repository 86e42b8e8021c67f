//! The chat widget: request state, display contract, and the streaming client.

mod client;
mod display;
mod state;
mod terminal;

pub use client::{SendOutcome, StreamingChatClient};
pub use display::{ChatDisplay, DisplayEvent, Transcript};
pub use state::RequestState;
pub use terminal::TerminalDisplay;
