//! Streaming chat client: one message out, one reply streamed back.

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;

use super::display::ChatDisplay;
use super::state::RequestState;
use crate::config::UiConfig;
use crate::error::{ChatError, StreamFailure};
use crate::message::{ChatMessage, ChatRequest};
use crate::streaming::ReplyRenderer;
use crate::transport::ChatTransport;

/// Result of [`StreamingChatClient::send_message`].
#[derive(Debug)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing happened.
    Ignored,
    /// A send was already in flight; nothing happened.
    Busy,
    /// The reply streamed to completion.
    Replied(ChatMessage),
    /// The exchange failed; the user was shown the error message.
    Failed(ChatError),
}

impl SendOutcome {
    pub fn reply(&self) -> Option<&ChatMessage> {
        match self {
            SendOutcome::Replied(reply) => Some(reply),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SendOutcome::Failed(_))
    }
}

/// Owns the request/response exchange and renders the reply as it arrives.
pub struct StreamingChatClient<D> {
    transport: Arc<dyn ChatTransport>,
    display: D,
    state: RequestState,
    error_message: String,
}

impl<D: ChatDisplay> StreamingChatClient<D> {
    pub fn new(transport: Arc<dyn ChatTransport>, display: D, ui: &UiConfig) -> Self {
        Self {
            transport,
            display,
            state: RequestState::Idle,
            error_message: ui.error_message.clone(),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Send one message and stream the reply into the display.
    ///
    /// Never fails: errors are shown to the user as a bot message and
    /// returned in the outcome. Controls are re-enabled and the input
    /// refocused on every path that reaches the end of the exchange.
    /// Dropping the future mid-exchange leaves the controls disabled.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }
        if !self.state.is_idle() {
            tracing::warn!(state = self.state.as_str(), "Send refused, exchange in flight");
            return SendOutcome::Busy;
        }

        self.transition(RequestState::Sending);
        self.display.append_message(&ChatMessage::user(message));
        self.display.clear_input();
        self.display.scroll_to_bottom();
        self.display.show_typing();
        self.display.scroll_to_bottom();

        let started = Instant::now();
        tracing::info!(
            transport = self.transport.name(),
            message_len = message.len(),
            "Sending chat message"
        );

        let outcome = match self.exchange(message).await {
            Ok(reply) => {
                tracing::info!(
                    reply_len = reply.text.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Reply completed"
                );
                SendOutcome::Replied(reply)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    stream_failure = e.is_stream_failure(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Chat exchange failed"
                );
                self.display.hide_typing();
                self.display
                    .append_message(&ChatMessage::bot(self.error_message.clone()));
                self.display.scroll_to_bottom();
                SendOutcome::Failed(e)
            }
        };

        self.transition(RequestState::Idle);
        self.display.focus_input();
        outcome
    }

    async fn exchange(&mut self, message: &str) -> Result<ChatMessage, ChatError> {
        let request = ChatRequest::user(message);
        let mut body = self.transport.open_stream(&request).await?;

        self.transition(RequestState::Streaming);
        self.display.hide_typing();
        self.display.start_reply();
        self.display.scroll_to_bottom();

        let mut renderer = ReplyRenderer::new();
        let display = &mut self.display;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            tracing::debug!(len = chunk.len(), "Body chunk received");

            renderer
                .push(&chunk, |text| {
                    display.update_reply(text);
                    display.scroll_to_bottom();
                })
                .map_err(StreamFailure::from)?;
        }

        tracing::debug!(payloads = renderer.payloads(), "Response stream ended");
        Ok(ChatMessage::bot(renderer.finish()))
    }

    fn transition(&mut self, next: RequestState) {
        let prev = self.state;
        debug_assert!(
            prev.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            prev,
            next
        );
        self.state = next;
        tracing::trace!(from = prev.as_str(), to = next.as_str(), "Request state");

        if prev.controls_enabled() != next.controls_enabled() {
            self.display.set_controls_enabled(next.controls_enabled());
        }
    }
}
