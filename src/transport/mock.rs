//! Mock transport for testing and demos.
//!
//! Simulates the chat backend by streaming a canned reply word-by-word,
//! framed as SSE `data:` lines.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::time::Duration;

use super::traits::{ByteStream, ChatTransport};
use crate::error::{ChatError, RequestFailure, StreamFailure};
use crate::message::{ChatMessage, ChatRequest};
use crate::streaming::{format_sse_chunk, format_sse_done, ReplyRenderer};

/// Health text reported by the mock backend.
pub const MOCK_HEALTH: &str = "Chatbot is ready!";

/// What the mock backend answers with.
#[derive(Debug, Clone)]
pub enum MockScript {
    /// Echo the prompt back inside a canned reply.
    Echo,
    /// Send these body chunks verbatim, then close.
    Chunks(Vec<Bytes>),
    /// Answer with this non-success status.
    Status(u16),
    /// Send these body chunks, then fail the read.
    BrokenAfter(Vec<Bytes>),
}

/// Mock transport that simulates a streaming backend.
pub struct MockTransport {
    script: MockScript,
    /// Delay between body chunks.
    token_delay: Duration,
}

impl MockTransport {
    /// Create an echoing mock transport.
    pub fn new() -> Self {
        Self::with_script(MockScript::Echo, Duration::from_millis(30))
    }

    pub fn with_script(script: MockScript, token_delay: Duration) -> Self {
        Self {
            script,
            token_delay,
        }
    }

    /// Create with custom token delay.
    pub fn with_delay(token_delay: Duration) -> Self {
        Self::with_script(MockScript::Echo, token_delay)
    }

    fn echo_reply(prompt: &str) -> String {
        let preview: String = if prompt.chars().count() > 100 {
            format!("{}...", prompt.chars().take(100).collect::<String>())
        } else {
            prompt.to_string()
        };

        format!(
            "You said: \"{}\". This reply is streamed by the mock transport, \
             one word at a time.",
            preview
        )
    }

    fn echo_chunks(prompt: &str) -> Vec<Bytes> {
        let reply = Self::echo_reply(prompt);
        let mut chunks: Vec<Bytes> = reply
            .split(' ')
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    format_sse_chunk(word)
                } else {
                    format_sse_chunk(&format!(" {}", word))
                }
            })
            .collect();
        chunks.push(format_sse_done());
        chunks
    }

    fn delayed(&self, items: Vec<Result<Bytes, ChatError>>) -> ByteStream {
        let delay = self.token_delay;
        stream::iter(items)
            .then(move |item| async move {
                if delay > Duration::ZERO {
                    tokio::time::sleep(delay).await;
                }
                item
            })
            .boxed()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn status_failure(status: u16) -> ChatError {
    ChatError::Request(RequestFailure::Status {
        status,
        body: "mock failure".to_string(),
    })
}

fn broken_read() -> ChatError {
    ChatError::Stream(StreamFailure::Read("connection reset by mock".to_string()))
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, ChatError> {
        let items: Vec<Result<Bytes, ChatError>> = match &self.script {
            MockScript::Echo => Self::echo_chunks(&request.message)
                .into_iter()
                .map(Ok)
                .collect(),
            MockScript::Chunks(chunks) => chunks.iter().cloned().map(Ok).collect(),
            MockScript::Status(status) => return Err(status_failure(*status)),
            MockScript::BrokenAfter(chunks) => chunks
                .iter()
                .cloned()
                .map(Ok)
                .chain(std::iter::once(Err(broken_read())))
                .collect(),
        };

        Ok(self.delayed(items))
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ChatError> {
        match &self.script {
            MockScript::Echo => Ok(ChatMessage::bot(Self::echo_reply(&request.message))),
            MockScript::Chunks(chunks) => {
                let mut renderer = ReplyRenderer::new();
                for chunk in chunks {
                    renderer
                        .push(chunk, |_| {})
                        .map_err(|e| ChatError::Stream(e.into()))?;
                }
                Ok(ChatMessage::bot(renderer.finish()))
            }
            MockScript::Status(status) => Err(status_failure(*status)),
            MockScript::BrokenAfter(_) => Err(broken_read()),
        }
    }

    async fn health_check(&self) -> Result<String, ChatError> {
        match &self.script {
            MockScript::Status(status) => Err(status_failure(*status)),
            _ => Ok(MOCK_HEALTH.to_string()),
        }
    }
}
