//! Transport trait definitions.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::ChatError;
use crate::message::{ChatMessage, ChatRequest};

/// Raw response body of a streaming exchange.
///
/// Items are arbitrarily sized; a read error ends the exchange.
pub type ByteStream = BoxStream<'static, Result<Bytes, ChatError>>;

/// The chat backend, as seen by the client.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &'static str;

    /// Post a message and open the streaming response body.
    ///
    /// Resolves once the response head arrives. A non-success status is a
    /// request failure, never a stream.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, ChatError>;

    /// Post a message and wait for the whole reply.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ChatError>;

    /// Health check for the backend. Returns its status text.
    async fn health_check(&self) -> Result<String, ChatError>;
}
