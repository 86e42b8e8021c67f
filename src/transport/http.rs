//! HTTP transport for the chat backend.
//!
//! Posts `{"message", "role"}` as JSON and exposes the SSE response body as
//! raw bytes; line splitting happens in the client.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};

use super::traits::{ByteStream, ChatTransport};
use crate::error::{ChatError, RequestFailure, StreamFailure};
use crate::message::{ChatMessage, ChatReply, ChatRequest};

/// Chat backend reached over HTTP.
pub struct HttpTransport {
    client: Client,
    stream_url: String,
    chat_url: String,
    health_url: String,
}

impl HttpTransport {
    pub fn new(client: Client, stream_url: String, chat_url: String, health_url: String) -> Self {
        Self {
            client,
            stream_url,
            chat_url,
            health_url,
        }
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, ChatError> {
        let response = self
            .client
            .post(&self.stream_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(request_error)?;

        let response = check_status(response).await?;

        tracing::debug!(
            status = response.status().as_u16(),
            url = %self.stream_url,
            "Response stream opened"
        );

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| ChatError::Stream(StreamFailure::Read(e.to_string()))));

        Ok(body.boxed())
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ChatError> {
        let response = self
            .client
            .post(&self.chat_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(request_error)?;

        let reply: ChatReply = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RequestFailure::InvalidReply(e.to_string()))?;

        Ok(reply.into())
    }

    async fn health_check(&self) -> Result<String, ChatError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(request_error)?;

        let text = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| RequestFailure::Http(e.to_string()))?;

        Ok(text)
    }
}

/// Turn a non-success status into a request failure, keeping the body for logs.
async fn check_status(response: Response) -> Result<Response, RequestFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RequestFailure::Status {
        status: status.as_u16(),
        body,
    })
}

fn request_error(e: reqwest::Error) -> RequestFailure {
    if e.is_connect() || e.is_timeout() {
        RequestFailure::Connection(e.to_string())
    } else {
        RequestFailure::Http(e.to_string())
    }
}
