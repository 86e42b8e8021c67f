//! Transports connecting the client to the chat backend.

mod client;
mod http;
mod mock;
mod traits;

pub use client::build_http_client;
pub use http::HttpTransport;
pub use mock::{MockScript, MockTransport, MOCK_HEALTH};
pub use traits::{ByteStream, ChatTransport};

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ChatError;

/// Create a transport from configuration.
pub fn create_transport(config: &ClientConfig) -> Result<Arc<dyn ChatTransport>, ChatError> {
    match config.transport.as_str() {
        "mock" => Ok(Arc::new(MockTransport::with_delay(config.mock_token_delay()))),
        "http" => {
            let client = build_http_client(config)?;
            Ok(Arc::new(HttpTransport::new(
                client,
                config.stream_url(),
                config.chat_url(),
                config.health_url(),
            )))
        }
        other => Err(ChatError::Config(format!(
            "Unknown transport: {}. Available: http, mock",
            other
        ))),
    }
}
