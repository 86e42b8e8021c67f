//! HTTP client builder for the chat transport.

use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::{ChatError, RequestFailure};

/// Build an HTTP client configured for SSE streaming.
///
/// No overall request timeout is set: reply streams are long-lived and a
/// total timeout would cut them off mid-answer. Only the TCP connect can be
/// bounded.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, ChatError> {
    let mut builder = Client::builder().pool_max_idle_per_host(config.pool_max_idle_per_host);

    if let Some(timeout) = config.connect_timeout() {
        builder = builder.connect_timeout(timeout);
        tracing::debug!(timeout_secs = timeout.as_secs(), "Connect timeout configured");
    }

    // Allow insecure TLS connections (for testing with self-signed certificates)
    if config.insecure_ssl {
        builder = builder.danger_accept_invalid_certs(true);
        tracing::warn!("TLS certificate verification disabled (insecure_ssl=true)");
    }

    if config.http1_only {
        builder = builder.http1_only();
        tracing::debug!("HTTP/1.1 only");
    }

    builder
        .build()
        .map_err(|e| ChatError::Request(RequestFailure::Connection(e.to_string())))
}
