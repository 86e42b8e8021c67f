//! Chunk-boundary independence of the rendered reply.
//!
//! The same response body, delivered with any chunking (mid-line,
//! mid-character, byte-by-byte), must render the same reply text.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use streaming_chat_client::chat::{StreamingChatClient, Transcript};
use streaming_chat_client::config::UiConfig;
use streaming_chat_client::message::Role;
use streaming_chat_client::transport::{MockScript, MockTransport};

/// A reply framed the way the backend frames tokens, with noise around it.
const BODY: &str = concat!(
    ": comment line\n",
    "data:Je\n\n",
    "data: suis\r\n\r\n",
    "event: token\n",
    "data: un robot 🤖\n\n",
    "data:\n\n",
    "data:, 日本語\n\n",
    "id: 42\n",
    "data:[DONE]\n\n",
);

const EXPECTED: &str = "Je suis un robot 🤖, 日本語";

async fn render(chunks: Vec<Bytes>) -> String {
    let transcript = Transcript::new();
    let transport = Arc::new(MockTransport::with_script(
        MockScript::Chunks(chunks),
        Duration::ZERO,
    ));
    let mut client = StreamingChatClient::new(transport, transcript.clone(), &UiConfig::default());

    let outcome = client.send_message("qui es-tu ?").await;
    let reply = outcome.reply().expect("reply").text.clone();

    // The display shows exactly what the client returns
    let shown = transcript.messages();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[1].role, Role::Bot);
    assert_eq!(shown[1].text, reply);
    reply
}

fn split_at_all(body: &[u8], points: &[usize]) -> Vec<Bytes> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &point in points {
        chunks.push(Bytes::copy_from_slice(&body[start..point]));
        start = point;
    }
    chunks.push(Bytes::copy_from_slice(&body[start..]));
    chunks
}

#[tokio::test]
async fn test_whole_body() {
    assert_eq!(render(vec![Bytes::from_static(BODY.as_bytes())]).await, EXPECTED);
}

#[tokio::test]
async fn test_every_two_way_split() {
    let body = BODY.as_bytes();
    for point in 0..=body.len() {
        let text = render(split_at_all(body, &[point])).await;
        assert_eq!(text, EXPECTED, "split at byte {}", point);
    }
}

#[tokio::test]
async fn test_byte_by_byte() {
    let chunks = BODY.as_bytes().iter().map(|b| Bytes::copy_from_slice(&[*b])).collect();
    assert_eq!(render(chunks).await, EXPECTED);
}

#[tokio::test]
async fn test_strided_splits() {
    let body = BODY.as_bytes();
    for stride in [2, 3, 5, 7, 13] {
        let chunks = body.chunks(stride).map(Bytes::copy_from_slice).collect();
        assert_eq!(render(chunks).await, EXPECTED, "stride {}", stride);
    }
}

#[tokio::test]
async fn test_example_chunkings() {
    let a = render(vec![
        Bytes::from_static(b"data: hel"),
        Bytes::from_static(b"lo\n"),
    ])
    .await;
    let b = render(vec![
        Bytes::from_static(b"d"),
        Bytes::from_static(b"ata: hello\n"),
    ])
    .await;

    // The leading space after the colon belongs to the payload
    assert_eq!(a, " hello");
    assert_eq!(a, b);
    assert_eq!(a.trim_start(), "hello");
}

#[tokio::test]
async fn test_non_data_lines_never_rendered() {
    let text = render(vec![Bytes::from_static(BODY.as_bytes())]).await;
    for noise in ["comment", "event", "token", "id", "42", "[DONE]", "data"] {
        assert!(!text.contains(noise), "{:?} leaked into {:?}", noise, text);
    }
}
