//! Integration tests for the input-control guard.
//!
//! A gated transport lets the test hold the exchange at each suspension
//! point (response head, each body chunk) and check that controls stay
//! disabled until the exchange has fully completed, on success and on error.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::{mpsc, oneshot};
use futures::StreamExt;

use streaming_chat_client::chat::{RequestState, SendOutcome, StreamingChatClient, Transcript};
use streaming_chat_client::config::UiConfig;
use streaming_chat_client::error::{ChatError, RequestFailure, StreamFailure};
use streaming_chat_client::message::{ChatMessage, ChatRequest, Role};
use streaming_chat_client::transport::{ByteStream, ChatTransport};

type BodyItem = Result<Bytes, ChatError>;

/// What the transport saw when the request was issued.
#[derive(Debug, Clone)]
struct OpenSnapshot {
    user_messages: usize,
    controls_enabled: bool,
    request: ChatRequest,
}

/// Transport whose response head and body are released by the test.
struct GatedTransport {
    head: Mutex<Option<oneshot::Receiver<u16>>>,
    body: Mutex<Option<mpsc::UnboundedReceiver<BodyItem>>>,
    observer: Transcript,
    opened: Mutex<Option<OpenSnapshot>>,
}

impl GatedTransport {
    fn opened(&self) -> Option<OpenSnapshot> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for GatedTransport {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, ChatError> {
        *self.opened.lock().unwrap() = Some(OpenSnapshot {
            user_messages: self.observer.count(Role::User),
            controls_enabled: self.observer.controls_enabled(),
            request: request.clone(),
        });

        let head = self.head.lock().unwrap().take().expect("opened twice");
        let status = head.await.unwrap_or(599);
        if status != 200 {
            return Err(RequestFailure::Status {
                status,
                body: String::new(),
            }
            .into());
        }

        let body = self.body.lock().unwrap().take().expect("opened twice");
        Ok(body.boxed())
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatMessage, ChatError> {
        unimplemented!("not used by the streaming client")
    }

    async fn health_check(&self) -> Result<String, ChatError> {
        Ok("gated".to_string())
    }
}

struct Harness {
    transport: Arc<GatedTransport>,
    transcript: Transcript,
    head: Option<oneshot::Sender<u16>>,
    body: mpsc::UnboundedSender<BodyItem>,
}

fn harness() -> (Harness, StreamingChatClient<Transcript>) {
    let transcript = Transcript::new();
    let (head_tx, head_rx) = oneshot::channel();
    let (body_tx, body_rx) = mpsc::unbounded();

    let transport = Arc::new(GatedTransport {
        head: Mutex::new(Some(head_rx)),
        body: Mutex::new(Some(body_rx)),
        observer: transcript.clone(),
        opened: Mutex::new(None),
    });

    let client = StreamingChatClient::new(transport.clone(), transcript.clone(), &UiConfig::default());

    (
        Harness {
            transport,
            transcript,
            head: Some(head_tx),
            body: body_tx,
        },
        client,
    )
}

impl Harness {
    fn release_head(&mut self, status: u16) {
        self.head.take().unwrap().send(status).unwrap();
    }

    fn send(&self, chunk: &'static [u8]) {
        self.body.unbounded_send(Ok(Bytes::from_static(chunk))).unwrap();
    }
}

/// Poll until `condition` holds, yielding to the client task in between.
async fn wait_until<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached");
}

#[tokio::test]
async fn test_controls_disabled_until_stream_ends() {
    let (mut h, mut client) = harness();
    let task = tokio::spawn(async move {
        let outcome = client.send_message("hello").await;
        (client, outcome)
    });

    // Waiting for the response head
    let transport = h.transport.clone();
    wait_until(|| transport.opened().is_some()).await;
    let snapshot = h.transport.opened().unwrap();
    assert_eq!(snapshot.user_messages, 1);
    assert!(!snapshot.controls_enabled);
    assert_eq!(snapshot.request, ChatRequest::user("hello"));
    assert!(h.transcript.typing_visible());
    assert!(!h.transcript.controls_enabled());

    // Streaming, mid-line
    h.release_head(200);
    h.send(b"data: hel");
    let transcript = h.transcript.clone();
    wait_until(|| !transcript.typing_visible()).await;
    assert!(!h.transcript.controls_enabled());

    // Streaming, line complete and rendered
    h.send(b"lo\n");
    wait_until(|| transcript.last_message().map(|m| m.text) == Some(" hello".to_string())).await;
    assert!(!h.transcript.controls_enabled());
    assert!(!h.transcript.input_focused());

    // [DONE] is not the end; only closing the body is
    h.send(b"data:[DONE]\n");
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!h.transcript.controls_enabled());

    h.body.close_channel();
    let (client, outcome) = task.await.unwrap();

    assert_eq!(outcome.reply().unwrap().text, " hello");
    assert_eq!(client.state(), RequestState::Idle);
    assert!(h.transcript.controls_enabled());
    assert!(h.transcript.input_focused());
    assert_eq!(h.transcript.count(Role::Bot), 1);
}

#[tokio::test]
async fn test_controls_disabled_until_stream_error() {
    let (mut h, mut client) = harness();
    let task = tokio::spawn(async move { client.send_message("hello").await });

    let transport = h.transport.clone();
    wait_until(|| transport.opened().is_some()).await;
    h.release_head(200);
    h.send(b"data:partial\n");

    let transcript = h.transcript.clone();
    wait_until(|| transcript.last_message().map(|m| m.text) == Some("partial".to_string())).await;
    assert!(!h.transcript.controls_enabled());

    h.body
        .unbounded_send(Err(StreamFailure::Read("connection reset".to_string()).into()))
        .unwrap();
    let outcome = task.await.unwrap();

    match outcome {
        SendOutcome::Failed(e) => assert!(e.is_stream_failure()),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(h.transcript.controls_enabled());
    assert!(h.transcript.input_focused());
    let messages = h.transcript.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].text, UiConfig::default().error_message);
}

#[tokio::test]
async fn test_controls_disabled_until_status_failure() {
    let (mut h, mut client) = harness();
    let task = tokio::spawn(async move { client.send_message("hello").await });

    let transport = h.transport.clone();
    wait_until(|| transport.opened().is_some()).await;
    assert!(!h.transcript.controls_enabled());

    h.release_head(503);
    let outcome = task.await.unwrap();

    assert!(outcome.is_failed());
    assert_eq!(h.transcript.count(Role::Bot), 1);
    assert!(!h.transcript.typing_visible());
    assert!(h.transcript.controls_enabled());
    assert!(h.transcript.input_focused());
}

#[tokio::test]
async fn test_whitespace_never_reaches_transport() {
    let (h, mut client) = harness();

    assert!(matches!(client.send_message(" \t\n").await, SendOutcome::Ignored));

    assert!(h.transport.opened().is_none());
    assert!(h.transcript.messages().is_empty());
    assert!(h.transcript.controls_enabled());
}
