//! SSE (Server-Sent Events) line handling.
//!
//! Only the `data:` field is meaningful to this protocol. Lines are split
//! on bare `\n` with an optional trailing `\r`, so both `\n` and `\r\n`
//! framing work without a full event parser.

use bytes::Bytes;

/// Field prefix carrying an event payload.
pub const DATA_PREFIX: &str = "data:";

/// Payload the backend may send at the end of a reply.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A complete line, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Payload after `data:`, verbatim (a leading space is part of it).
    Data(&'a str),
    /// `data:[DONE]`.
    Done,
    /// `data:` with nothing after it.
    Empty,
    /// Anything else: comments, other fields, blank separators.
    Ignored,
}

/// Classify one line as returned by [`LineBuffer::next_line`], already
/// stripped of its terminator. Any further `\r` belongs to the payload.
pub fn classify_line(line: &str) -> SseLine<'_> {
    match line.strip_prefix(DATA_PREFIX) {
        Some(DONE_SENTINEL) => SseLine::Done,
        Some("") => SseLine::Empty,
        Some(payload) => SseLine::Data(payload),
        None => SseLine::Ignored,
    }
}

/// Accumulates decoded text and hands out complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    raw: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        self.raw.push_str(text);
    }

    /// Split off the next complete line, minus `\n` and one trailing `\r`.
    pub fn next_line(&mut self) -> Option<String> {
        let newline_pos = self.raw.find('\n')?;
        let mut line: String = self.raw.drain(..=newline_pos).collect();
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Text received after the last `\n`.
    pub fn remainder(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Format content as SSE data lines, the way the chat backend frames tokens.
///
/// Content is written right after the colon, so a token " suis" becomes
/// `data: suis`. Embedded newlines become separate data lines.
pub fn format_sse_chunk(content: &str) -> Bytes {
    let mut out = String::with_capacity(content.len() + 8);
    for line in content.split('\n') {
        out.push_str(DATA_PREFIX);
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.into()
}

/// Format the done marker as an SSE event.
pub fn format_sse_done() -> Bytes {
    format!("{}{}\n\n", DATA_PREFIX, DONE_SENTINEL).into()
}
