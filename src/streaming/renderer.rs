//! Incremental reply rendering.
//!
//! Turns response body chunks into the bot's accumulated reply text:
//! decode, buffer until `\n`, extract `data:` payloads, append.

use super::decoder::Utf8StreamDecoder;
use super::sse::{classify_line, LineBuffer, SseLine};
use crate::error::DecodeError;

/// Render state for one streaming response.
#[derive(Debug, Default)]
pub struct ReplyRenderer {
    decoder: Utf8StreamDecoder,
    lines: LineBuffer,
    full_text: String,
    payloads: usize,
}

impl ReplyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one body chunk.
    ///
    /// `on_update` is called with the whole reply so far after every payload
    /// appended. Returns how many payloads this chunk completed.
    pub fn push<F>(&mut self, chunk: &[u8], mut on_update: F) -> Result<usize, DecodeError>
    where
        F: FnMut(&str),
    {
        let text = self.decoder.decode(chunk)?;
        self.lines.push_str(&text);

        let mut appended = 0;
        while let Some(line) = self.lines.next_line() {
            match classify_line(&line) {
                SseLine::Data(payload) => {
                    self.full_text.push_str(payload);
                    appended += 1;
                    on_update(&self.full_text);
                }
                // Recognized but not a terminator: the transport closing ends the reply
                SseLine::Done => tracing::trace!("done sentinel received"),
                SseLine::Empty | SseLine::Ignored => {}
            }
        }

        self.payloads += appended;
        Ok(appended)
    }

    /// Reply text accumulated so far.
    pub fn text(&self) -> &str {
        &self.full_text
    }

    /// Total payloads appended.
    pub fn payloads(&self) -> usize {
        self.payloads
    }

    /// End of stream. Unterminated text and partial characters are dropped.
    pub fn finish(self) -> String {
        if !self.lines.is_empty() {
            tracing::debug!(
                discarded = self.lines.remainder().len(),
                "unterminated line at end of stream"
            );
        }
        if self.decoder.has_pending() {
            tracing::debug!(
                discarded = self.decoder.pending_len(),
                "incomplete character at end of stream"
            );
        }
        self.full_text
    }
}
