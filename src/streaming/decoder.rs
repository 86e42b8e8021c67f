//! Incremental UTF-8 decoding across chunk boundaries.

use crate::error::DecodeError;

/// Longest incomplete UTF-8 prefix that can be carried between chunks.
const MAX_PENDING: usize = 3;

/// Stateful UTF-8 decoder.
///
/// A multi-byte character split across two chunks is held back until the
/// rest of its bytes arrive, so decoding the same bytes with any chunking
/// yields the same text.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning all complete characters.
    ///
    /// Trailing bytes that start a character but do not finish it are kept
    /// for the next call. An invalid sequence is an error.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, DecodeError> {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        if let Some(e) = std::str::from_utf8(&input).err() {
            // error_len() is None only when the input ends mid-character
            if e.error_len().is_some() {
                return Err(DecodeError {
                    offset: e.valid_up_to(),
                });
            }
            self.pending = input.split_off(e.valid_up_to());
            debug_assert!(self.pending.len() <= MAX_PENDING);
        }

        String::from_utf8(input).map_err(|e| DecodeError {
            offset: e.utf8_error().valid_up_to(),
        })
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
