//! Response body decoding and SSE line handling.

mod decoder;
mod renderer;
mod sse;

pub use decoder::Utf8StreamDecoder;
pub use renderer::ReplyRenderer;
pub use sse::{
    classify_line, format_sse_chunk, format_sse_done, LineBuffer, SseLine, DATA_PREFIX,
    DONE_SENTINEL,
};
