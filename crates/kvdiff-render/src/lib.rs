//! Report rendering for kvdiff.
//!
//! Renderers are [`DiffSink`](kvdiff_diff::DiffSink)s: each event is written
//! to the output as soon as the engine emits it, never buffered or reordered.
//!
//! - [`TextRenderer`] -- human-readable blocks with hex dumps
//! - [`JsonRenderer`] -- one JSON object per line
//!
//! Payload bytes can optionally be run through a [`DecoderChain`], an ordered
//! list of best-effort decoders where the first success wins. A payload no
//! decoder understands is shown raw with an "unknown conversion" marker.

pub mod config;
pub mod decode;
pub mod hexdump;
pub mod json;
pub mod text;

use std::io;

use kvdiff_diff::{DiffSink, DiffSummary};

pub use config::RenderConfig;
pub use decode::{Decoded, DecoderChain, FnDecoder, JsonDecoder, PayloadDecoder, Utf8Decoder};
pub use hexdump::hex_dump;
pub use json::JsonRenderer;
pub use text::{write_summary, TextRenderer};

/// A sink that can also close out the report with the final summary.
pub trait ReportRenderer: DiffSink {
    fn finish(&mut self, summary: &DiffSummary) -> io::Result<()>;
}
