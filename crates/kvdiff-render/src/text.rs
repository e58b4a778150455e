//! Human-readable report blocks.
//!
//! ```text
//!
//! Equal keys have different values:
//! K:
//! 00000000  6b 31 ...
//! V(A) 0:
//! 00000000  76 31 ...
//! Pretty(utf8): "v1"
//! V(B) 0:
//! 00000000  76 32 ...
//! Pretty(utf8): "v2"
//! ```

use std::io::{self, Write};

use colored::Colorize;

use kvdiff_diff::{DiffEvent, DiffResult, DiffSink, DiffSummary, Side, Versioned};

use crate::config::RenderConfig;
use crate::decode::DecoderChain;
use crate::hexdump::hex_dump_limited;
use crate::ReportRenderer;

const MISMATCH_HEADING: &str = "Equal keys have different values:";
const ONLY_IN_HEADING: &str = "Key present in one KV store but not the other:";
const UNDECODABLE: &str = "Pretty: unknown conversion";

/// Writes one text block per event, flushing after each.
pub struct TextRenderer<W: Write> {
    out: W,
    config: RenderConfig,
    decoders: DecoderChain,
}

impl<W: Write> TextRenderer<W> {
    /// Renderer using the standard decoder chain when `config.pretty` is set.
    pub fn new(out: W, config: RenderConfig) -> Self {
        let decoders = if config.pretty {
            DecoderChain::standard()
        } else {
            DecoderChain::empty()
        };
        Self::with_decoders(out, config, decoders)
    }

    pub fn with_decoders(out: W, config: RenderConfig, decoders: DecoderChain) -> Self {
        Self {
            out,
            config,
            decoders,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&self, text: &str) -> String {
        if self.config.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn write_dump(&mut self, bytes: &[u8]) -> io::Result<()> {
        let dump = hex_dump_limited(bytes, self.config.max_dump_bytes);
        self.out.write_all(dump.as_bytes())
    }

    fn write_pretty(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !self.config.pretty {
            return Ok(());
        }
        match self.decoders.decode(bytes) {
            Some(decoded) => writeln!(self.out, "Pretty({}): {}", decoded.schema, decoded.text),
            None => writeln!(self.out, "{UNDECODABLE}"),
        }
    }

    fn write_value(&mut self, side: Side, meta: u8, value: &[u8]) -> io::Result<()> {
        writeln!(self.out, "V({side}) {meta}:")?;
        self.write_dump(value)?;
        self.write_pretty(value)
    }

    fn write_mismatch(&mut self, key: &[u8], a: &Versioned, b: &Versioned) -> io::Result<()> {
        let heading = self.heading(MISMATCH_HEADING);
        writeln!(self.out)?;
        writeln!(self.out, "{heading}")?;
        writeln!(self.out, "K:")?;
        self.write_dump(key)?;
        self.write_value(Side::A, a.meta, &a.value)?;
        self.write_value(Side::B, b.meta, &b.value)
    }

    fn write_only_in(&mut self, side: Side, key: &[u8], meta: u8, value: &[u8]) -> io::Result<()> {
        let heading = self.heading(ONLY_IN_HEADING);
        writeln!(self.out)?;
        writeln!(self.out, "{heading}")?;
        writeln!(self.out, "K({side}):")?;
        self.write_dump(key)?;
        self.write_value(side, meta, value)
    }
}

impl<W: Write> DiffSink for TextRenderer<W> {
    fn emit(&mut self, event: DiffEvent) -> DiffResult<()> {
        match &event {
            DiffEvent::ValueMismatch { key, a, b } => self.write_mismatch(key, a, b)?,
            DiffEvent::OnlyIn {
                side,
                key,
                meta,
                value,
            } => self.write_only_in(*side, key, *meta, value)?,
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportRenderer for TextRenderer<W> {
    fn finish(&mut self, summary: &DiffSummary) -> io::Result<()> {
        write_summary(&mut self.out, summary)?;
        self.out.flush()
    }
}

/// The closing two-line summary of entries visited per store.
pub fn write_summary<W: Write>(w: &mut W, summary: &DiffSummary) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "Summary:")?;
    writeln!(w, "Num keys(A): {}", summary.count_a)?;
    writeln!(w, "Num keys(B): {}", summary.count_b)
}
