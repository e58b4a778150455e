//! JSON-lines output: one object per event, then one summary object.
//!
//! Keys and values are hex-encoded so arbitrary bytes survive.

use std::io::{self, Write};

use serde::Serialize;

use kvdiff_diff::{DiffEvent, DiffResult, DiffSink, DiffSummary, Side};

use crate::decode::DecoderChain;
use crate::ReportRenderer;

#[derive(Serialize)]
struct JsonValue {
    meta: u8,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pretty: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonRecord {
    ValueMismatch {
        key: String,
        a: JsonValue,
        b: JsonValue,
    },
    OnlyIn {
        side: Side,
        key: String,
        meta: u8,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pretty: Option<String>,
    },
    Summary {
        count_a: u64,
        count_b: u64,
        value_mismatches: u64,
        only_in_a: u64,
        only_in_b: u64,
        any_mismatch: bool,
    },
}

impl From<&DiffSummary> for JsonRecord {
    fn from(summary: &DiffSummary) -> Self {
        JsonRecord::Summary {
            count_a: summary.count_a,
            count_b: summary.count_b,
            value_mismatches: summary.value_mismatches,
            only_in_a: summary.only_in_a,
            only_in_b: summary.only_in_b,
            any_mismatch: summary.any_mismatch(),
        }
    }
}

/// Writes each event as a single JSON line.
pub struct JsonRenderer<W: Write> {
    out: W,
    decoders: DecoderChain,
}

impl<W: Write> JsonRenderer<W> {
    /// `decoders` fill the optional `pretty` field; pass an empty chain to omit it.
    pub fn new(out: W, decoders: DecoderChain) -> Self {
        Self { out, decoders }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn value(&self, meta: u8, bytes: &[u8]) -> JsonValue {
        JsonValue {
            meta,
            value: hex::encode(bytes),
            pretty: self.decoders.decode(bytes).map(|d| d.text),
        }
    }

    fn write_record(&mut self, record: &JsonRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> DiffSink for JsonRenderer<W> {
    fn emit(&mut self, event: DiffEvent) -> DiffResult<()> {
        let record = match &event {
            DiffEvent::ValueMismatch { key, a, b } => JsonRecord::ValueMismatch {
                key: hex::encode(key),
                a: self.value(a.meta, &a.value),
                b: self.value(b.meta, &b.value),
            },
            DiffEvent::OnlyIn {
                side,
                key,
                meta,
                value,
            } => {
                let JsonValue {
                    meta,
                    value,
                    pretty,
                } = self.value(*meta, value);
                JsonRecord::OnlyIn {
                    side: *side,
                    key: hex::encode(key),
                    meta,
                    value,
                    pretty,
                }
            }
        };
        self.write_record(&record)?;
        Ok(())
    }
}

impl<W: Write> ReportRenderer for JsonRenderer<W> {
    fn finish(&mut self, summary: &DiffSummary) -> io::Result<()> {
        self.write_record(&JsonRecord::from(summary))
    }
}
