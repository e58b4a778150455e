//! Best-effort payload decoding for display.
//!
//! Nothing here is authoritative: a decoder either produces a readable
//! rendering of the bytes or declines, and declining is never an error.

/// A named, speculative decoder for value bytes.
pub trait PayloadDecoder {
    /// Short schema name shown next to the decoded text.
    fn name(&self) -> &str;

    /// Render `bytes` if they look like this schema, otherwise `None`.
    fn try_decode(&self, bytes: &[u8]) -> Option<String>;
}

/// JSON objects and arrays, pretty-printed.
///
/// Bare scalars are declined: almost any short digit string parses as a JSON
/// number, which says nothing about the payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDecoder;

impl PayloadDecoder for JsonDecoder {
    fn name(&self) -> &str {
        "json"
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
        if !(value.is_object() || value.is_array()) {
            return None;
        }
        serde_json::to_string_pretty(&value).ok()
    }
}

/// Printable UTF-8 text, shown quoted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8Decoder;

impl PayloadDecoder for Utf8Decoder {
    fn name(&self) -> &str {
        "utf8"
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        if bytes.is_empty() {
            return None;
        }
        let text = std::str::from_utf8(bytes).ok()?;
        if text
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
        {
            return None;
        }
        Some(format!("{text:?}"))
    }
}

/// A decoder built from a name and a closure.
pub struct FnDecoder<F> {
    name: String,
    decode: F,
}

impl<F> FnDecoder<F>
where
    F: Fn(&[u8]) -> Option<String>,
{
    pub fn new(name: impl Into<String>, decode: F) -> Self {
        Self {
            name: name.into(),
            decode,
        }
    }
}

impl<F> PayloadDecoder for FnDecoder<F>
where
    F: Fn(&[u8]) -> Option<String>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        (self.decode)(bytes)
    }
}

/// Successful decode: which schema matched and its rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub schema: &'a str,
    pub text: String,
}

/// Ordered list of decoders. The first one that accepts the bytes wins.
#[derive(Default)]
pub struct DecoderChain {
    decoders: Vec<Box<dyn PayloadDecoder>>,
}

impl DecoderChain {
    /// A chain with no decoders; every payload is shown raw.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in chain: `json`, then `utf8`.
    pub fn standard() -> Self {
        let mut chain = Self::empty();
        chain.push(JsonDecoder);
        chain.push(Utf8Decoder);
        chain
    }

    /// Append a decoder after all existing ones.
    pub fn push(&mut self, decoder: impl PayloadDecoder + 'static) -> &mut Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Try each decoder in order.
    pub fn decode(&self, bytes: &[u8]) -> Option<Decoded<'_>> {
        self.decoders.iter().find_map(|d| {
            d.try_decode(bytes).map(|text| Decoded {
                schema: d.name(),
                text,
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decoder names in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }
}

impl std::fmt::Debug for DecoderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderChain")
            .field("decoders", &self.names())
            .finish()
    }
}
