use serde::{Deserialize, Serialize};

/// Options controlling how reports are rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Try the decoder chain on value bytes.
    pub pretty: bool,
    /// Colorize block headings.
    pub color: bool,
    /// Cap on bytes shown per hex dump. `None` dumps everything.
    pub max_dump_bytes: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            color: false,
            max_dump_bytes: None,
        }
    }
}

impl RenderConfig {
    /// Raw output: no decoding, no color.
    pub fn raw() -> Self {
        Self {
            pretty: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = RenderConfig::default();
        assert!(c.pretty);
        assert!(!c.color);
        assert!(c.max_dump_bytes.is_none());
    }

    #[test]
    fn raw_disables_decoding_only() {
        let c = RenderConfig::raw();
        assert!(!c.pretty);
        assert!(!c.color);
    }
}
