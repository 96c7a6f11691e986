//! Turns raw model output into a Slack-ready block sequence.
//!
//! The stages are pure: [`format::normalize`] cleans the markup,
//! [`chunk::split`] cuts it into paragraph-aligned chunks and
//! [`blocks::assemble`] wraps those in header and footer blocks under the
//! block cap. [`render`] runs all three.

pub mod blocks;
pub mod chunk;
pub mod format;
pub mod kind;

use serde::Deserialize;

use crate::config::deserialize_option_parsed;
use blocks::{BlockSequence, MessageBlock};
use kind::DigestKind;

pub const DEFAULT_CHUNK_CHARS: usize = 2800;
pub const DEFAULT_MAX_BLOCKS: usize = 50;
pub const DEFAULT_TRUNCATION_NOTICE: &str = "_(truncated)_";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DigestConfig {
    #[serde(rename = "digest_kind", default)]
    pub kind: DigestKind,
    #[serde(
        rename = "digest_chunk_chars",
        default,
        deserialize_with = "deserialize_option_parsed"
    )]
    pub chunk_chars: Option<usize>,
    #[serde(
        rename = "digest_max_blocks",
        default,
        deserialize_with = "deserialize_option_parsed"
    )]
    pub max_blocks: Option<usize>,
    #[serde(rename = "digest_truncation_notice")]
    pub truncation_notice: Option<String>,
}

/// Everything the formatting pipeline needs to know about one digest
/// variant and the delivery limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestLayout {
    pub section_markers: Vec<String>,
    pub bullet: String,
    /// Maximum characters per section block.
    pub chunk_chars: usize,
    /// Maximum number of blocks per message.
    pub max_blocks: usize,
    pub truncation_notice: String,
}

impl DigestLayout {
    pub fn new(config: &DigestConfig) -> Self {
        let kind = config.kind;
        Self {
            section_markers: kind.section_markers(),
            bullet: kind::BULLET.to_string(),
            chunk_chars: config.chunk_chars.unwrap_or(DEFAULT_CHUNK_CHARS),
            max_blocks: config.max_blocks.unwrap_or(DEFAULT_MAX_BLOCKS),
            truncation_notice: config
                .truncation_notice
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TRUNCATION_NOTICE.to_string()),
        }
    }

    /// Section markers with emoji presentation selectors removed.
    pub fn marker_glyphs(&self) -> Vec<String> {
        self.section_markers
            .iter()
            .map(|m| format::base_glyph(m))
            .filter(|m| !m.is_empty())
            .collect()
    }

    /// Markers that never appear in `text`, in configured order.
    pub fn missing_sections(&self, text: &str) -> Vec<String> {
        self.section_markers
            .iter()
            .filter(|m| !text.contains(format::base_glyph(m).as_str()))
            .cloned()
            .collect()
    }
}

impl Default for DigestLayout {
    fn default() -> Self {
        Self::new(&DigestConfig::default())
    }
}

/// Normalize, chunk and assemble `raw` between the given preamble and footer.
pub fn render(
    layout: &DigestLayout,
    raw: &str,
    preamble: &[MessageBlock],
    footer: &[MessageBlock],
) -> BlockSequence {
    let normalized = format::normalize(raw, layout);
    let chunks = chunk::split(&normalized, layout.chunk_chars);
    log::info!(
        "formatted digest: {} chars in {} chunks",
        normalized.chars().count(),
        chunks.len()
    );
    blocks::assemble(
        preamble,
        &chunks,
        footer,
        layout.max_blocks,
        &layout.truncation_notice,
    )
}
