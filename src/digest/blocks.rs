use serde::{Serialize, Serializer};

use super::chunk::Chunk;

/// One typed unit of a Slack Block Kit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBlock {
    Header { text: String },
    Section { text: String },
    Divider,
    Context { text: String },
}

impl MessageBlock {
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header { text: text.into() }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Self::Section { text: text.into() }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::Context { text: text.into() }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Header { text } | Self::Section { text } | Self::Context { text } => {
                Some(text.as_str())
            }
            Self::Divider => None,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireBlock<'a> {
    Header { text: WireText<'a> },
    Section { text: WireText<'a> },
    Divider,
    Context { elements: [WireText<'a>; 1] },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireText<'a> {
    PlainText { text: &'a str },
    Mrkdwn { text: &'a str },
}

impl Serialize for MessageBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Header { text } => WireBlock::Header {
                text: WireText::PlainText { text },
            },
            Self::Section { text } => WireBlock::Section {
                text: WireText::Mrkdwn { text },
            },
            Self::Divider => WireBlock::Divider,
            Self::Context { text } => WireBlock::Context {
                elements: [WireText::Mrkdwn { text }],
            },
        };
        wire.serialize(serializer)
    }
}

/// An ordered block list that never exceeds the delivery block limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlockSequence(Vec<MessageBlock>);

impl BlockSequence {
    pub fn blocks(&self) -> &[MessageBlock] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lay out preamble, one section per chunk and footer, then enforce the
/// block cap.
///
/// Dividers go between consecutive chunks only. When the result would hold
/// more than `max_blocks` blocks, the first `max_blocks - 1` are kept and a
/// context block carrying `truncation_notice` closes the sequence.
pub fn assemble(
    preamble: &[MessageBlock],
    chunks: &[Chunk],
    footer: &[MessageBlock],
    max_blocks: usize,
    truncation_notice: &str,
) -> BlockSequence {
    let mut blocks = Vec::with_capacity(preamble.len() + chunks.len() * 2 + footer.len());
    blocks.extend_from_slice(preamble);
    for (i, chunk) in chunks.iter().enumerate() {
        if i > 0 {
            blocks.push(MessageBlock::Divider);
        }
        blocks.push(MessageBlock::section(chunk.text.as_str()));
    }
    blocks.extend_from_slice(footer);

    let max_blocks = max_blocks.max(1);
    if blocks.len() > max_blocks {
        log::warn!(
            "too many blocks ({}), truncating to {}",
            blocks.len(),
            max_blocks
        );
        blocks.truncate(max_blocks - 1);
        blocks.push(MessageBlock::context(truncation_notice));
    }

    BlockSequence(blocks)
}
