const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A paragraph-aligned slice of a digest, small enough for one section block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position in the chunk sequence.
    pub index: usize,
    pub text: String,
}

/// Split normalized text into chunks of at most `max_chars` characters.
///
/// Splits happen only on blank lines. A paragraph that is longer than
/// `max_chars` on its own becomes a single oversized chunk instead of being
/// cut mid-paragraph.
pub fn split(text: &str, max_chars: usize) -> Vec<Chunk> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if char_len(trimmed) <= max_chars {
        return vec![Chunk {
            index: 1,
            text: trimmed.to_string(),
        }];
    }

    log::debug!(
        "content too long ({} chars), splitting at {} chars",
        char_len(trimmed),
        max_chars
    );

    let separator_len = char_len(PARAGRAPH_SEPARATOR);
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for paragraph in trimmed.split(PARAGRAPH_SEPARATOR) {
        let paragraph_len = char_len(paragraph);
        if buffer_len + paragraph_len + separator_len > max_chars && !buffer.is_empty() {
            close(&mut chunks, &buffer);
            buffer.clear();
            buffer_len = 0;
        }
        buffer.push_str(paragraph);
        buffer.push_str(PARAGRAPH_SEPARATOR);
        buffer_len += paragraph_len + separator_len;
    }
    close(&mut chunks, &buffer);

    chunks
}

fn close(chunks: &mut Vec<Chunk>, buffer: &str) {
    let text = buffer.trim();
    if text.is_empty() {
        return;
    }
    let index = chunks.len() + 1;
    log::debug!("chunk {}: {} chars", index, char_len(text));
    chunks.push(Chunk {
        index,
        text: text.to_string(),
    });
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
