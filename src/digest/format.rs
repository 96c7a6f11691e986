use regex::Regex;
use std::sync::LazyLock;

use super::DigestLayout;

static EMPHASIS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{2,}").expect("valid emphasis run regex"));
// Only pairs hugging non-space text count, so `2*3` and `a * b` survive.
static SINGLE_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").expect("valid single emphasis regex")
});
static HEADING_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{2,}").expect("valid heading regex"));
static LEADING_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#[ \t]+").expect("valid leading heading regex"));
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{3,}").expect("valid rule regex"));

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Rewrite generated text into the markup subset Slack renders reliably.
///
/// Header lines keep exactly one level of emphasis, bullet lines are reduced
/// to plain text, heading and rule artifacts are dropped, and anything the
/// model wrote before the first section header is discarded. Text without
/// any recognised section marker is passed through rather than dropped.
pub fn normalize(raw: &str, layout: &DigestLayout) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let markers = layout.marker_glyphs();
    let stripped = strip_noise(raw);

    let cleaned = stripped
        .lines()
        .map(|line| normalize_line(line.trim(), &markers, &layout.bullet))
        .collect::<Vec<_>>()
        .join("\n");
    let cleaned = cleaned.trim();

    match cleaned
        .lines()
        .position(|line| markers.iter().any(|m| line.contains(m.as_str())))
    {
        Some(0) => cleaned.to_string(),
        Some(first) => {
            log::debug!("discarding {} lines of preamble", first);
            cleaned
                .lines()
                .skip(first)
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        }
        None => {
            log::warn!("no section markers found, passing text through");
            cleaned.to_string()
        }
    }
}

fn strip_noise(raw: &str) -> String {
    let text = HORIZONTAL_RULE.replace_all(raw, "");
    let text = HEADING_RUN.replace_all(&text, "");
    LEADING_HEADING.replace_all(&text, "").into_owned()
}

fn normalize_line(line: &str, markers: &[String], bullet: &str) -> String {
    if line.is_empty() {
        return String::new();
    }

    if let Some(marker) = header_marker(line, markers) {
        let line = EMPHASIS_RUN.replace_all(line, "*");
        if line.contains('*') {
            return line.into_owned();
        }
        let wrapped = match line.split_once(' ') {
            Some((glyph, title)) if !title.trim().is_empty() && glyph.contains(marker) => {
                Some(format!("{} *{}*", glyph, title.trim()))
            }
            _ => None,
        };
        return wrapped.unwrap_or_else(|| line.into_owned());
    }

    if !bullet.is_empty() && line.starts_with(bullet) {
        let line = EMPHASIS_RUN.replace_all(line, "");
        return SINGLE_EMPHASIS.replace_all(&line, "$1").into_owned();
    }

    line.to_string()
}

// Models sometimes wrap the whole header in emphasis (`**🔬 Research**`).
fn header_marker<'a>(line: &str, markers: &'a [String]) -> Option<&'a str> {
    let head = line.trim_start_matches(['*', '_', ' ']);
    markers
        .iter()
        .find(|m| head.starts_with(m.as_str()))
        .map(String::as_str)
}

/// Strip the emoji presentation selector so `🛠️` and `🛠` compare equal.
pub(crate) fn base_glyph(marker: &str) -> String {
    marker
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR)
        .collect()
}
