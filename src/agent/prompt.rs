use chrono::NaiveDate;

use crate::digest::kind::{DigestKind, BULLET};

pub const PREAMBLE: &str = "You are an expert AI/tech news editor writing digests for Slack.";

pub const FORMAT_RULES: &str = r#"
# Formatting Rules
1. Section headers start with their emoji and use single asterisks: 🔬 *Research*
2. Every item is a bullet starting with • on its own paragraph.
3. NO bold (**) or italics inside bullet points, plain text only.
4. No markdown headings (#) and no horizontal rules (---).
5. Start IMMEDIATELY with the first section, no introduction.
6. End IMMEDIATELY after the last section, no conclusion.
7. Include ALL sections listed below, in order, and do not skip any.
"#;

fn brief(kind: DigestKind) -> &'static str {
    match kind {
        DigestKind::Daily => {
            "Create a concise daily AI/tech digest. Pick the 10-14 most important and most \
             recent items, prioritising the last 24-48 hours. Each item: headline, a one-sentence \
             takeaway and the article link."
        }
        DigestKind::Weekly => {
            "Create a weekly AI/tech digest covering the most significant developments of the \
             past 7 days. Group related stories together. Each item: headline, a one or two \
             sentence takeaway and the article link."
        }
        DigestKind::Regional => {
            "Create a regional AI roundup covering the past 7 days. For each region, summarise \
             the most important policy, industry and research developments, 2-4 items per region."
        }
        DigestKind::DeepDive => {
            "Create an in-depth WEEKLY technical deep dive covering the most significant open \
             source AI developments, new techniques, research papers and learning resources from \
             the past 7 days. Focus on HOW things work. Each section has 4-5 bullets; each bullet \
             gives the headline or tool name, a brief description and 2-3 sentences of technical \
             detail such as model sizes, benchmarks, repositories or techniques."
        }
    }
}

/// Build the generation prompt for `kind`, optionally grounded in fetched
/// article context.
pub fn build_prompt(kind: DigestKind, date: NaiveDate, news_context: Option<&str>) -> String {
    let sections = kind
        .sections()
        .iter()
        .map(|(marker, name)| format!("{} *{}*", marker, name))
        .collect::<Vec<_>>()
        .join("\n");

    let context = news_context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| {
            format!(
                "\n\nBase the digest ONLY on these articles and include their links:\n\n{}",
                c
            )
        })
        .unwrap_or_default();

    format!(
        "You are writing the {} for {} ({}).\n\n{}{}\n{}\n# Sections (copy these headers exactly)\n{}\n\nEach item is a paragraph starting with {}.\n\nBegin with the first section now:",
        kind.title(),
        date.format("%Y-%m-%d"),
        date.format("%A"),
        brief(kind),
        context,
        FORMAT_RULES,
        sections,
        BULLET
    )
}
