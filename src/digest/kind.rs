use chrono::NaiveDate;
use serde::Deserialize;

use super::blocks::MessageBlock;

/// The digest variants this binary can produce. Each one differs only in
/// copy and section markers; the pipeline underneath is shared.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DigestKind {
    Daily,
    Weekly,
    Regional,
    #[default]
    DeepDive,
}

/// `(marker, section name)` pairs in the order the digest should follow.
type Sections = &'static [(&'static str, &'static str)];

const NEWS_SECTIONS: Sections = &[
    ("🔬", "Research"),
    ("⚖️", "Policy & Regulation"),
    ("🖥️", "Hardware & Chips"),
    ("🚀", "Product Launches"),
    ("🏢", "Industry News"),
];
const REGIONAL_SECTIONS: Sections = &[
    ("🇺🇸", "United States"),
    ("🇪🇺", "European Union"),
    ("🇬🇧", "United Kingdom"),
    ("🇨🇳", "China"),
    ("🇯🇵", "Japan"),
    ("🇮🇳", "India"),
    ("🌏", "Rest of the World"),
];
const DEEP_DIVE_SECTIONS: Sections = &[
    ("🔬", "Research Papers & Breakthroughs"),
    ("🛠️", "Open Source AI Projects"),
    ("💡", "Techniques & Methods"),
    ("🖥️", "AI Infrastructure & Chips"),
    ("📚", "Learning Resources"),
    ("🔧", "Tools & Software Updates"),
];

pub const BULLET: &str = "•";

impl DigestKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Daily => "AI/Tech Daily Digest",
            Self::Weekly => "AI/Tech Weekly Digest",
            Self::Regional => "Global AI Roundup",
            Self::DeepDive => "Weekly AI Tech Deep Dive",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Daily => "📰",
            Self::Weekly => "🗞️",
            Self::Regional => "🌍",
            Self::DeepDive => "🔬",
        }
    }

    pub fn sections(&self) -> Sections {
        match self {
            Self::Daily | Self::Weekly => NEWS_SECTIONS,
            Self::Regional => REGIONAL_SECTIONS,
            Self::DeepDive => DEEP_DIVE_SECTIONS,
        }
    }

    pub fn section_markers(&self) -> Vec<String> {
        self.sections()
            .iter()
            .map(|(marker, _)| marker.to_string())
            .collect()
    }

    /// How many days of news to fetch, or `None` when the model works from
    /// its own knowledge.
    pub fn news_lookback_days(&self) -> Option<i64> {
        match self {
            Self::Daily => Some(2),
            Self::Weekly => Some(7),
            Self::Regional | Self::DeepDive => None,
        }
    }

    fn ready_line(&self) -> &'static str {
        match self {
            Self::Daily => "Your daily AI news digest is ready!",
            Self::Weekly => "Your weekly AI news digest is ready!",
            Self::Regional => "Your regional AI roundup is ready!",
            Self::DeepDive => "Your weekly tech deep dive is ready!",
        }
    }

    fn focus_lines(&self) -> &'static str {
        match self {
            Self::Daily => "📅 *Coverage:* Past 48 hours of AI news",
            Self::Weekly => "📅 *Coverage:* Past 7 days of AI news",
            Self::Regional => {
                "🗺️ *Focus:* AI developments region by region\n📅 *Coverage:* Past 7 days"
            }
            Self::DeepDive => {
                "🛠️ *Focus:* Open source, research, techniques & learning\n📅 *Coverage:* Past 7 days of AI developments"
            }
        }
    }

    fn tagline(&self) -> &'static str {
        match self {
            Self::Daily => "Daily Digest: Every weekday",
            Self::Weekly => "Weekly Digest: Every Monday",
            Self::Regional => "Regional Roundup: Every Friday",
            Self::DeepDive => "Weekly Tech Deep Dive: Every Wednesday",
        }
    }

    pub fn heading(&self, date: NaiveDate) -> String {
        format!("{} {} — {}", self.emoji(), self.title(), date.format("%Y-%m-%d"))
    }

    /// Header, optional greeting that mentions `mention`, then a divider.
    pub fn preamble(&self, date: NaiveDate, mention: Option<&str>) -> Vec<MessageBlock> {
        let mut blocks = vec![MessageBlock::header(self.heading(date))];
        if let Some(user) = mention.filter(|m| !m.trim().is_empty()) {
            blocks.push(MessageBlock::section(format!(
                "👋 <@{}> {}\n{}",
                user.trim(),
                self.ready_line(),
                self.focus_lines()
            )));
        }
        blocks.push(MessageBlock::Divider);
        blocks
    }

    /// Divider plus a context line naming the generator and time. When the
    /// digest was built from fetched articles, the count replaces the
    /// tagline.
    pub fn footer(&self, time: &str, article_count: Option<usize>) -> Vec<MessageBlock> {
        let text = match article_count {
            Some(count) => format!("_Generated from {} articles • {}_", count, time),
            None => format!("_Powered by Gemini • {} • {}_", time, self.tagline()),
        };
        vec![MessageBlock::Divider, MessageBlock::context(text)]
    }

    /// Plain-text notification body shown where blocks cannot render.
    pub fn fallback_text(&self, date: NaiveDate, mention: Option<&str>) -> String {
        let heading = format!("{} — {}", self.title(), date.format("%Y-%m-%d"));
        match mention.filter(|m| !m.trim().is_empty()) {
            Some(user) => format!("<@{}> {}", user.trim(), heading),
            None => heading,
        }
    }
}
