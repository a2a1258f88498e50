//! Educational content classification for catalog search results.

/// Keywords that indicate educational/study content.
const EDUCATIONAL_KEYWORDS: &[&str] = &[
    "tutorial",
    "learn",
    "course",
    "lesson",
    "guide",
    "how to",
    "basics",
    "fundamentals",
    "introduction",
    "overview",
    "explained",
    "step by step",
    "tips",
    "tricks",
    "best practices",
    "complete guide",
    "full course",
    "crash course",
    "beginners",
    "advanced",
    "intermediate",
    "masterclass",
    "workshop",
    "training",
    "education",
    "academic",
    "lecture",
    "seminar",
];

/// Keywords that indicate non-educational content (filtered out).
const NON_EDUCATIONAL_KEYWORDS: &[&str] = &[
    "vlog",
    "daily",
    "lifestyle",
    "funny",
    "comedy",
    "entertainment",
    "gaming",
    "music video",
    "song",
    "cover",
    "reaction",
    "challenge",
    "prank",
    "unboxing",
    "haul",
    "review",
    "unbox",
    "asmr",
    "satisfying",
    "relaxing",
    "sleep",
    "meditation",
    "workout",
    "fitness",
    "dance",
];

/// Classifies a title/description pair as educational or not.
///
/// The verdict is a conjunction of heuristics: an educational keyword must
/// be present, and none of the disqualifying signals (non-educational
/// keyword, short/quick marker, extreme-duration marker, emoji in the
/// title) may fire. Any single disqualifier vetoes the match.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    educational: &'static [&'static str],
    non_educational: &'static [&'static str],
}

impl ContentClassifier {
    pub fn new() -> Self {
        Self {
            educational: EDUCATIONAL_KEYWORDS,
            non_educational: NON_EDUCATIONAL_KEYWORDS,
        }
    }

    /// Strict verdict used by the first video-filter pass.
    pub fn is_educational(&self, title: &str, description: &str) -> bool {
        let text = format!("{} {}", title, description).to_lowercase();
        let title_lower = title.to_lowercase();

        let has_educational = self.educational.iter().any(|kw| text.contains(kw));
        let has_non_educational = self.non_educational.iter().any(|kw| text.contains(kw));
        let is_short_marker = title_lower.contains("short") || title_lower.contains("quick");
        let is_extreme_duration =
            title_lower.contains("10 hour") || title_lower.contains("24 hour");

        has_educational
            && !has_non_educational
            && !is_short_marker
            && !is_extreme_duration
            && !contains_emoji(title)
    }

    /// Negative-signal-only check used by the relaxed second pass: the item
    /// survives unless it carries a non-educational keyword or an emoji in
    /// the title.
    pub fn has_disqualifier(&self, title: &str, description: &str) -> bool {
        let text = format!("{} {}", title, description).to_lowercase();
        self.non_educational.iter().any(|kw| text.contains(kw)) || contains_emoji(title)
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Emoji ranges checked in titles: emoticons, symbols and pictographs,
/// transport, regional indicators, miscellaneous symbols, dingbats.
fn contains_emoji(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c as u32,
            0x1F600..=0x1F64F
                | 0x1F300..=0x1F5FF
                | 0x1F680..=0x1F6FF
                | 0x1F1E0..=0x1F1FF
                | 0x2600..=0x26FF
                | 0x2700..=0x27BF
        )
    })
}
