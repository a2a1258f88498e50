//! Lexical relevance scoring over transcript text.
//!
//! Used both as the last-resort substitute for a generative answer and as a
//! pre-filter before one. Scores are plain keyword-overlap counts; there is
//! no semantic matching here.

/// Words ignored when extracting query keywords.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "what", "when", "where", "which",
    "who", "whom", "why", "how", "are", "was", "were", "can", "could", "should", "would",
    "will", "shall", "may", "might", "must", "have", "has", "had", "does", "did", "doing",
    "not", "but", "about", "into", "over", "under", "then", "than", "them", "they", "their",
    "there", "here", "your", "you", "our", "out", "get", "got", "just", "also", "very",
    "some", "any", "all", "been", "being", "its", "his", "her", "him", "she", "please",
    "tell", "explain", "video",
];

/// Maximum number of keywords extracted from a query.
const MAX_KEYWORDS: usize = 12;

/// Maximum number of sentence units scored per call.
const MAX_SENTENCES: usize = 400;

/// Extract up to 12 keywords from free text: lower-cased, punctuation
/// stripped, stopwords and tokens shorter than 3 characters dropped,
/// original order preserved.
pub fn keywords(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut seen = Vec::new();
    for token in normalized.split_whitespace() {
        if token.len() < 3 || STOPWORDS.contains(&token) {
            continue;
        }
        if !seen.iter().any(|t| t == token) {
            seen.push(token.to_string());
        }
        if seen.len() == MAX_KEYWORDS {
            break;
        }
    }
    seen
}

/// Rank sentence-like units of `text` by how many distinct query keywords
/// they contain, and return the top `max` in descending score order. Units
/// with equal scores keep their original document order. Units that match
/// no keyword are dropped.
pub fn top_relevant_sentences(text: &str, query: &str, max: usize) -> Vec<String> {
    let query_keywords = keywords(query);
    if query_keywords.is_empty() || text.trim().is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, String)> = Vec::new();
    for sentence in split_sentences(text).into_iter().take(MAX_SENTENCES) {
        let lower = sentence.to_lowercase();
        let score = query_keywords.iter().filter(|kw| lower.contains(*kw)).count();
        if score > 0 {
            scored.push((score, sentence));
        }
    }

    // sort_by is stable, so equal scores keep document order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(max).map(|(_, s)| s).collect()
}

/// Split text into sentence-like units. A boundary is a newline, or one of
/// `.`, `!`, `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\n' {
            push_unit(&mut units, &mut current);
            continue;
        }
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            if chars.peek().map_or(true, |next| next.is_whitespace()) {
                push_unit(&mut units, &mut current);
            }
        }
    }
    push_unit(&mut units, &mut current);
    units
}

fn push_unit(units: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        units.push(trimmed.to_string());
    }
    current.clear();
}
