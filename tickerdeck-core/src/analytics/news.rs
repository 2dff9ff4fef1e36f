use std::collections::HashSet;

use tickerdeck_types::{NewsArticle, Sentiment};

const FINGERPRINT_LEN: usize = 50;

const POSITIVE: &[&str] = &[
    "surge", "surges", "record", "beats", "beat", "growth", "profit", "rally", "rallies", "gain",
    "gains", "innovation", "breakthrough", "soar", "soars", "jump", "jumps", "rise", "rises", "up",
];

const NEGATIVE: &[&str] = &[
    "plunge", "plunges", "loss", "losses", "cut", "cuts", "lawsuit", "recall", "recalls",
    "downgrade", "downgrades", "tumble", "tumbles", "miss", "misses", "warning", "decline",
    "declines", "weak", "down", "fall", "falls", "drop", "drops",
];

/// Headline identity used for de-duplication: lowercased, punctuation
/// stripped, first 50 characters.
#[must_use]
pub fn fingerprint(headline: &str) -> String {
    headline
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .take(FINGERPRINT_LEN)
        .collect()
}

/// Drop articles whose headline fingerprint was already seen, keeping the first.
#[must_use]
pub fn dedupe(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| seen.insert(fingerprint(&a.headline)))
        .collect()
}

/// Keyword tone of `text`. Each listed word counts once if it occurs
/// anywhere, including inside longer words.
#[must_use]
pub fn sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let hits = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count();
    match hits(POSITIVE).cmp(&hits(NEGATIVE)) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// De-duplicate, then tag each article with the tone of its headline and summary.
#[must_use]
pub fn annotate(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    dedupe(articles)
        .into_iter()
        .map(|mut a| {
            a.sentiment = Some(sentiment(&format!("{} {}", a.headline, a.summary)));
            a
        })
        .collect()
}
