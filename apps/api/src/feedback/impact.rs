//! Impact check — flags experience bullets that state activity without a measurable outcome.

use crate::models::NormalizedResume;

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "many",
    "numerous",
    "various",
    "several",
];

#[derive(Debug, Clone, PartialEq)]
pub struct UnquantifiedBullet {
    /// The bullet as written, trimmed.
    pub bullet: String,
    /// Lower-case phrase, e.g. "vague verb 'helped' without a quantified outcome".
    pub reason: String,
}

impl UnquantifiedBullet {
    /// Evidence line for feedback: the bullet followed by why it was flagged.
    pub fn to_evidence(&self) -> String {
        format!("{} ({})", self.bullet, self.reason)
    }
}

/// A bullet is quantified when it carries a number, percentage, currency
/// amount, or `~N` estimate.
pub fn is_quantified(text: &str) -> bool {
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');
    has_digit || has_percent || has_currency
}

/// Returns why a bullet lacks measurable impact, or `None` if it is quantified.
pub fn check_bullet(text: &str) -> Option<UnquantifiedBullet> {
    if text.trim().is_empty() || is_quantified(text) {
        return None;
    }

    let lower = text.to_lowercase();
    let reason = if let Some(verb) = VAGUE_VERBS.iter().find(|v| lower.contains(**v)) {
        format!("vague verb '{verb}' without a quantified outcome")
    } else if let Some(word) = VAGUE_SCALE_WORDS.iter().find(|w| lower.contains(**w)) {
        format!("vague scale word '{word}' without a number")
    } else {
        "no quantified outcome found".to_string()
    };

    Some(UnquantifiedBullet {
        bullet: text.trim().to_string(),
        reason,
    })
}

/// All experience bullets of the resume that fail [`check_bullet`], in resume order.
pub fn unquantified_bullets(resume: &NormalizedResume) -> Vec<UnquantifiedBullet> {
    resume
        .experience
        .iter()
        .flat_map(|e| e.bullets.iter())
        .filter_map(|b| check_bullet(b))
        .collect()
}
