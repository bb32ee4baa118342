//! Resume feedback postprocessing — JD-agnostic, advisory only.
//!
//! Cleans the raw quality feedback from the resume-normalization step and adds
//! a few local checks. Its output is never read by the score calculator.

pub mod impact;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::NormalizedResume;
use crate::normalize::{dedupe_by_key, group_by_key, normalize_sentence, normalize_text};

const MAX_SNIPPET_CHARS: usize = 160;
const MAX_SNIPPETS_PER_ITEM: usize = 3;
const MAX_ITEMS: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    fn parse(raw: &str) -> Self {
        match normalize_text(raw).as_str() {
            "critical" | "high" | "error" => Severity::Critical,
            "warning" | "medium" | "warn" => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSource {
    /// From the resume-normalization collaborator.
    Advisory,
    /// Produced by the local checks in this module.
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub category: String,
    pub message: String,
    pub severity: Severity,
    pub evidence: Vec<String>,
    pub source: FeedbackSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackList {
    pub items: Vec<FeedbackItem>,
}

/// Cleans `raw_feedback` and merges it with local checks on `resume`.
///
/// Accepts a JSON array of items, or an object holding one under `items` or
/// `feedback`. Unrecognized shapes contribute nothing.
pub fn post_process_resume_feedback(
    resume: &NormalizedResume,
    raw_feedback: Option<&Value>,
) -> FeedbackList {
    let mut items: Vec<FeedbackItem> = raw_feedback
        .map(advisory_items)
        .unwrap_or_default()
        .into_iter()
        .chain(local_items(resume))
        .collect();

    let groups = group_by_key(items.drain(..), |item| {
        format!(
            "{}\u{1f}{}",
            normalize_text(&item.category),
            normalize_sentence(&item.message)
        )
    });

    let mut merged: Vec<FeedbackItem> = groups
        .into_iter()
        .filter_map(|(_, group)| merge_group(group))
        .collect();

    // Stable: equal severities keep first-appearance order.
    merged.sort_by(|a, b| b.severity.cmp(&a.severity));
    merged.truncate(MAX_ITEMS);

    debug!(items = merged.len(), "Resume feedback postprocessed");

    FeedbackList { items: merged }
}

fn merge_group(group: Vec<FeedbackItem>) -> Option<FeedbackItem> {
    let mut iter = group.into_iter();
    let mut first = iter.next()?;
    for other in iter {
        first.severity = first.severity.max(other.severity);
        first.evidence.extend(other.evidence);
    }
    first.evidence = clean_evidence(first.evidence);
    Some(first)
}

fn advisory_items(raw: &Value) -> Vec<FeedbackItem> {
    let entries = match raw {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(map) => match map.get("items").or_else(|| map.get("feedback")) {
            Some(Value::Array(entries)) => entries.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    entries.iter().filter_map(parse_advisory).collect()
}

fn parse_advisory(value: &Value) -> Option<FeedbackItem> {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    match value {
        Value::String(message) if !message.trim().is_empty() => Some(FeedbackItem {
            category: "general".to_string(),
            message: message.trim().to_string(),
            severity: Severity::Info,
            evidence: vec![],
            source: FeedbackSource::Advisory,
        }),
        Value::Object(map) => {
            let message = non_empty(map.get("message"))
                .or_else(|| non_empty(map.get("issue")))
                .or_else(|| non_empty(map.get("suggestion")))?;
            let category = non_empty(map.get("category"))
                .or_else(|| non_empty(map.get("section")))
                .unwrap_or_else(|| "general".to_string());
            let severity = map
                .get("severity")
                .and_then(Value::as_str)
                .map(Severity::parse)
                .unwrap_or_default();
            let evidence = match map.get("evidence") {
                Some(Value::String(s)) => vec![s.clone()],
                Some(Value::Array(values)) => values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => vec![],
            };
            Some(FeedbackItem {
                category,
                message,
                severity,
                evidence,
                source: FeedbackSource::Advisory,
            })
        }
        _ => None,
    }
}

fn local_items(resume: &NormalizedResume) -> Vec<FeedbackItem> {
    let mut items = Vec::new();

    let unquantified = impact::unquantified_bullets(resume);
    if !unquantified.is_empty() {
        items.push(FeedbackItem {
            category: "impact".to_string(),
            message: format!(
                "{} experience bullet(s) describe activity without a measurable outcome. \
                 Add numbers, percentages or time saved.",
                unquantified.len()
            ),
            severity: Severity::Warning,
            evidence: unquantified.iter().map(|u| u.to_evidence()).collect(),
            source: FeedbackSource::Local,
        });
    }

    let has_email = resume
        .contact_info
        .email
        .as_deref()
        .is_some_and(|e| !e.trim().is_empty());
    if !has_email {
        items.push(FeedbackItem {
            category: "contact".to_string(),
            message: "Add a professional email address to your contact details.".to_string(),
            severity: Severity::Warning,
            evidence: vec![],
            source: FeedbackSource::Local,
        });
    }

    items
}

/// Dedupes snippets by normalized text, truncates long ones, keeps the first few.
fn clean_evidence(snippets: Vec<String>) -> Vec<String> {
    dedupe_by_key(snippets.into_iter().map(|s| s.trim().to_string()), |s| {
        normalize_text(s)
    })
    .into_iter()
    .map(|s| truncate_snippet(&s))
    .take(MAX_SNIPPETS_PER_ITEM)
    .collect()
}

/// Cuts a snippet longer than `MAX_SNIPPET_CHARS` to at most that many chars,
/// ellipsis included. Trailing whitespace before the ellipsis is dropped, so a
/// cut that lands on a space yields a slightly shorter snippet.
fn truncate_snippet(snippet: &str) -> String {
    if snippet.chars().count() <= MAX_SNIPPET_CHARS {
        return snippet.to_string();
    }
    let cut: String = snippet.chars().take(MAX_SNIPPET_CHARS - 1).collect();
    format!("{}…", cut.trim_end())
}
