//! Skill comparison — tiered matching of resume skills against JD skills.
//!
//! Tiers, first success wins:
//! 1. exact, after normalization
//! 2. synonym table, either direction
//! 3. fuzzy similarity at or above the configured cutoff
//!
//! Pure and deterministic: the same inputs always produce the same output.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MatchError;
use crate::matching::synonyms::SynonymTable;
use crate::models::{NormalizedResume, ParsedJobDescription};
use crate::normalize::{dedupe_terms, normalize_text};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Synonym,
    Fuzzy,
}

/// One JD skill satisfied by one resume skill, with the tier that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    pub jd_skill: String,
    pub resume_skill: String,
    pub match_type: MatchType,
    /// Only set for fuzzy matches, rounded to three decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedSkills {
    pub required: Vec<SkillMatch>,
    pub preferred: Vec<SkillMatch>,
}

/// Result of comparing a resume's skills with a JD.
///
/// `matched.required` and `missing` partition the deduplicated required skills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillComparison {
    pub matched: MatchedSkills,
    pub missing: Vec<String>,
    pub missing_preferred: Vec<String>,
    pub extra: Vec<String>,
}

impl SkillComparison {
    pub fn required_total(&self) -> usize {
        self.matched.required.len() + self.missing.len()
    }

    pub fn preferred_total(&self) -> usize {
        self.matched.preferred.len() + self.missing_preferred.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum similarity in (0, 1] for a fuzzy match.
    pub fuzzy_cutoff: f64,
    /// Terms shorter than this (in chars, normalized) never fuzzy-match.
    pub min_fuzzy_len: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: 0.85,
            min_fuzzy_len: 3,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.fuzzy_cutoff.is_finite() || self.fuzzy_cutoff <= 0.0 || self.fuzzy_cutoff > 1.0 {
            return Err(MatchError::Validation(format!(
                "fuzzy_cutoff must be in (0, 1], got {}",
                self.fuzzy_cutoff
            )));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Comparator
// ────────────────────────────────────────────────────────────────────────────

pub struct SkillComparator<'a> {
    synonyms: &'a SynonymTable,
    config: &'a MatchConfig,
}

/// A deduplicated resume skill with its lookup key.
struct ResumeTerm {
    display: String,
    key: String,
}

impl<'a> SkillComparator<'a> {
    pub fn new(synonyms: &'a SynonymTable, config: &'a MatchConfig) -> Self {
        Self { synonyms, config }
    }

    pub fn compare(&self, jd: &ParsedJobDescription, resume: &NormalizedResume) -> SkillComparison {
        let resume_terms: Vec<ResumeTerm> = dedupe_terms(&resume.skills.all().collect::<Vec<_>>())
            .into_iter()
            .map(|display| ResumeTerm {
                key: normalize_text(&display),
                display,
            })
            .collect();

        let required = dedupe_terms(&jd.required_skills);
        let required_keys: HashSet<String> = required.iter().map(|s| normalize_text(s)).collect();
        // A skill listed as both required and preferred only counts as required.
        let preferred: Vec<String> = dedupe_terms(&jd.preferred_skills)
            .into_iter()
            .filter(|s| !required_keys.contains(&normalize_text(s)))
            .collect();

        let mut claimed = vec![false; resume_terms.len()];

        let (matched_required, missing) = self.match_all(&required, &resume_terms, &mut claimed);
        let (matched_preferred, missing_preferred) =
            self.match_all(&preferred, &resume_terms, &mut claimed);

        let extra = resume_terms
            .iter()
            .zip(&claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(term, _)| term.display.clone())
            .collect();

        debug!(
            required = required.len(),
            matched_required = matched_required.len(),
            preferred = preferred.len(),
            matched_preferred = matched_preferred.len(),
            "Skill comparison complete"
        );

        SkillComparison {
            matched: MatchedSkills {
                required: matched_required,
                preferred: matched_preferred,
            },
            missing,
            missing_preferred,
            extra,
        }
    }

    fn match_all(
        &self,
        jd_skills: &[String],
        resume_terms: &[ResumeTerm],
        claimed: &mut [bool],
    ) -> (Vec<SkillMatch>, Vec<String>) {
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for jd_skill in jd_skills {
            match self.find_match(jd_skill, resume_terms) {
                Some((idx, match_type, similarity)) => {
                    claimed[idx] = true;
                    matched.push(SkillMatch {
                        jd_skill: jd_skill.clone(),
                        resume_skill: resume_terms[idx].display.clone(),
                        match_type,
                        similarity,
                    });
                }
                None => missing.push(jd_skill.clone()),
            }
        }

        (matched, missing)
    }

    fn find_match(
        &self,
        jd_skill: &str,
        resume_terms: &[ResumeTerm],
    ) -> Option<(usize, MatchType, Option<f64>)> {
        let key = normalize_text(jd_skill);

        if let Some(idx) = resume_terms.iter().position(|t| t.key == key) {
            return Some((idx, MatchType::Exact, None));
        }

        if let Some(idx) = resume_terms
            .iter()
            .position(|t| self.synonyms.are_synonyms(&key, &t.key))
        {
            return Some((idx, MatchType::Synonym, None));
        }

        if key.chars().count() < self.config.min_fuzzy_len {
            return None;
        }

        let mut best: Option<(usize, f64)> = None;
        for (idx, term) in resume_terms.iter().enumerate() {
            if term.key.chars().count() < self.config.min_fuzzy_len {
                continue;
            }
            let score = similarity(&key, &term.key);
            if score >= self.config.fuzzy_cutoff && best.map_or(true, |(_, b)| score > b) {
                best = Some((idx, score));
            }
        }

        best.map(|(idx, score)| (idx, MatchType::Fuzzy, Some(round3(score))))
    }
}

/// Convenience wrapper over [`SkillComparator`].
pub fn compare_skills(
    jd: &ParsedJobDescription,
    resume: &NormalizedResume,
    synonyms: &SynonymTable,
    config: &MatchConfig,
) -> SkillComparison {
    SkillComparator::new(synonyms, config).compare(jd, resume)
}

/// Similarity of two normalized terms: the better of the Levenshtein ratio
/// and token-set Jaccard overlap.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b).max(token_jaccard(a, b))
}

fn token_jaccard(a: &str, b: &str) -> f64 {
    let tokens = |s: &str| -> HashSet<String> {
        s.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    };
    let (ta, tb) = (tokens(a), tokens(b));
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count() as f64;
    let union = ta.union(&tb).count() as f64;
    intersection / union
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
