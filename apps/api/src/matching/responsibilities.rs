//! Responsibility matching — orchestrates the judge and normalizes its output.
//!
//! The judge decides coverage; this module guarantees the shape of the answer:
//! deduplicated responsibilities, pairwise-disjoint buckets (strongest bucket
//! wins on conflict), every JD responsibility accounted for, and totals that
//! never show an impossible ratio.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::MatchError;
use crate::matching::judge::{JudgementRequest, RawJudgement, ResponsibilityJudge};
use crate::models::{NormalizedResume, ParsedJobDescription};
use crate::normalize::{dedupe_by_key, normalize_sentence};

/// Explanation attached to JD responsibilities the judge did not classify.
pub const NOT_ASSESSED_EXPLANATION: &str =
    "No supporting experience was identified for this responsibility.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponsibilityJudgement {
    pub responsibility: String,
    pub explanation: String,
}

/// Coverage buckets, declared strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageBucket {
    Covered,
    WeaklyCovered,
    NotCovered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibilityTotals {
    pub covered: usize,
    pub weakly_covered: usize,
    pub not_covered: usize,
    /// Distinct declared JD responsibilities; equals the bucket sum.
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibilityMatching {
    pub covered: Vec<ResponsibilityJudgement>,
    pub weakly_covered: Vec<ResponsibilityJudgement>,
    pub not_covered: Vec<ResponsibilityJudgement>,
    pub totals: ResponsibilityTotals,
}

impl ResponsibilityMatching {
    pub fn bucket(&self, bucket: CoverageBucket) -> &[ResponsibilityJudgement] {
        match bucket {
            CoverageBucket::Covered => &self.covered,
            CoverageBucket::WeaklyCovered => &self.weakly_covered,
            CoverageBucket::NotCovered => &self.not_covered,
        }
    }

    /// Finds the judgement for a responsibility by normalized text.
    pub fn find(&self, responsibility: &str) -> Option<(CoverageBucket, &ResponsibilityJudgement)> {
        let key = normalize_sentence(responsibility);
        [
            CoverageBucket::Covered,
            CoverageBucket::WeaklyCovered,
            CoverageBucket::NotCovered,
        ]
        .into_iter()
        .find_map(|b| {
            self.bucket(b)
                .iter()
                .find(|j| normalize_sentence(&j.responsibility) == key)
                .map(|j| (b, j))
        })
    }
}

pub struct ResponsibilityMatcher<'a> {
    judge: &'a dyn ResponsibilityJudge,
}

impl<'a> ResponsibilityMatcher<'a> {
    pub fn new(judge: &'a dyn ResponsibilityJudge) -> Self {
        Self { judge }
    }

    /// Classifies every JD responsibility. Never returns partial results:
    /// a judge failure or malformed answer is a retryable `Collaborator` error.
    pub async fn match_responsibilities(
        &self,
        jd: &ParsedJobDescription,
        resume: &NormalizedResume,
    ) -> Result<ResponsibilityMatching, MatchError> {
        let responsibilities: Vec<String> = dedupe_by_key(
            jd.responsibilities.iter().map(|r| r.trim().to_string()),
            |r| normalize_sentence(r),
        );

        if responsibilities.is_empty() {
            return Ok(ResponsibilityMatching::default());
        }

        let request = JudgementRequest {
            responsibilities,
            experience_text: resume.experience_text(),
        };

        let raw = self.judge.judge(&request).await.map_err(|e| {
            warn!("Responsibility judge returned an error: {e}");
            e
        })?;

        normalize_judgement(&request.responsibilities, raw)
    }
}

/// Convenience wrapper over [`ResponsibilityMatcher`].
pub async fn match_responsibilities(
    jd: &ParsedJobDescription,
    resume: &NormalizedResume,
    judge: &dyn ResponsibilityJudge,
) -> Result<ResponsibilityMatching, MatchError> {
    ResponsibilityMatcher::new(judge)
        .match_responsibilities(jd, resume)
        .await
}

/// Turns raw judge output into disjoint buckets over the deduplicated JD set.
///
/// `responsibilities` must already be deduplicated by `normalize_sentence`.
pub fn normalize_judgement(
    responsibilities: &[String],
    raw: RawJudgement,
) -> Result<ResponsibilityMatching, MatchError> {
    if raw.is_empty() {
        warn!("Responsibility judge returned no classifications");
        return Err(MatchError::malformed());
    }

    let declared: HashMap<String, usize> = responsibilities
        .iter()
        .enumerate()
        .map(|(i, r)| (normalize_sentence(r), i))
        .collect();

    let buckets = [
        (CoverageBucket::Covered, raw.covered),
        (CoverageBucket::WeaklyCovered, raw.weakly_covered),
        (CoverageBucket::NotCovered, raw.not_covered),
    ];

    // key -> (bucket, judgement); first placement is the strongest bucket.
    let mut placed: HashMap<String, (CoverageBucket, ResponsibilityJudgement)> = HashMap::new();
    let mut unknown = 0usize;
    let mut repaired = 0usize;

    for (bucket, items) in buckets {
        for item in items {
            let key = normalize_sentence(&item.responsibility);
            if key.is_empty() {
                warn!("Responsibility judge returned a blank responsibility");
                return Err(MatchError::malformed());
            }

            if let Some((existing, _)) = placed.get(&key) {
                if *existing != bucket {
                    repaired += 1;
                }
                continue;
            }

            let Some(&i) = declared.get(&key) else {
                unknown += 1;
                continue;
            };
            let responsibility = responsibilities[i].clone();

            placed.insert(
                key,
                (
                    bucket,
                    ResponsibilityJudgement {
                        responsibility,
                        explanation: item.explanation.trim().to_string(),
                    },
                ),
            );
        }
    }

    if repaired > 0 {
        warn!(repaired, "Responsibilities appeared in several buckets; kept the strongest");
    }
    if unknown > 0 {
        warn!(unknown, "Responsibility judge returned items not present in the JD; dropped");
    }

    let mut matching = ResponsibilityMatching::default();
    let mut unassessed = 0usize;

    for text in responsibilities {
        let (bucket, judgement) = match placed.remove(&normalize_sentence(text)) {
            Some(entry) => entry,
            None => {
                unassessed += 1;
                (
                    CoverageBucket::NotCovered,
                    ResponsibilityJudgement {
                        responsibility: text.clone(),
                        explanation: NOT_ASSESSED_EXPLANATION.to_string(),
                    },
                )
            }
        };
        match bucket {
            CoverageBucket::Covered => matching.covered.push(judgement),
            CoverageBucket::WeaklyCovered => matching.weakly_covered.push(judgement),
            CoverageBucket::NotCovered => matching.not_covered.push(judgement),
        }
    }

    if unassessed > 0 {
        warn!(unassessed, "Responsibility judge skipped responsibilities; marked not covered");
    }

    // Buckets partition the declared set, so the total is the declared count.
    matching.totals = ResponsibilityTotals {
        covered: matching.covered.len(),
        weakly_covered: matching.weakly_covered.len(),
        not_covered: matching.not_covered.len(),
        total: responsibilities.len(),
    };

    debug!(
        covered = matching.totals.covered,
        weakly_covered = matching.totals.weakly_covered,
        not_covered = matching.totals.not_covered,
        total = matching.totals.total,
        "Responsibility matching normalized"
    );

    Ok(matching)
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::test_support::judgement;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const POOL: &[&str] = &[
        "Build APIs",
        "build apis.",
        "Design schemas",
        "Mentor juniors",
        "MENTOR  juniors",
        "Own on-call",
    ];

    proptest! {
        /// Buckets partition the declared responsibilities after normalization.
        #[test]
        fn buckets_are_disjoint_and_complete(
            declared in prop::collection::vec(0..POOL.len(), 1..6),
            assignments in prop::collection::vec((0..POOL.len(), 0..3usize), 1..12),
        ) {
            let responsibilities: Vec<String> = dedupe_by_key(
                declared.iter().map(|&i| POOL[i].to_string()),
                |r| normalize_sentence(r),
            );
            let mut raw = RawJudgement::default();
            for (i, bucket) in assignments {
                let item = judgement(POOL[i], "x");
                match bucket {
                    0 => raw.covered.push(item),
                    1 => raw.weakly_covered.push(item),
                    _ => raw.not_covered.push(item),
                }
            }

            let matching = normalize_judgement(&responsibilities, raw).unwrap();

            let set = |items: &[ResponsibilityJudgement]| -> HashSet<String> {
                items.iter().map(|j| normalize_sentence(&j.responsibility)).collect()
            };
            let (c, w, n) = (set(&matching.covered), set(&matching.weakly_covered), set(&matching.not_covered));
            prop_assert!(c.is_disjoint(&w));
            prop_assert!(c.is_disjoint(&n));
            prop_assert!(w.is_disjoint(&n));
            prop_assert_eq!(c.len(), matching.covered.len());
            prop_assert_eq!(w.len(), matching.weakly_covered.len());
            prop_assert_eq!(n.len(), matching.not_covered.len());

            for r in &responsibilities {
                let key = normalize_sentence(r);
                prop_assert!(c.contains(&key) || w.contains(&key) || n.contains(&key));
            }
            // Exactly the declared set: nothing invented survives.
            prop_assert_eq!(c.len() + w.len() + n.len(), responsibilities.len());
            prop_assert_eq!(matching.totals.total, responsibilities.len());
            prop_assert!(matching.totals.covered <= matching.totals.total);
        }
    }
}
