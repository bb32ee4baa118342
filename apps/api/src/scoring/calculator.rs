//! Score calculation — weighted, fully itemized ATS compatibility score.
//!
//! Algorithm:
//! 1. Every category is a list of items, each earning a credit in [0, 1]
//!    (skill matches, responsibility coverage, structural checks).
//! 2. Categories with no items are not applicable (`-1`); their weight is
//!    redistributed proportionally over the applicable ones.
//! 3. Each item is worth `category_points / item_count`; every point it
//!    fails to earn becomes one `ScoreDeduction`.
//! 4. `overall_score = round(100 - Σ exact deductions)`; the deductions are
//!    then apportioned to whole cents (largest remainder) so their sum
//!    matches the exact loss, and `Score::new` checks the result.
//!
//! Pure, synchronous, no network calls. The summary is templated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MatchError;
use crate::matching::{
    CoverageBucket, MatchType, ResponsibilityMatching, SkillComparison, SkillMatch,
};
use crate::models::{NormalizedResume, ParsedJobDescription};
use crate::normalize::{dedupe_by_key, dedupe_terms, normalize_sentence};
use crate::scoring::weights::{Grade, ScoreCategory, ScoringConfig};

/// Allowed gap between `Σ deductions` and `100 - overall_score`.
const DEDUCTION_TOLERANCE: f64 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// The concrete shortfall behind a deduction. Drives recovery suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeductionKind {
    MissingRequiredSkill,
    ApproximateRequiredSkill,
    MissingPreferredSkill,
    ApproximatePreferredSkill,
    WeakResponsibility,
    UncoveredResponsibility,
    MissingContactInfo,
    MissingExperience,
    MissingEducation,
    MissingSkills,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDeduction {
    pub category: ScoreCategory,
    pub kind: DeductionKind,
    /// The skill, responsibility, or section this deduction is about.
    pub item: String,
    pub reason: String,
    /// Always > 0, rounded to two decimals.
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub name: String,
    /// 0–100, or -1 when the category is not applicable.
    pub percentage: i32,
    /// Effective weight after redistribution (0 when not applicable).
    pub weight: f64,
    pub max_points: f64,
}

impl CategoryBreakdown {
    pub const NOT_APPLICABLE: i32 = -1;

    pub fn is_applicable(&self) -> bool {
        self.percentage != Self::NOT_APPLICABLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub overall_score: u32,
    pub grade: Grade,
    pub breakdown: BTreeMap<String, CategoryBreakdown>,
    pub summary: String,
    pub deductions: Vec<ScoreDeduction>,
}

impl Score {
    /// Builds a score, enforcing `Σ deductions == 100 - overall_score` (±1).
    pub fn new(
        overall_score: u32,
        grade: Grade,
        breakdown: BTreeMap<String, CategoryBreakdown>,
        summary: String,
        deductions: Vec<ScoreDeduction>,
    ) -> Result<Self, MatchError> {
        if overall_score > 100 {
            return Err(MatchError::InvariantViolation(format!(
                "overall score {overall_score} exceeds 100"
            )));
        }
        if let Some(bad) = deductions
            .iter()
            .find(|d| !d.points.is_finite() || d.points <= 0.0)
        {
            return Err(MatchError::InvariantViolation(format!(
                "deduction '{}' has non-positive points {}",
                bad.reason, bad.points
            )));
        }

        let deducted: f64 = deductions.iter().map(|d| d.points).sum();
        let lost = f64::from(100 - overall_score);
        if (deducted - lost).abs() > DEDUCTION_TOLERANCE + 1e-9 {
            return Err(MatchError::InvariantViolation(format!(
                "deductions sum to {deducted:.2} but score lost {lost} points"
            )));
        }

        Ok(Self {
            overall_score,
            grade,
            breakdown,
            summary,
            deductions,
        })
    }

    pub fn category(&self, category: ScoreCategory) -> Option<&CategoryBreakdown> {
        self.breakdown.get(category.key())
    }

    pub fn total_deducted(&self) -> f64 {
        self.deductions.iter().map(|d| d.points).sum()
    }
}

/// Everything the calculator reads. All four come from earlier pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub skill_comparison: &'a SkillComparison,
    pub responsibility_matching: &'a ResponsibilityMatching,
    pub job_description: &'a ParsedJobDescription,
    pub resume: &'a NormalizedResume,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

/// One scorable unit inside a category.
struct Item {
    credit: f64,
    shortfall: Option<Shortfall>,
}

struct Shortfall {
    kind: DeductionKind,
    item: String,
    reason: String,
}

impl Item {
    fn full() -> Self {
        Self {
            credit: 1.0,
            shortfall: None,
        }
    }

    fn short(credit: f64, kind: DeductionKind, item: impl Into<String>, reason: String) -> Self {
        Self {
            credit,
            shortfall: Some(Shortfall {
                kind,
                item: item.into(),
                reason,
            }),
        }
    }
}

pub fn calculate_ats_score(input: ScoreInput<'_>, config: &ScoringConfig) -> Result<Score, MatchError> {
    config.validate()?;
    check_inputs_agree(&input)?;

    let items: Vec<(ScoreCategory, Vec<Item>)> = ScoreCategory::ALL
        .into_iter()
        .map(|category| (category, category_items(category, &input, config)))
        .collect();

    let applicable_weight: f64 = items
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(c, _)| config.weights.get(*c))
        .sum();
    let applicable_count = items.iter().filter(|(_, items)| !items.is_empty()).count();

    let mut breakdown = BTreeMap::new();
    let mut deductions = Vec::new();

    for (category, category_items) in &items {
        if category_items.is_empty() {
            breakdown.insert(
                category.key().to_string(),
                CategoryBreakdown {
                    name: category.label().to_string(),
                    percentage: CategoryBreakdown::NOT_APPLICABLE,
                    weight: 0.0,
                    max_points: 0.0,
                },
            );
            continue;
        }

        // All applicable weights zero: split evenly so 100 stays reachable.
        let weight = if applicable_weight > 0.0 {
            config.weights.get(*category) / applicable_weight
        } else {
            1.0 / applicable_count as f64
        };
        let max_points = weight * 100.0;
        let per_item = max_points / category_items.len() as f64;

        let earned: f64 = category_items.iter().map(|i| i.credit).sum();
        let percentage = (earned / category_items.len() as f64 * 100.0).round() as i32;

        for item in category_items {
            let Some(shortfall) = &item.shortfall else {
                continue;
            };
            // Exact here; rounded to cents once all categories are known.
            let points = per_item * (1.0 - item.credit);
            if points <= 0.0 {
                continue;
            }
            deductions.push(ScoreDeduction {
                category: *category,
                kind: shortfall.kind,
                item: shortfall.item.clone(),
                reason: shortfall.reason.clone(),
                points,
            });
        }

        breakdown.insert(
            category.key().to_string(),
            CategoryBreakdown {
                name: category.label().to_string(),
                percentage: percentage.clamp(0, 100),
                weight: round4(weight),
                max_points: round2(max_points),
            },
        );
    }

    let exact_lost: f64 = deductions.iter().map(|d| d.points).sum();
    let overall_score = (100.0 - exact_lost).round().clamp(0.0, 100.0) as u32;
    reconcile_to_cents(&mut deductions, exact_lost);

    deductions.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| a.reason.cmp(&b.reason))
    });

    let grade = config.grades.grade(overall_score);
    let summary = build_summary(overall_score, grade, &input, &deductions);

    debug!(
        overall_score,
        deductions = deductions.len(),
        "ATS score calculated"
    );

    Score::new(overall_score, grade, breakdown, summary, deductions)
}

/// The skill comparison must describe the same JD it is scored against.
fn check_inputs_agree(input: &ScoreInput<'_>) -> Result<(), MatchError> {
    let declared = dedupe_terms(&input.job_description.required_skills).len();
    let compared = input.skill_comparison.required_total();
    if declared != compared {
        return Err(MatchError::Validation(format!(
            "skill comparison covers {compared} required skills but the job description declares {declared}"
        )));
    }
    Ok(())
}

fn category_items(category: ScoreCategory, input: &ScoreInput<'_>, config: &ScoringConfig) -> Vec<Item> {
    let skills = input.skill_comparison;
    match category {
        ScoreCategory::Required => skill_items(
            &skills.matched.required,
            &skills.missing,
            config.fuzzy_credit,
            DeductionKind::ApproximateRequiredSkill,
            DeductionKind::MissingRequiredSkill,
            "required",
        ),
        ScoreCategory::Preferred => skill_items(
            &skills.matched.preferred,
            &skills.missing_preferred,
            config.fuzzy_credit,
            DeductionKind::ApproximatePreferredSkill,
            DeductionKind::MissingPreferredSkill,
            "preferred",
        ),
        ScoreCategory::Responsibilities => responsibility_items(input, config.weak_credit),
        ScoreCategory::Structure => structure_items(input.resume),
    }
}

fn skill_items(
    matched: &[SkillMatch],
    missing: &[String],
    fuzzy_credit: f64,
    approximate_kind: DeductionKind,
    missing_kind: DeductionKind,
    label: &str,
) -> Vec<Item> {
    let matched_items = matched.iter().map(|m| match m.match_type {
        MatchType::Exact | MatchType::Synonym => Item::full(),
        MatchType::Fuzzy => Item::short(
            fuzzy_credit,
            approximate_kind,
            m.jd_skill.clone(),
            format!(
                "Approximate match for {label} skill: {} (resume lists \"{}\")",
                m.jd_skill, m.resume_skill
            ),
        ),
    });
    let missing_items = missing.iter().map(|skill| {
        Item::short(
            0.0,
            missing_kind,
            skill.clone(),
            format!("Missing {label} skill: {skill}"),
        )
    });
    matched_items.chain(missing_items).collect()
}

/// Coverage of every distinct declared JD responsibility, in JD order.
/// Judgements for text the JD never declared are ignored; declared text the
/// matching never classified counts as not covered.
fn declared_coverage(input: &ScoreInput<'_>) -> Vec<(String, CoverageBucket)> {
    let matching = input.responsibility_matching;
    dedupe_by_key(
        input.job_description.responsibilities.iter().map(|r| r.trim().to_string()),
        |r| normalize_sentence(r),
    )
    .into_iter()
    .map(|responsibility| {
        let bucket = matching
            .find(&responsibility)
            .map(|(bucket, _)| bucket)
            .unwrap_or(CoverageBucket::NotCovered);
        (responsibility, bucket)
    })
    .collect()
}

fn responsibility_items(input: &ScoreInput<'_>, weak_credit: f64) -> Vec<Item> {
    declared_coverage(input)
        .into_iter()
        .map(|(responsibility, bucket)| match bucket {
            CoverageBucket::Covered => Item::full(),
            CoverageBucket::WeaklyCovered => Item::short(
                weak_credit,
                DeductionKind::WeakResponsibility,
                responsibility.clone(),
                format!("Responsibility only weakly covered: {responsibility}"),
            ),
            CoverageBucket::NotCovered => Item::short(
                0.0,
                DeductionKind::UncoveredResponsibility,
                responsibility.clone(),
                format!("Responsibility not covered: {responsibility}"),
            ),
        })
        .collect()
}

fn structure_items(resume: &NormalizedResume) -> Vec<Item> {
    let check = |ok: bool, kind: DeductionKind, section: &str, reason: &str| {
        if ok {
            Item::full()
        } else {
            Item::short(0.0, kind, section, reason.to_string())
        }
    };

    vec![
        check(
            resume.contact_info.is_reachable(),
            DeductionKind::MissingContactInfo,
            "contact",
            "Resume has no email address or phone number",
        ),
        check(
            resume.has_experience(),
            DeductionKind::MissingExperience,
            "experience",
            "Resume has no experience section",
        ),
        check(
            resume.has_education(),
            DeductionKind::MissingEducation,
            "education",
            "Resume has no education section",
        ),
        check(
            !resume.skills.is_empty(),
            DeductionKind::MissingSkills,
            "skills",
            "Resume has no skills section",
        ),
    ]
}

/// Builds a deterministic, human-readable summary from the score and its inputs.
fn build_summary(
    score: u32,
    grade: Grade,
    input: &ScoreInput<'_>,
    deductions: &[ScoreDeduction],
) -> String {
    let headline = match grade {
        Grade::A => "Excellent match",
        Grade::B => "Strong match",
        Grade::C => "Moderate match",
        Grade::D => "Weak match",
        Grade::F => "Poor match",
    };

    let skills = input.skill_comparison;
    let mut parts = Vec::new();
    if skills.required_total() > 0 {
        parts.push(format!(
            "matched {} of {} required skills",
            skills.matched.required.len(),
            skills.required_total()
        ));
    }
    if skills.preferred_total() > 0 {
        parts.push(format!(
            "{} of {} preferred skills",
            skills.matched.preferred.len(),
            skills.preferred_total()
        ));
    }
    let coverage = declared_coverage(input);
    if !coverage.is_empty() {
        let count = |b: CoverageBucket| coverage.iter().filter(|(_, bucket)| *bucket == b).count();
        let weakly_covered = count(CoverageBucket::WeaklyCovered);
        let weak = if weakly_covered > 0 {
            format!(" ({weakly_covered} more weakly)")
        } else {
            String::new()
        };
        parts.push(format!(
            "{} of {} responsibilities covered{weak}",
            count(CoverageBucket::Covered),
            coverage.len()
        ));
    }

    let mut summary = format!("{headline} ({score}/100, grade {grade:?}).");
    if !parts.is_empty() {
        let body = parts.join("; ");
        let mut chars = body.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        summary.push_str(&format!(" {capitalized}."));
    }

    let gaps: Vec<&str> = deductions.iter().take(3).map(|d| d.item.as_str()).collect();
    if gaps.is_empty() {
        summary.push_str(" No gaps found.");
    } else {
        summary.push_str(&format!(" Biggest gaps: {}.", gaps.join(", ")));
    }
    summary
}

/// Rounds every deduction to whole cents so that their sum equals the exact
/// loss rounded to cents (largest-remainder apportionment). Deductions left
/// at zero cents are dropped.
fn reconcile_to_cents(deductions: &mut Vec<ScoreDeduction>, exact_lost: f64) {
    let target = (exact_lost * 100.0).round().clamp(0.0, 10_000.0) as i64;

    let mut cents: Vec<i64> = Vec::with_capacity(deductions.len());
    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(deductions.len());
    for (i, d) in deductions.iter().enumerate() {
        let scaled = d.points * 100.0;
        let floor = scaled.floor();
        cents.push(floor as i64);
        remainders.push((i, scaled - floor));
    }

    let mut shortfall = target - cents.iter().sum::<i64>();
    // Ties go to the earlier deduction so the result stays deterministic.
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (i, _) in remainders.iter().cycle().take(deductions.len() * 2) {
        if shortfall <= 0 {
            break;
        }
        cents[*i] += 1;
        shortfall -= 1;
    }

    let mut index = 0;
    deductions.retain_mut(|d| {
        let c = cents[index];
        index += 1;
        d.points = c as f64 / 100.0;
        c > 0
    });
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
