//! Score recovery planning — turns deductions into ranked, bounded suggestions.
//!
//! One suggestion per deduction at most, never promising more points than
//! that deduction cost. Nothing is suggested without a deduction behind it.

use serde::{Deserialize, Serialize};

use crate::matching::{ResponsibilityMatching, SkillComparison};
use crate::scoring::calculator::{DeductionKind, Score, ScoreDeduction};
use crate::scoring::weights::ScoreCategory;

/// Rewriting an uncovered responsibility realistically lifts it to weak coverage only.
const UNCOVERED_RECOVERY_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryItem {
    pub title: String,
    pub detail: String,
    pub estimated_points: f64,
    pub category: ScoreCategory,
    /// Reason of the deduction this item addresses.
    pub deduction_reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    /// Every suggestion, highest estimated gain first.
    pub items: Vec<RecoveryItem>,
    pub total_estimated_points: f64,
}

impl RecoveryPlan {
    /// The first `limit` items; the full list stays available in `items`.
    pub fn displayed(&self, limit: usize) -> &[RecoveryItem] {
        &self.items[..self.items.len().min(limit)]
    }
}

/// Optional context used to make suggestions more specific.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryDetails<'a> {
    pub skill_comparison: Option<&'a SkillComparison>,
    pub responsibility_matching: Option<&'a ResponsibilityMatching>,
}

pub fn build_score_recovery_plan(score: &Score, details: &RecoveryDetails<'_>) -> RecoveryPlan {
    let mut items: Vec<RecoveryItem> = score
        .deductions
        .iter()
        .filter_map(|d| suggest(d, details))
        .collect();

    items.sort_by(|a, b| {
        b.estimated_points
            .total_cmp(&a.estimated_points)
            .then_with(|| a.title.cmp(&b.title))
    });

    let total = items.iter().map(|i| i.estimated_points).sum::<f64>();

    RecoveryPlan {
        items,
        total_estimated_points: (total * 100.0).round() / 100.0,
    }
}

fn suggest(deduction: &ScoreDeduction, details: &RecoveryDetails<'_>) -> Option<RecoveryItem> {
    let item = deduction.item.as_str();

    let (ratio, title, detail) = match deduction.kind {
        DeductionKind::MissingRequiredSkill => (
            1.0,
            format!("Add {item} to your resume"),
            format!(
                "The job requires {item}. If you have used it, list it in your skills section \
                 and show it in an experience or project bullet."
            ),
        ),
        DeductionKind::MissingPreferredSkill => (
            1.0,
            format!("Highlight {item} if you have it"),
            format!(
                "{item} is a preferred skill for this role. Mention it if you have coursework, \
                 project or work experience with it."
            ),
        ),
        DeductionKind::ApproximateRequiredSkill | DeductionKind::ApproximatePreferredSkill => {
            let detail = match resume_term_for(item, details) {
                Some(term) => format!(
                    "Your resume lists \"{term}\", which only approximately matches \"{item}\". \
                     Use the job description's wording so screening software recognises it."
                ),
                None => format!(
                    "Use the exact wording \"{item}\" from the job description so screening \
                     software recognises it."
                ),
            };
            (1.0, format!("Use the exact term \"{item}\""), detail)
        }
        DeductionKind::WeakResponsibility => {
            let evidence = explanation_for(item, details)
                .map(|e| format!(" Current evidence: {e}"))
                .unwrap_or_default();
            (
                1.0,
                format!("Strengthen evidence for: {item}"),
                format!(
                    "Your experience only partly shows this responsibility.{evidence} Add a bullet \
                     with concrete scope, tools and results."
                ),
            )
        }
        DeductionKind::UncoveredResponsibility => (
            UNCOVERED_RECOVERY_RATIO,
            format!("Show experience with: {item}"),
            "No experience currently demonstrates this. Add an internship, project or coursework \
             bullet that does, even at a smaller scale."
                .to_string(),
        ),
        DeductionKind::MissingContactInfo => (
            1.0,
            "Add contact details".to_string(),
            "Include an email address or phone number at the top of your resume.".to_string(),
        ),
        DeductionKind::MissingExperience => (
            1.0,
            "Add an experience section".to_string(),
            "List internships, part-time jobs, research or substantial projects with short \
             result-focused bullets."
                .to_string(),
        ),
        DeductionKind::MissingEducation => (
            1.0,
            "Add an education section".to_string(),
            "List your institution, degree and expected graduation date.".to_string(),
        ),
        DeductionKind::MissingSkills => (
            1.0,
            "Add a skills section".to_string(),
            "List the tools, languages and methods you can use, matching the job's terminology."
                .to_string(),
        ),
    };

    let estimated_points = ((deduction.points * ratio) * 100.0).round() / 100.0;
    let estimated_points = estimated_points.min(deduction.points);
    if estimated_points <= 0.0 {
        return None;
    }

    Some(RecoveryItem {
        title,
        detail,
        estimated_points,
        category: deduction.category,
        deduction_reason: deduction.reason.clone(),
    })
}

fn resume_term_for<'a>(jd_skill: &str, details: &RecoveryDetails<'a>) -> Option<&'a str> {
    let comparison = details.skill_comparison?;
    comparison
        .matched
        .required
        .iter()
        .chain(comparison.matched.preferred.iter())
        .find(|m| m.jd_skill == jd_skill)
        .map(|m| m.resume_skill.as_str())
}

fn explanation_for<'a>(responsibility: &str, details: &RecoveryDetails<'a>) -> Option<&'a str> {
    let (_, judgement) = details.responsibility_matching?.find(responsibility)?;
    let explanation = judgement.explanation.trim();
    (!explanation.is_empty()).then_some(explanation)
}
