//! Analysis pipeline — one JD against one resume, end to end.
//!
//! skills ─┐
//!         ├─> score ─> recovery plan
//! resp. ──┘
//! resume ─> feedback (advisory, never read by the score)

pub mod handlers;

use serde::Serialize;
use tracing::debug;

use crate::errors::MatchError;
use crate::feedback::{post_process_resume_feedback, FeedbackList};
use crate::matching::{
    MatchConfig, ResponsibilityJudge, ResponsibilityMatcher, ResponsibilityMatching,
    SkillComparator, SkillComparison, SynonymTable,
};
use crate::models::{NormalizedResume, ParsedJobDescription};
use crate::scoring::{
    build_score_recovery_plan, calculate_ats_score, RecoveryDetails, RecoveryPlan, Score,
    ScoreInput, ScoringConfig,
};

/// Borrowed collaborators and configuration for one analysis.
#[derive(Clone, Copy)]
pub struct AnalysisDeps<'a> {
    pub synonyms: &'a SynonymTable,
    pub match_config: &'a MatchConfig,
    pub scoring: &'a ScoringConfig,
    pub judge: &'a dyn ResponsibilityJudge,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub skill_comparison: SkillComparison,
    pub responsibility_matching: ResponsibilityMatching,
    pub score: Score,
    pub recovery_plan: RecoveryPlan,
    pub resume_feedback: FeedbackList,
}

/// Rejects a JD that lists no skills and no responsibilities.
pub fn validate_job_description(jd: &ParsedJobDescription) -> Result<(), MatchError> {
    if jd.is_empty() {
        return Err(MatchError::Validation(
            "job description must list at least one skill or responsibility".to_string(),
        ));
    }
    Ok(())
}

/// Runs the full pipeline. Fails as a whole; no partial report is returned.
pub async fn analyze(
    jd: &ParsedJobDescription,
    resume: &NormalizedResume,
    deps: &AnalysisDeps<'_>,
) -> Result<AnalysisReport, MatchError> {
    validate_job_description(jd)?;
    deps.match_config.validate()?;
    deps.scoring.validate()?;

    let skill_comparison = SkillComparator::new(deps.synonyms, deps.match_config).compare(jd, resume);
    let responsibility_matching = ResponsibilityMatcher::new(deps.judge)
        .match_responsibilities(jd, resume)
        .await?;

    let score = calculate_ats_score(
        ScoreInput {
            skill_comparison: &skill_comparison,
            responsibility_matching: &responsibility_matching,
            job_description: jd,
            resume,
        },
        deps.scoring,
    )?;

    let recovery_plan = build_score_recovery_plan(
        &score,
        &RecoveryDetails {
            skill_comparison: Some(&skill_comparison),
            responsibility_matching: Some(&responsibility_matching),
        },
    );

    let resume_feedback =
        post_process_resume_feedback(resume, resume.resume_quality_feedback.as_ref());

    debug!(
        overall_score = score.overall_score,
        recovery_items = recovery_plan.items.len(),
        feedback_items = resume_feedback.items.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        skill_comparison,
        responsibility_matching,
        score,
        recovery_plan,
        resume_feedback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::RawJudgement;
    use crate::models::{ContactInfo, EducationEntry, ExperienceEntry, ResumeSkills};
    use crate::test_support::{judgement, StubJudge};
    use serde_json::json;

    fn jd() -> ParsedJobDescription {
        ParsedJobDescription {
            required_skills: vec!["Rust".into(), "PostgreSQL".into()],
            preferred_skills: vec!["Kubernetes".into()],
            responsibilities: vec!["Build backend services".into(), "Mentor engineers".into()],
        }
    }

    fn resume() -> NormalizedResume {
        NormalizedResume {
            contact_info: ContactInfo {
                email: Some("dev@example.com".into()),
                ..Default::default()
            },
            skills: ResumeSkills {
                technical: vec!["Rust".into(), "Postgres".into(), "K8s".into()],
                ..Default::default()
            },
            experience: vec![ExperienceEntry {
                title: Some("Backend Engineer".into()),
                company: Some("Acme".into()),
                bullets: vec!["Built 4 Rust services handling 2k rps".into()],
                ..Default::default()
            }],
            education: vec![EducationEntry {
                institution: Some("State University".into()),
                degree: Some("BSc".into()),
                ..Default::default()
            }],
            resume_quality_feedback: None,
        }
    }

    fn deps<'a>(
        synonyms: &'a SynonymTable,
        match_config: &'a MatchConfig,
        scoring: &'a ScoringConfig,
        judge: &'a StubJudge,
    ) -> AnalysisDeps<'a> {
        AnalysisDeps {
            synonyms,
            match_config,
            scoring,
            judge,
        }
    }

    #[tokio::test]
    async fn test_full_coverage_scores_100_with_empty_plan() {
        let (synonyms, match_config, scoring) =
            (SynonymTable::builtin(), MatchConfig::default(), ScoringConfig::default());
        let judge = StubJudge::all_covered();

        let report = analyze(&jd(), &resume(), &deps(&synonyms, &match_config, &scoring, &judge))
            .await
            .unwrap();

        assert_eq!(report.score.overall_score, 100);
        assert!(report.score.deductions.is_empty());
        assert!(report.recovery_plan.items.is_empty());
        assert!(report.skill_comparison.missing.is_empty());
        assert_eq!(report.responsibility_matching.totals.covered, 2);
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn test_gaps_flow_into_recovery_plan() {
        let (synonyms, match_config, scoring) =
            (SynonymTable::builtin(), MatchConfig::default(), ScoringConfig::default());
        let judge = StubJudge::returning(RawJudgement {
            covered: vec![judgement("Build backend services", "Built Rust services")],
            not_covered: vec![judgement("Mentor engineers", "No mentoring mentioned")],
            ..Default::default()
        });
        let mut jd = jd();
        jd.required_skills.push("Terraform".into());

        let report = analyze(&jd, &resume(), &deps(&synonyms, &match_config, &scoring, &judge))
            .await
            .unwrap();

        assert!(report.score.overall_score < 100);
        assert_eq!(report.skill_comparison.missing, vec!["Terraform".to_string()]);
        let reasons: Vec<_> = report.score.deductions.iter().map(|d| d.reason.as_str()).collect();
        for item in &report.recovery_plan.items {
            assert!(reasons.contains(&item.deduction_reason.as_str()));
        }
        assert!(report.recovery_plan.total_estimated_points <= report.score.total_deducted() + 1e-9);
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected_before_judging() {
        let (synonyms, match_config, scoring) =
            (SynonymTable::builtin(), MatchConfig::default(), ScoringConfig::default());
        let judge = StubJudge::all_covered();

        let err = analyze(
            &ParsedJobDescription::default(),
            &resume(),
            &deps(&synonyms, &match_config, &scoring, &judge),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MatchError::Validation(_)));
        assert_eq!(judge.calls(), 0);
    }

    #[tokio::test]
    async fn test_judge_failure_fails_the_whole_analysis() {
        let (synonyms, match_config, scoring) =
            (SynonymTable::builtin(), MatchConfig::default(), ScoringConfig::default());
        let judge = StubJudge::failing();

        let err = analyze(&jd(), &resume(), &deps(&synonyms, &match_config, &scoring, &judge))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_feedback_never_changes_the_score() {
        let (synonyms, match_config, scoring) =
            (SynonymTable::builtin(), MatchConfig::default(), ScoringConfig::default());
        let judge = StubJudge::all_covered();
        let plain = resume();
        let mut with_feedback = resume();
        with_feedback.resume_quality_feedback = Some(json!([
            {"category": "format", "message": "Inconsistent dates", "severity": "critical"}
        ]));

        let d = deps(&synonyms, &match_config, &scoring, &judge);
        let a = analyze(&jd(), &plain, &d).await.unwrap();
        let b = analyze(&jd(), &with_feedback, &d).await.unwrap();

        assert_eq!(a.score, b.score);
        assert!(a.resume_feedback.items.is_empty());
        assert_eq!(b.resume_feedback.items.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_scoring_config_is_rejected() {
        let (synonyms, match_config) = (SynonymTable::builtin(), MatchConfig::default());
        let mut scoring = ScoringConfig::default();
        scoring.weak_credit = -0.5;
        let judge = StubJudge::all_covered();

        let err = analyze(&jd(), &resume(), &deps(&synonyms, &match_config, &scoring, &judge))
            .await
            .unwrap_err();
        assert!(matches!(err, MatchError::Validation(_)));
        assert_eq!(judge.calls(), 0);
    }
}
