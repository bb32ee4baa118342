//! Responsibility judge — the narrow capability the matcher needs from a
//! semantic-judgment backend.
//!
//! Default production backend: `LlmResponsibilityJudge`. Tests inject a
//! deterministic stub. The matcher never sees which one it is talking to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::MatchError;
use crate::llm_client::LlmClient;
use crate::matching::prompts::{RESPONSIBILITY_JUDGE_PROMPT_TEMPLATE, RESPONSIBILITY_JUDGE_SYSTEM};
use crate::matching::responsibilities::ResponsibilityJudgement;

/// One batched judgment request: every deduplicated responsibility against
/// the candidate's flattened experience.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgementRequest {
    pub responsibilities: Vec<String>,
    pub experience_text: String,
}

/// Collaborator output before normalization. May contain duplicates, items in
/// several buckets, or paraphrased responsibilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawJudgement {
    pub covered: Vec<ResponsibilityJudgement>,
    pub weakly_covered: Vec<ResponsibilityJudgement>,
    pub not_covered: Vec<ResponsibilityJudgement>,
}

impl RawJudgement {
    pub fn is_empty(&self) -> bool {
        self.covered.is_empty() && self.weakly_covered.is_empty() && self.not_covered.is_empty()
    }
}

/// Implement this to swap judgment backends without touching the matcher.
///
/// Carried in `AppState` as `Arc<dyn ResponsibilityJudge>`.
#[async_trait]
pub trait ResponsibilityJudge: Send + Sync {
    async fn judge(&self, request: &JudgementRequest) -> Result<RawJudgement, MatchError>;
}

/// Semantic judge backed by the LLM client.
pub struct LlmResponsibilityJudge(pub LlmClient);

#[async_trait]
impl ResponsibilityJudge for LlmResponsibilityJudge {
    async fn judge(&self, request: &JudgementRequest) -> Result<RawJudgement, MatchError> {
        let prompt = build_prompt(request);
        let raw = self
            .0
            .call_json::<RawJudgement>(&prompt, RESPONSIBILITY_JUDGE_SYSTEM)
            .await
            .map_err(|e| {
                warn!("Responsibility judgment failed: {e}");
                if e.is_malformed_output() {
                    MatchError::malformed()
                } else {
                    MatchError::unavailable()
                }
            })?;

        debug!(
            covered = raw.covered.len(),
            weakly_covered = raw.weakly_covered.len(),
            not_covered = raw.not_covered.len(),
            "Responsibility judgment received"
        );
        Ok(raw)
    }
}

fn build_prompt(request: &JudgementRequest) -> String {
    let responsibilities = request
        .responsibilities
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r))
        .collect::<Vec<_>>()
        .join("\n");

    let experience = if request.experience_text.trim().is_empty() {
        "(no experience listed)"
    } else {
        request.experience_text.as_str()
    };

    RESPONSIBILITY_JUDGE_PROMPT_TEMPLATE
        .replace("{responsibilities}", &responsibilities)
        .replace("{experience}", experience)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_numbers_responsibilities_and_embeds_experience() {
        let request = JudgementRequest {
            responsibilities: vec!["Build APIs".into(), "Mentor juniors".into()],
            experience_text: "Engineer at Acme\n- Built REST APIs".into(),
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("1. Build APIs\n2. Mentor juniors"));
        assert!(prompt.contains("- Built REST APIs"));
        assert!(!prompt.contains("{responsibilities}"));
        assert!(!prompt.contains("{experience}"));
    }

    #[test]
    fn test_prompt_marks_missing_experience() {
        let request = JudgementRequest {
            responsibilities: vec!["Build APIs".into()],
            experience_text: "  ".into(),
        };
        assert!(build_prompt(&request).contains("(no experience listed)"));
    }

    #[test]
    fn test_raw_judgement_deserializes_camel_case_buckets() {
        let json = r#"{
            "covered": [{"responsibility": "Build APIs", "explanation": "Built REST APIs at Acme"}],
            "weaklyCovered": [{"responsibility": "Mentor juniors"}]
        }"#;
        let raw: RawJudgement = serde_json::from_str(json).unwrap();
        assert_eq!(raw.covered.len(), 1);
        assert_eq!(raw.weakly_covered[0].explanation, "");
        assert!(raw.not_covered.is_empty());
        assert!(!raw.is_empty());
    }
}
