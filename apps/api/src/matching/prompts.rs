// Prompt constants for the responsibility judge.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for responsibility judgment — enforces JSON-only output.
pub const RESPONSIBILITY_JUDGE_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Responsibility judgment prompt template.
/// Replace: {responsibilities}, {experience}
pub const RESPONSIBILITY_JUDGE_PROMPT_TEMPLATE: &str = r#"You are screening a student's resume against the responsibilities of a job description.

For EACH responsibility below, decide how well the candidate's experience demonstrates it:
- "covered": the experience clearly shows the candidate has done this or something directly equivalent
- "weaklyCovered": related or partial evidence only (adjacent work, smaller scope, coursework)
- "notCovered": no supporting evidence in the experience

Return a JSON object with this EXACT schema (no extra fields):
{
  "covered": [{"responsibility": "...", "explanation": "..."}],
  "weaklyCovered": [{"responsibility": "...", "explanation": "..."}],
  "notCovered": [{"responsibility": "...", "explanation": "..."}]
}

HARD RULES:
1. Copy each responsibility text EXACTLY as given — do not paraphrase
2. Place every responsibility in exactly ONE bucket
3. Explanations are one sentence and cite the resume evidence (or its absence)
4. Judge only from the experience text — do not assume skills that are not shown

RESPONSIBILITIES:
{responsibilities}

CANDIDATE EXPERIENCE:
{experience}"#;
