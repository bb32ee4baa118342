use serde::{Deserialize, Serialize};

/// Structured job description produced by the upstream JD parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedJobDescription {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub responsibilities: Vec<String>,
}

impl ParsedJobDescription {
    /// True when the JD carries nothing the engine can score against.
    pub fn is_empty(&self) -> bool {
        let blank = |items: &[String]| items.iter().all(|s| s.trim().is_empty());
        blank(&self.required_skills)
            && blank(&self.preferred_skills)
            && blank(&self.responsibilities)
    }
}
