use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub links: Vec<String>,
}

impl ContactInfo {
    /// A recruiter can reach the candidate through at least one channel.
    pub fn is_reachable(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.email) || present(&self.phone)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeSkills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub other: Vec<String>,
}

impl ResumeSkills {
    /// All claimed skills in category order: technical, soft, other.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.technical
            .iter()
            .chain(self.soft.iter())
            .chain(self.other.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.all().all(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub bullets: Vec<String>,
}

impl ExperienceEntry {
    /// Flattens the entry into a single block of text for semantic judgment.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        let heading = match (self.title.as_deref(), self.company.as_deref()) {
            (Some(t), Some(c)) => format!("{t} at {c}"),
            (Some(t), None) => t.to_string(),
            (None, Some(c)) => c.to_string(),
            (None, None) => String::new(),
        };
        if !heading.trim().is_empty() {
            lines.push(heading);
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(desc.trim().to_string());
        }
        lines.extend(
            self.bullets
                .iter()
                .filter(|b| !b.trim().is_empty())
                .map(|b| format!("- {}", b.trim())),
        );
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub graduation_date: Option<String>,
}

/// Resume as produced by the upstream normalization collaborator.
///
/// `resume_quality_feedback` is opaque advisory data; only the feedback
/// postprocessor looks at it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedResume {
    pub contact_info: ContactInfo,
    pub skills: ResumeSkills,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub resume_quality_feedback: Option<Value>,
}

impl NormalizedResume {
    /// Experience section flattened into one text, entries separated by blank lines.
    pub fn experience_text(&self) -> String {
        self.experience
            .iter()
            .map(ExperienceEntry::to_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn has_experience(&self) -> bool {
        self.experience.iter().any(|e| !e.to_text().is_empty())
    }

    pub fn has_education(&self) -> bool {
        self.education.iter().any(|e| {
            [&e.institution, &e.degree, &e.field]
                .iter()
                .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
        })
    }
}
