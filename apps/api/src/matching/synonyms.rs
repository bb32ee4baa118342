//! Synonym table — explicit, immutable configuration for skill equivalence.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};

use crate::normalize::normalize_text;

/// Canonical skills and their accepted aliases, as loaded from configuration.
///
/// Matching is symmetric: two terms are synonyms when they share a group,
/// regardless of which one is the canonical name.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    /// normalized term -> indices of every group it belongs to
    index: HashMap<String, Vec<usize>>,
    group_count: usize,
}

const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    ("JavaScript", &["JS", "ECMAScript"]),
    ("TypeScript", &["TS"]),
    ("Kubernetes", &["K8s"]),
    ("PostgreSQL", &["Postgres", "psql"]),
    ("Go", &["Golang"]),
    ("Node.js", &["Node", "NodeJS"]),
    ("React", &["React.js", "ReactJS"]),
    ("Amazon Web Services", &["AWS"]),
    ("Google Cloud Platform", &["GCP", "Google Cloud"]),
    ("Microsoft Azure", &["Azure"]),
    ("Machine Learning", &["ML"]),
    ("Artificial Intelligence", &["AI"]),
    ("Natural Language Processing", &["NLP"]),
    ("Continuous Integration", &["CI", "CI/CD"]),
    ("C#", &["CSharp", "C Sharp"]),
    ("C++", &["CPP"]),
    ("Python", &["Python3", "Python 3"]),
    ("Communication", &["Communication Skills"]),
    ("Leadership", &["Team Leadership"]),
];

impl SynonymTable {
    /// An empty table: only exact and fuzzy matching apply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table of common technology and soft-skill aliases.
    pub fn builtin() -> Self {
        Self::from_groups(BUILTIN_SYNONYMS.iter().map(|(canonical, aliases)| {
            std::iter::once(*canonical)
                .chain(aliases.iter().copied())
                .map(str::to_string)
                .collect::<Vec<_>>()
        }))
    }

    /// Builds a table from `canonical -> aliases`.
    pub fn from_map(map: &BTreeMap<String, Vec<String>>) -> Self {
        Self::from_groups(map.iter().map(|(canonical, aliases)| {
            std::iter::once(canonical.clone())
                .chain(aliases.iter().cloned())
                .collect::<Vec<_>>()
        }))
    }

    /// Loads `{"Canonical": ["alias", ...]}` from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read synonym table at {}", path.display()))?;
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Synonym table at {} is not valid JSON", path.display()))?;
        Ok(Self::from_map(&map))
    }

    fn from_groups<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = String>,
    {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut group_count = 0;

        for group in groups {
            let mut added = false;
            for term in group {
                let key = normalize_text(&term);
                if key.is_empty() {
                    continue;
                }
                let ids = index.entry(key).or_default();
                if !ids.contains(&group_count) {
                    ids.push(group_count);
                }
                added = true;
            }
            if added {
                group_count += 1;
            }
        }

        Self { index, group_count }
    }

    /// True when two distinct terms share a synonym group.
    /// Identical terms are an exact match, not a synonym.
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        let (a, b) = (normalize_text(a), normalize_text(b));
        if a == b {
            return false;
        }
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(ga), Some(gb)) => ga.iter().any(|g| gb.contains(g)),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.group_count
    }

    pub fn is_empty(&self) -> bool {
        self.group_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_synonyms_match_in_both_directions() {
        let table = SynonymTable::builtin();
        assert!(table.are_synonyms("JavaScript", "JS"));
        assert!(table.are_synonyms("js", "javascript"));
        assert!(table.are_synonyms("k8s", "KUBERNETES"));
    }

    #[test]
    fn test_aliases_of_same_canonical_are_synonyms() {
        let table = SynonymTable::builtin();
        assert!(table.are_synonyms("Postgres", "psql"));
    }

    #[test]
    fn test_identical_terms_are_not_synonyms() {
        let table = SynonymTable::builtin();
        assert!(!table.are_synonyms("JS", "js"));
    }

    #[test]
    fn test_builtin_has_no_sql_mysql_link() {
        let table = SynonymTable::builtin();
        assert!(!table.are_synonyms("SQL", "MySQL"));
    }

    #[test]
    fn test_empty_table_matches_nothing() {
        let table = SynonymTable::empty();
        assert!(table.is_empty());
        assert!(!table.are_synonyms("JavaScript", "JS"));
    }

    #[test]
    fn test_from_map_ignores_blank_terms() {
        let map = BTreeMap::from([("Rust".to_string(), vec!["rustlang".to_string(), " ".to_string()])]);
        let table = SynonymTable::from_map(&map);
        assert_eq!(table.len(), 1);
        assert!(table.are_synonyms("RustLang", "rust"));
    }

    #[test]
    fn test_from_json_file_loads_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Terraform": ["TF", "HCL"]}}"#).unwrap();
        let table = SynonymTable::from_json_file(file.path()).unwrap();
        assert!(table.are_synonyms("tf", "Terraform"));
        assert!(table.are_synonyms("HCL", "TF"));
        assert!(!table.are_synonyms("Terraform", "Pulumi"));
    }

    #[test]
    fn test_from_json_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(SynonymTable::from_json_file(file.path()).is_err());
    }
}
