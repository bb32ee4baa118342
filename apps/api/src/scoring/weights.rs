use serde::{Deserialize, Serialize};

use crate::errors::MatchError;

/// Fixed scoring categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreCategory {
    Required,
    Preferred,
    Responsibilities,
    Structure,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 4] = [
        ScoreCategory::Required,
        ScoreCategory::Preferred,
        ScoreCategory::Responsibilities,
        ScoreCategory::Structure,
    ];

    /// Key used in `Score::breakdown`.
    pub fn key(self) -> &'static str {
        match self {
            ScoreCategory::Required => "required",
            ScoreCategory::Preferred => "preferred",
            ScoreCategory::Responsibilities => "responsibilities",
            ScoreCategory::Structure => "structure",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::Required => "Required skills",
            ScoreCategory::Preferred => "Preferred skills",
            ScoreCategory::Responsibilities => "Responsibilities",
            ScoreCategory::Structure => "Resume structure",
        }
    }
}

/// Nominal category weights. Weights of not-applicable categories are
/// redistributed proportionally, so only their ratios matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub required: f64,
    pub preferred: f64,
    pub responsibilities: f64,
    pub structure: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            required: 0.40,
            preferred: 0.15,
            responsibilities: 0.35,
            structure: 0.10,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Required => self.required,
            ScoreCategory::Preferred => self.preferred,
            ScoreCategory::Responsibilities => self.responsibilities,
            ScoreCategory::Structure => self.structure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// Lower bounds (inclusive) for each passing grade; anything below `d` is F.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            a: 90,
            b: 80,
            c: 70,
            d: 60,
        }
    }
}

impl GradeThresholds {
    pub fn grade(&self, score: u32) -> Grade {
        match score {
            s if s >= self.a => Grade::A,
            s if s >= self.b => Grade::B,
            s if s >= self.c => Grade::C,
            s if s >= self.d => Grade::D,
            _ => Grade::F,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
    /// Share of an item's points earned by a fuzzy skill match.
    pub fuzzy_credit: f64,
    /// Share of a responsibility's points earned when weakly covered.
    pub weak_credit: f64,
    pub grades: GradeThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            fuzzy_credit: 0.75,
            weak_credit: 0.5,
            grades: GradeThresholds::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        let mut total = 0.0;
        for category in ScoreCategory::ALL {
            let w = self.weights.get(category);
            if !w.is_finite() || w < 0.0 {
                return Err(MatchError::Validation(format!(
                    "weight for {} must be a non-negative number, got {w}",
                    category.key()
                )));
            }
            total += w;
        }
        if total <= 0.0 {
            return Err(MatchError::Validation(
                "at least one category weight must be positive".to_string(),
            ));
        }

        for (name, credit) in [("fuzzy_credit", self.fuzzy_credit), ("weak_credit", self.weak_credit)] {
            if !(0.0..=1.0).contains(&credit) {
                return Err(MatchError::Validation(format!(
                    "{name} must be within [0, 1], got {credit}"
                )));
            }
        }

        let g = &self.grades;
        if !(g.a <= 100 && g.a > g.b && g.b > g.c && g.c > g.d) {
            return Err(MatchError::Validation(format!(
                "grade thresholds must be strictly decreasing and at most 100, got A={} B={} C={} D={}",
                g.a, g.b, g.c, g.d
            )));
        }
        Ok(())
    }
}
