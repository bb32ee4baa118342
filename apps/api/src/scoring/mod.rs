// Scoring: weighted ATS score with itemized deductions, and the recovery plan built from them.
// No LLM calls and no I/O anywhere in this module.

pub mod calculator;
pub mod recovery;
pub mod weights;

pub use calculator::{
    calculate_ats_score, CategoryBreakdown, DeductionKind, Score, ScoreDeduction, ScoreInput,
};
pub use recovery::{build_score_recovery_plan, RecoveryDetails, RecoveryItem, RecoveryPlan};
pub use weights::{CategoryWeights, Grade, GradeThresholds, ScoreCategory, ScoringConfig};
