// Matching core: skill comparison (pure) and responsibility matching (judge-backed).
// The two are independent; either may run first.

pub mod judge;
pub mod prompts;
pub mod responsibilities;
pub mod skills;
pub mod synonyms;

pub use judge::{JudgementRequest, LlmResponsibilityJudge, RawJudgement, ResponsibilityJudge};
pub use responsibilities::{
    match_responsibilities, CoverageBucket, ResponsibilityJudgement, ResponsibilityMatcher,
    ResponsibilityMatching, ResponsibilityTotals,
};
pub use skills::{
    compare_skills, MatchConfig, MatchType, MatchedSkills, SkillComparator, SkillComparison,
    SkillMatch,
};
pub use synonyms::SynonymTable;
