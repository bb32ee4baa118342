use std::sync::Arc;

use crate::analysis::AnalysisDeps;
use crate::config::Config;
use crate::matching::{MatchConfig, ResponsibilityJudge, SynonymTable};
use crate::scoring::ScoringConfig;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub synonyms: Arc<SynonymTable>,
    pub match_config: MatchConfig,
    pub scoring: ScoringConfig,
    /// Pluggable semantic judge. Default: LlmResponsibilityJudge.
    pub judge: Arc<dyn ResponsibilityJudge>,
}

impl AppState {
    pub fn analysis_deps(&self) -> AnalysisDeps<'_> {
        AnalysisDeps {
            synonyms: &self.synonyms,
            match_config: &self.match_config,
            scoring: &self.scoring,
            judge: self.judge.as_ref(),
        }
    }
}
