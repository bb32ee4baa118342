//! Deterministic fixtures for tests (compiled only under `cfg(test)`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::MatchError;
use crate::matching::judge::{JudgementRequest, RawJudgement, ResponsibilityJudge};
use crate::matching::responsibilities::ResponsibilityJudgement;

pub fn judgement(responsibility: &str, explanation: &str) -> ResponsibilityJudgement {
    ResponsibilityJudgement {
        responsibility: responsibility.to_string(),
        explanation: explanation.to_string(),
    }
}

enum Mode {
    Fixed(RawJudgement),
    AllCovered,
    Failing,
}

/// A `ResponsibilityJudge` with canned behaviour that records what it was asked.
pub struct StubJudge {
    mode: Mode,
    calls: AtomicUsize,
    last_request: Mutex<Option<JudgementRequest>>,
}

impl StubJudge {
    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always answers with the given raw judgement.
    pub fn returning(raw: RawJudgement) -> Self {
        Self::with_mode(Mode::Fixed(raw))
    }

    /// Marks every requested responsibility as covered.
    pub fn all_covered() -> Self {
        Self::with_mode(Mode::AllCovered)
    }

    /// Fails every call as if the backend were unreachable.
    pub fn failing() -> Self {
        Self::with_mode(Mode::Failing)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<JudgementRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponsibilityJudge for StubJudge {
    async fn judge(&self, request: &JudgementRequest) -> Result<RawJudgement, MatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.mode {
            Mode::Fixed(raw) => Ok(raw.clone()),
            Mode::AllCovered => Ok(RawJudgement {
                covered: request
                    .responsibilities
                    .iter()
                    .map(|r| judgement(r, "Demonstrated in experience"))
                    .collect(),
                ..Default::default()
            }),
            Mode::Failing => Err(MatchError::unavailable()),
        }
    }
}
