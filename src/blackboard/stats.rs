use super::hypothesis::HypothesisId;
use super::hypothesis::Method;
use crate::Completion;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-iteration snapshot of run state, derived by the supervisor and
/// immutable once recorded. Counts are monotone across iterations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub iteration: usize,
    pub num_hypotheses: usize,
    pub num_reviewed: usize,
    pub unreviewed: Vec<HypothesisId>,
    pub tournament_progress: Completion,
    pub completed_matches: usize,
    pub top_ranked: Vec<HypothesisId>,
    pub methods: BTreeMap<Method, usize>,
}
