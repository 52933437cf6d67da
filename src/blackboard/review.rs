use super::hypothesis::HypothesisId;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// a single scored criterion within a review stage, 1..=5
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub score: u8,
    pub assessment: String,
}

/// one stage of the reflection pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub criteria: BTreeMap<String, Criterion>,
    pub overall: String,
    pub passed: bool,
}

/// The reflection agent's multi-stage critique of a hypothesis.
/// The initial stage gates the expensive ones; the observation stage is
/// advisory and never contributes to the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "hypothesis_id")]
    pub hypothesis: HypothesisId,
    pub initial: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_verification: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Stage>,
    pub passed: bool,
}

impl Review {
    /// review cut short by a failed initial stage
    pub fn rejected(hypothesis: HypothesisId, initial: Stage) -> Self {
        Self {
            hypothesis,
            initial,
            full: None,
            deep_verification: None,
            observation: None,
            passed: false,
        }
    }

    /// full pipeline; the verdict is the conjunction of the gating stages
    pub fn completed(
        hypothesis: HypothesisId,
        initial: Stage,
        full: Stage,
        deep_verification: Stage,
        observation: Option<Stage>,
    ) -> Self {
        let passed = initial.passed && full.passed && deep_verification.passed;
        Self {
            hypothesis,
            initial,
            full: Some(full),
            deep_verification: Some(deep_verification),
            observation,
            passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(passed: bool) -> Stage {
        Stage {
            criteria: BTreeMap::new(),
            overall: String::new(),
            passed,
        }
    }

    #[test]
    fn rejected_never_passes() {
        let review = Review::rejected("h-1".to_string(), stage(false));
        assert!(!review.passed);
        assert!(review.full.is_none());
        assert!(review.deep_verification.is_none());
    }

    #[test]
    fn verdict_conjoins_gating_stages() {
        let review = Review::completed("h-1".into(), stage(true), stage(true), stage(true), None);
        assert!(review.passed);
        let review = Review::completed("h-1".into(), stage(true), stage(true), stage(false), None);
        assert!(!review.passed);
        let review = Review::completed("h-1".into(), stage(true), stage(false), stage(true), None);
        assert!(!review.passed);
    }

    #[test]
    fn observation_is_advisory() {
        let review = Review::completed(
            "h-1".into(),
            stage(true),
            stage(true),
            stage(true),
            Some(stage(false)),
        );
        assert!(review.passed);
    }
}
