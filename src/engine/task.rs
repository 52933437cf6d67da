use crate::agents::Capability;
use crate::blackboard::HypothesisId;
use serde::Deserialize;
use serde::Serialize;

/// One unit of pending work, tagged with the capability that performs
/// it. Variants carry exactly the payload their operation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Task {
    InitialGeneration,
    GenerateHypotheses { count: usize },
    ReviewHypothesis { hypothesis: HypothesisId },
    RunTournamentMatches { count: usize },
    UpdateRankings,
    CalculateProximity,
    EvolveHypothesis { hypothesis: HypothesisId },
    CombineHypotheses { hypotheses: Vec<HypothesisId> },
    GenerateResearchOverview,
}

impl Task {
    pub fn capability(&self) -> Capability {
        match self {
            Self::InitialGeneration => Capability::Generation,
            Self::GenerateHypotheses { .. } => Capability::Generation,
            Self::ReviewHypothesis { .. } => Capability::Reflection,
            Self::RunTournamentMatches { .. } => Capability::Ranking,
            Self::UpdateRankings => Capability::Ranking,
            Self::CalculateProximity => Capability::Proximity,
            Self::EvolveHypothesis { .. } => Capability::Evolution,
            Self::CombineHypotheses { .. } => Capability::Evolution,
            Self::GenerateResearchOverview => Capability::MetaReview,
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InitialGeneration => write!(f, "generation.initial_generation"),
            Self::GenerateHypotheses { count } => {
                write!(f, "generation.generate_hypotheses({})", count)
            }
            Self::ReviewHypothesis { hypothesis } => {
                write!(f, "reflection.review_hypothesis({})", hypothesis)
            }
            Self::RunTournamentMatches { count } => {
                write!(f, "ranking.run_tournament_matches({})", count)
            }
            Self::UpdateRankings => write!(f, "ranking.update_rankings"),
            Self::CalculateProximity => write!(f, "proximity.calculate_proximity"),
            Self::EvolveHypothesis { hypothesis } => {
                write!(f, "evolution.evolve_hypothesis({})", hypothesis)
            }
            Self::CombineHypotheses { hypotheses } => {
                write!(f, "evolution.combine_hypotheses({})", hypotheses.len())
            }
            Self::GenerateResearchOverview => write!(f, "meta_review.generate_research_overview"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_task_dispatches_to_its_capability() {
        assert!(Task::InitialGeneration.capability() == Capability::Generation);
        assert!(
            Task::ReviewHypothesis { hypothesis: "h".into() }.capability()
                == Capability::Reflection
        );
        assert!(Task::RunTournamentMatches { count: 1 }.capability() == Capability::Ranking);
        assert!(Task::CalculateProximity.capability() == Capability::Proximity);
        assert!(
            Task::EvolveHypothesis { hypothesis: "h".into() }.capability()
                == Capability::Evolution
        );
        assert!(Task::GenerateResearchOverview.capability() == Capability::MetaReview);
    }

    #[test]
    fn tasks_roundtrip_through_json() {
        let tasks = vec![
            Task::InitialGeneration,
            Task::GenerateHypotheses { count: 5 },
            Task::ReviewHypothesis { hypothesis: "h-1".into() },
            Task::CombineHypotheses { hypotheses: vec!["h-1".into(), "h-2".into()] },
        ];
        for task in tasks {
            let json = serde_json::to_string(&task).unwrap();
            let back: Task = serde_json::from_str(&json).unwrap();
            assert!(back == task);
        }
    }

    #[test]
    fn display_names_capability_and_kind() {
        let task = Task::ReviewHypothesis { hypothesis: "h-9".into() };
        assert!(task.to_string() == "reflection.review_hypothesis(h-9)");
    }
}
