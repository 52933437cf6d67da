use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;

/// opaque unique identifier, stamped once at creation and never mutated
pub type HypothesisId = String;

/// how a hypothesis came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    FocusAreaExploration,
    LiteratureExploration,
    SimulatedDebate,
    AssumptionsIdentification,
    ResearchExpansion,
    EvolutionEnhanceGrounding,
    EvolutionImproveFeasibility,
    EvolutionSimplification,
    EvolutionOutOfBox,
    EvolutionCombination,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::FocusAreaExploration => write!(f, "focus_area_exploration"),
            Self::LiteratureExploration => write!(f, "literature_exploration"),
            Self::SimulatedDebate => write!(f, "simulated_debate"),
            Self::AssumptionsIdentification => write!(f, "assumptions_identification"),
            Self::ResearchExpansion => write!(f, "research_expansion"),
            Self::EvolutionEnhanceGrounding => write!(f, "evolution_enhance_grounding"),
            Self::EvolutionImproveFeasibility => write!(f, "evolution_improve_feasibility"),
            Self::EvolutionSimplification => write!(f, "evolution_simplification"),
            Self::EvolutionOutOfBox => write!(f, "evolution_out_of_box"),
            Self::EvolutionCombination => write!(f, "evolution_combination"),
        }
    }
}

/// A structured research proposal: statement, rationale, and a plan for
/// how it could be tested. Hypotheses are immutable once created;
/// evolution produces new hypotheses that reference their parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: HypothesisId,
    #[serde(rename = "parent_ids", default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<HypothesisId>,
    pub title: String,
    pub statement: String,
    pub rationale: String,
    pub testability: String,
    #[serde(rename = "generation_method")]
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
}

impl Hypothesis {
    /// descendant of this hypothesis produced by an evolution technique
    pub fn descend(&self, id: HypothesisId, method: Method) -> Self {
        Self {
            id,
            parents: vec![self.id.clone()],
            method,
            ..self.clone()
        }
    }
}

/// a top-level sub-topic of the research goal; each spawns initial hypotheses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusArea {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl Arbitrary for Hypothesis {
    fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        Self {
            id: format!("h-{:016x}", rng.random::<u64>()),
            parents: Vec::new(),
            title: format!("hypothesis {:04x}", rng.random::<u16>()),
            statement: "a testable statement".to_string(),
            rationale: "a supporting rationale".to_string(),
            testability: "an experimental plan".to_string(),
            method: Method::LiteratureExploration,
            focus_area: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_are_snake_case() {
        assert!(Method::LiteratureExploration.to_string() == "literature_exploration");
        assert!(Method::EvolutionOutOfBox.to_string() == "evolution_out_of_box");
    }

    #[test]
    fn method_display_matches_serde() {
        for method in [
            Method::FocusAreaExploration,
            Method::SimulatedDebate,
            Method::EvolutionCombination,
        ] {
            let json = serde_json::to_value(method).unwrap();
            assert!(json == serde_json::Value::String(method.to_string()));
        }
    }

    #[test]
    fn descend_links_parent() {
        let parent = Hypothesis::random();
        let child = parent.descend("h-child".to_string(), Method::EvolutionSimplification);
        assert!(child.parents == vec![parent.id.clone()]);
        assert!(child.method == Method::EvolutionSimplification);
        assert!(child.id != parent.id);
    }

    #[test]
    fn serde_renames_wire_fields() {
        let h = Hypothesis {
            parents: vec!["h-parent".to_string()],
            ..Hypothesis::random()
        };
        let json = serde_json::to_value(&h).unwrap();
        assert!(json.get("parent_ids").is_some());
        assert!(json.get("generation_method").is_some());
        assert!(json.get("parents").is_none());
    }
}
