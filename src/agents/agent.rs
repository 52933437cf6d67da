use super::Evolution;
use super::Generation;
use super::MetaReview;
use super::Proximity;
use super::Ranking;
use super::Reflection;
use crate::blackboard::Blackboard;
use crate::blackboard::FocusArea;
use crate::blackboard::Hypothesis;
use crate::blackboard::ProximityGraph;
use crate::blackboard::Review;
use crate::engine::Task;
use crate::model::Model;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// a named operation a registered agent can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Generation,
    Reflection,
    Ranking,
    Proximity,
    Evolution,
    MetaReview,
}

impl Capability {
    pub const ALL: [Self; 6] = [
        Self::Generation,
        Self::Reflection,
        Self::Ranking,
        Self::Proximity,
        Self::Evolution,
        Self::MetaReview,
    ];
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Generation => write!(f, "generation"),
            Self::Reflection => write!(f, "reflection"),
            Self::Ranking => write!(f, "ranking"),
            Self::Proximity => write!(f, "proximity"),
            Self::Evolution => write!(f, "evolution"),
            Self::MetaReview => write!(f, "meta_review"),
        }
    }
}

/// One entry of an agent's result map. Workers apply these through the
/// blackboard's typed mutators; anything else goes through scalar put.
#[derive(Debug, Clone)]
pub enum Effect {
    Hypothesis(Hypothesis),
    FocusAreas(Vec<FocusArea>),
    Review(Review),
    Proximity(ProximityGraph),
    Scalar(String, Value),
}

/// ordered result map returned by one agent execution
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub effects: Vec<Effect>,
}

impl From<Vec<Effect>> for Outcome {
    fn from(effects: Vec<Effect>) -> Self {
        Self { effects }
    }
}

impl Outcome {
    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Route each result-map entry through the board's typed mutators;
    /// anything unclaimed lands in the scalar key space. Conflicts are
    /// logged as bugs and the run continues.
    pub async fn settle(self, board: &Blackboard) {
        for effect in self.effects {
            match effect {
                Effect::Hypothesis(h) => {
                    if let Err(e) = board.append_hypothesis(h).await {
                        log::error!("blackboard conflict: {}", e);
                    }
                }
                Effect::Review(review) => board.mark_reviewed(review).await,
                Effect::Proximity(graph) => board.install_proximity(graph).await,
                Effect::FocusAreas(areas) => {
                    board.put("focus_areas", serde_json::json!(areas)).await
                }
                Effect::Scalar(key, value) => board.put(&key, value).await,
            }
        }
    }
}

/// One cognitive operation over the blackboard. Implementations must be
/// re-entrant and keep no state between calls beyond their model handle
/// and seed; the pool may run several tasks of one capability at once.
#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    async fn execute(&self, task: &Task, board: &Blackboard) -> anyhow::Result<Outcome>;
}

/// capability name -> agent implementation
#[derive(Clone, Default)]
pub struct Registry {
    agents: BTreeMap<Capability, Arc<dyn Agent>>,
}

impl Registry {
    pub fn register(mut self, capability: Capability, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(capability, agent);
        self
    }

    pub fn get(&self, capability: Capability) -> Option<Arc<dyn Agent>> {
        self.agents.get(&capability).cloned()
    }

    /// every capability must be covered before the pool starts
    pub fn validate(&self) -> anyhow::Result<()> {
        match Capability::ALL.iter().find(|c| !self.agents.contains_key(c)) {
            Some(missing) => Err(anyhow::anyhow!("agent registry incomplete: {}", missing)),
            None => Ok(()),
        }
    }

    /// the standard six agents wired over one model handle
    pub fn standard(model: Arc<dyn Model>, seed: u64) -> Self {
        Self::default()
            .register(Capability::Generation, Arc::new(Generation::new(model.clone(), seed)))
            .register(Capability::Reflection, Arc::new(Reflection::new(model.clone(), seed)))
            .register(Capability::Ranking, Arc::new(Ranking::new(model.clone(), seed)))
            .register(Capability::Proximity, Arc::new(Proximity::new(seed)))
            .register(Capability::Evolution, Arc::new(Evolution::new(model.clone(), seed)))
            .register(Capability::MetaReview, Arc::new(MetaReview::new(model, seed)))
    }
}
