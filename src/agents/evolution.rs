use super::*;
use crate::blackboard::Blackboard;
use crate::blackboard::Hypothesis;
use crate::blackboard::Method;
use crate::engine::Task;
use crate::model::Model;
use std::sync::Arc;

/// Refines existing hypotheses into new ones. One of four techniques is
/// drawn per task: grounding in literature, coherence and feasibility
/// improvement, simplification, or out-of-box reframing. Evolved
/// hypotheses are fresh entries that reference their parents; the
/// originals are never touched.
pub struct Evolution {
    model: Arc<dyn Model>,
    seed: u64,
}

impl Evolution {
    const TECHNIQUES: [Method; 4] = [
        Method::EvolutionEnhanceGrounding,
        Method::EvolutionImproveFeasibility,
        Method::EvolutionSimplification,
        Method::EvolutionOutOfBox,
    ];

    pub fn new(model: Arc<dyn Model>, seed: u64) -> Self {
        Self { model, seed }
    }

    async fn evolve(&self, id: &str, board: &Blackboard) -> anyhow::Result<Outcome> {
        let parent = board
            .hypothesis(id)
            .await
            .ok_or_else(|| anyhow::anyhow!("hypothesis {} not found", id))?;
        let generation = board.hypotheses().await.len();
        let ref mut rng = stream(self.seed, &format!("evolution.{}.{}", id, generation));
        let method = {
            use rand::prelude::IndexedRandom;
            *Self::TECHNIQUES.choose(rng).expect("non-empty")
        };
        let prompt = match method {
            Method::EvolutionEnhanceGrounding => self.grounding_prompt(&parent),
            Method::EvolutionImproveFeasibility => self.feasibility_prompt(&parent),
            Method::EvolutionSimplification => self.simplification_prompt(&parent),
            _ => self.reframing_prompt(&parent),
        };
        let response = self.model.call(&prompt).await?;
        let child = self.assemble(&response, &parent, mint(rng), method);
        log::debug!("evolved {} -> {} via {}", parent.id, child.id, method);
        Ok(Outcome::default()
            .with(Effect::Hypothesis(child))
            .with(Effect::Scalar(
                "evolution_technique".to_string(),
                serde_json::json!(method),
            )))
    }

    async fn combine(&self, ids: &[String], board: &Blackboard) -> anyhow::Result<Outcome> {
        if ids.len() < 2 {
            return Err(anyhow::anyhow!("need at least 2 hypotheses to combine"));
        }
        let mut parents = Vec::new();
        for id in ids {
            parents.push(
                board
                    .hypothesis(id)
                    .await
                    .ok_or_else(|| anyhow::anyhow!("hypothesis {} not found", id))?,
            );
        }
        let generation = board.hypotheses().await.len();
        let ref mut rng = stream(self.seed, &format!("evolution.combine.{}", generation));
        let response = self.model.call(&self.combination_prompt(&parents)).await?;
        let mut child = self.assemble(&response, &parents[0], mint(rng), Method::EvolutionCombination);
        child.parents = ids.to_vec();
        Ok(Outcome::default().with(Effect::Hypothesis(child)))
    }

    /// evolved hypothesis from a labeled-section response, falling back
    /// to the parent's sections where the model left one out
    fn assemble(
        &self,
        response: &str,
        parent: &Hypothesis,
        id: String,
        method: Method,
    ) -> Hypothesis {
        let mut child = parent.descend(id, method);
        child.title = parse::section(response, "TITLE")
            .unwrap_or_else(|| format!("{}: {}", Self::label(method), parent.title));
        if let Some(statement) = parse::section(response, "STATEMENT") {
            child.statement = statement;
        }
        if let Some(rationale) = parse::section(response, "RATIONALE") {
            child.rationale = rationale;
        }
        if let Some(testability) = parse::section(response, "TESTABILITY") {
            child.testability = testability;
        }
        child
    }

    fn label(method: Method) -> &'static str {
        match method {
            Method::EvolutionEnhanceGrounding => "Enhanced",
            Method::EvolutionImproveFeasibility => "More feasible",
            Method::EvolutionSimplification => "Simplified",
            Method::EvolutionCombination => "Combined",
            _ => "Reframed",
        }
    }
}

// prompt templates
impl Evolution {
    const FORMAT: &'static str = "FORMAT:\nTITLE: ...\nSTATEMENT: ...\nRATIONALE: ...\nTESTABILITY: ...";

    fn grounding_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Enhance the following research hypothesis through grounding in literature:\n\n\
             STATEMENT: {}\nRATIONALE: {}\n\n\
             Identify weaknesses or gaps, find supporting literature, and elaborate \
             details to fill reasoning gaps. Provide the enhanced version.\n\n{}",
            h.statement, h.rationale, Self::FORMAT,
        )
    }

    fn feasibility_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Improve the coherence, practicality, and feasibility of the following \
             research hypothesis:\n\n\
             STATEMENT: {}\nRATIONALE: {}\nTESTABILITY: {}\n\n\
             Clarify unclear relationships, consider resource constraints, and suggest \
             more accessible experimental approaches.\n\n{}",
            h.statement, h.rationale, h.testability, Self::FORMAT,
        )
    }

    fn simplification_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Simplify the following research hypothesis for easier verification and \
             testing while preserving its core claim:\n\n\
             STATEMENT: {}\nTESTABILITY: {}\n\n{}",
            h.statement, h.testability, Self::FORMAT,
        )
    }

    fn reframing_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Reframe the following research hypothesis with out-of-box thinking: take \
             its core question and approach it from an unexpected direction.\n\n\
             STATEMENT: {}\n\n{}",
            h.statement, Self::FORMAT,
        )
    }

    fn combination_prompt(&self, parents: &[Hypothesis]) -> String {
        let listed = parents
            .iter()
            .map(|h| format!("- {}: {}", h.title, h.statement))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Combine the following research hypotheses into a single stronger one that \
             preserves the best elements of each:\n\n{}\n\n{}",
            listed,
            Self::FORMAT,
        )
    }
}

#[async_trait::async_trait]
impl Agent for Evolution {
    async fn execute(&self, task: &Task, board: &Blackboard) -> anyhow::Result<Outcome> {
        match task {
            Task::EvolveHypothesis { hypothesis } => self.evolve(hypothesis, board).await,
            Task::CombineHypotheses { hypotheses } => self.combine(hypotheses, board).await,
            _ => Err(anyhow::anyhow!("unsupported task for evolution: {}", task)),
        }
    }
}
