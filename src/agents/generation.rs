use super::*;
use crate::blackboard::Blackboard;
use crate::blackboard::FocusArea;
use crate::blackboard::Hypothesis;
use crate::blackboard::Method;
use crate::engine::Task;
use crate::model::Model;
use rand::Rng;
use rand::rngs::SmallRng;
use std::sync::Arc;

/// Generates novel research hypotheses. Initial generation derives focus
/// areas from the goal and seeds two hypotheses per area; later batches
/// cycle through literature exploration, simulated debate, assumptions
/// identification, and research expansion.
pub struct Generation {
    model: Arc<dyn Model>,
    seed: u64,
}

impl Generation {
    const TECHNIQUES: [Method; 4] = [
        Method::LiteratureExploration,
        Method::SimulatedDebate,
        Method::AssumptionsIdentification,
        Method::ResearchExpansion,
    ];

    pub fn new(model: Arc<dyn Model>, seed: u64) -> Self {
        Self { model, seed }
    }

    async fn initial(&self, board: &Blackboard) -> anyhow::Result<Outcome> {
        let goal = board.goal().await;
        if goal.is_empty() {
            return Err(anyhow::anyhow!("empty research goal, nothing to explore"));
        }
        let ref mut rng = stream(self.seed, "generation.initial");
        let response = self.model.call(&self.focus_prompt(&goal)).await?;
        let areas = parse::focus_areas(&response)
            .into_iter()
            .map(|(title, description)| FocusArea {
                id: format!("fa-{:08x}", rng.random::<u32>()),
                title,
                description,
            })
            .collect::<Vec<_>>();
        let mut outcome = Outcome::default();
        for area in &areas {
            let response = self.model.call(&self.area_prompt(&goal, area)).await?;
            for block in parse::blocks(&response) {
                if let Some(h) = self.assemble(&block, rng, Method::FocusAreaExploration, Some(&area.title)) {
                    outcome = outcome.with(Effect::Hypothesis(h));
                }
            }
        }
        log::info!("initial generation: {} areas, {} hypotheses", areas.len(), outcome.effects.len());
        Ok(outcome.with(Effect::FocusAreas(areas)))
    }

    async fn batch(&self, count: usize, board: &Blackboard) -> anyhow::Result<Outcome> {
        let goal = board.goal().await;
        if goal.is_empty() {
            return Err(anyhow::anyhow!("empty research goal, nothing to explore"));
        }
        let existing = board.hypotheses().await;
        let ref mut rng = stream(self.seed, &format!("generation.batch.{}", existing.len()));
        let mut outcome = Outcome::default();
        for i in 0..count {
            let method = Self::TECHNIQUES[i % Self::TECHNIQUES.len()];
            let prompt = match method {
                Method::LiteratureExploration => self.literature_prompt(&goal),
                Method::SimulatedDebate => self.debate_prompt(&goal),
                Method::AssumptionsIdentification => self.assumptions_prompt(&goal),
                _ => self.expansion_prompt(&goal, &existing),
            };
            let response = self.model.call(&prompt).await?;
            if let Some(h) = self.assemble(&response, rng, method, None) {
                outcome = outcome.with(Effect::Hypothesis(h));
            }
        }
        Ok(outcome)
    }

    /// structured hypothesis from one labeled-section block; an
    /// unlabeled response becomes the statement wholesale
    fn assemble(
        &self,
        block: &str,
        rng: &mut SmallRng,
        method: Method,
        focus_area: Option<&str>,
    ) -> Option<Hypothesis> {
        let statement = parse::section(block, "STATEMENT").unwrap_or_else(|| block.trim().to_string());
        if statement.is_empty() {
            return None;
        }
        Some(Hypothesis {
            id: mint(rng),
            parents: Vec::new(),
            title: parse::section(block, "TITLE")
                .unwrap_or_else(|| statement.chars().take(60).collect()),
            statement,
            rationale: parse::section(block, "RATIONALE").unwrap_or_default(),
            testability: parse::section(block, "TESTABILITY").unwrap_or_default(),
            method,
            focus_area: focus_area.map(String::from),
        })
    }
}

// prompt templates
impl Generation {
    const FORMAT: &'static str = "FORMAT:\nTITLE: ...\nSTATEMENT: ...\nRATIONALE: ...\nTESTABILITY: ...";

    fn focus_prompt(&self, goal: &str) -> String {
        format!(
            "Based on the following research goal:\n\n{}\n\n\
             Generate 3-5 initial focus areas for exploration, each with a brief description.\n\n\
             FORMAT:\nFOCUS AREA: ...\nDESCRIPTION: ...",
            goal,
        )
    }

    fn area_prompt(&self, goal: &str, area: &FocusArea) -> String {
        format!(
            "For the research goal:\n\n{}\n\n\
             Generate 2 novel research hypotheses for the following focus area:\n\n\
             FOCUS AREA: {}\nDESCRIPTION: {}\n\n\
             For each hypothesis provide a clear statement, its rationale and background, \
             and how it could be tested experimentally.\n\n{}",
            goal, area.title, area.description, Self::FORMAT,
        )
    }

    fn literature_prompt(&self, goal: &str) -> String {
        format!(
            "For the research goal:\n\n{}\n\n\
             Identify relevant search queries, summarize the key findings a literature \
             search would surface, and generate a novel research hypothesis that builds \
             on existing literature, addresses a gap in current knowledge, and is \
             testable and falsifiable.\n\n{}",
            goal, Self::FORMAT,
        )
    }

    fn debate_prompt(&self, goal: &str) -> String {
        format!(
            "For the research goal:\n\n{}\n\n\
             Simulate a scientific debate among three experts with different \
             perspectives: an initial hypothesis, critiques, defenses, and a final \
             synthesis that incorporates the best elements of the debate. Report only \
             the refined hypothesis that emerges.\n\n{}",
            goal, Self::FORMAT,
        )
    }

    fn assumptions_prompt(&self, goal: &str) -> String {
        format!(
            "For the research goal:\n\n{}\n\n\
             Identify 3-5 testable assumptions that would contribute to the goal, assess \
             the plausibility of each, and combine the most plausible into a coherent \
             hypothesis.\n\n{}",
            goal, Self::FORMAT,
        )
    }

    fn expansion_prompt(&self, goal: &str, existing: &[Hypothesis]) -> String {
        let summaries = existing
            .iter()
            .take(5)
            .map(|h| format!("- {}: {}", h.title, h.statement))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "For the research goal:\n\n{}\n\n\
             Consider the following existing hypotheses:\n\n{}\n\n\
             Generate a novel research hypothesis that explores an area they do not \
             cover, from a different approach or perspective, and is testable and \
             falsifiable.\n\n{}",
            goal, summaries, Self::FORMAT,
        )
    }
}

#[async_trait::async_trait]
impl Agent for Generation {
    async fn execute(&self, task: &Task, board: &Blackboard) -> anyhow::Result<Outcome> {
        match task {
            Task::InitialGeneration => self.initial(board).await,
            Task::GenerateHypotheses { count } => self.batch(*count, board).await,
            _ => Err(anyhow::anyhow!("unsupported task for generation: {}", task)),
        }
    }
}
