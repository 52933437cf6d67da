use super::*;
use crate::blackboard::Blackboard;
use crate::blackboard::Hypothesis;
use crate::engine::Task;
use crate::model::Model;
use std::sync::Arc;

/// Synthesizes the final research overview from the top-ranked
/// hypotheses once the supervisor decides the run is over. Invoked
/// exactly once per run, after the pool has drained.
pub struct MetaReview {
    model: Arc<dyn Model>,
    #[allow(dead_code)]
    seed: u64,
}

impl MetaReview {
    pub fn new(model: Arc<dyn Model>, seed: u64) -> Self {
        Self { model, seed }
    }

    async fn overview(&self, board: &Blackboard) -> anyhow::Result<Outcome> {
        let goal = board.goal().await;
        let state = board.tournament().await;
        let mut top = Vec::new();
        for id in state.top_ranked.iter().take(crate::STATS_TOP_N) {
            if let Some(hypothesis) = board.hypothesis(id).await {
                top.push(hypothesis);
            }
        }
        let summary = match top.is_empty() {
            true => "No hypotheses survived review; the research goal needs refinement.".to_string(),
            false => {
                let response = self.model.call(&self.overview_prompt(&goal, &top)).await?;
                parse::section(&response, "SUMMARY").unwrap_or(response)
            }
        };
        let overview = serde_json::json!({
            "goal": goal,
            "summary": summary,
            "top_hypotheses": top.iter().map(|h| h.id.clone()).collect::<Vec<_>>(),
            "num_ranked": state.top_ranked.len(),
        });
        Ok(Outcome::default().with(Effect::Scalar("research_overview".to_string(), overview)))
    }

    fn overview_prompt(&self, goal: &str, top: &[Hypothesis]) -> String {
        let listed = top
            .iter()
            .map(|h| format!("- {}: {}", h.title, h.statement))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Generate a research overview for the goal:\n\n{}\n\n\
             Synthesize the top-ranked hypotheses below into common themes, the most \
             promising directions, and the experiments to run first.\n\n{}\n\n\
             FORMAT:\nSUMMARY: ...\nTHEMES: ...\nNEXT EXPERIMENTS: ...",
            goal, listed,
        )
    }
}

#[async_trait::async_trait]
impl Agent for MetaReview {
    async fn execute(&self, task: &Task, board: &Blackboard) -> anyhow::Result<Outcome> {
        match task {
            Task::GenerateResearchOverview => self.overview(board).await,
            _ => Err(anyhow::anyhow!("unsupported task for meta review: {}", task)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::model::ModelConfig;
    use crate::model::Scripted;

    fn agent(seed: u64) -> MetaReview {
        MetaReview::new(Arc::new(Scripted::new(ModelConfig::default(), seed)), seed)
    }

    fn scalar(outcome: &Outcome) -> serde_json::Value {
        match &outcome.effects[..] {
            [Effect::Scalar(key, value)] if key == "research_overview" => value.clone(),
            _ => panic!("expected a research_overview scalar"),
        }
    }

    #[tokio::test]
    async fn empty_board_yields_a_degenerate_overview() {
        let board = Blackboard::default();
        let outcome = agent(1).execute(&Task::GenerateResearchOverview, &board).await.unwrap();
        let overview = scalar(&outcome);
        assert!(overview["top_hypotheses"].as_array().unwrap().is_empty());
        assert!(!overview["summary"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn overview_lists_the_ranked_ids() {
        let board = Blackboard::default();
        let hypothesis = Hypothesis::random();
        let id = hypothesis.id.clone();
        board.append_hypothesis(hypothesis).await.unwrap();
        board
            .update_tournament(|mut t| {
                t.admit(&id);
                t.refresh(1);
                t
            })
            .await;
        let outcome = agent(2).execute(&Task::GenerateResearchOverview, &board).await.unwrap();
        let overview = scalar(&outcome);
        assert!(overview["top_hypotheses"] == serde_json::json!([id]));
        assert!(overview["num_ranked"] == serde_json::json!(1));
    }
}
