use super::*;
use crate::blackboard::Blackboard;
use crate::blackboard::Hypothesis;
use crate::engine::Task;
use crate::model::Model;
use crate::tournament::MatchKind;
use crate::tournament::Selector;
use std::sync::Arc;

/// Runs batches of pairwise tournament matches over reviewed hypotheses.
/// High-rated pairs argue through a multi-turn scientific debate; the
/// rest get a single-turn comparison. Every decided match moves both
/// Elo ratings in one serialized transition on the blackboard.
pub struct Ranking {
    model: Arc<dyn Model>,
    seed: u64,
}

impl Ranking {
    pub fn new(model: Arc<dyn Model>, seed: u64) -> Self {
        Self { model, seed }
    }

    async fn matches(&self, count: usize, board: &Blackboard) -> anyhow::Result<Outcome> {
        let eligible = board.eligible().await;
        if eligible.len() < 2 {
            return Err(anyhow::anyhow!("not enough reviewed hypotheses for tournament"));
        }
        board
            .update_tournament(|mut t| {
                eligible.iter().for_each(|id| t.admit(id));
                t.refresh(eligible.len());
                t
            })
            .await;
        let graph = board.proximity().await;
        let mut played = 0;
        for _ in 0..count {
            let state = board.tournament().await;
            let ref mut rng = stream(self.seed, &format!("ranking.{}", state.completed_matches));
            let Some((a, b)) = Selector::new(&state, &graph).pair(&eligible, rng) else {
                break;
            };
            let (Some(first), Some(second)) =
                (board.hypothesis(&a).await, board.hypothesis(&b).await)
            else {
                log::error!("eligible id missing from hypothesis list: {} or {}", a, b);
                break;
            };
            let kind = state.kind(&a, &b);
            let prompt = match kind {
                MatchKind::Debate => self.debate_prompt(&first, &second),
                MatchKind::Simple => self.simple_prompt(&first, &second),
            };
            let response = self.model.call(&prompt).await?;
            let side = parse::winner(&response).unwrap_or_else(|| {
                use rand::Rng;
                match rng.random_bool(0.5) {
                    true => parse::Side::A,
                    false => parse::Side::B,
                }
            });
            let winner = match side {
                parse::Side::A => a.clone(),
                parse::Side::B => b.clone(),
            };
            board
                .update_tournament(|mut t| {
                    t.record(&a, &b, &winner, kind);
                    t.refresh(eligible.len());
                    t
                })
                .await;
            played += 1;
        }
        log::debug!("ranking batch: {} of {} matches played", played, count);
        Ok(Outcome::default().with(Effect::Scalar(
            "matches_played".to_string(),
            serde_json::json!(played),
        )))
    }

    /// recompute the ranking without running new matches
    async fn rerank(&self, board: &Blackboard) -> anyhow::Result<Outcome> {
        let eligible = board.eligible().await;
        board
            .update_tournament(|mut t| {
                t.refresh(eligible.len());
                t
            })
            .await;
        Ok(Outcome::default())
    }
}

// prompt templates
impl Ranking {
    const VERDICT: &'static str = "DECISION: judge novelty, correctness, testability, and \
                                   alignment with the research goal.\n\n\
                                   FORMAT:\nWINNER: A|B\nREASONING: ...";

    fn simple_prompt(&self, a: &Hypothesis, b: &Hypothesis) -> String {
        format!(
            "Compare the following two research hypotheses:\n\n\
             HYPOTHESIS A:\n{}\n\nHYPOTHESIS B:\n{}\n\n{}",
            a.statement, b.statement, Self::VERDICT,
        )
    }

    fn debate_prompt(&self, a: &Hypothesis, b: &Hypothesis) -> String {
        format!(
            "Compare the following two research hypotheses through a scientific debate:\n\n\
             HYPOTHESIS A:\n{}\n\nHYPOTHESIS B:\n{}\n\n\
             Round 1: each advocate presents strengths of their hypothesis and \
             weaknesses of the other.\n\
             Round 2: each advocate addresses the critiques and reinforces merits.\n\
             Round 3: synthesis and final arguments.\n\n{}",
            a.statement, b.statement, Self::VERDICT,
        )
    }
}

#[async_trait::async_trait]
impl Agent for Ranking {
    async fn execute(&self, task: &Task, board: &Blackboard) -> anyhow::Result<Outcome> {
        match task {
            Task::RunTournamentMatches { count } => self.matches(*count, board).await,
            Task::UpdateRankings => self.rerank(board).await,
            _ => Err(anyhow::anyhow!("unsupported task for ranking: {}", task)),
        }
    }
}
