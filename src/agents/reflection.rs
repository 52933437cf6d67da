use super::*;
use crate::blackboard::Blackboard;
use crate::blackboard::Hypothesis;
use crate::blackboard::Review;
use crate::engine::Task;
use crate::model::Model;
use std::sync::Arc;

/// Reviews hypotheses through a staged critique: a cheap initial review
/// gates the full review, deep verification, and observation stages.
/// Passing the gating stages admits the hypothesis to the tournament.
pub struct Reflection {
    model: Arc<dyn Model>,
    #[allow(dead_code)]
    seed: u64,
}

impl Reflection {
    pub fn new(model: Arc<dyn Model>, seed: u64) -> Self {
        Self { model, seed }
    }

    async fn review(&self, id: &str, board: &Blackboard) -> anyhow::Result<Outcome> {
        let hypothesis = board
            .hypothesis(id)
            .await
            .ok_or_else(|| anyhow::anyhow!("hypothesis {} not found", id))?;
        let initial = self.judge(&self.initial_prompt(&hypothesis), Self::INITIAL_CRITERIA).await?;
        let review = match initial.passed {
            false => Review::rejected(hypothesis.id.clone(), initial),
            true => Review::completed(
                hypothesis.id.clone(),
                initial,
                self.judge(&self.full_prompt(&hypothesis), Self::FULL_CRITERIA).await?,
                self.judge(&self.deep_prompt(&hypothesis), Self::DEEP_CRITERIA).await?,
                Some(self.judge(&self.observation_prompt(&hypothesis), Self::OBSERVATION_CRITERIA).await?),
            ),
        };
        log::debug!("reviewed {}: passed={}", id, review.passed);
        Ok(Outcome::default().with(Effect::Review(review)))
    }

    async fn judge(
        &self,
        prompt: &str,
        criteria: &[&str],
    ) -> anyhow::Result<crate::blackboard::Stage> {
        let response = self.model.call(prompt).await?;
        Ok(parse::stage(&response, criteria))
    }
}

// prompt templates
impl Reflection {
    const INITIAL_CRITERIA: &'static [&'static str] = &["CORRECTNESS", "QUALITY", "NOVELTY", "SAFETY"];
    const FULL_CRITERIA: &'static [&'static str] = &["CORRECTNESS", "QUALITY", "NOVELTY"];
    const DEEP_CRITERIA: &'static [&'static str] = &["ASSUMPTIONS"];
    const OBSERVATION_CRITERIA: &'static [&'static str] = &["OBSERVATIONS"];

    fn format_for(criteria: &[&str]) -> String {
        let mut lines = criteria
            .iter()
            .map(|name| format!("{}: <score 1-5> - <assessment>", name))
            .collect::<Vec<_>>();
        lines.push("OVERALL: ...".to_string());
        lines.push("PASSED: yes|no".to_string());
        format!("FORMAT:\n{}", lines.join("\n"))
    }

    fn initial_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Perform an initial review of the following hypothesis:\n\n{}\n\n\
             Assess correctness, quality, novelty, and safety, each scored 1-5, and \
             conclude with whether the hypothesis passes the initial review.\n\n{}",
            h.statement,
            Self::format_for(Self::INITIAL_CRITERIA),
        )
    }

    fn full_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Perform a full review of the following hypothesis against the relevant \
             literature:\n\nSTATEMENT: {}\nRATIONALE: {}\n\n\
             Assess correctness with literature support, quality with strengths and \
             weaknesses, and novelty against known work.\n\n{}",
            h.statement,
            h.rationale,
            Self::format_for(Self::FULL_CRITERIA),
        )
    }

    fn deep_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Perform a deep verification review of the following hypothesis:\n\n{}\n\n\
             Decompose it into its assumptions and sub-assumptions, verify each, and \
             judge whether any incorrect assumption is fundamental.\n\n{}",
            h.statement,
            Self::format_for(Self::DEEP_CRITERIA),
        )
    }

    fn observation_prompt(&self, h: &Hypothesis) -> String {
        format!(
            "Assess whether the following hypothesis accounts for existing observations \
             reported in the literature, and whether it provides a better explanation \
             than current theory:\n\n{}\n\n{}",
            h.statement,
            Self::format_for(Self::OBSERVATION_CRITERIA),
        )
    }
}

#[async_trait::async_trait]
impl Agent for Reflection {
    async fn execute(&self, task: &Task, board: &Blackboard) -> anyhow::Result<Outcome> {
        match task {
            Task::ReviewHypothesis { hypothesis } => self.review(hypothesis, board).await,
            _ => Err(anyhow::anyhow!("unsupported task for reflection: {}", task)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::model::Model;
    use crate::model::ModelConfig;
    use crate::model::Scripted;

    fn agent(seed: u64) -> Reflection {
        Reflection::new(Arc::new(Scripted::new(ModelConfig::default(), seed)), seed)
    }

    #[tokio::test]
    async fn review_of_known_hypothesis_lands_on_the_board() {
        let board = Blackboard::default();
        let hypothesis = Hypothesis::random();
        let id = hypothesis.id.clone();
        board.append_hypothesis(hypothesis).await.unwrap();
        let task = Task::ReviewHypothesis { hypothesis: id.clone() };
        let outcome = agent(1).execute(&task, &board).await.unwrap();
        match &outcome.effects[..] {
            [Effect::Review(review)] => {
                assert!(review.hypothesis == id);
                assert!(review.passed);
                assert!(review.full.is_some());
                assert!(review.deep_verification.is_some());
            }
            other => panic!("unexpected effects: {:?}", other.len()),
        }
    }

    #[tokio::test]
    async fn review_of_missing_hypothesis_is_an_error() {
        let board = Blackboard::default();
        let task = Task::ReviewHypothesis { hypothesis: "h-missing".to_string() };
        assert!(agent(1).execute(&task, &board).await.is_err());
    }

    /// model whose reviews always fail the initial stage
    struct Harsh;

    #[async_trait::async_trait]
    impl Model for Harsh {
        async fn call(&self, _: &str) -> anyhow::Result<String> {
            Ok("CORRECTNESS: 1 - unsound\nOVERALL: rejected\nPASSED: no".to_string())
        }
    }

    #[tokio::test]
    async fn failed_initial_review_skips_later_stages() {
        let board = Blackboard::default();
        let hypothesis = Hypothesis::random();
        let id = hypothesis.id.clone();
        board.append_hypothesis(hypothesis).await.unwrap();
        let agent = Reflection::new(Arc::new(Harsh), 0);
        let task = Task::ReviewHypothesis { hypothesis: id };
        let outcome = agent.execute(&task, &board).await.unwrap();
        match &outcome.effects[..] {
            [Effect::Review(review)] => {
                assert!(!review.passed);
                assert!(review.full.is_none());
                assert!(review.deep_verification.is_none());
                assert!(review.observation.is_none());
            }
            _ => panic!("expected a single review effect"),
        }
    }
}
