use crate::Rating;
use crate::blackboard::Hypothesis;
use crate::blackboard::Statistics;
use crate::model::ModelConfig;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// everything a run needs, as assembled by the CLI or a caller
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub goal: String,
    pub max_iterations: usize,
    pub workers: usize,
    pub model: ModelConfig,
    pub seed: u64,
    pub quantum: Duration,
    pub target_hypotheses: usize,
    pub queue_capacity: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            goal: String::new(),
            max_iterations: 10,
            workers: 5,
            model: ModelConfig::default(),
            seed: 0,
            quantum: Duration::from_secs(2),
            target_hypotheses: crate::TARGET_HYPOTHESES,
            queue_capacity: None,
        }
    }
}

impl RunConfig {
    /// user-facing validation, fatal at entry
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            anyhow::bail!("invalid worker count: need at least 1");
        }
        if self.max_iterations == 0 {
            anyhow::bail!("invalid iteration count: need at least 1");
        }
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or(crate::QUEUE_CAPACITY_PER_WORKER * self.workers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Completed,
    Aborted,
}

/// a hypothesis as exposed in the final result, with its rating if ranked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked {
    #[serde(flatten)]
    pub hypothesis: Hypothesis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// the combined result returned by the entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: Status,
    pub research_overview: Value,
    pub top_hypotheses: Vec<Ranked>,
    pub statistics: Statistics,
}
