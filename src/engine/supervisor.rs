use super::*;
use crate::agents::Capability;
use crate::agents::Registry;
use crate::blackboard::Blackboard;
use crate::blackboard::Statistics;
use crate::model::Model;
use crate::model::Scripted;
use serde_json::Value;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Drives the pipeline through fixed-interval rounds: sleep a quantum,
/// derive statistics, decide termination, refill the queue. The
/// supervisor is the queue's only producer; workers mutate the board
/// and the supervisor only ever reads it between rounds.
pub struct Supervisor {
    config: RunConfig,
    board: Arc<Blackboard>,
    queue: Queue,
    registry: Arc<Registry>,
    model: Arc<dyn Model>,
}

impl Supervisor {
    pub fn new(config: RunConfig, registry: Registry, model: Arc<dyn Model>) -> Self {
        Self {
            queue: Queue::new(config.capacity()),
            board: Arc::new(Blackboard::default()),
            registry: Arc::new(registry),
            model,
            config,
        }
    }

    pub fn board(&self) -> Arc<Blackboard> {
        self.board.clone()
    }

    pub async fn run(self) -> anyhow::Result<RunResult> {
        self.config.validate()?;
        self.registry.validate()?;
        self.board.resume();
        let pool = Pool::spawn(self.config.workers, &self.board, &self.queue, &self.registry);
        self.plan().await;
        let mut last = Statistics::default();
        for iteration in 0..self.config.max_iterations {
            tokio::time::sleep(self.config.quantum).await;
            let stats = self.observe(iteration).await;
            let terminal = self.terminal(&stats, iteration);
            last = stats;
            if terminal {
                log::info!("terminal state reached at iteration {}", iteration);
                break;
            }
            self.refill(&last, iteration).await;
        }
        self.board.halt();
        self.queue.shutdown(pool.len()).await;
        pool.join().await;
        let status = self.review().await;
        Ok(self.report(status, last).await)
    }
}

// round mechanics
impl Supervisor {
    /// parse the goal into a research plan and seed the queue
    async fn plan(&self) {
        let parsed = match self.config.goal.is_empty() {
            true => String::new(),
            false => self
                .model
                .call(&self.plan_prompt())
                .await
                .inspect_err(|e| log::warn!("goal parsing failed: {}", e))
                .unwrap_or_default(),
        };
        self.board
            .put(
                "research_plan_config",
                json!({ "raw_goal": self.config.goal, "parsed_config": parsed }),
            )
            .await;
        if let Err(e) = self.queue.enqueue(Task::InitialGeneration).await {
            log::error!("failed to seed the queue: {}", e);
        }
    }

    fn plan_prompt(&self) -> String {
        format!(
            "Parse the following research goal to derive a research plan \
             configuration:\n\n{}\n\n\
             The configuration should include research objectives, constraints and \
             preferences, evaluation criteria (novelty, correctness, testability), and \
             any domain-specific requirements.",
            self.config.goal,
        )
    }

    /// derive this iteration's statistics and record them on the board
    async fn observe(&self, iteration: usize) -> Statistics {
        let hypotheses = self.board.hypotheses().await;
        let reviews = self.board.reviews().await;
        let tournament = self.board.tournament().await;
        let mut methods = BTreeMap::new();
        for h in &hypotheses {
            *methods.entry(h.method).or_insert(0) += 1;
        }
        let stats = Statistics {
            iteration,
            num_hypotheses: hypotheses.len(),
            num_reviewed: reviews.len(),
            unreviewed: hypotheses
                .iter()
                .filter(|h| !reviews.contains_key(&h.id))
                .map(|h| h.id.clone())
                .collect(),
            tournament_progress: tournament.progress,
            completed_matches: tournament.completed_matches,
            top_ranked: tournament
                .top_ranked
                .iter()
                .take(crate::STATS_TOP_N)
                .cloned()
                .collect(),
            methods,
        };
        self.board.record_stats(iteration, stats.clone()).await;
        log::info!(
            "iteration {}: {} hypotheses, {} reviewed, {:.0}% tournament",
            iteration,
            stats.num_hypotheses,
            stats.num_reviewed,
            stats.tournament_progress * 100.,
        );
        stats
    }

    /// the last iteration always terminates; earlier ones terminate once
    /// enough reviewed, well-ranked hypotheses exist
    fn terminal(&self, stats: &Statistics, iteration: usize) -> bool {
        iteration >= self.config.max_iterations.saturating_sub(1)
            || (stats.num_hypotheses >= crate::TERMINAL_HYPOTHESES
                && stats.num_reviewed >= crate::TERMINAL_REVIEWED
                && stats.top_ranked.len() >= crate::TERMINAL_TOP_RANKED
                && stats.tournament_progress > crate::TERMINAL_PROGRESS)
    }

    /// top up every starved stage of the pipeline
    async fn refill(&self, stats: &Statistics, iteration: usize) {
        let mut tasks = Vec::new();
        if stats.num_hypotheses < self.config.target_hypotheses {
            tasks.push(Task::GenerateHypotheses { count: crate::GENERATION_BATCH });
        }
        tasks.extend(
            stats
                .unreviewed
                .iter()
                .take(crate::REVIEW_BATCH)
                .map(|id| Task::ReviewHypothesis { hypothesis: id.clone() }),
        );
        if stats.tournament_progress < crate::TOURNAMENT_HUNGER {
            tasks.push(Task::RunTournamentMatches { count: crate::MATCH_BATCH });
        }
        tasks.extend(
            stats
                .top_ranked
                .iter()
                .take(crate::EVOLUTION_BATCH)
                .map(|id| Task::EvolveHypothesis { hypothesis: id.clone() }),
        );
        if iteration % crate::PROXIMITY_PERIOD == 0 {
            tasks.push(Task::CalculateProximity);
        }
        for task in tasks {
            if let Err(e) = self.queue.enqueue(task).await {
                log::error!("refill enqueue failed: {}", e);
                break;
            }
        }
    }

    /// invoke the meta-review capability once, after the pool is drained
    async fn review(&self) -> Status {
        let Some(agent) = self.registry.get(Capability::MetaReview) else {
            return Status::Aborted;
        };
        match agent.execute(&Task::GenerateResearchOverview, &self.board).await {
            Ok(outcome) => {
                outcome.settle(&self.board).await;
                Status::Completed
            }
            Err(e) => {
                log::error!("meta review failed: {}", e);
                Status::Aborted
            }
        }
    }

    async fn report(&self, status: Status, statistics: Statistics) -> RunResult {
        let tournament = self.board.tournament().await;
        let mut top = Vec::new();
        for id in tournament.top_ranked.iter().take(crate::STATS_TOP_N) {
            if let Some(hypothesis) = self.board.hypothesis(id).await {
                top.push(Ranked {
                    rating: tournament.ratings.get(id).copied(),
                    hypothesis,
                });
            }
        }
        RunResult {
            status,
            research_overview: self.board.get("research_overview").await.unwrap_or(Value::Null),
            top_hypotheses: top,
            statistics,
        }
    }
}

/// Run a research goal to completion with an explicit registry and
/// model. Validation failures are the only user-visible errors; task
/// failures degrade the output instead.
pub async fn run(
    config: RunConfig,
    registry: Registry,
    model: Arc<dyn Model>,
) -> anyhow::Result<RunResult> {
    Supervisor::new(config, registry, model).run().await
}

/// the standard agents over the deterministic offline model
pub async fn run_default(config: RunConfig) -> anyhow::Result<RunResult> {
    let model: Arc<dyn Model> = Arc::new(Scripted::new(config.model.clone(), config.seed));
    let registry = Registry::standard(model.clone(), config.seed);
    run(config, registry, model).await
}
