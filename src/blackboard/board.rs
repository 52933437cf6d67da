use super::*;
use crate::tournament::TournamentState;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

/// Shared state store mediating all inter-agent communication.
/// Each section sits behind its own lock; readers receive cloned
/// snapshots that are safe to inspect without further locking, and the
/// tournament mutator serializes all rating transitions through a single
/// critical section. Lives only for the duration of a run.
#[derive(Debug, Default)]
pub struct Blackboard {
    hypotheses: RwLock<Vec<Hypothesis>>,
    reviews: RwLock<BTreeMap<HypothesisId, Review>>,
    tournament: Mutex<TournamentState>,
    proximity: RwLock<ProximityGraph>,
    stats: RwLock<BTreeMap<usize, Statistics>>,
    scalars: RwLock<BTreeMap<String, Value>>,
    running: AtomicBool,
}

// scalar key space
impl Blackboard {
    /// replace a whole scalar value
    pub async fn put(&self, key: &str, value: Value) {
        self.scalars.write().await.insert(key.to_string(), value);
    }

    /// snapshot read of a scalar value
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.scalars.read().await.get(key).cloned()
    }

    /// raw research goal, as stored by the supervisor's planning call
    pub async fn goal(&self) -> String {
        self.get("research_plan_config")
            .await
            .and_then(|config| config.get("raw_goal").cloned())
            .and_then(|goal| goal.as_str().map(String::from))
            .unwrap_or_default()
    }
}

// hypothesis list
impl Blackboard {
    /// insert a new hypothesis; id collisions are rejected
    pub async fn append_hypothesis(&self, hypothesis: Hypothesis) -> anyhow::Result<()> {
        let mut hypotheses = self.hypotheses.write().await;
        match hypotheses.iter().any(|h| h.id == hypothesis.id) {
            true => Err(anyhow::anyhow!("hypothesis id collision: {}", hypothesis.id)),
            false => Ok(hypotheses.push(hypothesis)),
        }
    }

    /// immutable ordered snapshot
    pub async fn hypotheses(&self) -> Vec<Hypothesis> {
        self.hypotheses.read().await.clone()
    }

    pub async fn hypothesis(&self, id: &str) -> Option<Hypothesis> {
        self.hypotheses.read().await.iter().find(|h| h.id == id).cloned()
    }
}

// review set
impl Blackboard {
    /// Idempotent on membership: re-marking an id keeps the review that
    /// was recorded first.
    pub async fn mark_reviewed(&self, review: Review) {
        self.reviews
            .write()
            .await
            .entry(review.hypothesis.clone())
            .or_insert(review);
    }

    pub async fn reviews(&self) -> BTreeMap<HypothesisId, Review> {
        self.reviews.read().await.clone()
    }

    /// ids whose review passed every gating stage
    pub async fn eligible(&self) -> Vec<HypothesisId> {
        self.reviews
            .read()
            .await
            .values()
            .filter(|r| r.passed)
            .map(|r| r.hypothesis.clone())
            .collect()
    }
}

// tournament state
impl Blackboard {
    /// Read-modify-write under the tournament's exclusive lock. The
    /// closure receives a copy of the current state and returns the next
    /// one; concurrent readers never observe a partial transition.
    pub async fn update_tournament<F>(&self, transition: F) -> TournamentState
    where
        F: FnOnce(TournamentState) -> TournamentState,
    {
        let mut tournament = self.tournament.lock().await;
        *tournament = transition(tournament.clone());
        tournament.clone()
    }

    pub async fn tournament(&self) -> TournamentState {
        self.tournament.lock().await.clone()
    }
}

// proximity graph
impl Blackboard {
    /// replaced wholesale by the proximity capability
    pub async fn install_proximity(&self, graph: ProximityGraph) {
        *self.proximity.write().await = graph;
    }

    pub async fn proximity(&self) -> ProximityGraph {
        self.proximity.read().await.clone()
    }
}

// iteration statistics
impl Blackboard {
    /// keyed by iteration; rewriting an iteration overwrites
    pub async fn record_stats(&self, iteration: usize, stats: Statistics) {
        self.stats.write().await.insert(iteration, stats);
    }

    pub async fn stats(&self, iteration: usize) -> Option<Statistics> {
        self.stats.read().await.get(&iteration).cloned()
    }

    pub async fn all_stats(&self) -> BTreeMap<usize, Statistics> {
        self.stats.read().await.clone()
    }
}

// cooperative shutdown flag
impl Blackboard {
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn resume(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    pub fn halt(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;

    fn review(id: &str, passed: bool, overall: &str) -> Review {
        let stage = Stage {
            criteria: BTreeMap::new(),
            overall: overall.to_string(),
            passed,
        };
        match passed {
            true => Review::completed(id.to_string(), stage.clone(), stage.clone(), stage, None),
            false => Review::rejected(id.to_string(), stage),
        }
    }

    #[tokio::test]
    async fn append_rejects_id_collision() {
        let board = Blackboard::default();
        let hypothesis = Hypothesis::random();
        assert!(board.append_hypothesis(hypothesis.clone()).await.is_ok());
        assert!(board.append_hypothesis(hypothesis).await.is_err());
        assert!(board.hypotheses().await.len() == 1);
    }

    #[tokio::test]
    async fn mark_reviewed_is_idempotent() {
        let board = Blackboard::default();
        board.mark_reviewed(review("h-1", true, "first")).await;
        board.mark_reviewed(review("h-1", false, "second")).await;
        let reviews = board.reviews().await;
        assert!(reviews.len() == 1);
        assert!(reviews.get("h-1").unwrap().initial.overall == "first");
        assert!(reviews.get("h-1").unwrap().passed);
    }

    #[tokio::test]
    async fn eligible_filters_failed_reviews() {
        let board = Blackboard::default();
        board.mark_reviewed(review("h-1", true, "")).await;
        board.mark_reviewed(review("h-2", false, "")).await;
        assert!(board.eligible().await == vec!["h-1".to_string()]);
    }

    #[tokio::test]
    async fn snapshots_are_isolated_from_later_writes() {
        let board = Blackboard::default();
        board.append_hypothesis(Hypothesis::random()).await.unwrap();
        let snapshot = board.hypotheses().await;
        board.append_hypothesis(Hypothesis::random()).await.unwrap();
        assert!(snapshot.len() == 1);
        assert!(board.hypotheses().await.len() == 2);
    }

    #[tokio::test]
    async fn tournament_transition_is_applied_atomically() {
        let board = Blackboard::default();
        let state = board
            .update_tournament(|mut t| {
                t.admit("h-1");
                t.admit("h-2");
                t
            })
            .await;
        assert!(state.ratings.len() == 2);
        assert!(board.tournament().await.ratings.len() == 2);
    }

    #[tokio::test]
    async fn stats_rewrite_overwrites_iteration() {
        let board = Blackboard::default();
        let first = Statistics {
            iteration: 0,
            num_hypotheses: 1,
            ..Statistics::default()
        };
        let second = Statistics {
            iteration: 0,
            num_hypotheses: 2,
            ..Statistics::default()
        };
        board.record_stats(0, first).await;
        board.record_stats(0, second).await;
        assert!(board.stats(0).await.unwrap().num_hypotheses == 2);
        assert!(board.all_stats().await.len() == 1);
    }

    #[tokio::test]
    async fn scalar_put_replaces_whole_value() {
        let board = Blackboard::default();
        board.put("k", serde_json::json!({"a": 1})).await;
        board.put("k", serde_json::json!({"b": 2})).await;
        assert!(board.get("k").await == Some(serde_json::json!({"b": 2})));
        assert!(board.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn goal_reads_research_plan_config() {
        let board = Blackboard::default();
        assert!(board.goal().await.is_empty());
        board
            .put(
                "research_plan_config",
                serde_json::json!({"raw_goal": "cure aging", "parsed_config": "..."}),
            )
            .await;
        assert!(board.goal().await == "cure aging");
    }
}
