use super::*;
use crate::Similarity;
use crate::blackboard::Blackboard;
use crate::blackboard::Hypothesis;
use crate::blackboard::ProximityGraph;
use crate::engine::Task;
use std::collections::BTreeSet;

/// Rebuilds the proximity graph from pairwise textual similarity of the
/// hypotheses. Clusters of related ideas then compete against each
/// other in the tournament rather than across the whole field.
pub struct Proximity {
    #[allow(dead_code)]
    seed: u64,
}

impl Proximity {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    async fn calculate(&self, board: &Blackboard) -> anyhow::Result<Outcome> {
        let hypotheses = board.hypotheses().await;
        if hypotheses.len() < 2 {
            return Err(anyhow::anyhow!("not enough hypotheses for proximity calculation"));
        }
        let mut graph = ProximityGraph::default();
        for (i, a) in hypotheses.iter().enumerate() {
            for b in hypotheses.iter().skip(i + 1) {
                graph.link(&a.id, &b.id, Self::similarity(a, b));
            }
        }
        log::debug!("proximity graph rebuilt over {} hypotheses", graph.len());
        Ok(Outcome::default().with(Effect::Proximity(graph)))
    }

    /// Jaccard overlap of the titles and statements. A lexical stand-in
    /// for embedding distance; close enough to cluster rephrasings and
    /// descendants of the same idea.
    fn similarity(a: &Hypothesis, b: &Hypothesis) -> Similarity {
        let a = Self::tokens(a);
        let b = Self::tokens(b);
        let shared = a.intersection(&b).count();
        let either = a.union(&b).count();
        match either {
            0 => 0.,
            _ => shared as Similarity / either as Similarity,
        }
    }

    fn tokens(h: &Hypothesis) -> BTreeSet<String> {
        format!("{} {}", h.title, h.statement)
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.len() > 2)
            .map(String::from)
            .collect()
    }
}

#[async_trait::async_trait]
impl Agent for Proximity {
    async fn execute(&self, task: &Task, board: &Blackboard) -> anyhow::Result<Outcome> {
        match task {
            Task::CalculateProximity => self.calculate(board).await,
            _ => Err(anyhow::anyhow!("unsupported task for proximity: {}", task)),
        }
    }
}
