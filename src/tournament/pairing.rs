use super::state::TournamentState;
use crate::Similarity;
use crate::blackboard::HypothesisId;
use crate::blackboard::ProximityGraph;
use rand::rngs::SmallRng;

/// extra weight for contestants that make a pairing informative
const FRESH_BONUS: Similarity = 0.25;
const PROMINENT_BONUS: Similarity = 0.25;

/// Chooses the next tournament pairing. Prefers pairs that are close on
/// the proximity graph and involve a newly eligible or top-ranked
/// contestant; ties break toward the pair with fewer completed matches,
/// then lexically. Without proximity data, pairing is uniform random.
/// Rematches are allowed but deferred until every pair has met.
pub struct Selector<'a> {
    state: &'a TournamentState,
    graph: &'a ProximityGraph,
}

impl<'a> Selector<'a> {
    pub fn new(state: &'a TournamentState, graph: &'a ProximityGraph) -> Self {
        Self { state, graph }
    }

    pub fn pair(
        &self,
        eligible: &[HypothesisId],
        rng: &mut SmallRng,
    ) -> Option<(HypothesisId, HypothesisId)> {
        if eligible.len() < 2 {
            return None;
        }
        match self.graph.is_empty() {
            true => self.anywhere(eligible, rng),
            false => self.nearby(eligible),
        }
    }

    /// no proximity information: uniform random distinct pair
    fn anywhere(
        &self,
        eligible: &[HypothesisId],
        rng: &mut SmallRng,
    ) -> Option<(HypothesisId, HypothesisId)> {
        let picks = rand::seq::index::sample(rng, eligible.len(), 2);
        Some((eligible[picks.index(0)].clone(), eligible[picks.index(1)].clone()))
    }

    /// competition within clusters: highest-scored pair wins
    fn nearby(&self, eligible: &[HypothesisId]) -> Option<(HypothesisId, HypothesisId)> {
        let pairs = self.candidates(eligible);
        pairs
            .into_iter()
            .max_by(|(a1, b1, s1), (a2, b2, s2)| {
                s1.partial_cmp(s2)
                    .expect("not NaN")
                    .then_with(|| self.load(a2, b2).cmp(&self.load(a1, b1)))
                    .then_with(|| (a2, b2).cmp(&(a1, b1)))
            })
            .map(|(a, b, _)| (a.clone(), b.clone()))
    }

    /// all unordered pairs, restricted to unmet ones while any remain
    fn candidates<'e>(
        &self,
        eligible: &'e [HypothesisId],
    ) -> Vec<(&'e HypothesisId, &'e HypothesisId, Similarity)> {
        let mut pairs = Vec::new();
        for (i, a) in eligible.iter().enumerate() {
            for b in eligible.iter().skip(i + 1) {
                pairs.push((a, b, self.appeal(a, b)));
            }
        }
        match pairs.iter().any(|(a, b, _)| !self.met(a, b)) {
            true => pairs.into_iter().filter(|(a, b, _)| !self.met(a, b)).collect(),
            false => pairs,
        }
    }

    fn appeal(&self, a: &str, b: &str) -> Similarity {
        self.graph.between(a, b).unwrap_or(0.)
            + [a, b]
                .iter()
                .map(|id| match (self.fresh(id), self.prominent(id)) {
                    (true, _) => FRESH_BONUS,
                    (_, true) => PROMINENT_BONUS,
                    _ => 0.,
                })
                .sum::<Similarity>()
    }

    fn load(&self, a: &str, b: &str) -> usize {
        self.state.played(a) + self.state.played(b)
    }

    fn met(&self, a: &str, b: &str) -> bool {
        self.state
            .matches
            .iter()
            .any(|m| (m.h1 == a && m.h2 == b) || (m.h1 == b && m.h2 == a))
    }

    fn fresh(&self, id: &str) -> bool {
        self.state.played(id) == 0
    }

    fn prominent(&self, id: &str) -> bool {
        self.state
            .top_ranked
            .iter()
            .take(crate::TERMINAL_TOP_RANKED)
            .any(|top| top == id)
    }
}
