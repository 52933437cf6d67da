use super::elo;
use crate::Completion;
use crate::Rating;
use crate::blackboard::HypothesisId;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Debate,
    Simple,
}

/// a decided pairwise comparison; immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub h1: HypothesisId,
    pub h2: HypothesisId,
    pub winner: HypothesisId,
    pub kind: MatchKind,
    pub at: usize,
}

/// Elo tournament over reviewed hypotheses. Ratings start at the entry
/// value, the match log is append-only, and progress estimates how much
/// of the all-pairs schedule has been played.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentState {
    pub ratings: BTreeMap<HypothesisId, Rating>,
    pub matches: Vec<Match>,
    pub completed_matches: usize,
    pub progress: Completion,
    pub top_ranked: Vec<HypothesisId>,
}

impl TournamentState {
    /// enter a hypothesis at the initial rating; re-entry is a no-op
    pub fn admit(&mut self, id: &str) {
        self.ratings.entry(id.to_string()).or_insert(crate::ELO_INITIAL);
    }

    pub fn rating(&self, id: &str) -> Rating {
        self.ratings.get(id).copied().unwrap_or(crate::ELO_INITIAL)
    }

    /// debate tier requires both contestants above the gate
    pub fn kind(&self, a: &str, b: &str) -> MatchKind {
        match self.rating(a) >= crate::ELO_DEBATE_GATE && self.rating(b) >= crate::ELO_DEBATE_GATE {
            true => MatchKind::Debate,
            false => MatchKind::Simple,
        }
    }

    /// matches a contestant has already played
    pub fn played(&self, id: &str) -> usize {
        self.matches.iter().filter(|m| m.h1 == id || m.h2 == id).count()
    }

    /// Record one decided match and apply the Elo transition to both
    /// contestants. Malformed matches are logged and dropped.
    pub fn record(&mut self, h1: &str, h2: &str, winner: &str, kind: MatchKind) {
        if h1 == h2 || (winner != h1 && winner != h2) {
            log::error!("malformed match dropped: {} vs {} -> {}", h1, h2, winner);
            return;
        }
        self.admit(h1);
        self.admit(h2);
        let (won, lost) = match winner == h1 {
            true => (h1, h2),
            false => (h2, h1),
        };
        let (w, l) = elo::update(self.rating(won), self.rating(lost));
        self.ratings.insert(won.to_string(), w);
        self.ratings.insert(lost.to_string(), l);
        self.matches.push(Match {
            h1: h1.to_string(),
            h2: h2.to_string(),
            winner: winner.to_string(),
            kind,
            at: self.matches.len(),
        });
        self.completed_matches += 1;
    }

    /// Refresh the derived fields against the current eligible count.
    /// Progress is completed over C(n, 2), clamped; admitting a new
    /// contestant may lower it, which is fine for an estimate. The top
    /// ranking is every rated id, rating descending, lexical tiebreak.
    pub fn refresh(&mut self, eligible: usize) {
        let schedule = eligible * eligible.saturating_sub(1) / 2;
        self.progress = (self.completed_matches as Completion
            / schedule.max(1) as Completion)
            .clamp(0., 1.);
        let mut ranked = self.ratings.keys().cloned().collect::<Vec<_>>();
        ranked.sort_by(|a, b| self.ratings[b].cmp(&self.ratings[a]).then(a.cmp(b)));
        self.top_ranked = ranked;
    }
}
