use super::hypothesis::HypothesisId;
use crate::Similarity;
use petgraph::graph::NodeIndex;
use petgraph::graph::UnGraph;
use std::collections::BTreeMap;

/// Similarity-weighted undirected graph over hypotheses. Rebuilt wholesale
/// by the proximity capability and consulted by the tournament pair
/// selector. Symmetric by construction; self-edges are dropped.
#[derive(Debug, Clone)]
pub struct ProximityGraph {
    graph: UnGraph<HypothesisId, Similarity>,
    index: BTreeMap<HypothesisId, NodeIndex>,
}

impl Default for ProximityGraph {
    fn default() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            index: BTreeMap::new(),
        }
    }
}

impl ProximityGraph {
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// connect two hypotheses with a similarity in [0, 1]
    pub fn link(&mut self, a: &str, b: &str, similarity: Similarity) {
        if a == b {
            return;
        }
        let weight = similarity.clamp(0., 1.);
        let a = self.node(a);
        let b = self.node(b);
        self.graph.update_edge(a, b, weight);
    }

    /// similarity between two hypotheses, if both are present and linked
    pub fn between(&self, a: &str, b: &str) -> Option<Similarity> {
        let a = self.index.get(a)?;
        let b = self.index.get(b)?;
        self.graph
            .find_edge(*a, *b)
            .map(|e| *self.graph.edge_weight(e).expect("edge exists"))
    }

    /// neighbors of a hypothesis, most similar first
    pub fn neighbors(&self, id: &str) -> Vec<(HypothesisId, Similarity)> {
        use petgraph::visit::EdgeRef;
        let Some(node) = self.index.get(id) else {
            return Vec::new();
        };
        let mut neighbors = self
            .graph
            .edges(*node)
            .map(|e| {
                let other = if e.source() == *node {
                    e.target()
                } else {
                    e.source()
                };
                (self.graph[other].clone(), *e.weight())
            })
            .collect::<Vec<_>>();
        neighbors.sort_by(|(a, x), (b, y)| y.partial_cmp(x).expect("not NaN").then(a.cmp(b)));
        neighbors
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        match self.index.get(id) {
            Some(node) => *node,
            None => {
                let node = self.graph.add_node(id.to_string());
                self.index.insert(id.to_string(), node);
                node
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_symmetric() {
        let mut graph = ProximityGraph::default();
        graph.link("h-a", "h-b", 0.8);
        assert!(graph.between("h-a", "h-b") == Some(0.8));
        assert!(graph.between("h-b", "h-a") == Some(0.8));
    }

    #[test]
    fn self_edges_are_dropped() {
        let mut graph = ProximityGraph::default();
        graph.link("h-a", "h-a", 0.9);
        assert!(graph.is_empty());
        assert!(graph.between("h-a", "h-a").is_none());
    }

    #[test]
    fn similarity_is_clamped() {
        let mut graph = ProximityGraph::default();
        graph.link("h-a", "h-b", 1.5);
        graph.link("h-a", "h-c", -0.5);
        assert!(graph.between("h-a", "h-b") == Some(1.0));
        assert!(graph.between("h-a", "h-c") == Some(0.0));
    }

    #[test]
    fn relink_replaces_weight() {
        let mut graph = ProximityGraph::default();
        graph.link("h-a", "h-b", 0.2);
        graph.link("h-b", "h-a", 0.7);
        assert!(graph.between("h-a", "h-b") == Some(0.7));
    }

    #[test]
    fn neighbors_sorted_most_similar_first() {
        let mut graph = ProximityGraph::default();
        graph.link("h-a", "h-b", 0.3);
        graph.link("h-a", "h-c", 0.9);
        graph.link("h-a", "h-d", 0.6);
        let neighbors = graph.neighbors("h-a");
        let ids = neighbors.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>();
        assert!(ids == vec!["h-c", "h-d", "h-b"]);
    }

    #[test]
    fn unknown_id_has_no_neighbors() {
        let graph = ProximityGraph::default();
        assert!(graph.neighbors("h-z").is_empty());
    }
}
