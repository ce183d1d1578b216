//! Generic undirected node/edge graph storage and adjacency lookup, the
//! building block [`ObstacleGraph`](crate::obstacle::ObstacleGraph) and
//! [`VisibilityGraph`](crate::obstacle::VisibilityGraph) specialize.
//!
//! This engine only ever needs undirected graphs keyed by
//! [`Point`](crate::geometry::Point), so there's no directedness
//! bookkeeping; just a node set plus a node -> incident-edge-set adjacency
//! map.

use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;

/// An edge of a [`Graph`].
///
/// Type Parameters:
/// - `NId`: node id
pub trait Edge<NId: Clone + Copy + Hash + Eq>: Clone + Hash + PartialEq + Eq {
    fn p1(&self) -> NId;
    fn p2(&self) -> NId;
    /// Assuming `id` is one end of the edge, what is the other end.
    fn other(&self, id: NId) -> NId {
        if id == self.p1() {
            self.p2()
        } else {
            self.p1()
        }
    }
}

/// An undirected graph over node id `NId`, with edges of type `E`.
#[derive(Clone, Debug)]
pub struct Graph<NId, E>
where
    NId: Clone + Copy + Hash + Eq,
    E: Edge<NId>,
{
    nodes: HashSet<NId>,
    adjacency: IndexMap<NId, HashSet<E>>,
    _empty: HashSet<E>,
}

impl<NId, E> Default for Graph<NId, E>
where
    NId: Clone + Copy + Hash + Eq,
    E: Edge<NId>,
{
    fn default() -> Self {
        Graph {
            nodes: Default::default(),
            adjacency: Default::default(),
            _empty: Default::default(),
        }
    }
}

impl<NId, E> Graph<NId, E>
where
    NId: Clone + Copy + Hash + Eq,
    E: Edge<NId>,
{
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether `n` is a vertex of this graph (has been added via
    /// [`add_node`](Self::add_node) or [`add_edge`](Self::add_edge)).
    pub fn contains_node(&self, n: NId) -> bool {
        self.nodes.contains(&n)
    }

    /// Whether `e` (by its symmetric identity) is present.
    pub fn contains_edge(&self, e: &E) -> bool {
        self.adjacency.get(&e.p1()).map_or(false, |es| es.contains(e))
    }

    pub fn add_node(&mut self, id: NId) -> bool {
        self.nodes.insert(id)
    }

    /// Adds an edge, implicitly adding its endpoints as nodes.
    pub fn add_edge(&mut self, e: E) {
        self.nodes.insert(e.p1());
        self.nodes.insert(e.p2());
        self.adjacency.entry(e.p1()).or_default().insert(e.clone());
        self.adjacency.entry(e.p2()).or_default().insert(e);
    }

    pub fn get_edges(&self, n: NId) -> &HashSet<E> {
        self.adjacency.get(&n).unwrap_or(&self._empty)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.adjacency.iter().flat_map(|(n, es)| es.iter().filter(move |e| e.p1() == *n))
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Edge<u64> for (u64, u64) {
        fn p1(&self) -> u64 {
            self.0
        }
        fn p2(&self) -> u64 {
            self.1
        }
    }

    #[test]
    fn add_edge_links_both_endpoints() {
        let mut g: Graph<u64, (u64, u64)> = Graph::new();
        g.add_edge((1, 2));
        assert!(g.contains_node(1));
        assert!(g.contains_node(2));
        assert_eq!(g.get_edges(1).len(), 1);
        assert_eq!(g.get_edges(2).len(), 1);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn edge_count_does_not_double_count_undirected_edges() {
        let mut g: Graph<u64, (u64, u64)> = Graph::new();
        g.add_edge((1, 2));
        g.add_edge((2, 3));
        assert_eq!(g.edge_count(), 2);
    }
}
