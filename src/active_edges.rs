//! The active-edge structure: the sweep ray's currently-crossed obstacle
//! edges, kept sorted nearest-to-`p` first.

use crate::config::EngineConfig;
use crate::geometry::{angle_abc, point_edge_distance, segments_intersect, Edge, Point};

/// Ordered set of obstacle edges the sweep ray from `p` currently crosses.
#[derive(Clone, Debug, Default)]
pub struct ActiveEdges {
    edges: Vec<Edge>,
}

impl ActiveEdges {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn smallest(&self) -> &Edge {
        &self.edges[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn insert(&mut self, cfg: &EngineConfig, p: Point, pivot: Point, edge: Edge) {
        let idx = self.index_of(cfg, p, pivot, &edge);
        self.edges.insert(idx, edge);
    }

    pub fn delete(&mut self, cfg: &EngineConfig, p: Point, pivot: Point, edge: &Edge) {
        if self.edges.is_empty() {
            return;
        }
        let idx = self.index_of(cfg, p, pivot, edge);
        if idx > 0 && &self.edges[idx - 1] == edge {
            self.edges.remove(idx - 1);
        }
    }

    /// Binary-search insertion point for `edge` w.r.t. ray `p -> pivot`.
    fn index_of(&self, cfg: &EngineConfig, p: Point, pivot: Point, edge: &Edge) -> usize {
        let (mut lo, mut hi) = (0usize, self.edges.len());
        while lo < hi {
            let mid = (lo + hi) / 2;
            if less_than(cfg, p, pivot, edge, &self.edges[mid]) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }
}

/// True iff `e1` sorts before `e2` w.r.t. the ray `p -> pivot`.
///
/// Equal edges never compare less. An edge the ray doesn't cross at all
/// sorts as smaller (it stays toward the back of "currently crossed"
/// ordering). Otherwise nearer wins; ties (edges sharing a vertex) are
/// broken by the interior angle each makes with the ray at that shared
/// vertex, smaller angle first.
fn less_than(cfg: &EngineConfig, p: Point, pivot: Point, e1: &Edge, e2: &Edge) -> bool {
    if e1 == e2 {
        return false;
    }
    if !segments_intersect(cfg, p, pivot, e2) {
        return true;
    }
    let d1 = point_edge_distance(p, pivot, e1);
    let d2 = point_edge_distance(p, pivot, e2);
    if d1 != d2 {
        return d1 < d2;
    }
    let shared = if e1.p1 == e2.p1 || e1.p1 == e2.p2 { e1.p1 } else { e1.p2 };
    let a1 = angle_abc(cfg, p, pivot, e1.other(shared));
    let a2 = angle_abc(cfg, p, pivot, e2.other(shared));
    a1 < a2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearer_edge_sorts_first() {
        let cfg = EngineConfig::default();
        let p = Point::new(0.0, 0.0);
        let pivot = Point::new(10.0, 0.0);
        let near = Edge::new(Point::new(2.0, -1.0), Point::new(2.0, 1.0));
        let far = Edge::new(Point::new(5.0, -1.0), Point::new(5.0, 1.0));
        let mut active = ActiveEdges::new();
        active.insert(&cfg, p, pivot, far);
        active.insert(&cfg, p, pivot, near);
        assert_eq!(active.smallest(), &near);
    }

    #[test]
    fn delete_removes_previously_inserted_edge() {
        let cfg = EngineConfig::default();
        let p = Point::new(0.0, 0.0);
        let pivot = Point::new(10.0, 0.0);
        let e = Edge::new(Point::new(2.0, -1.0), Point::new(2.0, 1.0));
        let mut active = ActiveEdges::new();
        active.insert(&cfg, p, pivot, e);
        assert_eq!(active.len(), 1);
        active.delete(&cfg, p, pivot, &e);
        assert_eq!(active.len(), 0);
    }
}
