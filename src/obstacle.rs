//! The obstacle graph: polygons turned into a vertex/edge adjacency
//! structure with polygon-id tagging.

use std::collections::HashMap;
use std::collections::HashSet;

use itertools::Itertools;

use crate::error::EngineError;
use crate::geometry::{Edge, Point};
use crate::graph::Graph;

impl crate::graph::Edge<Point> for Edge {
    fn p1(&self) -> Point {
        self.p1
    }
    fn p2(&self) -> Point {
        self.p2
    }
}

/// Polygons turned into an adjacency graph, immutable once built.
///
/// Holds the same adjacency/edge-set shape as [`VisibilityGraph`], plus a
/// `polygons` ledger mapping polygon id to its edge set (populated only for
/// polygons with >= 3 distinct vertices, per the data model invariants).
#[derive(Clone, Debug, Default)]
pub struct ObstacleGraph {
    graph: Graph<Point, Edge>,
    polygons: HashMap<i64, HashSet<Edge>>,
}

impl ObstacleGraph {
    pub fn build(polygons: &[Vec<Point>], cfg: &crate::config::EngineConfig) -> Result<Self, EngineError> {
        let mut g = ObstacleGraph::default();
        let mut next_polygon_id = 0i64;
        for polygon in polygons {
            if polygon.is_empty() {
                return Err(EngineError::InvalidPolygon {
                    reason: "polygon has zero points".to_string(),
                });
            }
            for p in polygon {
                if !p.is_finite() {
                    return Err(EngineError::InvalidPolygon {
                        reason: format!("non-finite coordinate at {}", p),
                    });
                }
                if !cfg.fits_domain(p.x, p.y) {
                    return Err(EngineError::DomainOverflow {
                        coordinate: *p,
                        limit: cfg.infinity,
                    });
                }
            }
            g.process_polygon(polygon, next_polygon_id);
            if distinct_len(polygon) >= 3 {
                next_polygon_id += 1;
            }
        }
        Ok(g)
    }

    fn process_polygon(&mut self, polygon: &[Point], polygon_id: i64) {
        // A closed polygon (first point repeated as last) is stored once,
        // with the duplicate dropped.
        let mut pts: Vec<Point> = polygon.to_vec();
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        let n = pts.len();
        let tagged = n >= 3;
        if n < 2 {
            if n == 1 {
                self.graph.add_node(pts[0]);
            }
            return;
        }
        for (point, sibling) in pts.iter().copied().circular_tuple_windows() {
            if point == sibling {
                continue;
            }
            let (p, s) = if tagged {
                (point.with_tag(polygon_id), sibling.with_tag(polygon_id))
            } else {
                (point, sibling)
            };
            let edge = Edge::new(p, s);
            if tagged {
                self.polygons.entry(polygon_id).or_default().insert(edge);
            }
            self.graph.add_edge(edge);
        }
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.graph.contains_node(p)
    }

    pub fn contains_edge(&self, e: &Edge) -> bool {
        self.graph.contains_edge(e)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.graph.nodes()
    }

    pub fn point_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edges()
    }

    /// Edges incident on `p`.
    pub fn incident(&self, p: Point) -> &HashSet<Edge> {
        self.graph.get_edges(p)
    }

    /// Vertices directly joined to `p` by an obstacle edge.
    pub fn adjacent_points(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        self.graph.get_edges(p).iter().map(move |e| e.other(p))
    }

    /// Edges of the polygon `p1`/`p2` both belong to, or an empty set if
    /// they belong to different polygons (or either is untagged).
    pub fn polygon_edges(&self, polygon_id: i64) -> Option<&HashSet<Edge>> {
        self.polygons.get(&polygon_id)
    }

    /// Ids of every tagged (>= 3 vertex) polygon in this graph.
    pub fn polygon_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.polygons.keys().copied()
    }
}

fn distinct_len(polygon: &[Point]) -> usize {
    let mut pts = polygon.to_vec();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    pts.len()
}

/// Same adjacency shape as [`ObstacleGraph`], but with no polygon tagging;
/// populated by the visibility-graph builder.
#[derive(Clone, Debug, Default)]
pub struct VisibilityGraph {
    graph: Graph<Point, Edge>,
}

impl VisibilityGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_edge(&mut self, e: Edge) {
        self.graph.add_edge(e);
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.graph.contains_node(p)
    }

    pub fn get_edges(&self, p: Point) -> &HashSet<Edge> {
        self.graph.get_edges(p)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.graph.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edges()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn square_polygon_tags_all_vertices() {
        let cfg = EngineConfig::default();
        let square = vec![
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 3.0),
            Point::new(1.0, 3.0),
        ];
        let g = ObstacleGraph::build(&[square], &cfg).unwrap();
        assert_eq!(g.point_count(), 4);
        assert_eq!(g.edges().count(), 4);
        for p in g.points() {
            assert_eq!(p.polygon_id, 0);
        }
        assert_eq!(g.polygon_edges(0).unwrap().len(), 4);
    }

    #[test]
    fn closed_polygon_drops_duplicate_last_point() {
        let cfg = EngineConfig::default();
        let closed = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        let g = ObstacleGraph::build(&[closed], &cfg).unwrap();
        assert_eq!(g.point_count(), 3);
    }

    #[test]
    fn degenerate_polygon_is_untagged() {
        let cfg = EngineConfig::default();
        let pair = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let g = ObstacleGraph::build(&[pair], &cfg).unwrap();
        for p in g.points() {
            assert_eq!(p.polygon_id, -1);
        }
        assert!(g.polygon_edges(0).is_none());
    }

    #[test]
    fn single_point_polygon_is_isolated() {
        let cfg = EngineConfig::default();
        let g = ObstacleGraph::build(&[vec![Point::new(5.0, 5.0)]], &cfg).unwrap();
        assert_eq!(g.point_count(), 1);
        assert_eq!(g.edges().count(), 0);
    }

    #[test]
    fn empty_polygon_is_rejected() {
        let cfg = EngineConfig::default();
        let err = ObstacleGraph::build(&[vec![]], &cfg).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPolygon { .. }));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let cfg = EngineConfig::default();
        let err = ObstacleGraph::build(&[vec![Point::new(f64::NAN, 0.0)]], &cfg).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPolygon { .. }));
    }
}
