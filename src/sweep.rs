//! The rotational-sweep visibility algorithm and the polygon-interior test
//! it depends on.

use crate::active_edges::ActiveEdges;
use crate::config::EngineConfig;
use crate::geometry::{angle, ccw, edge_distance, segments_intersect, Edge, Orientation, Point};
use crate::obstacle::ObstacleGraph;

/// Vertices of `graph` visible from `source`, in sweep (angular) order.
///
/// `origin`/`destination` are optional extra points appended to the sweep
/// (used when computing visibility for an ad-hoc query endpoint that needs
/// a direct edge to another ad-hoc endpoint considered too).
pub fn visible_vertices(
    cfg: &EngineConfig,
    source: Point,
    graph: &ObstacleGraph,
    origin: Option<Point>,
    destination: Option<Point>,
) -> Vec<Point> {
    let mut points: Vec<Point> = graph.points().collect();
    if let Some(o) = origin {
        points.push(o);
    }
    if let Some(d) = destination {
        points.push(d);
    }
    points.sort_by(|&a, &b| {
        let ka = (angle(source, a), edge_distance(source, a));
        let kb = (angle(source, b), edge_distance(source, b));
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut active = ActiveEdges::new();
    let far = Point::new(source.x + cfg.infinity, source.y);
    for edge in graph.edges() {
        if edge.contains(source) {
            continue;
        }
        if segments_intersect(cfg, source, far, edge) {
            if crate::geometry::on_segment(source, edge.p1, far) {
                continue;
            }
            if crate::geometry::on_segment(source, edge.p2, far) {
                continue;
            }
            active.insert(cfg, source, far, *edge);
        }
    }

    let mut visible = Vec::new();
    let mut prev: Option<Point> = None;
    let mut prev_visible = false;

    for p in points {
        if p == source {
            continue;
        }

        // Remove edges incident on p whose other endpoint has rotated
        // behind the sweep ray.
        if !active.is_empty() {
            for edge in graph.incident(p) {
                if ccw(cfg, source, p, edge.other(p)) == Orientation::Clockwise {
                    active.delete(cfg, source, p, edge);
                }
            }
        }

        let collinear_with_prev = match prev {
            None => false,
            Some(prev_p) => ccw(cfg, source, prev_p, p) == Orientation::Collinear && crate::geometry::on_segment(source, prev_p, p),
        };

        let mut is_visible;
        if !collinear_with_prev {
            is_visible = active.is_empty() || !segments_intersect(cfg, source, p, active.smallest());
        } else if !prev_visible {
            is_visible = false;
        } else {
            let prev_p = prev.unwrap();
            is_visible = true;
            for edge in active.iter() {
                if !edge.contains(prev_p) && segments_intersect(cfg, prev_p, p, edge) {
                    is_visible = false;
                    break;
                }
            }
            if is_visible && edge_interior_to_polygon(cfg, prev_p, p, graph) {
                is_visible = false;
            }
        }

        if is_visible && !graph.adjacent_points(source).any(|a| a == p) {
            is_visible = !edge_interior_to_polygon(cfg, source, p, graph);
        }

        if is_visible {
            visible.push(p);
        }

        for edge in graph.incident(p) {
            if !edge.contains(source) && ccw(cfg, source, p, edge.other(p)) == Orientation::CounterClockwise {
                active.insert(cfg, source, p, *edge);
            }
        }

        prev = Some(p);
        prev_visible = is_visible;
    }
    visible
}

/// True iff the segment `p1-p2` lies inside the polygon both endpoints
/// belong to.
pub fn edge_interior_to_polygon(cfg: &EngineConfig, p1: Point, p2: Point, graph: &ObstacleGraph) -> bool {
    if p1.polygon_id != p2.polygon_id || p1.polygon_id == -1 {
        return false;
    }
    let mid = Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
    match graph.polygon_edges(p1.polygon_id) {
        Some(edges) => polygon_crossing(cfg, mid, edges),
        None => false,
    }
}

/// True iff `point` lies strictly inside any tagged polygon of `graph`.
///
/// A query endpoint that isn't itself an obstacle vertex can still land
/// inside a closed obstacle's interior; the rotational sweep alone doesn't
/// catch this (it only filters chords between two vertices of the same
/// tagged polygon), so `shortest_path` checks this separately before
/// trusting that endpoint's visible vertices.
pub fn is_enclosed(cfg: &EngineConfig, point: Point, graph: &ObstacleGraph) -> bool {
    graph.polygon_ids().any(|id| match graph.polygon_edges(id) {
        Some(edges) => polygon_crossing(cfg, point, edges),
        None => false,
    })
}

/// Crossing-number point-in-polygon test: shoots a ray from `p1` to
/// `(infinity, p1.y)` and counts parity of crossings against `poly_edges`.
pub(crate) fn polygon_crossing<'a>(cfg: &EngineConfig, p1: Point, poly_edges: impl IntoIterator<Item = &'a Edge>) -> bool {
    let p2 = Point::new(p1.x + cfg.infinity, p1.y);
    let mut crossings = 0;
    for edge in poly_edges {
        let (a, b) = (edge.p1, edge.p2);
        if p1.y < a.y.min(b.y) {
            continue;
        }
        if p1.y > a.y.max(b.y) {
            continue;
        }
        if p1.x > a.x.max(b.x) {
            continue;
        }
        let a_collinear = ccw(cfg, p1, a, p2) == Orientation::Collinear;
        let b_collinear = ccw(cfg, p1, b, p2) == Orientation::Collinear;
        if a_collinear && b_collinear {
            continue;
        }
        if a_collinear || b_collinear {
            let collinear_point = if a_collinear { a } else { b };
            let other = edge.other(collinear_point);
            if other.y > p1.y {
                crossings += 1;
            }
        } else if segments_intersect(cfg, p1, p2, edge) {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::ObstacleGraph;

    fn square() -> ObstacleGraph {
        let cfg = EngineConfig::default();
        ObstacleGraph::build(
            &[vec![
                Point::new(1.0, 1.0),
                Point::new(3.0, 1.0),
                Point::new(3.0, 3.0),
                Point::new(1.0, 3.0),
            ]],
            &cfg,
        )
        .unwrap()
    }

    #[test]
    fn visibility_of_near_corners_not_far_ones() {
        let cfg = EngineConfig::default();
        let g = square();
        let source = Point::new(0.0, 2.0);
        let vis = visible_vertices(&cfg, source, &g, None, None);
        assert!(vis.contains(&Point::new(1.0, 1.0)));
        assert!(vis.contains(&Point::new(1.0, 3.0)));
        assert!(!vis.contains(&Point::new(3.0, 1.0)));
        assert!(!vis.contains(&Point::new(3.0, 3.0)));
    }

    #[test]
    fn center_of_square_is_enclosed() {
        let cfg = EngineConfig::default();
        let g = square();
        assert!(is_enclosed(&cfg, Point::new(2.0, 2.0), &g));
    }

    #[test]
    fn point_outside_square_is_not_enclosed() {
        let cfg = EngineConfig::default();
        let g = square();
        assert!(!is_enclosed(&cfg, Point::new(20.0, 20.0), &g));
    }

    #[test]
    fn visibility_is_symmetric_for_square_obstacle() {
        let cfg = EngineConfig::default();
        let g = square();
        for a in g.points().collect::<Vec<_>>() {
            for b in g.points().collect::<Vec<_>>() {
                if a == b {
                    continue;
                }
                let vis_a = visible_vertices(&cfg, a, &g, None, None);
                let vis_b = visible_vertices(&cfg, b, &g, None, None);
                assert_eq!(vis_a.contains(&b), vis_b.contains(&a), "{} <-> {}", a, b);
            }
        }
    }

    #[test]
    fn polygon_neighbors_are_always_visible() {
        let cfg = EngineConfig::default();
        let g = square();
        for p in g.points().collect::<Vec<_>>() {
            let vis = visible_vertices(&cfg, p, &g, None, None);
            for n in g.adjacent_points(p) {
                assert!(vis.contains(&n), "{} should see neighbor {}", p, n);
            }
        }
    }
}
