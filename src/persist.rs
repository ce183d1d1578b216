//! Opaque binary persistence of a built engine.
//!
//! `bincode` over `serde`-derived wire types keeps the on-disk format
//! private to this module: callers treat it as an opaque byte string.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry::{Edge, Point};
use crate::obstacle::{ObstacleGraph, VisibilityGraph};

/// Wire format version tag; bumped if `SerializedEngine`'s shape changes,
/// so `load` can reject a blob from an incompatible build instead of
/// misinterpreting its bytes.
const WIRE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SerializedEngine {
    version: u32,
    config: EngineConfig,
    obstacle_polygons: Vec<Vec<(f64, f64, i64)>>,
    visibility_edges: Vec<(Point, Point)>,
}

pub fn save(path: impl AsRef<Path>, cfg: &EngineConfig, obstacles: &ObstacleGraph, visgraph: &VisibilityGraph) -> Result<(), EngineError> {
    let obstacle_polygons = obstacle_polygon_components(obstacles);
    let visibility_edges = visgraph.edges().map(|e| (e.p1, e.p2)).collect();
    let wire = SerializedEngine {
        version: WIRE_VERSION,
        config: *cfg,
        obstacle_polygons,
        visibility_edges,
    };
    let bytes = bincode::serialize(&wire)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<(EngineConfig, ObstacleGraph, VisibilityGraph), EngineError> {
    let mut bytes = Vec::new();
    std::fs::File::open(path)?.read_to_end(&mut bytes)?;
    let wire: SerializedEngine = bincode::deserialize(&bytes)?;
    if wire.version != WIRE_VERSION {
        return Err(EngineError::Codec(Box::new(bincode::ErrorKind::Custom(format!(
            "unsupported visibility-graph wire version {}",
            wire.version
        )))));
    }
    let polygons: Vec<Vec<Point>> = wire
        .obstacle_polygons
        .into_iter()
        .map(|poly| poly.into_iter().map(|(x, y, id)| Point::tagged(x, y, id)).collect())
        .collect();
    let obstacles = ObstacleGraph::build(&polygons, &wire.config)?;
    let mut visgraph = VisibilityGraph::new();
    for (p1, p2) in wire.visibility_edges {
        visgraph.add_edge(Edge::new(p1, p2));
    }
    Ok((wire.config, obstacles, visgraph))
}

/// Recovers a `polygons`-shaped input from an already-built obstacle graph,
/// grouping each polygon's tagged edges back into an ordered vertex ring so
/// `load` can reconstruct the graph by replaying `ObstacleGraph::build`
/// rather than persisting (and trusting) its internal adjacency directly.
fn obstacle_polygon_components(obstacles: &ObstacleGraph) -> Vec<Vec<(f64, f64, i64)>> {
    use std::collections::{HashMap, HashSet};
    let mut by_polygon: HashMap<i64, Vec<&Edge>> = HashMap::new();
    let mut untagged: Vec<(f64, f64, i64)> = Vec::new();
    let mut seen_untagged_pairs: HashSet<(Point, Point)> = HashSet::new();
    let mut touched: HashSet<Point> = HashSet::new();

    for edge in obstacles.edges() {
        touched.insert(edge.p1);
        touched.insert(edge.p2);
        if edge.p1.polygon_id == -1 {
            let key = if edge.p1 < edge.p2 { (edge.p1, edge.p2) } else { (edge.p2, edge.p1) };
            if seen_untagged_pairs.insert(key) {
                untagged.push((edge.p1.x, edge.p1.y, -1));
                untagged.push((edge.p2.x, edge.p2.y, -1));
            }
        } else {
            by_polygon.entry(edge.p1.polygon_id).or_default().push(edge);
        }
    }

    let mut polygons: Vec<Vec<(f64, f64, i64)>> = Vec::new();
    let mut polygon_ids: Vec<i64> = by_polygon.keys().copied().collect();
    polygon_ids.sort_unstable();
    for id in polygon_ids {
        let edges = &by_polygon[&id];
        if edges.is_empty() {
            continue;
        }
        let mut adjacency: HashMap<Point, Vec<Point>> = HashMap::new();
        for e in edges {
            adjacency.entry(e.p1).or_default().push(e.p2);
            adjacency.entry(e.p2).or_default().push(e.p1);
        }
        let start = edges[0].p1;
        let mut ring = vec![start];
        let mut prev = start;
        let mut current = edges[0].p2;
        while current != start {
            ring.push(current);
            let next = adjacency[&current].iter().find(|&&n| n != prev).copied().unwrap_or(start);
            prev = current;
            current = next;
            if ring.len() > edges.len() + 1 {
                break; // malformed ring guard; should not happen for valid polygons
            }
        }
        polygons.push(ring.into_iter().map(|p| (p.x, p.y, id)).collect());
    }

    for isolated in untagged.chunks(2) {
        if let [a, b] = isolated {
            polygons.push(vec![*a, *b]);
        }
    }
    // Edgeless obstacle points (single-point "polygons") leave no edge to
    // rediscover them from; carry them over explicitly.
    for p in obstacles.points() {
        if !touched.contains(&p) {
            polygons.push(vec![(p.x, p.y, -1)]);
        }
    }
    polygons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_visibility_edges() {
        let cfg = EngineConfig::default();
        let polygons = vec![vec![Point::new(1.0, 1.0), Point::new(3.0, 1.0), Point::new(3.0, 3.0), Point::new(1.0, 3.0)]];
        let obstacles = ObstacleGraph::build(&polygons, &cfg).unwrap();
        let cancel = crate::builder::CancellationToken::new();
        let visgraph = crate::builder::build_visibility_graph(&cfg, &obstacles, 1, &|_, _| {}, &cancel).unwrap();

        let dir = std::env::temp_dir().join(format!("vispath-roundtrip-{}.bin", std::process::id()));
        save(&dir, &cfg, &obstacles, &visgraph).unwrap();
        let (loaded_cfg, _loaded_obstacles, loaded_visgraph) = load(&dir).unwrap();
        let _ = std::fs::remove_file(&dir);

        assert_eq!(loaded_cfg, cfg);
        let mut original: Vec<String> = visgraph.edges().map(|e| e.to_string()).collect();
        let mut restored: Vec<String> = loaded_visgraph.edges().map(|e| e.to_string()).collect();
        original.sort();
        restored.sort();
        assert_eq!(original, restored);
    }
}
