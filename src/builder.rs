//! Visibility-graph construction: sweeps every obstacle vertex and
//! accumulates the discovered edges, optionally fanned out over a `rayon`
//! thread pool.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry::{Edge, Point};
use crate::obstacle::{ObstacleGraph, VisibilityGraph};
use crate::sweep::visible_vertices;

/// Cooperative cancellation, checked between batches.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// `(batches completed, total batches)`, reported after each batch.
pub type ProgressHook<'a> = dyn Fn(usize, usize) + 'a;

fn batch_edges(cfg: &EngineConfig, graph: &ObstacleGraph, batch: &[Point]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for &p1 in batch {
        for p2 in visible_vertices(cfg, p1, graph, None, None) {
            edges.push(Edge::new(p1, p2));
        }
    }
    edges
}

/// Builds the visibility graph for `graph`'s vertices.
///
/// `workers == 1` runs every batch sequentially on the calling thread
/// (guaranteeing the same edge-discovery order regardless of batch size).
/// `workers > 1` builds a scoped `rayon` pool with that many threads and
/// dispatches batches across it; since every worker only ever reads
/// `graph` and returns an owned `Vec<Edge>`, merging happens solely on the
/// calling thread after all workers finish, per the no-shared-mutable-state
/// requirement.
pub fn build_visibility_graph(
    cfg: &EngineConfig,
    graph: &ObstacleGraph,
    workers: usize,
    progress: &ProgressHook,
    cancel: &CancellationToken,
) -> Result<VisibilityGraph, EngineError> {
    let workers = workers.max(1);
    let points: Vec<Point> = graph.points().collect();
    let batches: Vec<&[Point]> = points.chunks(cfg.batch_size.max(1)).collect();
    let total = batches.len();

    let mut visgraph = VisibilityGraph::new();
    if workers == 1 {
        for (done, batch) in batches.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            for edge in batch_edges(cfg, graph, batch) {
                visgraph.add_edge(edge);
            }
            progress(done + 1, total);
        }
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("failed to create visibility-graph worker pool");
        let results: Vec<Vec<Edge>> = pool.install(|| {
            use rayon::prelude::*;
            batches
                .par_iter()
                .map(|batch| {
                    if cancel.is_cancelled() {
                        Vec::new()
                    } else {
                        batch_edges(cfg, graph, batch)
                    }
                })
                .collect()
        });
        for (done, batch_result) in results.into_iter().enumerate() {
            for edge in batch_result {
                visgraph.add_edge(edge);
            }
            progress(done + 1, total);
        }
    }
    Ok(visgraph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::ObstacleGraph;

    fn two_squares() -> ObstacleGraph {
        let cfg = EngineConfig::default();
        ObstacleGraph::build(
            &[
                vec![Point::new(1.0, 1.0), Point::new(3.0, 1.0), Point::new(3.0, 3.0), Point::new(1.0, 3.0)],
                vec![Point::new(5.0, 5.0), Point::new(7.0, 5.0), Point::new(7.0, 7.0), Point::new(5.0, 7.0)],
            ],
            &cfg,
        )
        .unwrap()
    }

    #[test]
    fn deterministic_across_worker_counts() {
        let cfg = EngineConfig::default();
        let g = two_squares();
        let cancel = CancellationToken::new();
        let noop = |_: usize, _: usize| {};
        let single = build_visibility_graph(&cfg, &g, 1, &noop, &cancel).unwrap();
        let multi = build_visibility_graph(&cfg, &g, 4, &noop, &cancel).unwrap();

        let mut single_edges: Vec<String> = single.edges().map(|e| e.to_string()).collect();
        let mut multi_edges: Vec<String> = multi.edges().map(|e| e.to_string()).collect();
        single_edges.sort();
        multi_edges.sort();
        assert_eq!(single_edges, multi_edges);
        assert_eq!(single.edge_count(), multi.edge_count());
    }

    #[test]
    fn progress_hook_sees_every_batch() {
        let cfg = EngineConfig::default();
        let g = two_squares();
        let cancel = CancellationToken::new();
        let seen = std::sync::Mutex::new(Vec::new());
        let hook = |done: usize, total: usize| seen.lock().unwrap().push((done, total));
        build_visibility_graph(&cfg, &g, 1, &hook, &cancel).unwrap();
        let seen = seen.into_inner().unwrap();
        assert!(!seen.is_empty());
        assert_eq!(seen.last().unwrap().0, seen.last().unwrap().1);
    }
}
