//! Top-level entry point: builds a visibility graph from obstacle polygons
//! and answers shortest-path / point-visibility queries against it.

use std::path::Path;

use log::info;

use crate::builder::{build_visibility_graph, CancellationToken, ProgressHook};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry::Point;
use crate::obstacle::{ObstacleGraph, VisibilityGraph};
use crate::sweep::{self, visible_vertices};

/// A built visibility-graph engine: the obstacle set, its derived visibility
/// graph, and the configuration both were built with.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    obstacles: ObstacleGraph,
    visgraph: VisibilityGraph,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            config,
            obstacles: ObstacleGraph::default(),
            visgraph: VisibilityGraph::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the visibility graph for `polygons` using `workers` threads.
    /// `show_progress` logs a line (at `info` level) after every batch; use
    /// [`Engine::build_with_progress`] for a caller-supplied hook instead.
    pub fn build(&mut self, polygons: &[Vec<Point>], workers: usize, show_progress: bool) -> Result<(), EngineError> {
        if show_progress {
            self.build_with_progress(polygons, workers, &|done, total| info!("visibility graph: {}/{} batches", done, total))
        } else {
            self.build_with_progress(polygons, workers, &|_, _| {})
        }
    }

    pub fn build_with_progress(&mut self, polygons: &[Vec<Point>], workers: usize, progress: &ProgressHook) -> Result<(), EngineError> {
        self.build_cancellable(polygons, workers, progress, &CancellationToken::new())
    }

    pub fn build_cancellable(
        &mut self,
        polygons: &[Vec<Point>],
        workers: usize,
        progress: &ProgressHook,
        cancel: &CancellationToken,
    ) -> Result<(), EngineError> {
        let obstacles = ObstacleGraph::build(polygons, &self.config)?;
        let visgraph = build_visibility_graph(&self.config, &obstacles, workers, progress, cancel)?;
        self.obstacles = obstacles;
        self.visgraph = visgraph;
        Ok(())
    }

    pub fn point_count(&self) -> usize {
        self.obstacles.point_count()
    }

    pub fn visibility_edge_count(&self) -> usize {
        self.visgraph.edge_count()
    }

    /// Shortest obstacle-avoiding path from `origin` to `destination`,
    /// inclusive of both endpoints.
    ///
    /// When an endpoint is already a vertex of the built visibility graph
    /// its existing edges are used directly; otherwise a per-query auxiliary
    /// graph is swept for that endpoint (and, if both are missing, for a
    /// possible direct edge between them). An ad-hoc endpoint that lands
    /// strictly inside a closed obstacle is given no visible vertices at
    /// all: a straight line from there to anything outside the obstacle
    /// must cross its boundary, so there is no legitimate exit edge to
    /// find, and the query correctly falls through to `NoPath`.
    pub fn shortest_path(&self, origin: Point, destination: Point) -> Result<Vec<Point>, EngineError> {
        if !origin.is_finite() || !self.config.fits_domain(origin.x, origin.y) {
            return Err(EngineError::DomainOverflow {
                coordinate: origin,
                limit: self.config.infinity,
            });
        }
        if !destination.is_finite() || !self.config.fits_domain(destination.x, destination.y) {
            return Err(EngineError::DomainOverflow {
                coordinate: destination,
                limit: self.config.infinity,
            });
        }

        let origin_exists = self.visgraph.contains_point(origin);
        let destination_exists = self.visgraph.contains_point(destination);

        let mut aux = VisibilityGraph::new();
        if !origin_exists && !sweep::is_enclosed(&self.config, origin, &self.obstacles) {
            let dest_hint = if destination_exists { None } else { Some(destination) };
            for visible in visible_vertices(&self.config, origin, &self.obstacles, None, dest_hint) {
                aux.add_edge(crate::geometry::Edge::new(origin, visible));
            }
        }
        if !destination_exists && !sweep::is_enclosed(&self.config, destination, &self.obstacles) {
            for visible in visible_vertices(&self.config, destination, &self.obstacles, Some(origin), None) {
                aux.add_edge(crate::geometry::Edge::new(destination, visible));
            }
        }

        let aux_ref = if origin_exists && destination_exists { None } else { Some(&aux) };
        crate::pathfind::shortest_path(&self.visgraph, aux_ref, origin, destination)
    }

    /// Vertices of the built visibility graph visible from `point`,
    /// computed fresh against the current obstacle set (not cached).
    pub fn find_visible(&self, point: Point) -> Vec<Point> {
        visible_vertices(&self.config, point, &self.obstacles, None, None)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        crate::persist::save(path, &self.config, &self.obstacles, &self.visgraph)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let (config, obstacles, visgraph) = crate::persist::load(path)?;
        Ok(Engine { config, obstacles, visgraph })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_obstacle() -> Vec<Vec<Point>> {
        vec![vec![
            Point::new(2.0, 2.0),
            Point::new(4.0, 2.0),
            Point::new(4.0, 4.0),
            Point::new(2.0, 4.0),
        ]]
    }

    #[test]
    fn empty_world_gives_direct_path() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.build(&[], 1, false).unwrap();
        let path = engine.shortest_path(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        assert_eq!(path, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn routes_around_square_obstacle() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.build(&square_obstacle(), 1, false).unwrap();
        let origin = Point::new(0.0, 3.0);
        let destination = Point::new(6.0, 3.0);
        let path = engine.shortest_path(origin, destination).unwrap();
        assert_eq!(path.first().copied().unwrap(), origin);
        assert_eq!(path.last().copied().unwrap(), destination);
        assert!(path.len() >= 3, "path should detour around the obstacle: {:?}", path);
    }

    #[test]
    fn start_inside_closed_square_has_no_exit() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.build(&square_obstacle(), 1, false).unwrap();
        let trapped = Point::new(3.0, 3.0); // strictly inside the square
        let outside = Point::new(10.0, 10.0);
        let err = engine.shortest_path(trapped, outside).unwrap_err();
        assert!(matches!(err, EngineError::NoPath));
    }

    #[test]
    fn origin_equals_destination_is_a_singleton_path() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.build(&[], 1, false).unwrap();
        let p = Point::new(1.0, 1.0);
        let path = engine.shortest_path(p, p).unwrap();
        assert_eq!(path, vec![p]);
    }

    #[test]
    fn find_visible_reports_square_corners() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.build(&square_obstacle(), 1, false).unwrap();
        let vis = engine.find_visible(Point::new(0.0, 3.0));
        assert!(vis.contains(&Point::new(2.0, 2.0)));
        assert!(vis.contains(&Point::new(2.0, 4.0)));
    }
}
