//! Visibility-graph construction and obstacle-avoiding shortest-path
//! routing over polygonal obstacles.
//!
//! Build an [`Engine`] from a set of obstacle polygons, then query
//! [`Engine::shortest_path`] or [`Engine::find_visible`] against it.

pub mod active_edges;
pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gj;
pub mod graph;
pub mod obstacle;
pub mod pathfind;
pub mod persist;
pub mod sweep;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use geometry::{Edge, Point};
pub use obstacle::{ObstacleGraph, VisibilityGraph};
