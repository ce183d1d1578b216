//! Typed error surface for the engine: a `thiserror`-derived enum
//! distinguishing fatal geometry bugs from ordinary "no path" outcomes.

use crate::geometry::Point;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("invalid polygon: {reason}")]
    InvalidPolygon { reason: String },

    #[error("no path exists between the requested endpoints")]
    NoPath,

    #[error("relaxation found a strictly shorter path to an already-finalized vertex at {vertex}; this indicates a geometry-tolerance bug upstream")]
    NegativeCycle { vertex: Point },

    #[error("coordinate {coordinate} exceeds the configured infinity sentinel ({limit})")]
    DomainOverflow { coordinate: Point, limit: f64 },

    #[error("I/O failure")]
    IoFailure(#[from] std::io::Error),

    #[error("corrupt or incompatible persisted graph")]
    Codec(#[from] bincode::Error),
}
