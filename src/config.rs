//! Engine-instance configuration: coordinate-domain and tolerance knobs
//! live on an [`Engine`](crate::engine::Engine) instance rather than as
//! process-global constants, so two engines with different coordinate
//! domains never interfere with each other.

use serde::{Deserialize, Serialize};

/// Coordinate-domain and numerical-tolerance knobs for one engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scale factor orientation/angle computations truncate through to
    /// collapse near-collinear configurations to exactly collinear. Default
    /// `1e10`.
    pub tolerance_scale: f64,
    /// Sentinel "far away" coordinate used to build sweep rays and the
    /// point-in-polygon crossing ray. Must be chosen strictly larger than
    /// any coordinate magnitude in the input; `build` rejects polygons that
    /// violate this as [`EngineError::DomainOverflow`](crate::error::EngineError::DomainOverflow).
    /// Default `1e4`.
    pub infinity: f64,
    /// Batch size for the parallel visibility-graph builder. Default `10`.
    pub batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tolerance_scale: 1e10,
            infinity: 1e4,
            batch_size: 10,
        }
    }
}

impl EngineConfig {
    /// Checks that a coordinate's magnitude fits comfortably inside
    /// `infinity / 2`, the domain the engine assumes all input lies within.
    pub fn fits_domain(&self, x: f64, y: f64) -> bool {
        x.abs() < self.infinity / 2.0 && y.abs() < self.infinity / 2.0
    }
}
