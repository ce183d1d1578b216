//! Point/edge primitives and the orientation, intersection and angle
//! predicates the sweep and active-edge structure are built on.
//!
//! All angle- and orientation-sensitive predicates are scaled through a
//! configurable tolerance so that borderline-collinear floating point
//! configurations collapse to exactly-collinear outcomes; see
//! [`EngineConfig::tolerance_scale`](crate::config::EngineConfig::tolerance_scale).

use std::cmp::Ordering;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// A planar vertex, tagged with the id of the polygon it belongs to.
///
/// Identity and hashing are by `(x, y)` only; `polygon_id` is metadata that
/// travels with a vertex but never distinguishes it from an otherwise equal
/// one. `-1` marks a vertex that is not part of any obstacle (an ad-hoc
/// query endpoint, or a 1-2 point degenerate "polygon").
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub polygon_id: i64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y, polygon_id: -1 }
    }

    pub fn tagged(x: f64, y: f64, polygon_id: i64) -> Self {
        Point { x, y, polygon_id }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Same coordinates, with a (possibly different) polygon tag.
    pub fn with_tag(&self, polygon_id: i64) -> Self {
        Point { polygon_id, ..*self }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}
impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .to_bits()
            .cmp(&other.x.to_bits())
            .then_with(|| self.y.to_bits().cmp(&other.y.to_bits()))
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// An unordered pair of [`Point`]s. `Edge(a, b) == Edge(b, a)`, and an edge
/// never self-loops.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub p1: Point,
    pub p2: Point,
}

impl Edge {
    /// Panics if `p1 == p2`; the data model forbids self-loops by
    /// construction.
    pub fn new(p1: Point, p2: Point) -> Self {
        debug_assert!(p1 != p2, "edge endpoints must be distinct");
        Edge { p1, p2 }
    }

    /// The endpoint of this edge other than `point`.
    ///
    /// Assumes `point` is one of the two endpoints.
    pub fn other(&self, point: Point) -> Point {
        if point == self.p1 {
            self.p2
        } else {
            self.p1
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point == self.p1 || point == self.p2
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.p1 == other.p1 && self.p2 == other.p2) || (self.p1 == other.p2 && self.p2 == other.p1)
    }
}
impl Eq for Edge {}

impl Hash for Edge {
    /// Order-independent so that an edge discovered from either endpoint
    /// hashes identically and the visibility graph's deduplication-by-insert
    /// is harmless.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut h1 = std::collections::hash_map::DefaultHasher::new();
        let mut h2 = std::collections::hash_map::DefaultHasher::new();
        self.p1.hash(&mut h1);
        self.p2.hash(&mut h2);
        (h1.finish() ^ h2.finish()).hash(state);
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.p1, self.p2)
    }
}

/// Orientation of the triple `(A, B, C)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Signed orientation of triangle `ABC`, scaled and truncated through
/// `cfg.tolerance_scale` to make near-collinear triples exactly collinear.
pub fn ccw(cfg: &EngineConfig, a: Point, b: Point, c: Point) -> Orientation {
    let area = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let scaled = (area * cfg.tolerance_scale).trunc() / cfg.tolerance_scale;
    if scaled > 0.0 {
        Orientation::CounterClockwise
    } else if scaled < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// True iff `q` lies within the axis-aligned bounding box of `p` and `r`.
///
/// Only meaningful when `p`, `q`, `r` are already known to be collinear.
pub fn on_segment(p: Point, q: Point, r: Point) -> bool {
    (p.x <= q.x && q.x <= r.x || r.x <= q.x && q.x <= p.x)
        && (p.y <= q.y && q.y <= r.y || r.y <= q.y && q.y <= p.y)
}

/// Euclidean distance between two points.
pub fn edge_distance(p: Point, q: Point) -> f64 {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    (dx * dx + dy * dy).sqrt()
}

/// Whether segment `p-q` intersects `edge`, using the four-orientation test
/// plus collinear-overlap fallbacks. Endpoint coincidence counts as an
/// intersection in the relevant branch.
pub fn segments_intersect(cfg: &EngineConfig, p: Point, q: Point, edge: &Edge) -> bool {
    let (e1, e2) = (edge.p1, edge.p2);
    let o1 = ccw(cfg, p, q, e1);
    let o2 = ccw(cfg, p, q, e2);
    let o3 = ccw(cfg, e1, e2, p);
    let o4 = ccw(cfg, e1, e2, q);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    if o1 == Orientation::Collinear && on_segment(p, e1, q) {
        return true;
    }
    if o2 == Orientation::Collinear && on_segment(p, e2, q) {
        return true;
    }
    if o3 == Orientation::Collinear && on_segment(e1, p, e2) {
        return true;
    }
    if o4 == Orientation::Collinear && on_segment(e1, q, e2) {
        return true;
    }
    false
}

/// Euclidean intersection of line `p-q` with `edge`'s line.
///
/// Returns `None` for parallel, non-coincident lines. Shared endpoints
/// short-circuit to that endpoint.
pub fn intersect_point(p: Point, q: Point, edge: &Edge) -> Option<Point> {
    if edge.contains(p) {
        return Some(p);
    }
    if edge.contains(q) {
        return Some(q);
    }
    if edge.p1.x == edge.p2.x {
        // edge is vertical
        if p.x == q.x {
            return None;
        }
        let pslope = (p.y - q.y) / (p.x - q.x);
        let ix = edge.p1.x;
        let iy = pslope * (ix - p.x) + p.y;
        return Some(Point::new(ix, iy));
    }
    if p.x == q.x {
        let eslope = (edge.p1.y - edge.p2.y) / (edge.p1.x - edge.p2.x);
        let ix = p.x;
        let iy = eslope * (ix - edge.p1.x) + edge.p1.y;
        return Some(Point::new(ix, iy));
    }
    let pslope = (p.y - q.y) / (p.x - q.x);
    let eslope = (edge.p1.y - edge.p2.y) / (edge.p1.x - edge.p2.x);
    if eslope == pslope {
        return None;
    }
    let ix = (eslope * edge.p1.x - pslope * p.x + p.y - edge.p1.y) / (eslope - pslope);
    let iy = eslope * (ix - edge.p1.x) + edge.p1.y;
    Some(Point::new(ix, iy))
}

/// Distance from `p` to where the ray `p -> q` meets `edge`.
///
/// Assumes the line from `p` to `q` crosses `edge` before reaching `q`.
/// Returns `0.0` if the lines are parallel (no intersection point).
pub fn point_edge_distance(p: Point, q: Point, edge: &Edge) -> f64 {
    intersect_point(p, q, edge).map_or(0.0, |ip| edge_distance(p, ip))
}

/// Angle of `point` around `center`, measured counter-clockwise from the
/// positive x-axis, in `[0, 2*PI)`.
pub fn angle(center: Point, point: Point) -> f64 {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    if dx == 0.0 {
        return if dy > 0.0 { PI / 2.0 } else { 3.0 * PI / 2.0 };
    }
    if dy == 0.0 {
        return if dx > 0.0 { 0.0 } else { PI };
    }
    let a = (dy / dx).atan();
    if dx < 0.0 {
        PI + a
    } else if dy < 0.0 {
        2.0 * PI + a
    } else {
        a
    }
}

/// Interior angle at `b` of triangle `a-b-c`, via the law of cosines.
///
/// The denominator carries a small additive guard so that coincident or
/// near-coincident points don't divide by zero; the cosine argument is
/// scaled and truncated through `cfg.tolerance_scale` before `acos` to keep
/// it inside `[-1, 1]`.
pub fn angle_abc(cfg: &EngineConfig, a: Point, b: Point, c: Point) -> f64 {
    let sq = |p: Point, q: Point| (p.x - q.x).powi(2) + (p.y - q.y).powi(2);
    let side_a = sq(c, b); // opposite vertex a
    let side_b = sq(c, a); // opposite vertex b
    let side_c = sq(b, a); // opposite vertex c
    let denom_raw = 2.0 * side_a.sqrt() * side_c.sqrt();
    let denom = if denom_raw != 0.0 { denom_raw } else { 1e-6 };
    let cos_value = (side_a + side_c - side_b) / denom;
    let scaled = (cos_value * cfg.tolerance_scale).trunc() / cfg.tolerance_scale;
    scaled.clamp(-1.0, 1.0).acos()
}
