//! GeoJSON conversion functions.
//!
//! Converts obstacle polygons, visibility-graph edges and routed paths to
//! GeoJSON, mainly for visualization.

use std::convert::TryInto;

use geojson::{Feature, FeatureCollection, Geometry, Value};

use crate::geometry::Point;

pub fn polygons_to_geojson(polygons: &[Vec<Point>]) -> FeatureCollection {
    FeatureCollection {
        features: polygons
            .iter()
            .map(|polygon| {
                let mut ring: Vec<Vec<f64>> = polygon.iter().map(|p| vec![p.x, p.y]).collect();
                if ring.first() != ring.last() {
                    if let Some(first) = ring.first().cloned() {
                        ring.push(first);
                    }
                }
                Feature {
                    geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                    properties: None,
                    bbox: None,
                    foreign_members: None,
                    id: None,
                }
            })
            .collect(),
        bbox: None,
        foreign_members: None,
    }
}

pub fn visibility_graph_to_geojson(edges: impl IntoIterator<Item = (Point, Point)>) -> FeatureCollection {
    FeatureCollection {
        features: edges
            .into_iter()
            .map(|(p1, p2)| Feature {
                geometry: Some(Geometry::new(Value::LineString(vec![vec![p1.x, p1.y], vec![p2.x, p2.y]]))),
                properties: None,
                bbox: None,
                foreign_members: None,
                id: None,
            })
            .collect(),
        bbox: None,
        foreign_members: None,
    }
}

pub fn path_to_geojson(path: &[Point]) -> Geometry {
    Geometry::new(Value::LineString(path.iter().map(|p| vec![p.x, p.y]).collect()))
}

/// Obstacle polygons recovered from a GeoJSON `FeatureCollection` of
/// `Polygon` geometries (outer rings only; the closing point is dropped to
/// match [`crate::obstacle::ObstacleGraph`]'s expected input shape).
pub fn geojson_to_polygons(collection: FeatureCollection) -> Vec<Vec<Point>> {
    collection
        .features
        .into_iter()
        .filter_map(|f| f.geometry)
        .filter_map(|g| -> Option<geo::Geometry<f64>> { g.value.try_into().ok() })
        .filter_map(|g| match g {
            geo::Geometry::Polygon(poly) => Some(poly.exterior().coords().map(|c| Point::new(c.x, c.y)).collect()),
            _ => None,
        })
        .collect()
}
