// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Minimal GeoJSON model for storm product and outlook payloads.
//!
//! The backend serves standard GeoJSON feature collections. Only the pieces
//! the renderer needs are modeled here: feature properties (for styling and
//! popups) and coordinate extraction for points, lines, and polygon rings.
//! Unknown or malformed geometry is skipped, never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A position on the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// The first feature of the collection, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Feature> {
        self.features.first()
    }
}

/// A single GeoJSON feature with its properties bag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Look up a string-valued property.
    #[must_use]
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Whether the feature carries a property under this key, of any type.
    #[must_use]
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

/// A GeoJSON geometry. Coordinates are kept as raw JSON and interpreted
/// on demand, since nesting depth depends on the geometry type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    /// Extract a point position, if this is a `Point` geometry.
    #[must_use]
    pub fn as_point(&self) -> Option<LatLon> {
        if self.kind != "Point" {
            return None;
        }
        position(&self.coordinates)
    }

    /// Extract all line strings from this geometry.
    ///
    /// `LineString` yields one path, `MultiLineString` one per member, and
    /// `Polygon`/`MultiPolygon` one per ring. Other types yield nothing.
    #[must_use]
    pub fn paths(&self) -> Vec<Vec<LatLon>> {
        match self.kind.as_str() {
            "LineString" => path(&self.coordinates).into_iter().collect(),
            "Polygon" | "MultiLineString" => paths(&self.coordinates),
            "MultiPolygon" => self
                .coordinates
                .as_array()
                .map(|polygons| polygons.iter().flat_map(paths).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Whether the geometry encloses area (polygon rings) rather than
    /// tracing a path.
    #[must_use]
    pub fn is_area(&self) -> bool {
        matches!(self.kind.as_str(), "Polygon" | "MultiPolygon")
    }
}

/// Interpret a JSON value as a single `[lon, lat]` position.
fn position(value: &Value) -> Option<LatLon> {
    let coords = value.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    Some(LatLon::new(lat, lon))
}

/// Interpret a JSON value as an array of positions.
fn path(value: &Value) -> Option<Vec<LatLon>> {
    let points: Vec<LatLon> = value.as_array()?.iter().filter_map(position).collect();
    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}

/// Interpret a JSON value as an array of position arrays.
fn paths(value: &Value) -> Vec<Vec<LatLon>> {
    value
        .as_array()
        .map(|rings| rings.iter().filter_map(path).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_feature_collection() {
        let fc: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Watch area"},
                "geometry": {"type": "Point", "coordinates": [-80.1, 25.5]}
            }]
        }))
        .unwrap();

        assert_eq!(fc.features.len(), 1);
        let first = fc.first().unwrap();
        assert_eq!(first.property_str("name"), Some("Watch area"));
        let point = first.geometry.as_ref().unwrap().as_point().unwrap();
        assert!((point.lat - 25.5).abs() < 1e-9);
        assert!((point.lon - (-80.1)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_collection() {
        let fc: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection", "features": []})).unwrap();
        assert!(fc.first().is_none());
    }

    #[test]
    fn test_point_rejects_other_kinds() {
        let f = feature(json!({
            "geometry": {"type": "LineString", "coordinates": [[-80.0, 25.0], [-81.0, 26.0]]}
        }));
        assert!(f.geometry.as_ref().unwrap().as_point().is_none());
    }

    #[test]
    fn test_line_string_paths() {
        let f = feature(json!({
            "geometry": {"type": "LineString", "coordinates": [[-80.0, 25.0], [-81.0, 26.0]]}
        }));
        let paths = f.geometry.as_ref().unwrap().paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 2);
        assert!((paths[0][1].lat - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_rings() {
        let f = feature(json!({
            "geometry": {"type": "Polygon", "coordinates": [
                [[-80.0, 25.0], [-81.0, 25.0], [-81.0, 26.0], [-80.0, 25.0]]
            ]}
        }));
        let geometry = f.geometry.as_ref().unwrap();
        assert!(geometry.is_area());
        let rings = geometry.paths();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn test_unknown_geometry_skipped() {
        let f = feature(json!({
            "geometry": {"type": "GeometryCollection", "coordinates": null}
        }));
        let geometry = f.geometry.as_ref().unwrap();
        assert!(geometry.paths().is_empty());
        assert!(geometry.as_point().is_none());
    }

    #[test]
    fn test_malformed_coordinates_skipped() {
        let f = feature(json!({
            "geometry": {"type": "LineString", "coordinates": [["bad", "data"]]}
        }));
        assert!(f.geometry.as_ref().unwrap().paths().is_empty());
    }
}
