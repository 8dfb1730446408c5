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

//! Layer selection: products and outlooks to renderer-agnostic layer specs.
//!
//! Each product kind maps to one rendering strategy; the match is exhaustive
//! so a new recognized kind is a compile error here rather than a silent
//! fall-through at runtime. The output is plain shape data (paths, rings,
//! markers, popups) for the UI layer to paint; no map-widget types leak in.

use log::warn;

use crate::geojson::{Feature, FeatureCollection, LatLon};
use crate::intensity::{self, IntensityClass, ProbabilityClass, Rgb};
use crate::model::{Outlook, Product, ProductKind};

/// Stroke color for geometry with no per-feature styling.
pub const DEFAULT_COLOR: Rgb = (0x33, 0x88, 0xff);

/// One drawable element of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// An open path.
    Polyline {
        points: Vec<LatLon>,
        color: Rgb,
        popup: Option<String>,
    },
    /// A closed ring.
    Polygon {
        ring: Vec<LatLon>,
        color: Rgb,
        popup: Option<String>,
    },
    /// An intensity-classified point marker.
    IntensityMarker {
        pos: LatLon,
        class: &'static IntensityClass,
        popup: String,
    },
    /// A formation-probability icon marker.
    ProbabilityMarker {
        pos: LatLon,
        class: &'static ProbabilityClass,
        popup: Option<String>,
    },
}

/// A renderable map layer assembled from one product or outlook.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    /// Stable id, e.g. `"cone_AL01"` or `"outlook_atl"`.
    pub id: String,
    /// Whether shapes in this layer respond to pointer interaction.
    pub interactive: bool,
    pub shapes: Vec<Shape>,
}

/// Build the layer for one storm product.
#[must_use]
pub fn product_layer(storm_id: &str, product: &Product) -> LayerSpec {
    let id = format!("{}_{}", product.kind.tag(), storm_id);

    match &product.kind {
        ProductKind::Cone => LayerSpec {
            id,
            interactive: false,
            shapes: outline_shapes(&product.geometry, |_| DEFAULT_COLOR, |_| None),
        },
        ProductKind::InitialWindField => LayerSpec {
            id,
            interactive: false,
            shapes: outline_shapes(&product.geometry, fill_color, |_| None),
        },
        ProductKind::Track | ProductKind::PastTrack => LayerSpec {
            id,
            interactive: true,
            shapes: intensity_markers(&product.geometry),
        },
        ProductKind::Other(_) => LayerSpec {
            id,
            interactive: true,
            shapes: outline_shapes(
                &product.geometry,
                |_| DEFAULT_COLOR,
                |feature| feature.property_str("name").map(str::to_owned),
            ),
        },
    }
}

/// Build all layers for a storm's products, in product order.
#[must_use]
pub fn storm_layers(storm: &crate::model::Storm) -> Vec<LayerSpec> {
    storm
        .products
        .iter()
        .map(|product| product_layer(&storm.atcf_id, product))
        .collect()
}

/// Build the layer for a basin outlook.
///
/// An outlook whose first feature has no `Disturbance` property is treated
/// as malformed or empty and skipped entirely.
#[must_use]
pub fn outlook_layer(outlook: &Outlook) -> Option<LayerSpec> {
    let first = outlook.features.first()?;
    if !first.has_property("Disturbance") {
        return None;
    }

    let mut shapes = Vec::new();
    for feature in &outlook.features.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };

        if let Some(pos) = geometry.as_point() {
            let class = intensity::classify_probability(feature.property_str("5day_category"));
            shapes.push(Shape::ProbabilityMarker {
                pos,
                class,
                popup: feature.property_str("Discussion").map(str::to_owned),
            });
        } else {
            push_outline(&mut shapes, feature, fill_color(feature), None);
        }
    }

    Some(LayerSpec {
        id: format!("outlook_{}", outlook.basin.path_segment()),
        interactive: true,
        shapes,
    })
}

/// Per-feature stroke color from the feature's `fill` property.
fn fill_color(feature: &Feature) -> Rgb {
    feature
        .property_str("fill")
        .and_then(parse_hex_color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Parse a `#rrggbb` color string.
fn parse_hex_color(text: &str) -> Option<Rgb> {
    let hex = text.strip_prefix('#')?;
    // Byte-index slicing below requires single-byte chars.
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Outline every feature's geometry, with per-feature color and popup.
fn outline_shapes(
    features: &FeatureCollection,
    color: impl Fn(&Feature) -> Rgb,
    popup: impl Fn(&Feature) -> Option<String>,
) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for feature in &features.features {
        push_outline(&mut shapes, feature, color(feature), popup(feature));
    }
    shapes
}

fn push_outline(shapes: &mut Vec<Shape>, feature: &Feature, color: Rgb, popup: Option<String>) {
    let Some(geometry) = &feature.geometry else {
        return;
    };

    if let Some(pos) = geometry.as_point() {
        // Points in outline strategies render as single-point paths so the
        // renderer still gets a visible mark.
        shapes.push(Shape::Polyline {
            points: vec![pos],
            color,
            popup,
        });
        return;
    }

    let closed = geometry.is_area();
    for path in geometry.paths() {
        if closed {
            shapes.push(Shape::Polygon {
                ring: path,
                color,
                popup: popup.clone(),
            });
        } else {
            shapes.push(Shape::Polyline {
                points: path,
                color,
                popup: popup.clone(),
            });
        }
    }
}

/// Intensity markers for track/past-track point features.
///
/// Wind speed comes from each feature's `description` text; a point whose
/// description cannot be parsed is dropped from the layer rather than
/// aborting the whole track.
fn intensity_markers(features: &FeatureCollection) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for feature in &features.features {
        let Some(pos) = feature.geometry.as_ref().and_then(crate::geojson::Geometry::as_point)
        else {
            continue;
        };
        let Some(description) = feature.property_str("description") else {
            warn!("track point at ({:.2}, {:.2}) has no description", pos.lat, pos.lon);
            continue;
        };

        match intensity::wind_speed_from_text(description) {
            Ok(knots) => shapes.push(Shape::IntensityMarker {
                pos,
                class: intensity::classify_intensity(f64::from(knots)),
                popup: description.to_owned(),
            }),
            Err(err) => warn!("skipping track point: {err}"),
        }
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Basin;
    use serde_json::json;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    fn product(kind: &str, geometry: serde_json::Value) -> Product {
        Product {
            kind: ProductKind::from_tag(kind),
            dir: format!("/storms/AL01/{kind}"),
            geometry: collection(geometry),
        }
    }

    fn cone_geometry() -> serde_json::Value {
        json!({
            "features": [{
                "properties": {},
                "geometry": {"type": "Polygon", "coordinates": [
                    [[-80.0, 25.0], [-81.0, 25.0], [-81.0, 26.0], [-80.0, 25.0]]
                ]}
            }]
        })
    }

    #[test]
    fn test_cone_is_static_and_non_interactive() {
        let layer = product_layer("AL01", &product("cone", cone_geometry()));
        assert_eq!(layer.id, "cone_AL01");
        assert!(!layer.interactive);
        assert_eq!(layer.shapes.len(), 1);
        assert!(matches!(
            &layer.shapes[0],
            Shape::Polygon { color, popup, .. } if *color == DEFAULT_COLOR && popup.is_none()
        ));
    }

    #[test]
    fn test_wind_field_styled_per_feature() {
        let layer = product_layer(
            "AL01",
            &product(
                "initialwindfield",
                json!({
                    "features": [{
                        "properties": {"fill": "#eb4c0d"},
                        "geometry": {"type": "Polygon", "coordinates": [
                            [[-80.0, 25.0], [-81.0, 25.0], [-81.0, 26.0], [-80.0, 25.0]]
                        ]}
                    }]
                }),
            ),
        );
        assert!(!layer.interactive);
        assert!(matches!(
            &layer.shapes[0],
            Shape::Polygon { color, .. } if *color == (0xeb, 0x4c, 0x0d)
        ));
    }

    #[test]
    fn test_track_points_become_intensity_markers() {
        let layer = product_layer(
            "AL01",
            &product(
                "track",
                json!({
                    "features": [
                        {
                            "properties": {"description": "Winds of 65 knots."},
                            "geometry": {"type": "Point", "coordinates": [-80.0, 25.0]}
                        },
                        {
                            "properties": {"description": "no speed here"},
                            "geometry": {"type": "Point", "coordinates": [-80.5, 25.5]}
                        }
                    ]
                }),
            ),
        );

        // Unparsable second point is dropped, not fatal.
        assert_eq!(layer.shapes.len(), 1);
        assert!(matches!(
            &layer.shapes[0],
            Shape::IntensityMarker { class, popup, .. }
                if class.category == "Category 1 Hurricane" && popup.contains("65 knots")
        ));
    }

    #[test]
    fn test_pasttrack_uses_same_strategy_as_track() {
        let geometry = json!({
            "features": [{
                "properties": {"description": "Winds of 30 knots."},
                "geometry": {"type": "Point", "coordinates": [-80.0, 25.0]}
            }]
        });
        let track = product_layer("AL01", &product("track", geometry.clone()));
        let past = product_layer("AL01", &product("pasttrack", geometry));
        assert_eq!(track.shapes, past.shapes);
        assert_eq!(past.id, "pasttrack_AL01");
    }

    #[test]
    fn test_unknown_kind_gets_default_strategy_with_name_popup() {
        let layer = product_layer(
            "AL01",
            &product(
                "xyz",
                json!({
                    "features": [
                        {
                            "properties": {"name": "Hurricane Warning"},
                            "geometry": {"type": "LineString",
                                         "coordinates": [[-80.0, 25.0], [-81.0, 26.0]]}
                        },
                        {
                            "properties": {},
                            "geometry": {"type": "LineString",
                                         "coordinates": [[-82.0, 25.0], [-83.0, 26.0]]}
                        }
                    ]
                }),
            ),
        );

        assert_eq!(layer.id, "xyz_AL01");
        assert!(layer.interactive);
        assert!(matches!(
            &layer.shapes[0],
            Shape::Polyline { popup: Some(name), .. } if name == "Hurricane Warning"
        ));
        assert!(matches!(&layer.shapes[1], Shape::Polyline { popup: None, .. }));
    }

    #[test]
    fn test_outlook_without_disturbance_is_skipped() {
        let outlook = Outlook::new(
            Basin::Atlantic,
            collection(json!({
                "features": [{
                    "properties": {"name": "quiet basin"},
                    "geometry": {"type": "Point", "coordinates": [-50.0, 20.0]}
                }]
            })),
        );
        assert!(outlook_layer(&outlook).is_none());

        let empty = Outlook::new(Basin::Atlantic, FeatureCollection::default());
        assert!(outlook_layer(&empty).is_none());
    }

    #[test]
    fn test_outlook_probability_markers_and_fill() {
        let outlook = Outlook::new(
            Basin::EasternPacific,
            collection(json!({
                "features": [
                    {
                        "properties": {
                            "Disturbance": "1",
                            "5day_category": "2",
                            "Discussion": "A broad area of low pressure..."
                        },
                        "geometry": {"type": "Point", "coordinates": [-110.0, 15.0]}
                    },
                    {
                        "properties": {"Disturbance": "1", "fill": "#0eaf26"},
                        "geometry": {"type": "Polygon", "coordinates": [
                            [[-110.0, 14.0], [-111.0, 14.0], [-111.0, 15.0], [-110.0, 14.0]]
                        ]}
                    }
                ]
            })),
        );

        let layer = outlook_layer(&outlook).unwrap();
        assert_eq!(layer.id, "outlook_pac");
        assert_eq!(layer.shapes.len(), 2);
        assert!(matches!(
            &layer.shapes[0],
            Shape::ProbabilityMarker { class, popup: Some(text), .. }
                if class.level == "medium" && text.starts_with("A broad area")
        ));
        assert!(matches!(
            &layer.shapes[1],
            Shape::Polygon { color, .. } if *color == (0x0e, 0xaf, 0x26)
        ));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1285c3"), Some((0x12, 0x85, 0xc3)));
        assert_eq!(parse_hex_color("1285c3"), None);
        assert_eq!(parse_hex_color("#12"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        // Multi-byte char straddling a slice boundary must not panic
        assert_eq!(parse_hex_color("#aébcd"), None);
    }

    #[test]
    fn test_non_ascii_fill_falls_back_to_default() {
        let outlook = Outlook::new(
            Basin::Atlantic,
            collection(json!({
                "features": [{
                    "properties": {"Disturbance": "1", "fill": "#aébcd"},
                    "geometry": {"type": "Polygon", "coordinates": [
                        [[-50.0, 20.0], [-51.0, 20.0], [-51.0, 21.0], [-50.0, 20.0]]
                    ]}
                }]
            })),
        );

        let layer = outlook_layer(&outlook).unwrap();
        assert!(matches!(
            &layer.shapes[0],
            Shape::Polygon { color, .. } if *color == DEFAULT_COLOR
        ));
    }
}
