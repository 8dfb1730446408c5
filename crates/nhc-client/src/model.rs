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

//! Domain model for storms, products, and outlooks.
//!
//! Wire types (`StormSummary`, `StormDetail`, `ProductRef`) mirror the
//! backend JSON exactly; assembled types (`Storm`, `Product`, `Outlook`)
//! are what the store publishes and the renderer consumes. A storm is
//! assembled only once every product geometry has been fetched.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::geojson::FeatureCollection;
use crate::intensity::{self, IntensityClass};

/// Forecast basins served by the outlook endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basin {
    Atlantic,
    EasternPacific,
    CentralPacific,
}

impl Basin {
    /// All basins fetched on refresh.
    pub const ALL: [Basin; 3] = [Basin::Atlantic, Basin::EasternPacific, Basin::CentralPacific];

    /// The path segment used by the outlook endpoint.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Basin::Atlantic => "atl",
            Basin::EasternPacific => "pac",
            Basin::CentralPacific => "cpac",
        }
    }

    /// Human-readable basin name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Basin::Atlantic => "Atlantic",
            Basin::EasternPacific => "Eastern Pacific",
            Basin::CentralPacific => "Central Pacific",
        }
    }
}

/// Kind of map product attached to a storm.
///
/// The backend tags products with free-form strings; everything the renderer
/// does not recognize falls into `Other` and gets the default strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKind {
    /// Forecast uncertainty cone around the projected path.
    Cone,
    /// Projected path points.
    Track,
    /// Historical path points.
    PastTrack,
    /// Initial wind field extent.
    InitialWindField,
    /// Anything else (watches/warnings, surge, ...).
    Other(String),
}

impl ProductKind {
    /// Map a backend product tag to a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "cone" => ProductKind::Cone,
            "track" => ProductKind::Track,
            "pasttrack" => ProductKind::PastTrack,
            "initialwindfield" => ProductKind::InitialWindField,
            other => ProductKind::Other(other.to_owned()),
        }
    }

    /// The backend tag for this kind, used in layer ids.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            ProductKind::Cone => "cone",
            ProductKind::Track => "track",
            ProductKind::PastTrack => "pasttrack",
            ProductKind::InitialWindField => "initialwindfield",
            ProductKind::Other(tag) => tag,
        }
    }
}

/// One entry from `GET /storms`. Only the id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct StormSummary {
    pub id: String,
}

/// Product reference inside a storm detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRef {
    /// Product tag (`cone`, `track`, ...).
    pub product: String,
    /// Path to the geometry payload, relative to the API origin.
    pub dir: String,
}

/// Storm record from `GET /storms/{id}`.
///
/// Numeric-looking fields arrive as strings with unit suffixes
/// (e.g. `"100 mph"`), matching the upstream advisory text.
#[derive(Debug, Clone, Deserialize)]
pub struct StormDetail {
    #[serde(rename = "atcfID")]
    pub atcf_id: String,
    pub name: String,
    #[serde(rename = "centerLat")]
    pub center_lat: String,
    #[serde(rename = "centerLon")]
    pub center_lon: String,
    #[serde(rename = "maxSustainedWind")]
    pub max_sustained_wind: String,
    #[serde(rename = "minimumPressure")]
    pub minimum_pressure: String,
    #[serde(default)]
    pub movement: String,
    #[serde(default)]
    pub products: Vec<ProductRef>,
}

/// Errors assembling a storm from its detail record.
#[derive(Debug, Error)]
pub enum StormDataError {
    #[error("storm {id}: invalid value for {field}: {value:?}")]
    InvalidField {
        id: String,
        field: &'static str,
        value: String,
    },
}

/// A product with its fetched geometry attached.
#[derive(Debug, Clone)]
pub struct Product {
    pub kind: ProductKind,
    pub dir: String,
    pub geometry: FeatureCollection,
}

/// A fully assembled storm, immutable once published to the view state.
#[derive(Debug, Clone)]
pub struct Storm {
    pub atcf_id: String,
    pub name: String,
    pub center: crate::geojson::LatLon,
    /// Raw advisory string, e.g. `"100 mph"`.
    pub max_sustained_wind: String,
    /// Raw advisory string, e.g. `"965 mb"`.
    pub minimum_pressure: String,
    pub movement: String,
    pub products: Vec<Product>,
    pub fetched_at: DateTime<Utc>,
}

impl Storm {
    /// Assemble a storm from its detail record and fetched product
    /// geometries, paired in order with `detail.products`.
    pub fn assemble(
        detail: StormDetail,
        geometries: Vec<FeatureCollection>,
    ) -> Result<Self, StormDataError> {
        let lat = parse_coord(&detail.atcf_id, "centerLat", &detail.center_lat)?;
        let lon = parse_coord(&detail.atcf_id, "centerLon", &detail.center_lon)?;

        let products = detail
            .products
            .into_iter()
            .zip(geometries)
            .map(|(product, geometry)| Product {
                kind: ProductKind::from_tag(&product.product),
                dir: product.dir,
                geometry,
            })
            .collect();

        Ok(Self {
            atcf_id: detail.atcf_id,
            name: detail.name,
            center: crate::geojson::LatLon::new(lat, lon),
            max_sustained_wind: detail.max_sustained_wind,
            minimum_pressure: detail.minimum_pressure,
            movement: detail.movement,
            products,
            fetched_at: Utc::now(),
        })
    }

    /// Maximum sustained wind in knots, converted from the advisory's mph
    /// figure. `None` if the advisory string carries no digits.
    #[must_use]
    pub fn max_wind_knots(&self) -> Option<f64> {
        intensity::leading_digits(&self.max_sustained_wind)
            .map(|mph| intensity::mph_to_knots(f64::from(mph)))
    }

    /// Intensity class for the storm center marker, from the advisory wind.
    #[must_use]
    pub fn intensity(&self) -> Option<&'static IntensityClass> {
        self.max_wind_knots().map(intensity::classify_intensity)
    }
}

fn parse_coord(id: &str, field: &'static str, value: &str) -> Result<f64, StormDataError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| StormDataError::InvalidField {
            id: id.to_owned(),
            field,
            value: value.to_owned(),
        })
}

/// Outlook feature collection for one basin.
#[derive(Debug, Clone)]
pub struct Outlook {
    pub basin: Basin,
    pub features: FeatureCollection,
    pub fetched_at: DateTime<Utc>,
}

impl Outlook {
    #[must_use]
    pub fn new(basin: Basin, features: FeatureCollection) -> Self {
        Self {
            basin,
            features,
            fetched_at: Utc::now(),
        }
    }
}
