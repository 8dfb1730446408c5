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

//! HTTP access to the storm data backend.
//!
//! The backend exposes four JSON-over-HTTP endpoints:
//!
//! ```text
//! GET /outlooks/{region}   region in {atl, pac, cpac}
//! GET /storms              active storm ids
//! GET /storms/{id}         storm detail with product references
//! GET {dir}                product geometry payload (same origin)
//! ```
//!
//! [`StormFeed`] is the seam the fetch pipeline works against; [`HttpApi`]
//! is the reqwest-backed implementation. Every request carries the
//! configured timeout so one stalled product fetch cannot hold a storm's
//! assembly open indefinitely.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::geojson::FeatureCollection;
use crate::model::{Basin, StormDetail, StormSummary};

/// Default backend origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Errors from backend requests.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Configuration for the backend connection.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend origin, no trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Source of storm and outlook data.
///
/// The fetch pipeline is generic over this trait so tests can drive it with
/// canned responses instead of a live backend.
pub trait StormFeed {
    fn outlook(
        &self,
        basin: Basin,
    ) -> impl Future<Output = Result<FeatureCollection, ApiError>> + Send;

    fn storms(&self) -> impl Future<Output = Result<Vec<StormSummary>, ApiError>> + Send;

    fn storm_detail(&self, id: &str)
        -> impl Future<Output = Result<StormDetail, ApiError>> + Send;

    /// Fetch a product geometry payload by its `dir` reference path.
    fn product_geometry(
        &self,
        dir: &str,
    ) -> impl Future<Output = Result<FeatureCollection, ApiError>> + Send;
}

/// reqwest-backed implementation of [`StormFeed`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }
}

impl StormFeed for HttpApi {
    async fn outlook(&self, basin: Basin) -> Result<FeatureCollection, ApiError> {
        self.get_json(&format!("/outlooks/{}", basin.path_segment()))
            .await
    }

    async fn storms(&self) -> Result<Vec<StormSummary>, ApiError> {
        self.get_json("/storms").await
    }

    async fn storm_detail(&self, id: &str) -> Result<StormDetail, ApiError> {
        self.get_json(&format!("/storms/{id}")).await
    }

    async fn product_geometry(&self, dir: &str) -> Result<FeatureCollection, ApiError> {
        self.get_json(dir).await
    }
}
