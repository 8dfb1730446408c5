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

//! Client library for tropical storm and outlook visualization data.
//!
//! This crate fetches storm lists, per-storm products, and basin outlooks
//! from a storm data backend and turns them into renderer-agnostic layer
//! specs. It is organized in layers that can be used independently or
//! composed together:
//!
//! - **api**: HTTP endpoints behind the [`StormFeed`] trait
//! - **model**: wire and assembled domain types
//! - **intensity**: wind-speed and formation-probability classification
//! - **layers**: product/outlook to declarative layer specs
//! - **store**: explicit view-state container with change events
//! - **fetch**: concurrent refresh pipeline with all-success storm joins
//!
//! # Quick Start
//!
//! Use the [`Client`] type for full-stack operation:
//!
//! ```no_run
//! use nhc_client::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::new(ClientConfig::default()).unwrap();
//!     client.refresh_future().await;
//!
//!     for storm in client.snapshot().storms {
//!         println!("{}: {:?}", storm.atcf_id, storm.intensity().map(|i| i.category));
//!     }
//! }
//! ```
//!
//! # Classification Only
//!
//! The classifier works standalone:
//!
//! ```
//! use nhc_client::intensity::{classify_intensity, wind_speed_from_text};
//!
//! let knots = wind_speed_from_text("Maximum winds 65 knots.").unwrap();
//! assert_eq!(classify_intensity(f64::from(knots)).category, "Category 1 Hurricane");
//! ```

pub mod api;
pub mod fetch;
pub mod geojson;
pub mod intensity;
pub mod layers;
pub mod model;
pub mod store;

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

pub use api::{ApiConfig, ApiError, HttpApi, StormFeed};
pub use geojson::{FeatureCollection, LatLon};
pub use intensity::{IntensityClass, ProbabilityClass};
pub use layers::{LayerSpec, Shape};
pub use model::{Basin, Outlook, Product, ProductKind, Storm};
pub use store::{Store, StoreAction, StoreEvent, ViewState};

/// Configuration for the full-stack client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Backend connection settings.
    pub api: ApiConfig,
}

/// Full-stack client that wires the feed, fetch pipeline, and store.
///
/// The UI thread reads snapshots; refreshes run as tokio tasks produced by
/// [`Client::refresh_future`] so the caller decides which runtime drives
/// them.
#[derive(Debug)]
pub struct Client {
    api: HttpApi,
    store: Arc<RwLock<Store>>,
}

impl Client {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            api: HttpApi::new(&config.api)?,
            store: Arc::new(RwLock::new(Store::default())),
        })
    }

    /// A future that runs one full refresh when awaited.
    ///
    /// The future owns its handles, so it can be spawned on any runtime.
    #[must_use]
    pub fn refresh_future(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let api = self.api.clone();
        let store = Arc::clone(&self.store);
        async move {
            fetch::refresh(&api, &store).await;
        }
    }

    /// Clone the current view state.
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.store
            .read()
            .map(|store| store.snapshot())
            .unwrap_or_default()
    }

    /// Subscribe to store change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store
            .read()
            .map(|store| store.subscribe())
            .unwrap_or_else(|_| {
                let (tx, rx) = broadcast::channel(1);
                drop(tx);
                rx
            })
    }
}
