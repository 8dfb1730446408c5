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

//! Fetch orchestration: one refresh populates the store.
//!
//! Outlook regions and the storm list are fetched concurrently; each storm's
//! product geometries are fetched concurrently and joined with all-success
//! semantics, so a storm is published exactly once and only fully assembled.
//! Per-request timeouts in the feed bound the join; there is no retry.
//!
//! Failure policy: a failed outlook, storm, or product leaves the entity
//! absent from the view state. Failures are logged and counted, never
//! rendered partially.

use std::sync::{Arc, RwLock};

use futures::future::{join_all, try_join_all};
use log::{info, warn};
use thiserror::Error;

use crate::api::{ApiError, StormFeed};
use crate::model::{Basin, Outlook, Storm, StormDataError};
use crate::store::{Store, StoreAction};

/// Why a storm could not be assembled.
#[derive(Debug, Error)]
enum AssembleError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Data(#[from] StormDataError),
}

/// Run one full refresh against the feed, applying results to the store.
///
/// Completion order across basins and storms is arrival order; nothing
/// beyond per-storm assembly is sequenced.
pub async fn refresh<F: StormFeed>(feed: &F, store: &Arc<RwLock<Store>>) {
    apply(store, StoreAction::FetchStarted);

    let outlooks = join_all(
        Basin::ALL
            .iter()
            .map(|&basin| fetch_outlook(feed, store, basin)),
    );
    let storms = fetch_storms(feed, store);

    futures::join!(outlooks, storms);

    apply(store, StoreAction::FetchFinished);
}

async fn fetch_outlook<F: StormFeed>(feed: &F, store: &Arc<RwLock<Store>>, basin: Basin) {
    match feed.outlook(basin).await {
        Ok(features) => {
            apply(store, StoreAction::OutlookLoaded(Outlook::new(basin, features)));
        }
        Err(err) => {
            warn!("outlook fetch for {} failed: {err}", basin.path_segment());
            apply(
                store,
                StoreAction::FetchFailed {
                    what: format!("outlook {}", basin.path_segment()),
                },
            );
        }
    }
}

async fn fetch_storms<F: StormFeed>(feed: &F, store: &Arc<RwLock<Store>>) {
    let summaries = match feed.storms().await {
        Ok(summaries) => summaries,
        Err(err) => {
            warn!("storm list fetch failed: {err}");
            apply(
                store,
                StoreAction::FetchFailed {
                    what: "storm list".to_owned(),
                },
            );
            return;
        }
    };

    info!("fetching {} active storms", summaries.len());

    join_all(summaries.iter().map(|summary| async {
        match assemble_storm(feed, &summary.id).await {
            Ok(storm) => apply(store, StoreAction::StormLoaded(storm)),
            Err(err) => {
                warn!("storm {} dropped: {err}", summary.id);
                apply(
                    store,
                    StoreAction::FetchFailed {
                        what: format!("storm {}", summary.id),
                    },
                );
            }
        }
    }))
    .await;
}

/// Fetch a storm's detail and every product geometry, publishing only if
/// all of them succeed.
async fn assemble_storm<F: StormFeed>(feed: &F, id: &str) -> Result<Storm, AssembleError> {
    let detail = feed.storm_detail(id).await?;

    let geometries = try_join_all(
        detail
            .products
            .iter()
            .map(|product| feed.product_geometry(&product.dir)),
    )
    .await?;

    Ok(Storm::assemble(detail, geometries)?)
}

fn apply(store: &Arc<RwLock<Store>>, action: StoreAction) {
    if let Ok(mut store) = store.write() {
        store.apply(action);
    }
}
