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

//! View-state store for fetched storms and outlooks.
//!
//! All mutation goes through discrete [`StoreAction`]s so the data flow is
//! one-way and testable without a renderer: fetch tasks apply actions, the
//! store broadcasts [`StoreEvent`]s, and the UI reads snapshots. A refresh
//! replaces the published state wholesale; there is no partial update path.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::model::{Outlook, Storm};

/// A discrete state mutation from the fetch pipeline.
#[derive(Debug)]
pub enum StoreAction {
    /// A refresh began; published state is cleared.
    FetchStarted,
    /// A fully assembled storm is ready for display.
    StormLoaded(Storm),
    /// An outlook region resolved. Append order is arrival order.
    OutlookLoaded(Outlook),
    /// A fetch failed; the entity stays absent from the view.
    FetchFailed { what: String },
    /// The refresh pipeline drained.
    FetchFinished,
}

/// Change notifications for the UI.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    RefreshStarted,
    StormPublished(String),
    OutlookPublished(&'static str),
    FetchFailed(String),
    RefreshFinished,
}

/// Everything the renderer needs, snapshot-cloneable.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub storms: Vec<Storm>,
    pub outlooks: Vec<Outlook>,
    /// Count of failed fetches in the current refresh.
    pub failed_fetches: u32,
    pub refreshing: bool,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// State container with broadcast change events.
pub struct Store {
    state: ViewState,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("storms", &self.state.storms.len())
            .field("outlooks", &self.state.outlooks.len())
            .field("refreshing", &self.state.refreshing)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store with the given event channel capacity.
    #[must_use]
    pub fn new(event_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity);
        Self {
            state: ViewState::default(),
            event_tx,
        }
    }

    /// Apply one action and broadcast the matching event.
    pub fn apply(&mut self, action: StoreAction) {
        let event = match action {
            StoreAction::FetchStarted => {
                self.state.storms.clear();
                self.state.outlooks.clear();
                self.state.failed_fetches = 0;
                self.state.refreshing = true;
                StoreEvent::RefreshStarted
            }
            StoreAction::StormLoaded(storm) => {
                let id = storm.atcf_id.clone();
                self.state.storms.push(storm);
                StoreEvent::StormPublished(id)
            }
            StoreAction::OutlookLoaded(outlook) => {
                let basin = outlook.basin.path_segment();
                self.state.outlooks.push(outlook);
                StoreEvent::OutlookPublished(basin)
            }
            StoreAction::FetchFailed { what } => {
                self.state.failed_fetches += 1;
                StoreEvent::FetchFailed(what)
            }
            StoreAction::FetchFinished => {
                self.state.refreshing = false;
                self.state.last_refresh = Some(Utc::now());
                StoreEvent::RefreshFinished
            }
        };

        // Nobody listening is fine; the UI may poll snapshots instead.
        let _ = self.event_tx.send(event);
    }

    /// Current state, by reference.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Clone the current state for rendering without holding a lock.
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.state.clone()
    }

    /// Subscribe to change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(256)
    }
}
