// Copyright 2026 bizscout Contributors
// SPDX-License-Identifier: Apache-2.0

//! Harvest event bus — typed progress events from every pipeline stage.
//!
//! The bus is a `tokio::sync::broadcast` channel carrying [`HarvestEvent`]
//! values. Any consumer — CLI progress bar, log sink, a future dashboard —
//! subscribes independently; the pipeline never blocks on a consumer. When
//! no subscribers exist, events are silently dropped (zero overhead).

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Every event the harvest pipeline emits. Serialized to JSON for
/// machine-readable output.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HarvestEvent {
    /// A harvest run has started.
    RunStarted {
        run_id: String,
        query: String,
        location: Option<String>,
        requested: usize,
    },
    /// A consent interstitial was dismissed before searching.
    ConsentDismissed { run_id: String },
    /// The search phrase was submitted.
    SearchSubmitted { run_id: String, phrase: String },
    /// Scroll-loading finished; the listing holds `realized` cards.
    ListingLoaded {
        run_id: String,
        realized: usize,
        requested: usize,
    },
    /// Processing of one listing item has started.
    ItemStarted { run_id: String, index: usize },
    /// Preview extraction from the collapsed card, before navigation.
    ItemPreviewed {
        run_id: String,
        index: usize,
        name: Option<String>,
    },
    /// An item yielded a validated record.
    ItemExtracted {
        run_id: String,
        index: usize,
        name: String,
        has_phone: bool,
        has_address: bool,
        has_website: bool,
    },
    /// An item was written off after exhausting retries.
    ItemFailed {
        run_id: String,
        index: usize,
        attempts: u32,
        reason: String,
    },
    /// Item data was kept but the return to the listing could not be
    /// verified by any recovery strategy.
    ReturnUncertain { run_id: String, index: usize },
    /// The run was aborted early; partial results were returned.
    RunAborted { run_id: String, processed: usize },
    /// The run finished.
    RunComplete {
        run_id: String,
        records: usize,
        failures: usize,
        elapsed_ms: u64,
    },
    /// A non-fatal condition worth surfacing.
    Warning { run_id: String, message: String },
}

/// The harvest event bus.
///
/// All pipeline stages emit through this bus; consumers subscribe to
/// receive a stream of all events.
pub struct EventBus {
    sender: broadcast::Sender<HarvestEvent>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers. Silently ignores if no subscribers.
    pub fn emit(&self, event: HarvestEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<HarvestEvent> {
        self.sender.subscribe()
    }
}
