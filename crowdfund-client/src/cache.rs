// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! An optional, short-lived snapshot of the campaign list.

use std::sync::Arc;

use async_lock::Mutex;
use crowdfund_base::{data_types::Timestamp, time::Clock};
use tracing::trace;

use crate::campaign::Campaign;

/// Keeps the last fetched campaign list for at most `ttl_millis` milliseconds.
///
/// The snapshot is dropped whenever a write goes through the gateway, so a client never
/// reads back its own stale state. Writes from other clients only become visible once
/// the snapshot expires.
pub struct SnapshotCache {
    ttl_millis: u64,
    clock: Arc<dyn Clock>,
    entry: Mutex<Option<(Timestamp, Vec<Campaign>)>>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    pub fn new(ttl_millis: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl_millis,
            clock,
            entry: Mutex::new(None),
        }
    }

    /// Returns a copy of the snapshot if it has not expired.
    pub async fn get(&self) -> Option<Vec<Campaign>> {
        let now = self.clock.current_time();
        let mut entry = self.entry.lock().await;
        if let Some((fetched_at, campaigns)) = &*entry {
            if now.millis_since(*fetched_at) < self.ttl_millis {
                trace!(count = campaigns.len(), "campaign snapshot hit");
                return Some(campaigns.clone());
            }
        }
        *entry = None;
        None
    }

    /// Replaces the snapshot.
    pub async fn insert(&self, campaigns: Vec<Campaign>) {
        let now = self.clock.current_time();
        *self.entry.lock().await = Some((now, campaigns));
    }

    /// Drops the snapshot.
    pub async fn invalidate(&self) {
        if self.entry.lock().await.take().is_some() {
            trace!("campaign snapshot invalidated");
        }
    }
}
