// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pending-result store keyed by correlation id.
//!
//! Each outstanding request owns exactly one completion slot: a
//! `tokio::sync::oneshot` sender held here, with the matching receiver held
//! by the submitting caller. Publication and claiming are both O(1) map
//! operations, and a result can never be delivered to the wrong caller
//! because no caller ever touches another caller's slot.
//!
//! A caller that stops waiting removes its own slot (`abandon`), so a result
//! computed after the deadline finds no slot and is dropped at publish time.
//! That keeps memory bounded under sustained timeouts without any separate
//! expiry machinery.

use std::collections::HashMap;

use tokio::sync::{oneshot, Mutex};

/// One completion slot per outstanding request.
pub(crate) struct PendingResults {
    slots: Mutex<HashMap<u64, oneshot::Sender<Vec<f32>>>>,
}

impl PendingResults {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Register the completion slot for a freshly issued correlation id.
    pub async fn register(&self, id: u64, slot: oneshot::Sender<Vec<f32>>) {
        let previous = self.slots.lock().await.insert(id, slot);
        debug_assert!(previous.is_none(), "correlation id {id} reused while outstanding");
    }

    /// Deliver a result to the caller holding `id`.
    ///
    /// Returns `false` if the slot is gone (caller timed out or the
    /// receiver was dropped), in which case the result is discarded.
    pub async fn publish(&self, id: u64, output: Vec<f32>) -> bool {
        match self.slots.lock().await.remove(&id) {
            Some(slot) => slot.send(output).is_ok(),
            None => false,
        }
    }

    /// Remove a slot without delivering a result.
    ///
    /// Dropping the sender wakes the waiting caller (if any) with a closed
    /// channel, which the facade maps to "no result". Used by callers that
    /// time out and by the worker when it drops a failed batch.
    pub async fn abandon(&self, id: u64) -> bool {
        self.slots.lock().await.remove(&id).is_some()
    }

    /// Drop every slot, waking all waiting callers with "no result".
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }
}
