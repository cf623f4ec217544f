// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Match tracking between the writer and remote subscribers.
//!
//! [`MatchState`] is the only state shared between the send loop and the
//! middleware's callback threads. It holds the last subscriber count the
//! middleware reported; the send loop reads it without locking and treats a
//! stale value as harmless (writing with nobody matched is a skip).

use crate::dds::{DataWriterListener, PublicationMatchedStatus};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// How a match notification was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchChange {
    Matched,
    Unmatched,
    /// Delta was neither +1 nor -1; state untouched.
    Ignored,
}

/// Eventually-consistent count of matched subscribers.
#[derive(Debug, Default)]
pub struct MatchState {
    matched: AtomicI32,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last count reported by the middleware.
    pub fn matched_count(&self) -> i32 {
        self.matched.load(Ordering::Acquire)
    }

    pub fn has_subscribers(&self) -> bool {
        self.matched_count() > 0
    }

    /// Apply a match notification: `delta` is the change in matched readers,
    /// `total` the count after the change.
    pub fn on_match_changed(&self, delta: i32, total: i32) -> MatchChange {
        match delta {
            1 => {
                self.matched.store(total, Ordering::Release);
                tracing::info!("Publisher matched.");
                MatchChange::Matched
            }
            -1 => {
                self.matched.store(total, Ordering::Release);
                tracing::info!("Publisher unmatched.");
                MatchChange::Unmatched
            }
            other => {
                tracing::warn!(
                    "{} is not a valid value for PublicationMatchedStatus current count change.",
                    other
                );
                MatchChange::Ignored
            }
        }
    }
}

/// Writer listener that feeds publication-matched events into a [`MatchState`].
pub struct MatchListener {
    state: Arc<MatchState>,
}

impl MatchListener {
    pub fn new(state: Arc<MatchState>) -> Self {
        Self { state }
    }
}

impl DataWriterListener for MatchListener {
    fn on_publication_matched(&self, status: PublicationMatchedStatus) {
        let total = i32::try_from(status.current_count).unwrap_or(i32::MAX);
        self.state
            .on_match_changed(status.current_count_change, total);
    }

    fn on_offered_incompatible_qos(&self, policy_id: u32, policy_name: &str) {
        tracing::warn!(
            "Reader requested incompatible QoS: {} (policy id {})",
            policy_name,
            policy_id
        );
    }
}
