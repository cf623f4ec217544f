// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS Listener Traits
//!
//! Listeners provide callback-based notification for writer-side events.
//!
//! # Thread Safety
//!
//! Listeners are called from middleware threads (discovery, matching), never
//! from the thread that owns the writer. They must be `Send + Sync` and
//! should not block or panic.

use super::handle::WriterHandle;

/// Status information for publication matching events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicationMatchedStatus {
    /// Total cumulative count of matched subscriptions.
    pub total_count: u32,
    /// Change in total_count since last callback.
    pub total_count_change: i32,
    /// Current number of matched subscriptions.
    pub current_count: u32,
    /// Change in current_count since last callback.
    pub current_count_change: i32,
    /// Handle of the last matched/unmatched subscription.
    pub last_subscription_handle: Option<u64>,
}

/// Listener for DataWriter events.
///
/// All methods have default no-op implementations.
///
/// # Example
///
/// ```ignore
/// struct MyWriterListener;
///
/// impl DataWriterListener for MyWriterListener {
///     fn on_publication_matched(&self, status: PublicationMatchedStatus) {
///         println!("Matched with {} readers", status.current_count);
///     }
/// }
/// ```
pub trait DataWriterListener: Send + Sync {
    /// Called when the writer matches or unmatches with a reader.
    fn on_publication_matched(&self, status: PublicationMatchedStatus) {
        let _ = status;
    }

    /// Called when QoS is incompatible with a discovered reader.
    ///
    /// # Arguments
    ///
    /// * `policy_id` - ID of the incompatible QoS policy
    /// * `policy_name` - Name of the policy (e.g., "RELIABILITY")
    fn on_offered_incompatible_qos(&self, policy_id: u32, policy_name: &str) {
        let _ = (policy_id, policy_name);
    }
}

/// Listener attached to a Publisher.
///
/// Receives the matching events of every writer the publisher owns, tagged
/// with the writer they concern.
pub trait PublisherListener: Send + Sync {
    fn on_publication_matched(&self, writer: WriterHandle, status: PublicationMatchedStatus) {
        let _ = (writer, status);
    }
}
