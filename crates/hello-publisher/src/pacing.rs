// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-rate pacing and cooperative cancellation for the send loop.
//!
//! [`Pacer`] schedules iterations on a monotonic grid (`t0 + k * interval`)
//! so time spent publishing does not push later iterations back. When the
//! loop falls more than one interval behind, the grid is re-anchored on the
//! current instant instead of firing a burst of catch-up iterations.
//!
//! [`CancelToken`] is shared with signal handlers or other threads; waiting
//! on it returns early as soon as it is cancelled.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct CancelInner {
    cancelled: Mutex<bool>,
    cvar: Condvar,
}

/// Clonable stop signal checked by the send loop.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every waiter.
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock();
        *cancelled = true;
        self.inner.cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Block until `deadline` or cancellation. Returns `true` if cancelled.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            if self
                .inner
                .cvar
                .wait_until(&mut cancelled, deadline)
                .timed_out()
            {
                break;
            }
        }
        *cancelled
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Drift-free fixed-interval scheduler.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    next: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Deadline ending the current iteration, given the current instant.
    ///
    /// The first call anchors the grid at `now`.
    pub fn next_deadline(&mut self, now: Instant) -> Instant {
        let deadline = *self.next.get_or_insert(now + self.interval);
        let following = deadline + self.interval;
        self.next = Some(if following <= now {
            now + self.interval
        } else {
            following
        });
        deadline
    }

    /// Sleep until the end of the current iteration. Returns `true` if
    /// `cancel` fired while waiting.
    pub fn wait(&mut self, cancel: &CancelToken) -> bool {
        let deadline = self.next_deadline(Instant::now());
        cancel.wait_until(deadline)
    }
}
