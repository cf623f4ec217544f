// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process subscriber endpoint of the loopback middleware.

use super::registry::{dispatch_all, Registry, SampleRef};
use crate::dds::DdsType;
use crossbeam::channel::Receiver;
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::num::NonZeroU64;
use std::sync::Weak;
use std::time::{Duration, Instant};

/// Typed reader fed by every matched loopback writer.
///
/// Dropping the reader unmatches it; matched writers see a `-1` change.
pub struct LocalReader<T: DdsType> {
    id: NonZeroU64,
    rx: Receiver<SampleRef>,
    registry: Weak<Mutex<Registry>>,
    _type: PhantomData<fn() -> T>,
}

impl<T: DdsType> LocalReader<T> {
    pub(crate) fn new(
        id: NonZeroU64,
        rx: Receiver<SampleRef>,
        registry: Weak<Mutex<Registry>>,
    ) -> Self {
        Self {
            id,
            rx,
            registry,
            _type: PhantomData,
        }
    }

    /// Take the next queued sample without blocking.
    pub fn try_take(&self) -> Option<T> {
        while let Ok(sample) = self.rx.try_recv() {
            if let Some(value) = sample.downcast_ref::<T>() {
                return Some(value.clone());
            }
        }
        None
    }

    /// Wait up to `timeout` for the next sample.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        while let Ok(sample) = self.rx.recv_deadline(deadline) {
            if let Some(value) = sample.downcast_ref::<T>() {
                return Some(value.clone());
            }
        }
        None
    }

    /// Samples received but not taken yet.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Number of writers currently matched with this reader.
    pub fn matched_writers(&self) -> usize {
        self.registry
            .upgrade()
            .map(|registry| registry.lock().reader_matches(self.id.get()))
            .unwrap_or(0)
    }
}

impl<T: DdsType> Drop for LocalReader<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let notifications = registry.lock().remove_reader(self.id.get());
            dispatch_all(notifications);
        }
    }
}

impl<T: DdsType> std::fmt::Debug for LocalReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalReader")
            .field("id", &self.id)
            .field("type", &T::type_name())
            .field("pending", &self.pending())
            .finish()
    }
}
