// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Quality of Service policies consumed by the middleware contract.
//!
//! Only the policies the publisher client sets are modelled: reliability and
//! history on the writer and a name on the participant. Topic and publisher
//! QoS carry no policy yet and are passed as defaults.

/// Reliability policy
///
/// Determines delivery guarantees for samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Reliability {
    /// Fire-and-forget (no ACKs, no retransmission)
    #[default]
    BestEffort,
    /// Reliable delivery with retransmission
    Reliable,
}

impl Reliability {
    /// Whether a writer offering `self` satisfies a reader requesting `requested`.
    ///
    /// - Reliable writer -> any reader: compatible
    /// - BestEffort writer + BestEffort reader: compatible
    /// - BestEffort writer + Reliable reader: INCOMPATIBLE
    pub fn satisfies(self, requested: Reliability) -> bool {
        match (self, requested) {
            (Reliability::Reliable, _) => true,
            (Reliability::BestEffort, Reliability::BestEffort) => true,
            (Reliability::BestEffort, Reliability::Reliable) => false,
        }
    }
}

/// History policy
///
/// Determines how many samples the writer retains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum History {
    /// Keep last N samples (bounded queue, drops oldest)
    KeepLast(u32),
    /// Keep every sample written.
    KeepAll,
}

impl Default for History {
    fn default() -> Self {
        Self::KeepLast(1)
    }
}

/// Participant QoS (entity name only).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ParticipantQos {
    pub name: String,
}

impl ParticipantQos {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Topic QoS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TopicQos;

/// Publisher QoS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PublisherQos;

/// DataWriter QoS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WriterQos {
    pub reliability: Reliability,
    pub history: History,
}

impl WriterQos {
    /// Best-effort delivery with a bounded keep-last history.
    #[must_use]
    pub fn best_effort_keep_last(depth: u32) -> Self {
        Self {
            reliability: Reliability::BestEffort,
            history: History::KeepLast(depth),
        }
    }

    /// Validate QoS configuration
    ///
    /// - History::KeepLast(n) where n > 0
    pub fn validate(&self) -> Result<(), String> {
        if let History::KeepLast(0) = self.history {
            return Err("History::KeepLast(n) requires n > 0".to_string());
        }
        Ok(())
    }

    /// History depth, `None` for KeepAll.
    pub fn depth(&self) -> Option<usize> {
        match self.history {
            History::KeepLast(n) => Some(n as usize),
            History::KeepAll => None,
        }
    }
}
