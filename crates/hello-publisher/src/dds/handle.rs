// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque entity handles issued by a middleware.
//!
//! A handle is only meaningful to the middleware that issued it. Handles are
//! never zero, so `Option<Handle>` is the "null or valid" slot the client
//! keeps for each entity it owns.

use std::fmt;
use std::num::NonZeroU64;

macro_rules! entity_handle {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU64);

        impl $name {
            pub const fn from_raw(id: NonZeroU64) -> Self {
                Self(id)
            }

            pub const fn raw(self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

entity_handle!(
    /// Handle to a domain participant.
    ParticipantHandle,
    "participant"
);
entity_handle!(
    /// Handle to a topic.
    TopicHandle,
    "topic"
);
entity_handle!(
    /// Handle to a publisher.
    PublisherHandle,
    "publisher"
);
entity_handle!(
    /// Handle to a data writer.
    WriterHandle,
    "writer"
);

/// Entities the publisher client acquires, in acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Participant,
    Type,
    Topic,
    Publisher,
    Writer,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Participant => "participant",
            Entity::Type => "type registration",
            Entity::Topic => "topic",
            Entity::Publisher => "publisher",
            Entity::Writer => "datawriter",
        };
        f.write_str(name)
    }
}
