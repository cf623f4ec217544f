// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Middleware contract
//!
//! The publisher client never talks to a transport directly. It drives a
//! [`Middleware`]: a factory for participants, topics, publishers and
//! writers that also performs the actual `write()` and reports matching
//! through listener callbacks.
//!
//! ## Entity Hierarchy
//!
//! ```text
//! DomainParticipant
//! +-- registered types
//! +-- Topic (name, type name)
//! +-- Publisher
//!     +-- DataWriter  ------> Topic
//! ```
//!
//! Creation goes top-down, deletion bottom-up. A middleware reports a failed
//! creation with `None`; deletions and writes report a [`ReturnCode`].
//!
//! ## Implementations
//!
//! - [`crate::loopback::LoopbackMiddleware`] - in-process domain with local readers

mod handle;
/// Listener traits for callback-based notifications.
pub mod listener;
/// QoS policy definitions.
pub mod qos;
mod retcode;
mod types;

use std::sync::Arc;

pub use handle::{Entity, ParticipantHandle, PublisherHandle, TopicHandle, WriterHandle};
pub use listener::{DataWriterListener, PublicationMatchedStatus, PublisherListener};
pub use qos::{History, ParticipantQos, PublisherQos, Reliability, TopicQos, WriterQos};
pub use retcode::{ReturnCode, WriteOutcome};
pub use types::{fnv1a, DdsType, FieldKind, FieldLayout, TypeDescriptor};

/// Domain ID type (0-232 per DDS v1.4)
pub type DomainId = u32;

/// Highest valid domain id.
pub const MAX_DOMAIN_ID: DomainId = 232;

/// Pub-sub middleware as seen by a publishing client.
///
/// Every method may be called from the client's thread only; listener
/// callbacks registered through [`create_writer`](Middleware::create_writer)
/// may fire on any thread, at any time after the writer exists.
pub trait Middleware: Send + Sync {
    /// Join `domain_id`. `None` if the participant cannot be created.
    fn create_participant(
        &self,
        domain_id: DomainId,
        qos: &ParticipantQos,
    ) -> Option<ParticipantHandle>;

    /// Make `descriptor` usable as a topic type on `participant`.
    fn register_type(
        &self,
        participant: ParticipantHandle,
        descriptor: &'static TypeDescriptor,
    ) -> ReturnCode;

    fn create_topic(
        &self,
        participant: ParticipantHandle,
        name: &str,
        type_name: &str,
        qos: &TopicQos,
    ) -> Option<TopicHandle>;

    fn create_publisher(
        &self,
        participant: ParticipantHandle,
        qos: &PublisherQos,
        listener: Option<Arc<dyn PublisherListener>>,
    ) -> Option<PublisherHandle>;

    fn create_writer(
        &self,
        publisher: PublisherHandle,
        topic: TopicHandle,
        qos: &WriterQos,
        listener: Arc<dyn DataWriterListener>,
    ) -> Option<WriterHandle>;

    /// Publish one sample.
    fn write<T: DdsType>(&self, writer: WriterHandle, sample: &T) -> ReturnCode;

    fn delete_writer(&self, publisher: PublisherHandle, writer: WriterHandle) -> ReturnCode;

    fn delete_publisher(
        &self,
        participant: ParticipantHandle,
        publisher: PublisherHandle,
    ) -> ReturnCode;

    fn delete_topic(&self, participant: ParticipantHandle, topic: TopicHandle) -> ReturnCode;

    fn delete_participant(&self, participant: ParticipantHandle) -> ReturnCode;
}

impl<M: Middleware> Middleware for Arc<M> {
    fn create_participant(
        &self,
        domain_id: DomainId,
        qos: &ParticipantQos,
    ) -> Option<ParticipantHandle> {
        (**self).create_participant(domain_id, qos)
    }

    fn register_type(
        &self,
        participant: ParticipantHandle,
        descriptor: &'static TypeDescriptor,
    ) -> ReturnCode {
        (**self).register_type(participant, descriptor)
    }

    fn create_topic(
        &self,
        participant: ParticipantHandle,
        name: &str,
        type_name: &str,
        qos: &TopicQos,
    ) -> Option<TopicHandle> {
        (**self).create_topic(participant, name, type_name, qos)
    }

    fn create_publisher(
        &self,
        participant: ParticipantHandle,
        qos: &PublisherQos,
        listener: Option<Arc<dyn PublisherListener>>,
    ) -> Option<PublisherHandle> {
        (**self).create_publisher(participant, qos, listener)
    }

    fn create_writer(
        &self,
        publisher: PublisherHandle,
        topic: TopicHandle,
        qos: &WriterQos,
        listener: Arc<dyn DataWriterListener>,
    ) -> Option<WriterHandle> {
        (**self).create_writer(publisher, topic, qos, listener)
    }

    fn write<T: DdsType>(&self, writer: WriterHandle, sample: &T) -> ReturnCode {
        (**self).write(writer, sample)
    }

    fn delete_writer(&self, publisher: PublisherHandle, writer: WriterHandle) -> ReturnCode {
        (**self).delete_writer(publisher, writer)
    }

    fn delete_publisher(
        &self,
        participant: ParticipantHandle,
        publisher: PublisherHandle,
    ) -> ReturnCode {
        (**self).delete_publisher(participant, publisher)
    }

    fn delete_topic(&self, participant: ParticipantHandle, topic: TopicHandle) -> ReturnCode {
        (**self).delete_topic(participant, topic)
    }

    fn delete_participant(&self, participant: ParticipantHandle) -> ReturnCode {
        (**self).delete_participant(participant)
    }
}
