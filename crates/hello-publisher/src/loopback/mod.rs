// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Loopback middleware
//!
//! In-process implementation of [`Middleware`]: entities live in a shared
//! registry, writers and [`LocalReader`]s on the same domain, topic and type
//! are matched immediately, and `write()` hands each matched reader a clone
//! of the sample. Nothing leaves the process.
//!
//! Clones share the same registry, so a publisher client and any number of
//! local readers can run on different threads against one domain space.
//!
//! ```no_run
//! use hello_publisher::dds::Reliability;
//! use hello_publisher::{HelloWorld, LoopbackMiddleware};
//!
//! let middleware = LoopbackMiddleware::new();
//! let reader = middleware
//!     .create_reader::<HelloWorld>(0, "HelloWorldTopic", Reliability::BestEffort)
//!     .expect("valid domain");
//! if let Some(sample) = reader.try_take() {
//!     println!("received index {}", sample.index);
//! }
//! ```

mod reader;
mod registry;

pub use reader::LocalReader;

use crate::dds::{
    DataWriterListener, DdsType, DomainId, Middleware, ParticipantHandle, ParticipantQos,
    PublisherHandle, PublisherListener, PublisherQos, Reliability, ReturnCode, TopicHandle,
    TopicQos, TypeDescriptor, WriterHandle, WriterQos, MAX_DOMAIN_ID,
};
use parking_lot::Mutex;
use registry::{dispatch_all, MatchKey, ReaderEntry, Registry, SampleRef};
use std::sync::Arc;

/// Process-local middleware.
#[derive(Clone, Default)]
pub struct LoopbackMiddleware {
    registry: Arc<Mutex<Registry>>,
}

impl LoopbackMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader on `topic_name` for samples of type `T`.
    ///
    /// Returns `None` for an out-of-range domain.
    pub fn create_reader<T: DdsType>(
        &self,
        domain_id: DomainId,
        topic_name: &str,
        reliability: Reliability,
    ) -> Option<LocalReader<T>> {
        if domain_id > MAX_DOMAIN_ID {
            tracing::warn!("Invalid domain id {} for reader", domain_id);
            return None;
        }
        let (tx, rx) = crossbeam::channel::unbounded();
        let entry = ReaderEntry {
            key: MatchKey {
                domain_id,
                topic_name: Arc::from(topic_name),
                type_id: T::type_descriptor().type_id,
            },
            reliability,
            tx,
        };
        let (id, notifications) = self.registry.lock().add_reader(entry);
        dispatch_all(notifications);
        tracing::debug!("Local reader created on '{}'", topic_name);
        Some(LocalReader::new(id, rx, Arc::downgrade(&self.registry)))
    }

    /// Samples currently retained in a writer's history.
    pub fn history_len(&self, writer: WriterHandle) -> Option<usize> {
        self.registry.lock().history_len(writer.raw())
    }

    /// Samples accepted by a writer since it was created.
    pub fn samples_written(&self, writer: WriterHandle) -> Option<u64> {
        self.registry.lock().samples_written(writer.raw())
    }

    /// Live participants, topics, publishers and writers.
    pub fn entity_count(&self) -> usize {
        self.registry.lock().entity_count()
    }
}

impl Middleware for LoopbackMiddleware {
    fn create_participant(
        &self,
        domain_id: DomainId,
        qos: &ParticipantQos,
    ) -> Option<ParticipantHandle> {
        if domain_id > MAX_DOMAIN_ID {
            tracing::warn!(
                "Invalid domain id {} (must be 0-{})",
                domain_id,
                MAX_DOMAIN_ID
            );
            return None;
        }
        let id = self.registry.lock().add_participant(domain_id, &qos.name);
        tracing::debug!("Participant '{}' joined domain {}", qos.name, domain_id);
        Some(ParticipantHandle::from_raw(id))
    }

    fn register_type(
        &self,
        participant: ParticipantHandle,
        descriptor: &'static TypeDescriptor,
    ) -> ReturnCode {
        self.registry
            .lock()
            .register_type(participant.raw(), descriptor)
    }

    fn create_topic(
        &self,
        participant: ParticipantHandle,
        name: &str,
        type_name: &str,
        _qos: &TopicQos,
    ) -> Option<TopicHandle> {
        let id = self
            .registry
            .lock()
            .add_topic(participant.raw(), name, type_name)?;
        Some(TopicHandle::from_raw(id))
    }

    fn create_publisher(
        &self,
        participant: ParticipantHandle,
        _qos: &PublisherQos,
        listener: Option<Arc<dyn PublisherListener>>,
    ) -> Option<PublisherHandle> {
        let id = self
            .registry
            .lock()
            .add_publisher(participant.raw(), listener)?;
        Some(PublisherHandle::from_raw(id))
    }

    fn create_writer(
        &self,
        publisher: PublisherHandle,
        topic: TopicHandle,
        qos: &WriterQos,
        listener: Arc<dyn DataWriterListener>,
    ) -> Option<WriterHandle> {
        let created = self
            .registry
            .lock()
            .add_writer(publisher.raw(), topic.raw(), qos, listener);
        let (id, notifications) = created?;
        dispatch_all(notifications);
        Some(WriterHandle::from_raw(id))
    }

    fn write<T: DdsType>(&self, writer: WriterHandle, sample: &T) -> ReturnCode {
        let sample: SampleRef = Arc::new(sample.clone());
        self.registry
            .lock()
            .write(writer.raw(), T::type_descriptor().type_id, sample)
    }

    fn delete_writer(&self, publisher: PublisherHandle, writer: WriterHandle) -> ReturnCode {
        self.registry
            .lock()
            .remove_writer(publisher.raw(), writer.raw())
    }

    fn delete_publisher(
        &self,
        participant: ParticipantHandle,
        publisher: PublisherHandle,
    ) -> ReturnCode {
        self.registry
            .lock()
            .remove_publisher(participant.raw(), publisher.raw())
    }

    fn delete_topic(&self, participant: ParticipantHandle, topic: TopicHandle) -> ReturnCode {
        self.registry
            .lock()
            .remove_topic(participant.raw(), topic.raw())
    }

    fn delete_participant(&self, participant: ParticipantHandle) -> ReturnCode {
        self.registry.lock().remove_participant(participant.raw())
    }
}

impl std::fmt::Debug for LoopbackMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackMiddleware")
            .field("entities", &self.entity_count())
            .finish()
    }
}
