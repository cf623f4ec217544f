// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity tables and endpoint matching for the loopback middleware.
//!
//! # Architecture
//!
//! ```text
//! Registry (one per LoopbackMiddleware, behind a Mutex)
//! +-- participants: id -> { domain, types, child topics, child publishers }
//! +-- topics:       id -> { participant, MatchKey, writer refcount }
//! +-- publishers:   id -> { participant, listener, child writers }
//! +-- writers:      id -> { MatchKey, QoS, listener, matched readers, history }
//! +-- readers:      id -> { MatchKey, reliability, channel }
//!
//! MatchKey
//! +-- domain_id
//! +-- topic_name: Arc<str>
//! +-- type_id: FNV-1a of the type name
//! ```
//!
//! A writer and a reader match when their keys are equal and the writer's
//! reliability satisfies the reader's. Every
//! mutation returns the listener callbacks it caused as [`Notification`]s;
//! callers dispatch them after releasing the lock so a listener can call
//! back into the middleware.

use crate::dds::{
    DataWriterListener, DomainId, PublicationMatchedStatus, PublisherListener, Reliability,
    ReturnCode, TypeDescriptor, WriterHandle, WriterQos,
};
use crossbeam::channel::Sender;
use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroU64;
use std::sync::Arc;

/// Type-erased sample as stored in histories and reader queues.
pub(crate) type SampleRef = Arc<dyn Any + Send + Sync>;

/// DDS policy id of RELIABILITY (DDS v1.4 Sec.2.2.3).
const RELIABILITY_QOS_POLICY_ID: u32 = 11;

/// Match key for endpoint lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MatchKey {
    pub domain_id: DomainId,
    pub topic_name: Arc<str>,
    pub type_id: u32,
}

/// A listener callback to run once the registry lock is released.
pub(crate) enum Notification {
    Matched {
        writer: WriterHandle,
        listener: Arc<dyn DataWriterListener>,
        publisher_listener: Option<Arc<dyn PublisherListener>>,
        status: PublicationMatchedStatus,
    },
    IncompatibleQos {
        listener: Arc<dyn DataWriterListener>,
    },
}

impl Notification {
    pub(crate) fn dispatch(self) {
        match self {
            Notification::Matched {
                writer,
                listener,
                publisher_listener,
                status,
            } => {
                listener.on_publication_matched(status);
                if let Some(publisher_listener) = publisher_listener {
                    publisher_listener.on_publication_matched(writer, status);
                }
            }
            Notification::IncompatibleQos { listener } => {
                listener.on_offered_incompatible_qos(RELIABILITY_QOS_POLICY_ID, "RELIABILITY");
            }
        }
    }
}

pub(crate) fn dispatch_all(notifications: Vec<Notification>) {
    for notification in notifications {
        notification.dispatch();
    }
}

struct ParticipantEntry {
    domain_id: DomainId,
    name: String,
    types: HashMap<&'static str, &'static TypeDescriptor>,
    topics: HashSet<u64>,
    publishers: HashSet<u64>,
}

struct TopicEntry {
    participant: u64,
    key: MatchKey,
    writers: usize,
}

struct PublisherEntry {
    participant: u64,
    listener: Option<Arc<dyn PublisherListener>>,
    writers: HashSet<u64>,
}

struct WriterEntry {
    handle: WriterHandle,
    publisher: u64,
    topic: u64,
    key: MatchKey,
    qos: WriterQos,
    listener: Arc<dyn DataWriterListener>,
    publisher_listener: Option<Arc<dyn PublisherListener>>,
    matched: HashSet<u64>,
    total_count: u32,
    history: VecDeque<SampleRef>,
    written: u64,
}

impl WriterEntry {
    fn status(&self, reader: u64, current_count_change: i32) -> PublicationMatchedStatus {
        PublicationMatchedStatus {
            total_count: self.total_count,
            total_count_change: i32::from(current_count_change > 0),
            current_count: u32::try_from(self.matched.len()).unwrap_or(u32::MAX),
            current_count_change,
            last_subscription_handle: Some(reader),
        }
    }

    fn notification(&self, status: PublicationMatchedStatus) -> Notification {
        Notification::Matched {
            writer: self.handle,
            listener: Arc::clone(&self.listener),
            publisher_listener: self.publisher_listener.clone(),
            status,
        }
    }

    fn try_match(&mut self, reader_id: u64, reader: &ReaderEntry) -> Option<Notification> {
        if self.key != reader.key {
            return None;
        }
        if !self.qos.reliability.satisfies(reader.reliability) {
            tracing::debug!(
                "Skipping match on '{}': writer {:?} incompatible with reader {:?}",
                self.key.topic_name,
                self.qos.reliability,
                reader.reliability
            );
            return Some(Notification::IncompatibleQos {
                listener: Arc::clone(&self.listener),
            });
        }
        self.matched.insert(reader_id);
        self.total_count += 1;
        Some(self.notification(self.status(reader_id, 1)))
    }

    fn record(&mut self, sample: SampleRef) {
        self.written += 1;
        self.history.push_back(sample);
        if let Some(depth) = self.qos.depth() {
            while self.history.len() > depth {
                self.history.pop_front();
            }
        }
    }
}

pub(crate) struct ReaderEntry {
    pub key: MatchKey,
    pub reliability: Reliability,
    pub tx: Sender<SampleRef>,
}

/// Every entity of one loopback middleware instance.
#[derive(Default)]
pub(crate) struct Registry {
    issued: u64,
    participants: HashMap<u64, ParticipantEntry>,
    topics: HashMap<u64, TopicEntry>,
    publishers: HashMap<u64, PublisherEntry>,
    writers: HashMap<u64, WriterEntry>,
    readers: HashMap<u64, ReaderEntry>,
}

impl Registry {
    /// Allocate a fresh handle id. Ids are never reused.
    pub fn allocate(&mut self) -> NonZeroU64 {
        let id = NonZeroU64::MIN.saturating_add(self.issued);
        self.issued += 1;
        id
    }

    /// Code for a handle that does not name a live entity.
    fn missing(&self, id: u64) -> ReturnCode {
        if id <= self.issued {
            ReturnCode::AlreadyDeleted
        } else {
            ReturnCode::BadParameter
        }
    }

    pub fn add_participant(&mut self, domain_id: DomainId, name: &str) -> NonZeroU64 {
        let id = self.allocate();
        self.participants.insert(
            id.get(),
            ParticipantEntry {
                domain_id,
                name: name.to_string(),
                types: HashMap::new(),
                topics: HashSet::new(),
                publishers: HashSet::new(),
            },
        );
        id
    }

    pub fn register_type(
        &mut self,
        participant: u64,
        descriptor: &'static TypeDescriptor,
    ) -> ReturnCode {
        let Some(entry) = self.participants.get_mut(&participant) else {
            return self.missing(participant);
        };
        match entry.types.get(descriptor.type_name) {
            Some(existing) if existing.type_id != descriptor.type_id => {
                ReturnCode::PreconditionNotMet
            }
            _ => {
                entry.types.insert(descriptor.type_name, descriptor);
                ReturnCode::Ok
            }
        }
    }

    pub fn add_topic(
        &mut self,
        participant: u64,
        name: &str,
        type_name: &str,
    ) -> Option<NonZeroU64> {
        let entry = self.participants.get(&participant)?;
        let Some(descriptor) = entry.types.get(type_name) else {
            tracing::warn!(
                "Type '{}' not registered on participant '{}'",
                type_name,
                entry.name
            );
            return None;
        };
        let key = MatchKey {
            domain_id: entry.domain_id,
            topic_name: Arc::from(name),
            type_id: descriptor.type_id,
        };
        let duplicate = entry
            .topics
            .iter()
            .filter_map(|id| self.topics.get(id))
            .any(|topic| *topic.key.topic_name == *name);
        if duplicate {
            tracing::warn!("Topic '{}' already exists on participant '{}'", name, entry.name);
            return None;
        }

        let id = self.allocate();
        self.topics.insert(
            id.get(),
            TopicEntry {
                participant,
                key,
                writers: 0,
            },
        );
        if let Some(entry) = self.participants.get_mut(&participant) {
            entry.topics.insert(id.get());
        }
        Some(id)
    }

    pub fn add_publisher(
        &mut self,
        participant: u64,
        listener: Option<Arc<dyn PublisherListener>>,
    ) -> Option<NonZeroU64> {
        if !self.participants.contains_key(&participant) {
            return None;
        }
        let id = self.allocate();
        self.publishers.insert(
            id.get(),
            PublisherEntry {
                participant,
                listener,
                writers: HashSet::new(),
            },
        );
        if let Some(entry) = self.participants.get_mut(&participant) {
            entry.publishers.insert(id.get());
        }
        Some(id)
    }

    /// Create a writer and match it against every existing reader.
    pub fn add_writer(
        &mut self,
        publisher: u64,
        topic: u64,
        qos: &WriterQos,
        listener: Arc<dyn DataWriterListener>,
    ) -> Option<(NonZeroU64, Vec<Notification>)> {
        let pub_entry = self.publishers.get(&publisher)?;
        let topic_entry = self.topics.get(&topic)?;
        if topic_entry.participant != pub_entry.participant {
            tracing::warn!("Topic and publisher belong to different participants");
            return None;
        }
        if let Err(e) = qos.validate() {
            tracing::warn!("Rejecting writer QoS: {}", e);
            return None;
        }
        let key = topic_entry.key.clone();
        let publisher_listener = pub_entry.listener.clone();

        let id = self.allocate();
        let mut writer = WriterEntry {
            handle: WriterHandle::from_raw(id),
            publisher,
            topic,
            key,
            qos: *qos,
            listener,
            publisher_listener,
            matched: HashSet::new(),
            total_count: 0,
            history: VecDeque::new(),
            written: 0,
        };
        let notifications = self
            .readers
            .iter()
            .filter_map(|(reader_id, reader)| writer.try_match(*reader_id, reader))
            .collect();

        self.writers.insert(id.get(), writer);
        if let Some(entry) = self.publishers.get_mut(&publisher) {
            entry.writers.insert(id.get());
        }
        if let Some(entry) = self.topics.get_mut(&topic) {
            entry.writers += 1;
        }
        Some((id, notifications))
    }

    /// Register a reader and match it against every existing writer.
    pub fn add_reader(&mut self, reader: ReaderEntry) -> (NonZeroU64, Vec<Notification>) {
        let id = self.allocate();
        let notifications = self
            .writers
            .values_mut()
            .filter_map(|writer| writer.try_match(id.get(), &reader))
            .collect();
        self.readers.insert(id.get(), reader);
        (id, notifications)
    }

    /// Remove a reader, unmatching it from every writer it was matched with.
    pub fn remove_reader(&mut self, reader: u64) -> Vec<Notification> {
        if self.readers.remove(&reader).is_none() {
            return Vec::new();
        }
        self.writers
            .values_mut()
            .filter_map(|writer| {
                writer
                    .matched
                    .remove(&reader)
                    .then(|| writer.notification(writer.status(reader, -1)))
            })
            .collect()
    }

    /// Number of writers a reader is matched with.
    pub fn reader_matches(&self, reader: u64) -> usize {
        self.writers
            .values()
            .filter(|writer| writer.matched.contains(&reader))
            .count()
    }

    pub fn write(&mut self, writer: u64, type_id: u32, sample: SampleRef) -> ReturnCode {
        let missing = self.missing(writer);
        let Some(entry) = self.writers.get_mut(&writer) else {
            return missing;
        };
        if entry.key.type_id != type_id {
            return ReturnCode::PreconditionNotMet;
        }

        for reader in entry.matched.iter().filter_map(|id| self.readers.get(id)) {
            // A closed channel means the reader is being dropped right now.
            let _ = reader.tx.send(Arc::clone(&sample));
        }
        entry.record(sample);
        ReturnCode::Ok
    }

    pub fn remove_writer(&mut self, publisher: u64, writer: u64) -> ReturnCode {
        let Some(entry) = self.writers.get(&writer) else {
            return self.missing(writer);
        };
        if entry.publisher != publisher {
            return ReturnCode::PreconditionNotMet;
        }
        let topic = entry.topic;
        self.writers.remove(&writer);
        if let Some(entry) = self.publishers.get_mut(&publisher) {
            entry.writers.remove(&writer);
        }
        if let Some(entry) = self.topics.get_mut(&topic) {
            entry.writers = entry.writers.saturating_sub(1);
        }
        ReturnCode::Ok
    }

    pub fn remove_publisher(&mut self, participant: u64, publisher: u64) -> ReturnCode {
        let Some(entry) = self.publishers.get(&publisher) else {
            return self.missing(publisher);
        };
        if entry.participant != participant || !entry.writers.is_empty() {
            return ReturnCode::PreconditionNotMet;
        }
        self.publishers.remove(&publisher);
        if let Some(entry) = self.participants.get_mut(&participant) {
            entry.publishers.remove(&publisher);
        }
        ReturnCode::Ok
    }

    pub fn remove_topic(&mut self, participant: u64, topic: u64) -> ReturnCode {
        let Some(entry) = self.topics.get(&topic) else {
            return self.missing(topic);
        };
        if entry.participant != participant || entry.writers > 0 {
            return ReturnCode::PreconditionNotMet;
        }
        self.topics.remove(&topic);
        if let Some(entry) = self.participants.get_mut(&participant) {
            entry.topics.remove(&topic);
        }
        ReturnCode::Ok
    }

    pub fn remove_participant(&mut self, participant: u64) -> ReturnCode {
        let Some(entry) = self.participants.get(&participant) else {
            return self.missing(participant);
        };
        if !entry.topics.is_empty() || !entry.publishers.is_empty() {
            return ReturnCode::PreconditionNotMet;
        }
        self.participants.remove(&participant);
        ReturnCode::Ok
    }

    pub fn history_len(&self, writer: u64) -> Option<usize> {
        self.writers.get(&writer).map(|entry| entry.history.len())
    }

    pub fn samples_written(&self, writer: u64) -> Option<u64> {
        self.writers.get(&writer).map(|entry| entry.written)
    }

    /// Live participants, topics, publishers and writers (readers excluded).
    pub fn entity_count(&self) -> usize {
        self.participants.len() + self.topics.len() + self.publishers.len() + self.writers.len()
    }
}
