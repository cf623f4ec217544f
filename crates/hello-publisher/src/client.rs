// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Publisher client
//!
//! Owns the four middleware entities a publishing application needs and
//! drives a fixed-count send loop over them.
//!
//! ```text
//! Uninitialized --init()--> Initializing --ok--> Ready --run()--> Running
//!       ^                        |                 ^                  |
//!       +-------- failure -------+                 +------ done ------+
//!
//! any state --shutdown()/drop--> ShuttingDown --> Terminated
//! ```
//!
//! Entities are acquired participant -> topic -> publisher -> writer and
//! released in the exact reverse order. A handle slot is `None` until its
//! entity exists and goes back to `None` once released, so teardown never
//! touches an entity that was not acquired.

use crate::config::PublisherConfig;
use crate::dds::{
    DdsType, Entity, Middleware, ParticipantHandle, ParticipantQos, PublisherHandle,
    PublisherQos, ReturnCode, TopicHandle, TopicQos, WriteOutcome, WriterHandle,
};
use crate::error::{Error, Result};
use crate::matched::{MatchListener, MatchState};
use crate::message::HelloWorld;
use crate::pacing::{CancelToken, Pacer};
use std::fmt;
use std::sync::Arc;

/// Lifecycle state of a [`PublisherClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Uninitialized,
    Initializing,
    Ready,
    Running,
    ShuttingDown,
    Terminated,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientState::Uninitialized => "uninitialized",
            ClientState::Initializing => "initializing",
            ClientState::Ready => "ready",
            ClientState::Running => "running",
            ClientState::ShuttingDown => "shutting down",
            ClientState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Result of a single [`PublisherClient::publish`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The writer accepted the sample.
    Sent { index: u32 },
    /// Nobody is matched; nothing was written and the index is unchanged.
    NoSubscribers,
    /// The writer refused the sample. The index was still consumed.
    Rejected { index: u32, outcome: WriteOutcome },
}

impl PublishOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, PublishOutcome::Sent { .. })
    }
}

/// Summary of a [`PublisherClient::run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Samples the writer accepted.
    pub sent: u32,
    /// Loop iterations, including skips and rejections.
    pub attempts: u64,
    /// Writes refused by the writer.
    pub rejected: u64,
    /// The loop stopped on its cancel token before reaching the target.
    pub cancelled: bool,
}

/// Periodic HelloWorld publisher over a [`Middleware`].
///
/// # Example
///
/// ```no_run
/// use hello_publisher::{LoopbackMiddleware, PublisherClient, PublisherConfig};
///
/// let mut client = PublisherClient::new(LoopbackMiddleware::new(), PublisherConfig::default());
/// client.init()?;
/// let report = client.run(10)?;
/// println!("sent {} samples", report.sent);
/// # Ok::<(), hello_publisher::Error>(())
/// ```
pub struct PublisherClient<M: Middleware> {
    middleware: M,
    config: PublisherConfig,
    state: ClientState,
    sample: HelloWorld,
    matched: Arc<MatchState>,
    participant: Option<ParticipantHandle>,
    topic: Option<TopicHandle>,
    publisher: Option<PublisherHandle>,
    writer: Option<WriterHandle>,
}

impl<M: Middleware> PublisherClient<M> {
    /// Create a client. No middleware entity exists until [`init`](Self::init).
    pub fn new(middleware: M, config: PublisherConfig) -> Self {
        Self {
            middleware,
            config,
            state: ClientState::Uninitialized,
            sample: HelloWorld::with_payload_size(0),
            matched: Arc::new(MatchState::new()),
            participant: None,
            topic: None,
            publisher: None,
            writer: None,
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// The outgoing sample (index of the last send attempt).
    pub fn sample(&self) -> &HelloWorld {
        &self.sample
    }

    /// Match state shared with the writer listener.
    pub fn match_state(&self) -> &Arc<MatchState> {
        &self.matched
    }

    pub fn matched_count(&self) -> i32 {
        self.matched.matched_count()
    }

    /// Validate the configuration, build the sample and acquire participant,
    /// type, topic, publisher and writer. On failure everything acquired so far is released and the
    /// client is back in `Uninitialized`.
    pub fn init(&mut self) -> Result<()> {
        if self.state != ClientState::Uninitialized {
            return Err(Error::InvalidState {
                operation: "init",
                state: self.state,
            });
        }
        self.state = ClientState::Initializing;

        match self.acquire() {
            Ok(()) => {
                self.state = ClientState::Ready;
                tracing::info!(
                    "Publisher ready on domain {} (topic {})",
                    self.config.domain_id,
                    self.config.topic_name
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Publisher init failed: {}", e);
                self.release();
                self.state = ClientState::Uninitialized;
                Err(e)
            }
        }
    }

    fn acquire(&mut self) -> Result<()> {
        self.config.validate()?;
        self.sample = HelloWorld::with_payload_size(self.config.payload_size);
        tracing::debug!("send {}", self.sample.payload_hex());

        let participant = self
            .middleware
            .create_participant(
                self.config.domain_id,
                &ParticipantQos::named(self.config.participant_name.as_str()),
            )
            .ok_or(Error::Acquire {
                entity: Entity::Participant,
                code: None,
            })?;
        self.participant = Some(participant);

        let rc = self
            .middleware
            .register_type(participant, HelloWorld::type_descriptor());
        if !rc.is_ok() {
            return Err(Error::Acquire {
                entity: Entity::Type,
                code: Some(rc),
            });
        }

        let topic = self
            .middleware
            .create_topic(
                participant,
                &self.config.topic_name,
                HelloWorld::type_name(),
                &TopicQos::default(),
            )
            .ok_or(Error::Acquire {
                entity: Entity::Topic,
                code: None,
            })?;
        self.topic = Some(topic);

        let publisher = self
            .middleware
            .create_publisher(participant, &PublisherQos::default(), None)
            .ok_or(Error::Acquire {
                entity: Entity::Publisher,
                code: None,
            })?;
        self.publisher = Some(publisher);

        let qos = self.config.writer_qos();
        tracing::info!(
            "Creating reliability for datawriter: {:?}, history {:?}",
            qos.reliability,
            qos.history
        );
        tracing::info!("Creating datawriter: {}", self.config.topic_name);
        let listener = Arc::new(MatchListener::new(Arc::clone(&self.matched)));
        let writer = match self
            .middleware
            .create_writer(publisher, topic, &qos, listener)
        {
            Some(writer) => writer,
            None => {
                tracing::warn!("Datawriter not created");
                return Err(Error::Acquire {
                    entity: Entity::Writer,
                    code: None,
                });
            }
        };
        self.writer = Some(writer);
        tracing::info!("Datawriter created.");

        Ok(())
    }

    /// Send one sample if at least one subscriber is matched.
    ///
    /// The index is bumped before every write attempt, so a rejected write
    /// still consumes an index. With nobody matched the sample is untouched.
    pub fn publish(&mut self) -> Result<PublishOutcome> {
        let writer = self.active_writer("publish")?;
        Ok(self.publish_with(writer))
    }

    fn active_writer(&self, operation: &'static str) -> Result<WriterHandle> {
        match (self.state, self.writer) {
            (ClientState::Ready | ClientState::Running, Some(writer)) => Ok(writer),
            (state, _) => Err(Error::InvalidState { operation, state }),
        }
    }

    fn publish_with(&mut self, writer: WriterHandle) -> PublishOutcome {
        if !self.matched.has_subscribers() {
            return PublishOutcome::NoSubscribers;
        }

        let index = self.sample.advance();
        let outcome = WriteOutcome::from(self.middleware.write(writer, &self.sample));
        match outcome {
            WriteOutcome::Ok => {
                tracing::debug!("write succeeded: {}", outcome);
                PublishOutcome::Sent { index }
            }
            _ => {
                tracing::warn!("write failed: {}", outcome);
                PublishOutcome::Rejected { index, outcome }
            }
        }
    }

    /// Send `samples` samples, pausing the configured interval after every
    /// attempt. Returns once all of them were accepted.
    pub fn run(&mut self, samples: u32) -> Result<RunReport> {
        self.run_until(samples, &CancelToken::new())
    }

    /// Like [`run`](Self::run), but stops early once `cancel` fires. The
    /// pause between attempts wakes up immediately on cancellation.
    pub fn run_until(&mut self, samples: u32, cancel: &CancelToken) -> Result<RunReport> {
        if self.state != ClientState::Ready {
            return Err(Error::InvalidState {
                operation: "run",
                state: self.state,
            });
        }
        let writer = self.active_writer("run")?;

        self.state = ClientState::Running;
        let mut report = RunReport::default();
        let mut pacer = Pacer::new(self.config.interval());

        while report.sent < samples {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            report.attempts += 1;
            match self.publish_with(writer) {
                PublishOutcome::Sent { index } => {
                    report.sent += 1;
                    tracing::info!(
                        "Message: {} with index: {} SENT",
                        self.sample.message,
                        index
                    );
                }
                PublishOutcome::Rejected { .. } => report.rejected += 1,
                PublishOutcome::NoSubscribers => {
                    tracing::trace!("No matched subscriber, skipping");
                }
            }

            if report.sent >= samples {
                break;
            }
            if pacer.wait(cancel) {
                report.cancelled = true;
                break;
            }
        }

        if report.cancelled {
            tracing::info!(
                "Send loop cancelled after {}/{} samples",
                report.sent,
                samples
            );
        }
        self.state = ClientState::Ready;
        Ok(report)
    }

    /// Release every held entity in reverse acquisition order.
    ///
    /// Runs once; later calls (including the one from `Drop`) do nothing.
    pub fn shutdown(&mut self) {
        if matches!(
            self.state,
            ClientState::ShuttingDown | ClientState::Terminated
        ) {
            return;
        }
        self.state = ClientState::ShuttingDown;
        self.release();
        self.state = ClientState::Terminated;
        tracing::debug!("Publisher terminated");
    }

    fn release(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Some(publisher) = self.publisher {
                let rc = self.middleware.delete_writer(publisher, writer);
                log_release(Entity::Writer, rc);
            }
        }
        if let Some(publisher) = self.publisher.take() {
            if let Some(participant) = self.participant {
                let rc = self.middleware.delete_publisher(participant, publisher);
                log_release(Entity::Publisher, rc);
            }
        }
        if let Some(topic) = self.topic.take() {
            if let Some(participant) = self.participant {
                let rc = self.middleware.delete_topic(participant, topic);
                log_release(Entity::Topic, rc);
            }
        }
        if let Some(participant) = self.participant.take() {
            let rc = self.middleware.delete_participant(participant);
            log_release(Entity::Participant, rc);
        }
    }
}

fn log_release(entity: Entity, rc: ReturnCode) {
    if rc.is_ok() {
        tracing::debug!("Deleted {}", entity);
    } else {
        tracing::warn!("Failed to delete {}: {}", entity, rc);
    }
}

impl<M: Middleware> Drop for PublisherClient<M> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
