// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::items_after_statements)] // Test helpers

//! Publisher client lifecycle against a scripted middleware.
//!
//! The middleware fails on demand at any acquisition step, replays a script
//! of write return codes and records every call, so acquisition order,
//! teardown order and the send loop can be checked exactly.

use hello_publisher::dds::{
    DataWriterListener, DdsType, DomainId, Entity, ParticipantHandle, ParticipantQos,
    PublicationMatchedStatus, PublisherHandle, PublisherListener, PublisherQos, TopicHandle,
    TopicQos, TypeDescriptor, WriterHandle, WriterQos,
};
use hello_publisher::{
    CancelToken, ClientState, Error, HelloWorld, Middleware, PublishOutcome, PublisherClient,
    PublisherConfig, ReturnCode, WriteOutcome,
};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::num::NonZeroU64;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Create(Entity),
    Delete(Entity),
}

#[derive(Default)]
struct ScriptedMiddleware {
    fail_at: Option<Entity>,
    calls: Mutex<Vec<Call>>,
    write_script: Mutex<VecDeque<ReturnCode>>,
    written: Mutex<Vec<u32>>,
    writer_qos: Mutex<Option<WriterQos>>,
    listener: Mutex<Option<Arc<dyn DataWriterListener>>>,
}

impl ScriptedMiddleware {
    fn failing_at(entity: Entity) -> Self {
        Self {
            fail_at: Some(entity),
            ..Self::default()
        }
    }

    fn with_writes(script: &[ReturnCode]) -> Self {
        Self {
            write_script: Mutex::new(script.iter().copied().collect()),
            ..Self::default()
        }
    }

    fn create(&self, entity: Entity, id: u64) -> Option<NonZeroU64> {
        if self.fail_at == Some(entity) {
            return None;
        }
        self.calls.lock().push(Call::Create(entity));
        NonZeroU64::new(id)
    }

    fn delete(&self, entity: Entity) -> ReturnCode {
        self.calls.lock().push(Call::Delete(entity));
        ReturnCode::Ok
    }

    fn deletes(&self) -> Vec<Entity> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Delete(entity) => Some(*entity),
                Call::Create(_) => None,
            })
            .collect()
    }

    fn notify(&self, current_count_change: i32, current_count: u32) {
        let listener = self.listener.lock().clone().expect("writer created");
        listener.on_publication_matched(PublicationMatchedStatus {
            current_count,
            current_count_change,
            ..Default::default()
        });
    }
}

impl Middleware for ScriptedMiddleware {
    fn create_participant(
        &self,
        _domain_id: DomainId,
        _qos: &ParticipantQos,
    ) -> Option<ParticipantHandle> {
        self.create(Entity::Participant, 1)
            .map(ParticipantHandle::from_raw)
    }

    fn register_type(
        &self,
        _participant: ParticipantHandle,
        _descriptor: &'static TypeDescriptor,
    ) -> ReturnCode {
        match self.create(Entity::Type, 2) {
            Some(_) => ReturnCode::Ok,
            None => ReturnCode::PreconditionNotMet,
        }
    }

    fn create_topic(
        &self,
        _participant: ParticipantHandle,
        _name: &str,
        _type_name: &str,
        _qos: &TopicQos,
    ) -> Option<TopicHandle> {
        self.create(Entity::Topic, 3).map(TopicHandle::from_raw)
    }

    fn create_publisher(
        &self,
        _participant: ParticipantHandle,
        _qos: &PublisherQos,
        _listener: Option<Arc<dyn PublisherListener>>,
    ) -> Option<PublisherHandle> {
        self.create(Entity::Publisher, 4)
            .map(PublisherHandle::from_raw)
    }

    fn create_writer(
        &self,
        _publisher: PublisherHandle,
        _topic: TopicHandle,
        qos: &WriterQos,
        listener: Arc<dyn DataWriterListener>,
    ) -> Option<WriterHandle> {
        let id = self.create(Entity::Writer, 5)?;
        *self.writer_qos.lock() = Some(*qos);
        *self.listener.lock() = Some(listener);
        Some(WriterHandle::from_raw(id))
    }

    fn write<T: DdsType>(&self, _writer: WriterHandle, sample: &T) -> ReturnCode {
        let sample: &dyn Any = sample;
        if let Some(hello) = sample.downcast_ref::<HelloWorld>() {
            self.written.lock().push(hello.index);
        }
        self.write_script.lock().pop_front().unwrap_or(ReturnCode::Ok)
    }

    fn delete_writer(&self, _publisher: PublisherHandle, _writer: WriterHandle) -> ReturnCode {
        self.delete(Entity::Writer)
    }

    fn delete_publisher(
        &self,
        _participant: ParticipantHandle,
        _publisher: PublisherHandle,
    ) -> ReturnCode {
        self.delete(Entity::Publisher)
    }

    fn delete_topic(&self, _participant: ParticipantHandle, _topic: TopicHandle) -> ReturnCode {
        self.delete(Entity::Topic)
    }

    fn delete_participant(&self, _participant: ParticipantHandle) -> ReturnCode {
        self.delete(Entity::Participant)
    }
}

fn config() -> PublisherConfig {
    PublisherConfig::default().interval_ms(0)
}

fn client(middleware: ScriptedMiddleware) -> PublisherClient<Arc<ScriptedMiddleware>> {
    PublisherClient::new(Arc::new(middleware), config())
}

#[test]
fn test_init_acquires_in_order_with_best_effort_keep_last() {
    let mut client = client(ScriptedMiddleware::default());
    client.init().expect("init");

    assert_eq!(client.state(), ClientState::Ready);
    assert_eq!(
        *client.middleware().calls.lock(),
        vec![
            Call::Create(Entity::Participant),
            Call::Create(Entity::Type),
            Call::Create(Entity::Topic),
            Call::Create(Entity::Publisher),
            Call::Create(Entity::Writer),
        ]
    );
    let qos = client.middleware().writer_qos.lock().expect("writer qos");
    assert_eq!(qos, WriterQos::best_effort_keep_last(1));
}

#[test]
fn test_init_failure_releases_acquired_in_reverse() {
    let steps = [
        (Entity::Participant, vec![]),
        (Entity::Type, vec![Entity::Participant]),
        (Entity::Topic, vec![Entity::Participant]),
        (Entity::Publisher, vec![Entity::Topic, Entity::Participant]),
        (
            Entity::Writer,
            vec![Entity::Publisher, Entity::Topic, Entity::Participant],
        ),
    ];

    for (failing, expected_deletes) in steps {
        let mw = Arc::new(ScriptedMiddleware::failing_at(failing));
        let mut client = PublisherClient::new(Arc::clone(&mw), config());

        match client.init() {
            Err(Error::Acquire { entity, .. }) => assert_eq!(entity, failing),
            other => panic!("expected acquire failure at {}, got {:?}", failing, other),
        }
        assert_eq!(client.state(), ClientState::Uninitialized);
        assert_eq!(mw.deletes(), expected_deletes, "failing at {}", failing);

        // Teardown after a failed init releases nothing more.
        drop(client);
        assert_eq!(mw.deletes(), expected_deletes, "failing at {}", failing);
    }
}

#[test]
fn test_type_registration_failure_reports_code() {
    let mut client = client(ScriptedMiddleware::failing_at(Entity::Type));
    match client.init() {
        Err(Error::Acquire { entity, code }) => {
            assert_eq!(entity, Entity::Type);
            assert_eq!(code, Some(ReturnCode::PreconditionNotMet));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_end_to_end_three_samples() {
    let mut client = client(ScriptedMiddleware::default());
    client.init().expect("init");
    client.middleware().notify(1, 1);
    assert_eq!(client.matched_count(), 1);

    let report = client.run(3).expect("run");

    assert_eq!(report.sent, 3);
    assert_eq!(report.attempts, 3);
    assert_eq!(*client.middleware().written.lock(), vec![1, 2, 3]);
    assert_eq!(client.sample().index, 3);
    assert_eq!(client.state(), ClientState::Ready);
}

#[test]
fn test_rejected_writes_consume_indices() {
    let mut client = client(ScriptedMiddleware::with_writes(&[
        ReturnCode::Ok,
        ReturnCode::PreconditionNotMet,
        ReturnCode::Error,
        ReturnCode::Ok,
        ReturnCode::Ok,
    ]));
    client.init().expect("init");
    client.middleware().notify(1, 1);

    let report = client.run(3).expect("run");

    assert_eq!(report.sent, 3);
    assert_eq!(report.rejected, 2);
    assert_eq!(report.attempts, 5);
    assert_eq!(*client.middleware().written.lock(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_publish_classifies_write_results() {
    let mut client = client(ScriptedMiddleware::with_writes(&[
        ReturnCode::PreconditionNotMet,
        ReturnCode::Timeout,
    ]));
    client.init().expect("init");
    client.middleware().notify(1, 2);

    assert_eq!(
        client.publish().expect("publish"),
        PublishOutcome::Rejected {
            index: 1,
            outcome: WriteOutcome::PreconditionNotMet
        }
    );
    assert_eq!(
        client.publish().expect("publish"),
        PublishOutcome::Rejected {
            index: 2,
            outcome: WriteOutcome::Other(ReturnCode::Timeout)
        }
    );
    assert_eq!(
        client.publish().expect("publish"),
        PublishOutcome::Sent { index: 3 }
    );
}

#[test]
fn test_unmatched_publish_never_mutates_index() {
    let mut client = client(ScriptedMiddleware::default());
    client.init().expect("init");

    for _ in 0..10 {
        assert!(!client.publish().expect("publish").is_sent());
    }
    client.middleware().notify(1, 1);
    client.middleware().notify(-1, 0);
    for _ in 0..10 {
        assert_eq!(
            client.publish().expect("publish"),
            PublishOutcome::NoSubscribers
        );
    }
    assert_eq!(client.sample().index, 0);
    assert!(client.middleware().written.lock().is_empty());
}

#[test]
fn test_invalid_match_delta_ignored() {
    let mut client = client(ScriptedMiddleware::default());
    client.init().expect("init");

    client.middleware().notify(1, 3);
    client.middleware().notify(0, 9);
    client.middleware().notify(2, 9);
    assert_eq!(client.matched_count(), 3);
}

#[test]
fn test_run_zero_sends_nothing() {
    let mut client = client(ScriptedMiddleware::default());
    client.init().expect("init");
    client.middleware().notify(1, 1);

    let report = client.run(0).expect("run");
    assert_eq!(report.sent, 0);
    assert_eq!(report.attempts, 0);
    assert!(client.middleware().written.lock().is_empty());
}

#[test]
fn test_cancel_stops_unmatched_loop() {
    let mw = Arc::new(ScriptedMiddleware::default());
    let mut client = PublisherClient::new(
        Arc::clone(&mw),
        PublisherConfig::default().interval_ms(5),
    );
    client.init().expect("init");

    let cancel = CancelToken::new();
    let remote = cancel.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        remote.cancel();
    });

    let report = client.run_until(10, &cancel).expect("run");
    canceller.join().expect("canceller");

    assert!(report.cancelled);
    assert_eq!(report.sent, 0);
    assert!(report.attempts >= 1);
    assert!(mw.written.lock().is_empty());
    assert_eq!(client.state(), ClientState::Ready);
}

#[test]
fn test_shutdown_runs_once() {
    let mw = Arc::new(ScriptedMiddleware::default());
    let mut client = PublisherClient::new(Arc::clone(&mw), config());
    client.init().expect("init");

    client.shutdown();
    assert_eq!(client.state(), ClientState::Terminated);
    assert_eq!(
        mw.deletes(),
        vec![
            Entity::Writer,
            Entity::Publisher,
            Entity::Topic,
            Entity::Participant
        ]
    );

    client.shutdown();
    drop(client);
    assert_eq!(mw.deletes().len(), 4);
}

#[test]
fn test_terminated_client_rejects_operations() {
    let mut client = client(ScriptedMiddleware::default());
    client.init().expect("init");
    client.shutdown();

    assert!(matches!(
        client.init(),
        Err(Error::InvalidState {
            state: ClientState::Terminated,
            ..
        })
    ));
    assert!(client.publish().is_err());
    assert!(client.run(1).is_err());
}
