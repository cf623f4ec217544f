// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic

//! Publisher client end-to-end over the loopback middleware.

use hello_publisher::dds::Reliability;
use hello_publisher::{
    CancelToken, ClientState, HelloWorld, LoopbackMiddleware, PublishOutcome, PublisherClient,
    PublisherConfig, PAYLOAD_SENTINEL,
};
use std::time::Duration;

fn fast_config() -> PublisherConfig {
    PublisherConfig::default().interval_ms(1)
}

fn hello_reader(
    mw: &LoopbackMiddleware,
    domain_id: u32,
    reliability: Reliability,
) -> hello_publisher::LocalReader<HelloWorld> {
    mw.create_reader::<HelloWorld>(domain_id, "HelloWorldTopic", reliability)
        .expect("reader")
}

#[test]
fn test_local_reader_receives_every_sample() {
    let mw = LoopbackMiddleware::new();
    let reader = hello_reader(&mw, 0, Reliability::BestEffort);

    let mut client = PublisherClient::new(mw.clone(), fast_config().payload_size(64));
    client.init().expect("init");
    assert_eq!(client.matched_count(), 1);

    let report = client.run(3).expect("run");
    assert_eq!(report.sent, 3);

    let received: Vec<HelloWorld> = std::iter::from_fn(|| reader.try_take()).collect();
    assert_eq!(
        received.iter().map(|s| s.index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    for sample in &received {
        assert_eq!(sample.message, "HelloWorld");
        assert_eq!(sample.data.len(), 16);
        assert!(sample.data.iter().all(|w| *w == PAYLOAD_SENTINEL));
    }
}

#[test]
fn test_late_subscriber_starts_the_run() {
    let mw = LoopbackMiddleware::new();
    let mut client = PublisherClient::new(mw.clone(), fast_config().interval_ms(10));
    client.init().expect("init");

    let joiner = {
        let mw = mw.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            let reader = hello_reader(&mw, 0, Reliability::BestEffort);
            let first = reader.take_timeout(Duration::from_secs(5));
            (first, reader)
        })
    };

    let report = client.run(2).expect("run");
    let (first, _reader) = joiner.join().expect("joiner");

    assert_eq!(report.sent, 2);
    assert!(report.attempts > 2, "skips happen before the reader joins");
    // Skipped iterations did not consume an index.
    assert_eq!(first.map(|s| s.index), Some(1));
}

#[test]
fn test_reliable_reader_does_not_match_best_effort_writer() {
    let mw = LoopbackMiddleware::new();
    let reader = hello_reader(&mw, 0, Reliability::Reliable);

    let mut client = PublisherClient::new(mw.clone(), fast_config());
    client.init().expect("init");

    assert_eq!(client.matched_count(), 0);
    assert_eq!(reader.matched_writers(), 0);
    assert_eq!(
        client.publish().expect("publish"),
        PublishOutcome::NoSubscribers
    );
}

#[test]
fn test_reader_on_other_domain_is_ignored() {
    let mw = LoopbackMiddleware::new();
    let _reader = hello_reader(&mw, 5, Reliability::BestEffort);

    let mut client = PublisherClient::new(mw.clone(), fast_config());
    client.init().expect("init");
    assert_eq!(client.matched_count(), 0);
}

#[test]
fn test_reader_departure_unmatches() {
    let mw = LoopbackMiddleware::new();
    let mut client = PublisherClient::new(mw.clone(), fast_config());
    client.init().expect("init");

    let first = hello_reader(&mw, 0, Reliability::BestEffort);
    let second = hello_reader(&mw, 0, Reliability::BestEffort);
    assert_eq!(client.matched_count(), 2);

    drop(first);
    assert_eq!(client.matched_count(), 1);
    assert!(client.publish().expect("publish").is_sent());
    assert_eq!(second.try_take().map(|s| s.index), Some(1));

    drop(second);
    assert_eq!(client.matched_count(), 0);
    assert_eq!(
        client.publish().expect("publish"),
        PublishOutcome::NoSubscribers
    );
}

#[test]
fn test_shutdown_leaves_no_entities() {
    let mw = LoopbackMiddleware::new();
    let mut client = PublisherClient::new(mw.clone(), fast_config());
    client.init().expect("init");
    assert_eq!(mw.entity_count(), 4);

    client.shutdown();
    assert_eq!(client.state(), ClientState::Terminated);
    assert_eq!(mw.entity_count(), 0);
}

#[test]
fn test_invalid_domain_fails_init_cleanly() {
    let mw = LoopbackMiddleware::new();
    let mut config = fast_config();
    config.domain_id = 500;
    let mut client = PublisherClient::new(mw.clone(), config);

    assert!(client.init().is_err());
    assert_eq!(client.state(), ClientState::Uninitialized);
    assert_eq!(mw.entity_count(), 0);
}

#[test]
fn test_cancel_without_subscribers() {
    let mw = LoopbackMiddleware::new();
    let mut client = PublisherClient::new(mw, fast_config().interval_ms(1000));
    client.init().expect("init");

    let cancel = CancelToken::new();
    let remote = cancel.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        remote.cancel();
    });

    let started = std::time::Instant::now();
    let report = client.run_until(10, &cancel).expect("run");
    canceller.join().expect("canceller");

    assert!(report.cancelled);
    assert_eq!(report.sent, 0);
    // Woken from the 1 s pause, not after it.
    assert!(started.elapsed() < Duration::from_millis(900));
}
