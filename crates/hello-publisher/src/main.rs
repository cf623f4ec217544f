// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HelloWorld publisher CLI
//!
//! Publishes `HelloWorld` samples on the loopback middleware. By default an
//! in-process subscriber joins the domain shortly after start-up so the run
//! can complete; pass `--no-local-subscriber` to watch the publisher skip
//! every iteration until cancelled.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 1024-byte payload, 10 samples, 1 s apart
//! hello-publisher
//!
//! # Payload size as the first argument
//! hello-publisher 4096
//!
//! # Using configuration file, CLI flags override it
//! hello-publisher --config publisher.toml --samples 3
//! ```

use clap::Parser;
use hello_publisher::dds::Reliability;
use hello_publisher::{
    CancelToken, ConfigError, HelloWorld, LoopbackMiddleware, PublisherClient, PublisherConfig,
    RunReport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Delay before the local subscriber joins.
const SUBSCRIBER_JOIN_DELAY: Duration = Duration::from_millis(1500);
const SUBSCRIBER_POLL: Duration = Duration::from_millis(100);

/// HelloWorld DDS publisher
#[derive(Parser, Debug)]
#[command(name = "hello-publisher")]
#[command(about = "Periodic HelloWorld publisher over a DDS-style middleware")]
#[command(version)]
struct Args {
    /// Payload size in bytes (rounded down to whole 4-byte words)
    size: Option<usize>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of samples to send
    #[arg(short = 'n', long)]
    samples: Option<u32>,

    /// Pause between send attempts (milliseconds)
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Domain ID
    #[arg(short, long)]
    domain: Option<u32>,

    /// Keep-last history depth of the writer
    #[arg(long)]
    depth: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Do not start the in-process subscriber
    #[arg(long)]
    no_local_subscriber: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(config, !args.no_local_subscriber) {
        Ok(report) => {
            if report.cancelled {
                tracing::info!("Stopped by user after {} samples", report.sent);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<PublisherConfig, ConfigError> {
    let mut config = match args.config {
        Some(ref path) => PublisherConfig::from_file(path)?,
        None => PublisherConfig::default(),
    };

    if let Some(size) = args.size {
        config.payload_size = size;
    }
    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = interval_ms;
    }
    if let Some(domain) = args.domain {
        config.domain_id = domain;
    }
    if let Some(depth) = args.depth {
        config.history_depth = depth;
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run(config: PublisherConfig, local_subscriber: bool) -> hello_publisher::Result<RunReport> {
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())?;

    let middleware = LoopbackMiddleware::new();
    let subscriber = if local_subscriber {
        LocalSubscriber::spawn(middleware.clone(), config.domain_id, &config.topic_name)
    } else {
        None
    };

    let samples = config.samples;
    let mut client = PublisherClient::new(middleware, config);

    tracing::info!("Starting publisher.");
    client.init()?;
    let report = client.run_until(samples, &cancel)?;
    tracing::info!(
        "Sent {}/{} samples in {} attempts ({} rejected)",
        report.sent,
        samples,
        report.attempts,
        report.rejected
    );
    client.shutdown();

    if let Some(subscriber) = subscriber {
        tracing::info!("Local subscriber received {} samples", subscriber.finish());
    }
    Ok(report)
}

/// In-process subscriber thread reading from the loopback domain.
struct LocalSubscriber {
    stop: CancelToken,
    handle: Option<JoinHandle<u32>>,
}

impl LocalSubscriber {
    fn spawn(middleware: LoopbackMiddleware, domain_id: u32, topic: &str) -> Option<Self> {
        let stop = CancelToken::new();
        let token = stop.clone();
        let topic = topic.to_string();

        let spawned = std::thread::Builder::new()
            .name("local-subscriber".into())
            .spawn(move || {
                if token.wait_until(Instant::now() + SUBSCRIBER_JOIN_DELAY) {
                    return 0;
                }
                let Some(reader) =
                    middleware.create_reader::<HelloWorld>(domain_id, &topic, Reliability::BestEffort)
                else {
                    return 0;
                };

                let mut received = 0;
                while !token.is_cancelled() {
                    if let Some(sample) = reader.take_timeout(SUBSCRIBER_POLL) {
                        received += 1;
                        tracing::info!(
                            "Message: {} with index: {} RECEIVED ({} words)",
                            sample.message,
                            sample.index,
                            sample.data.len()
                        );
                    }
                }
                received
            });

        match spawned {
            Ok(handle) => Some(Self {
                stop,
                handle: Some(handle),
            }),
            Err(e) => {
                tracing::warn!("Local subscriber not started: {}", e);
                None
            }
        }
    }

    /// Stop the thread and return how many samples it received.
    fn finish(mut self) -> u32 {
        self.stop.cancel();
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for LocalSubscriber {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
