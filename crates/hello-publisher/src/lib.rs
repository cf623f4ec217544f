// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HelloWorld DDS publisher
//!
//! A thin publishing client that joins a domain, creates a topic, publisher
//! and best-effort keep-last writer through a [`Middleware`], then sends a
//! fixed number of `HelloWorld` samples at a fixed rate while at least one
//! subscriber is matched.
//!
//! # Quick Start
//!
//! ```bash
//! # 10 samples of 1024-byte payload, one per second
//! hello-publisher
//!
//! # 4 KiB payload, 20 samples, every 250 ms
//! hello-publisher 4096 --samples 20 --interval-ms 250
//!
//! # Using config file
//! hello-publisher --config publisher.toml
//! ```
//!
//! # Library use
//!
//! ```no_run
//! use hello_publisher::{CancelToken, LoopbackMiddleware, PublisherClient, PublisherConfig};
//!
//! let config = PublisherConfig::default().samples(3);
//! let mut client = PublisherClient::new(LoopbackMiddleware::new(), config);
//! client.init()?;
//! let report = client.run_until(3, &CancelToken::new())?;
//! assert!(report.sent <= 3);
//! # Ok::<(), hello_publisher::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod dds;
pub mod error;
pub mod loopback;
pub mod matched;
pub mod message;
pub mod pacing;

pub use client::{ClientState, PublishOutcome, PublisherClient, RunReport};
pub use config::{ConfigError, PublisherConfig};
pub use dds::{Middleware, ReturnCode, WriteOutcome};
pub use error::{Error, Result};
pub use loopback::{LocalReader, LoopbackMiddleware};
pub use matched::{MatchChange, MatchListener, MatchState};
pub use message::{HelloWorld, DEFAULT_PAYLOAD_SIZE, MAX_PAYLOAD_SIZE, PAYLOAD_SENTINEL};
pub use pacing::{CancelToken, Pacer};
