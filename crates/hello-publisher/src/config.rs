// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publisher configuration.
//!
//! Supports both programmatic and file-based configuration. Every field has
//! a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! domain_id = 0
//! payload_size = 4096
//! samples = 20
//! interval_ms = 500
//! ```

use crate::dds::{WriterQos, MAX_DOMAIN_ID};
use crate::message::MAX_PAYLOAD_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Publisher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// DDS domain to join.
    #[serde(default)]
    pub domain_id: u32,

    /// Participant name announced to the domain.
    #[serde(default = "default_participant_name")]
    pub participant_name: String,

    /// Topic the samples are written to.
    #[serde(default = "default_topic_name")]
    pub topic_name: String,

    /// Payload size in bytes (rounded down to whole 4-byte words).
    #[serde(default = "default_payload_size")]
    pub payload_size: usize,

    /// Number of samples to send before stopping.
    #[serde(default = "default_samples")]
    pub samples: u32,

    /// Pause between send attempts (milliseconds).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Keep-last history depth of the writer.
    #[serde(default = "default_history_depth")]
    pub history_depth: u32,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_participant_name() -> String {
    "Participant_publisher".to_string()
}

fn default_topic_name() -> String {
    "HelloWorldTopic".to_string()
}

fn default_payload_size() -> usize {
    crate::message::DEFAULT_PAYLOAD_SIZE
}

fn default_samples() -> u32 {
    10
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_history_depth() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            domain_id: 0,
            participant_name: default_participant_name(),
            topic_name: default_topic_name(),
            payload_size: default_payload_size(),
            samples: default_samples(),
            interval_ms: default_interval_ms(),
            history_depth: default_history_depth(),
            log_level: default_log_level(),
        }
    }
}

impl PublisherConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain_id > MAX_DOMAIN_ID {
            return Err(ConfigError::Invalid(format!(
                "domain_id {} out of range (must be 0-{})",
                self.domain_id, MAX_DOMAIN_ID
            )));
        }
        if self.participant_name.is_empty() {
            return Err(ConfigError::Invalid("participant_name is empty".into()));
        }
        if self.topic_name.is_empty() {
            return Err(ConfigError::Invalid("topic_name is empty".into()));
        }
        if self.payload_size > MAX_PAYLOAD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "payload_size {} exceeds maximum {}",
                self.payload_size, MAX_PAYLOAD_SIZE
            )));
        }
        self.writer_qos().validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Writer QoS: best-effort with keep-last `history_depth`.
    pub fn writer_qos(&self) -> WriterQos {
        WriterQos::best_effort_keep_last(self.history_depth)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Set the domain ID.
    pub fn domain_id(mut self, domain_id: u32) -> Self {
        self.domain_id = domain_id;
        self
    }

    /// Set the payload size in bytes.
    pub fn payload_size(mut self, bytes: usize) -> Self {
        self.payload_size = bytes;
        self
    }

    /// Set the number of samples to send.
    pub fn samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    /// Set the pause between send attempts.
    pub fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Set the keep-last history depth.
    pub fn history_depth(mut self, depth: u32) -> Self {
        self.history_depth = depth;
        self
    }

    /// Set the topic name.
    pub fn topic_name(mut self, name: impl Into<String>) -> Self {
        self.topic_name = name.into();
        self
    }
}
