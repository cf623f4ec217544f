// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the publisher client.

use crate::client::ClientState;
use crate::config::ConfigError;
use crate::dds::{Entity, ReturnCode};
use thiserror::Error;

/// Publisher errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The middleware refused to create an entity during `init`.
    #[error("failed to create {entity}{}", describe_code(.code))]
    Acquire {
        entity: Entity,
        code: Option<ReturnCode>,
    },

    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: ClientState,
    },

    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

fn describe_code(code: &Option<ReturnCode>) -> String {
    match code {
        Some(code) => format!(": {}", code),
        None => String::new(),
    }
}

/// Result type for publisher operations.
pub type Result<T> = std::result::Result<T, Error>;
