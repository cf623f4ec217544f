// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Middleware return codes and write-result classification.

use std::fmt;

/// Standard DDS return codes (DDS v1.4 Sec.2.2.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ReturnCode {
    Ok = 0,
    Error = 1,
    Unsupported = 2,
    BadParameter = 3,
    PreconditionNotMet = 4,
    OutOfResources = 5,
    NotEnabled = 6,
    ImmutablePolicy = 7,
    InconsistentPolicy = 8,
    AlreadyDeleted = 9,
    Timeout = 10,
    NoData = 11,
    IllegalOperation = 12,
}

impl ReturnCode {
    /// Numeric value as carried by C middleware APIs.
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, ReturnCode::Ok)
    }

    /// Map a numeric code back to a variant.
    pub fn from_code(code: i32) -> Option<Self> {
        let rc = match code {
            0 => Self::Ok,
            1 => Self::Error,
            2 => Self::Unsupported,
            3 => Self::BadParameter,
            4 => Self::PreconditionNotMet,
            5 => Self::OutOfResources,
            6 => Self::NotEnabled,
            7 => Self::ImmutablePolicy,
            8 => Self::InconsistentPolicy,
            9 => Self::AlreadyDeleted,
            10 => Self::Timeout,
            11 => Self::NoData,
            12 => Self::IllegalOperation,
            _ => return None,
        };
        Some(rc)
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReturnCode::Ok => "RETCODE_OK",
            ReturnCode::Error => "RETCODE_ERROR",
            ReturnCode::Unsupported => "RETCODE_UNSUPPORTED",
            ReturnCode::BadParameter => "RETCODE_BAD_PARAMETER",
            ReturnCode::PreconditionNotMet => "RETCODE_PRECONDITION_NOT_MET",
            ReturnCode::OutOfResources => "RETCODE_OUT_OF_RESOURCES",
            ReturnCode::NotEnabled => "RETCODE_NOT_ENABLED",
            ReturnCode::ImmutablePolicy => "RETCODE_IMMUTABLE_POLICY",
            ReturnCode::InconsistentPolicy => "RETCODE_INCONSISTENT_POLICY",
            ReturnCode::AlreadyDeleted => "RETCODE_ALREADY_DELETED",
            ReturnCode::Timeout => "RETCODE_TIMEOUT",
            ReturnCode::NoData => "RETCODE_NO_DATA",
            ReturnCode::IllegalOperation => "RETCODE_ILLEGAL_OPERATION",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Classification of a `write()` return code as seen by the publisher client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Sample accepted by the writer.
    Ok,
    /// Writer refused the sample because a precondition does not hold.
    PreconditionNotMet,
    /// Any other non-ok code.
    Other(ReturnCode),
}

impl From<ReturnCode> for WriteOutcome {
    fn from(rc: ReturnCode) -> Self {
        match rc {
            ReturnCode::Ok => WriteOutcome::Ok,
            ReturnCode::PreconditionNotMet => WriteOutcome::PreconditionNotMet,
            other => WriteOutcome::Other(other),
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Ok => write!(f, "ok"),
            WriteOutcome::PreconditionNotMet => write!(f, "precondition not met"),
            WriteOutcome::Other(rc) => write!(f, "other {}", rc.code()),
        }
    }
}
