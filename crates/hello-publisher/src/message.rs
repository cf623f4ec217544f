// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HelloWorld sample
//!
//! ```idl
//! struct HelloWorld {
//!     unsigned long index;
//!     string message;
//!     sequence<unsigned long> data;
//! };
//! ```
//!
//! The payload is sized once from a byte count and filled with a sentinel
//! word so receivers can check it arrived intact.

use crate::dds::{DdsType, FieldKind, FieldLayout, TypeDescriptor};

/// Registered type name.
pub const HELLO_WORLD_TYPE_NAME: &str = "HelloWorld";

/// Constant label carried by every sample.
pub const HELLO_WORLD_LABEL: &str = "HelloWorld";

/// Value of every payload word.
pub const PAYLOAD_SENTINEL: u32 = 0xDEAD_BEEF;

/// Payload size used when none is configured.
pub const DEFAULT_PAYLOAD_SIZE: usize = 1024;

/// Largest accepted payload size (64 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

const WORD_BYTES: usize = std::mem::size_of::<u32>();

const HELLO_WORLD_FIELDS: [FieldLayout; 3] = [
    FieldLayout {
        name: "index",
        kind: FieldKind::U32,
    },
    FieldLayout {
        name: "message",
        kind: FieldKind::String,
    },
    FieldLayout {
        name: "data",
        kind: FieldKind::SequenceU32,
    },
];

static HELLO_WORLD_DESCRIPTOR: TypeDescriptor =
    TypeDescriptor::new(HELLO_WORLD_TYPE_NAME, &HELLO_WORLD_FIELDS);

/// The unit of data the publisher sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloWorld {
    pub index: u32,
    pub message: String,
    pub data: Vec<u32>,
}

impl HelloWorld {
    /// Build a sample with index 0 and `payload_size / 4` sentinel words.
    pub fn with_payload_size(payload_size: usize) -> Self {
        Self {
            index: 0,
            message: HELLO_WORLD_LABEL.to_string(),
            data: vec![PAYLOAD_SENTINEL; Self::payload_words(payload_size)],
        }
    }

    /// Number of payload words for a byte size (partial words are dropped).
    pub const fn payload_words(payload_size: usize) -> usize {
        payload_size / WORD_BYTES
    }

    /// Payload as space-separated lowercase hex words.
    pub fn payload_hex(&self) -> String {
        self.data
            .iter()
            .map(|word| format!("{:x}", word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Bump the index for the next send attempt and return it.
    pub(crate) fn advance(&mut self) -> u32 {
        self.index = self.index.wrapping_add(1);
        self.index
    }
}

impl Default for HelloWorld {
    fn default() -> Self {
        Self::with_payload_size(DEFAULT_PAYLOAD_SIZE)
    }
}

impl DdsType for HelloWorld {
    fn type_descriptor() -> &'static TypeDescriptor {
        &HELLO_WORLD_DESCRIPTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_payload_is_256_words() {
        let hello = HelloWorld::default();
        assert_eq!(hello.index, 0);
        assert_eq!(hello.message, "HelloWorld");
        assert_eq!(hello.data.len(), 256);
    }

    #[test]
    fn test_payload_words_floor() {
        for size in [4usize, 5, 7, 8, 9, 1023, 1024, 4096] {
            let hello = HelloWorld::with_payload_size(size);
            assert_eq!(hello.data.len(), size / 4, "size {}", size);
            assert!(hello.data.iter().all(|w| *w == PAYLOAD_SENTINEL));
        }
    }

    #[test]
    fn test_payload_below_one_word_is_empty() {
        for size in 0..4 {
            assert!(HelloWorld::with_payload_size(size).data.is_empty());
        }
    }

    #[test]
    fn test_payload_hex() {
        let hello = HelloWorld::with_payload_size(8);
        assert_eq!(hello.payload_hex(), "deadbeef deadbeef");
        assert_eq!(HelloWorld::with_payload_size(0).payload_hex(), "");
    }

    #[test]
    fn test_advance_increments_by_one() {
        let mut hello = HelloWorld::with_payload_size(4);
        assert_eq!(hello.advance(), 1);
        assert_eq!(hello.advance(), 2);
        assert_eq!(hello.index, 2);
    }

    #[test]
    fn test_type_descriptor() {
        let desc = HelloWorld::type_descriptor();
        assert_eq!(desc.type_name, "HelloWorld");
        assert_eq!(HelloWorld::type_name(), "HelloWorld");
        assert!(desc.is_variable_size);
        assert_eq!(desc.fields.len(), 3);
        assert_eq!(desc.type_id, crate::dds::fnv1a(b"HelloWorld"));
    }
}
