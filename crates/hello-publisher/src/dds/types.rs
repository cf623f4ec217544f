// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type support: descriptors handed to the middleware at type registration.
//!
//! A [`TypeDescriptor`] names a sample type and lists its top-level fields.
//! The middleware keys topics on the type name; the `type_id` (FNV-1a of the
//! name) is a cheap identity for lookups.

/// Field type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U32,
    String,
    SequenceU32,
}

/// Layout of a single top-level field
#[derive(Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Type descriptor: metadata for registration and endpoint matching
#[derive(Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub type_id: u32,            // FNV-1a hash of type_name
    pub type_name: &'static str, // e.g., "HelloWorld"
    pub is_variable_size: bool,  // true if contains sequence/string
    pub fields: &'static [FieldLayout],
}

impl TypeDescriptor {
    pub const fn new(type_name: &'static str, fields: &'static [FieldLayout]) -> Self {
        let mut is_variable_size = false;
        let mut i = 0;
        while i < fields.len() {
            if !matches!(fields[i].kind, FieldKind::U32) {
                is_variable_size = true;
            }
            i += 1;
        }
        Self {
            type_id: fnv1a(type_name.as_bytes()),
            type_name,
            is_variable_size,
            fields,
        }
    }
}

/// 32-bit FNV-1a.
pub const fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(0x0100_0193);
        i += 1;
    }
    hash
}

/// Contract for sample types that can be written through a [`Middleware`](super::Middleware).
///
/// Samples are cloned when an in-process middleware hands them to local
/// readers, hence the `Clone + 'static` bounds.
pub trait DdsType: Clone + Send + Sync + 'static {
    /// Static descriptor registered with the participant before topic creation.
    fn type_descriptor() -> &'static TypeDescriptor;

    /// Registered type name (shortcut for `type_descriptor().type_name`).
    fn type_name() -> &'static str {
        Self::type_descriptor().type_name
    }
}
