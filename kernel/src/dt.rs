// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Device description reader.
//!
//! Firmware hands the kernel a key/value tree describing each device to
//! probe. Drivers only see it through the [`DtNode`] trait, so the source of
//! the tree (a parsed blob, a table compiled into the board crate) does not
//! matter to them.
//!
//! [`DtObject`] is the in-memory implementation boards use to describe their
//! devices:
//!
//! ```rust,ignore
//! let pll = DtObject::new()
//!     .with("parent", "osc24m")
//!     .with("name", "dpll1")
//!     .with("channel", 0)
//!     .with("default", DtObject::new().with("enable", true));
//! ```

use alloc::string::String;
use alloc::vec::Vec;

/// Read access to one node of a device description.
///
/// Readers never fail: a missing key, or a key holding a value of another
/// type, yields the supplied default.
pub trait DtNode {
    fn read_string<'a>(&'a self, key: &str, default: Option<&'a str>) -> Option<&'a str>;
    fn read_int(&self, key: &str, default: i32) -> i32;
    fn read_long(&self, key: &str, default: i64) -> i64;
    /// Tri-state read: `None` when the key is absent or not a boolean.
    fn read_bool(&self, key: &str) -> Option<bool>;
    fn read_object(&self, key: &str) -> Option<&dyn DtNode>;
}

/// A value stored in a [`DtObject`].
#[derive(Clone, Debug, PartialEq)]
pub enum DtValue {
    Bool(bool),
    Int(i64),
    String(String),
    Object(DtObject),
}

impl From<bool> for DtValue {
    fn from(value: bool) -> Self {
        DtValue::Bool(value)
    }
}

impl From<i32> for DtValue {
    fn from(value: i32) -> Self {
        DtValue::Int(value.into())
    }
}

impl From<u32> for DtValue {
    fn from(value: u32) -> Self {
        DtValue::Int(value.into())
    }
}

impl From<i64> for DtValue {
    fn from(value: i64) -> Self {
        DtValue::Int(value)
    }
}

impl From<&str> for DtValue {
    fn from(value: &str) -> Self {
        DtValue::String(value.into())
    }
}

impl From<String> for DtValue {
    fn from(value: String) -> Self {
        DtValue::String(value)
    }
}

impl From<DtObject> for DtValue {
    fn from(value: DtObject) -> Self {
        DtValue::Object(value)
    }
}

/// An ordered set of key/value entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DtObject {
    entries: Vec<(String, DtValue)>,
}

impl DtObject {
    pub fn new() -> DtObject {
        DtObject {
            entries: Vec::new(),
        }
    }

    /// Builder form of [`DtObject::insert`].
    pub fn with<V: Into<DtValue>>(mut self, key: &str, value: V) -> DtObject {
        self.insert(key, value);
        self
    }

    /// Set `key` to `value`, replacing any previous value for `key`.
    pub fn insert<V: Into<DtValue>>(&mut self, key: &str, value: V) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.into(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DtValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl DtNode for DtObject {
    fn read_string<'a>(&'a self, key: &str, default: Option<&'a str>) -> Option<&'a str> {
        match self.get(key) {
            Some(DtValue::String(s)) => Some(s.as_str()),
            _ => default,
        }
    }

    fn read_int(&self, key: &str, default: i32) -> i32 {
        match self.get(key) {
            Some(DtValue::Int(v)) => i32::try_from(*v).unwrap_or(default),
            _ => default,
        }
    }

    fn read_long(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(DtValue::Int(v)) => *v,
            _ => default,
        }
    }

    fn read_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(DtValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    fn read_object(&self, key: &str) -> Option<&dyn DtNode> {
        match self.get(key) {
            Some(DtValue::Object(o)) => Some(o),
            _ => None,
        }
    }
}
