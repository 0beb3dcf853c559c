// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metric input record.
//!
//! A [`Metric`] is one time-series sample as produced by a collector:
//! a measurement name, a nanosecond timestamp, a tag map, a field map,
//! and a caller-supplied series-identity hash.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A value that can be stored in a metric field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 64-bit floating point. May be NaN or infinite.
    Float(f64),
    /// 64-bit signed integer.
    Integer(i64),
    /// UTF-8 string.
    String(String),
    /// Boolean value.
    Boolean(bool),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::String(v) => serializer.serialize_str(v),
            FieldValue::Boolean(v) => serializer.serialize_bool(*v),
        }
    }
}

/// One time-series sample.
#[derive(Debug, Clone)]
pub struct Metric {
    /// Measurement name.
    pub name: String,
    /// Sample time in nanoseconds since the Unix epoch.
    pub timestamp_ns: i64,
    /// Tag key-value pairs. Keys are unique.
    pub tags: BTreeMap<String, String>,
    /// Field key-value pairs.
    pub fields: BTreeMap<String, FieldValue>,
    /// Hash of the metric's tag-set/field-shape identity, supplied by the
    /// collector. Used as dedup input by [`crate::identity::document_id`].
    pub series_hash: u64,
}

impl Metric {
    /// Create a metric with no tags or fields.
    pub fn new(name: impl Into<String>, timestamp_ns: i64, series_hash: u64) -> Self {
        Self {
            name: name.into(),
            timestamp_ns,
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            series_hash,
        }
    }

    /// Add a tag, builder style.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Add a field, builder style.
    pub fn with_field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}
