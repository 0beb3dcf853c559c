// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Deterministic document ids.

use crate::metric::Metric;
use sha2::{Digest, Sha256};

/// Derive a stable document id for a metric.
///
/// The id is the lowercase-hex SHA-256 of the metric's nanosecond
/// timestamp, name, and series-identity hash, each rendered as decimal
/// text and concatenated. Re-sending the same point therefore overwrites
/// the stored document instead of duplicating it.
pub fn document_id(metric: &Metric) -> String {
    let mut hasher = Sha256::new();
    hasher.update(metric.timestamp_ns.to_string().as_bytes());
    hasher.update(metric.name.as_bytes());
    hasher.update(metric.series_hash.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
