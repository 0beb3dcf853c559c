// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bulk submission types and the external transport seam.
//!
//! The sink does not talk to the store itself. It hands a slice of
//! [`BulkItem`]s to a [`BulkTransport`] implementation and interprets the
//! [`BulkResponse`] that comes back.

use crate::document::Document;
use std::time::Duration;

/// Errors produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One document prepared for a bulk submission.
#[derive(Debug, Clone)]
pub struct BulkItem {
    /// Target index name, resolved per record.
    pub index: String,
    /// The encoded document.
    pub document: Document,
    /// Explicit document id, when deterministic ids are enabled.
    pub id: Option<String>,
    /// Ingest pipeline to apply before indexing.
    pub pipeline: Option<String>,
    /// Mapping type required by pre-7 stores.
    pub doc_type: Option<&'static str>,
}

/// Per-item failure reported by the store.
#[derive(Debug, Clone)]
pub struct BulkFailure {
    /// Position of the failed item in the submitted batch.
    pub index: usize,
    /// Failure reason reported by the store.
    pub reason: String,
    /// Underlying cause, when the store reports one.
    pub cause: String,
}

/// Response to one bulk submission.
///
/// The transport call itself succeeded; individual items may still have
/// been rejected.
#[derive(Debug, Clone, Default)]
pub struct BulkResponse {
    /// Failures for rejected items. Empty means every item was indexed.
    pub failures: Vec<BulkFailure>,
}

impl BulkResponse {
    /// A response with every item indexed.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Whether any item was rejected.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// External transport performing the actual bulk call.
///
/// One call submits one whole batch. The implementation owns connection
/// management, authentication, and encoding of the bulk wire format; it
/// must respect `timeout` as the budget for the entire call.
pub trait BulkTransport {
    fn submit(&mut self, items: &[BulkItem], timeout: Duration) -> Result<BulkResponse, BoxError>;
}
