// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Batch coordinator.
//!
//! [`ElasticSink`] ties configuration, name resolution, document encoding,
//! and identity hashing together: it assembles one bulk submission from a
//! slice of metrics, hands it to the transport, and classifies the outcome.

use crate::bulk::{BoxError, BulkItem, BulkResponse, BulkTransport};
use crate::config::{ConfigError, SinkConfig};
use crate::document::{encode_document, FloatPolicy};
use crate::identity::document_id;
use crate::metric::Metric;
use crate::pattern::IndexPattern;
use log::error;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Target store schema generation, fixed once at setup from the store's
/// reported major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSchema {
    /// Elasticsearch 5.x.
    Es5,
    /// Elasticsearch 6.x.
    Es6,
    /// Elasticsearch 7 and later.
    Es7Plus,
}

impl TargetSchema {
    /// Map a store-reported major version. Majors below 5 are unsupported.
    pub fn from_major(major: u32) -> Option<Self> {
        match major {
            0..=4 => None,
            5 => Some(TargetSchema::Es5),
            6 => Some(TargetSchema::Es6),
            _ => Some(TargetSchema::Es7Plus),
        }
    }

    /// Mapping type that pre-7 stores require on every bulk item.
    pub fn legacy_doc_type(self) -> Option<&'static str> {
        match self {
            TargetSchema::Es5 | TargetSchema::Es6 => Some("metrics"),
            TargetSchema::Es7Plus => None,
        }
    }
}

/// Outcome of one bulk submission.
///
/// Covers both sides of a partial failure: the store does not roll back
/// items it already indexed, so the caller gets the accepted indices as
/// well as the per-item diagnostics and decides whether partial success
/// is acceptable.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of items submitted.
    pub total: usize,
    /// Indices of items the store accepted, in batch order.
    pub succeeded: Vec<usize>,
    /// Per-item failures reported by the store.
    pub failures: Vec<crate::bulk::BulkFailure>,
}

impl BatchReport {
    fn from_response(total: usize, response: BulkResponse) -> Self {
        let failed: HashSet<usize> = response.failures.iter().map(|f| f.index).collect();
        let succeeded = (0..total).filter(|i| !failed.contains(i)).collect();
        Self {
            total,
            succeeded,
            failures: response.failures,
        }
    }
}

/// Errors from a batch submission.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("error sending bulk request to the store: {0}")]
    Transport(BoxError),

    #[error("store failed to index {} of {} metrics", .0.failures.len(), .0.total)]
    Rejected(BatchReport),
}

/// The sink engine.
///
/// Construction compiles the name templates and fixes the target schema;
/// everything here is read-only afterwards, so one sink can serve
/// concurrent batches.
pub struct ElasticSink {
    index_pattern: IndexPattern,
    pipeline_pattern: Option<IndexPattern>,
    default_tag_value: String,
    default_pipeline: String,
    float_policy: FloatPolicy,
    float_replacement: f64,
    force_document_id: bool,
    schema: TargetSchema,
    timeout: Duration,
}

impl ElasticSink {
    /// Build a sink from configuration and the store's major version.
    ///
    /// Fails fast on an empty index template or an unsupported version,
    /// before any metric is processed.
    pub fn new(config: &SinkConfig, store_major_version: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let schema = TargetSchema::from_major(store_major_version)
            .ok_or(ConfigError::UnsupportedVersion(store_major_version))?;

        let pipeline_pattern = if config.use_pipeline.is_empty() {
            None
        } else {
            Some(IndexPattern::compile(&config.use_pipeline))
        };

        Ok(Self {
            index_pattern: IndexPattern::compile(&config.index_name),
            pipeline_pattern,
            default_tag_value: config.default_tag_value.clone(),
            default_pipeline: config.default_pipeline.clone(),
            float_policy: config.float_handling,
            float_replacement: config.float_replacement_value,
            force_document_id: config.force_document_id,
            schema,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// The schema variant this sink targets.
    pub fn schema(&self) -> TargetSchema {
        self.schema
    }

    /// Resolve, encode, and wrap one metric as a bulk item.
    ///
    /// The index name is re-evaluated for every metric so each sample
    /// lands in the correct time-based index.
    pub fn prepare(&self, metric: &Metric) -> BulkItem {
        let index = self.index_pattern.resolve_index(
            metric.timestamp_ns,
            &metric.tags,
            &self.default_tag_value,
        );
        let document = encode_document(metric, self.float_policy, self.float_replacement);
        let id = self.force_document_id.then(|| document_id(metric));
        let pipeline = self
            .pipeline_pattern
            .as_ref()
            .map(|p| p.resolve_pipeline(&metric.tags, &self.default_pipeline))
            .filter(|name| !name.is_empty());

        BulkItem {
            index,
            document,
            id,
            pipeline,
            doc_type: self.schema.legacy_doc_type(),
        }
    }

    /// Submit one batch of metrics through the transport.
    ///
    /// An empty batch is a no-op: the transport is not invoked. A failed
    /// transport call fails the whole operation with no partial effect
    /// assumed. When the transport succeeds but the store rejects items,
    /// the error carries the full [`BatchReport`]; items the store
    /// accepted stay indexed. No retry happens here.
    pub fn write_batch<T: BulkTransport>(
        &self,
        transport: &mut T,
        metrics: &[Metric],
    ) -> Result<BatchReport, SinkError> {
        if metrics.is_empty() {
            return Ok(BatchReport {
                total: 0,
                succeeded: Vec::new(),
                failures: Vec::new(),
            });
        }

        let items: Vec<BulkItem> = metrics.iter().map(|m| self.prepare(m)).collect();

        let response = transport
            .submit(&items, self.timeout)
            .map_err(SinkError::Transport)?;

        let report = BatchReport::from_response(items.len(), response);
        if report.failures.is_empty() {
            Ok(report)
        } else {
            let first = &report.failures[0];
            error!(
                "store indexing failure, id: {}, error: {}, caused by: {}",
                first.index, first.reason, first.cause
            );
            Err(SinkError::Rejected(report))
        }
    }
}
