// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Elasticsearch sink engine for time-series metrics.
//!
//! This crate provides:
//! - Index and ingest-pipeline name resolution from templates mixing
//!   date tokens (`%Y %y %m %d %H %V`) with `{{tag}}` placeholders
//! - Document encoding with configurable handling of NaN/infinite floats
//! - Deterministic document ids for resend-as-overwrite semantics
//! - Bulk batch assembly and per-item failure classification
//!
//! # Overview
//!
//! The sink does NOT perform HTTP requests to the store. It prepares bulk
//! items and interprets bulk responses; any HTTP client can implement
//! [`BulkTransport`] to carry them.
//!
//! ```text
//! Metric --> IndexPattern --> encode_document --> ElasticSink --> BulkTransport
//! ```

pub mod bulk;
pub mod config;
pub mod document;
pub mod identity;
pub mod metric;
pub mod pattern;
pub mod sink;

pub use bulk::{BoxError, BulkFailure, BulkItem, BulkResponse, BulkTransport};
pub use config::{ConfigError, SinkConfig};
pub use document::{encode_document, Document, FloatPolicy};
pub use identity::document_id;
pub use metric::{FieldValue, Metric};
pub use pattern::IndexPattern;
pub use sink::{BatchReport, ElasticSink, SinkError, TargetSchema};
