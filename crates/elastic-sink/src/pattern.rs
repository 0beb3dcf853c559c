// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Index and pipeline name templates.
//!
//! Templates mix literal text, date tokens, and tag placeholders:
//!
//! ```text
//! metrics-{{host}}-%Y.%m.%d
//! ```
//!
//! Date tokens (rendered from the metric timestamp in UTC):
//! - `%Y` - 4-digit year, `%y` - last two digits of year
//! - `%m` - month (01..12), `%d` - day of month (01..31)
//! - `%H` - hour (00..23)
//! - `%V` - ISO-8601 week number
//!
//! `{{tag_name}}` placeholders are filled from the metric's tag map.
//! Unrecognized `%` sequences pass through untouched.

use chrono::{DateTime, Datelike, Timelike, Utc};
use log::debug;
use std::collections::BTreeMap;

/// One piece of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal text, possibly containing date tokens.
    Literal(String),
    /// Index into the ordered tag-key list.
    Tag(usize),
}

/// A compiled name template.
///
/// Compilation happens once at setup; resolution runs per record. Each
/// `{{...}}` occurrence becomes an indexed slot, so a tag name appearing
/// as a substring of surrounding literal text cannot be substituted by
/// accident.
#[derive(Debug, Clone)]
pub struct IndexPattern {
    raw: String,
    segments: Vec<Segment>,
    tag_keys: Vec<String>,
    has_date_tokens: bool,
}

impl IndexPattern {
    /// Compile a raw template.
    ///
    /// Scans left to right for `{{`; a placeholder without a matching `}}`
    /// ends the scan and the remainder is kept as literal text. Placeholder
    /// names are trimmed. There is no escape syntax for a literal `{{`.
    pub fn compile(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut tag_keys = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            let Some(end) = rest[start + 2..].find("}}") else {
                // Unterminated placeholder: keep the remainder as-is.
                break;
            };
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let name = rest[start + 2..start + 2 + end].trim().to_string();
            segments.push(Segment::Tag(tag_keys.len()));
            tag_keys.push(name);
            rest = &rest[start + 2 + end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Self {
            raw: template.to_string(),
            segments,
            tag_keys,
            has_date_tokens: template.contains('%'),
        }
    }

    /// The template as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Tag keys in left-to-right occurrence order.
    pub fn tag_keys(&self) -> &[String] {
        &self.tag_keys
    }

    /// Resolve an index name for one record.
    ///
    /// Date tokens render from `timestamp_ns` in UTC. A tag missing from
    /// `tags` substitutes `default_tag_value` at its slot; this degrades
    /// the name rather than failing the record.
    pub fn resolve_index(
        &self,
        timestamp_ns: i64,
        tags: &BTreeMap<String, String>,
        default_tag_value: &str,
    ) -> String {
        let ts = DateTime::from_timestamp_nanos(timestamp_ns);
        let mut out = String::with_capacity(self.raw.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => {
                    if self.has_date_tokens && lit.contains('%') {
                        substitute_date_tokens(&mut out, lit, &ts);
                    } else {
                        out.push_str(lit);
                    }
                }
                Segment::Tag(i) => {
                    let key = &self.tag_keys[*i];
                    match tags.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            debug!(
                                "tag '{}' not found, using '{}' in index name",
                                key, default_tag_value
                            );
                            out.push_str(default_tag_value);
                        }
                    }
                }
            }
        }
        out
    }

    /// Resolve a pipeline name for one record.
    ///
    /// A template with no tag keys resolves to its raw form unchanged.
    /// A missing tag short-circuits: the whole result is
    /// `default_pipeline`, not a partially substituted name. An empty
    /// result means "no pipeline".
    pub fn resolve_pipeline(
        &self,
        tags: &BTreeMap<String, String>,
        default_pipeline: &str,
    ) -> String {
        if self.tag_keys.is_empty() {
            return self.raw.clone();
        }

        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Tag(i) => {
                    let key = &self.tag_keys[*i];
                    match tags.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            debug!(
                                "tag '{}' not found, reverting to default pipeline",
                                key
                            );
                            return default_pipeline.to_string();
                        }
                    }
                }
            }
        }
        out
    }
}

/// Append `literal` to `out` with recognized date tokens replaced by
/// UTC-rendered values. Unrecognized tokens and trailing `%` pass through.
fn substitute_date_tokens(out: &mut String, literal: &str, ts: &DateTime<Utc>) {
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('Y') => {
                chars.next();
                out.push_str(&format!("{:04}", ts.year()));
            }
            Some('y') => {
                chars.next();
                out.push_str(&format!("{:02}", ts.year() % 100));
            }
            Some('m') => {
                chars.next();
                out.push_str(&format!("{:02}", ts.month()));
            }
            Some('d') => {
                chars.next();
                out.push_str(&format!("{:02}", ts.day()));
            }
            Some('H') => {
                chars.next();
                out.push_str(&format!("{:02}", ts.hour()));
            }
            Some('V') => {
                chars.next();
                out.push_str(&ts.iso_week().week().to_string());
            }
            _ => out.push('%'),
        }
    }
}
