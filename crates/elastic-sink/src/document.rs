// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Document encoding.
//!
//! A [`Document`] is the store-ready form of one metric. Its wire layout
//! is fixed:
//!
//! ```json
//! {
//!   "@timestamp": "2024-03-05T00:00:00Z",
//!   "measurement_name": "cpu",
//!   "tag": { "host": "web01" },
//!   "cpu": { "usage": 42.5 }
//! }
//! ```
//!
//! The field bag sits under a key named after the measurement itself.

use crate::metric::{FieldValue, Metric};
use chrono::{DateTime, SecondsFormat};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Handling of NaN and infinite float field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatPolicy {
    /// Do not modify field values. Non-finite floats reach the store,
    /// which is expected to reject them.
    #[default]
    #[serde(alias = "")]
    None,
    /// Drop fields containing non-finite floats.
    Drop,
    /// Replace NaN and +inf with the configured replacement value, and
    /// -inf with its negation.
    Replace,
}

/// Store-ready form of one metric.
#[derive(Debug, Clone)]
pub struct Document {
    /// Sample time in nanoseconds since the Unix epoch.
    pub timestamp_ns: i64,
    /// Measurement name; also names the field-bag key.
    pub measurement_name: String,
    /// Full tag map, possibly empty.
    pub tags: BTreeMap<String, String>,
    /// Field bag after float-policy sanitization.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Sample time rendered as RFC 3339 in UTC.
    pub fn timestamp_rfc3339(&self) -> String {
        DateTime::from_timestamp_nanos(self.timestamp_ns)
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("@timestamp", &self.timestamp_rfc3339())?;
        map.serialize_entry("measurement_name", &self.measurement_name)?;
        map.serialize_entry("tag", &self.tags)?;
        map.serialize_entry(&self.measurement_name, &self.fields)?;
        map.end()
    }
}

/// Encode one metric as a document, applying the float policy.
///
/// The metric is not mutated; sanitization works on a copy of its field
/// map. `replacement` is only consulted under [`FloatPolicy::Replace`].
pub fn encode_document(metric: &Metric, policy: FloatPolicy, replacement: f64) -> Document {
    let mut fields = BTreeMap::new();

    for (key, value) in &metric.fields {
        let v = match value {
            FieldValue::Float(v) if !v.is_finite() => *v,
            other => {
                fields.insert(key.clone(), other.clone());
                continue;
            }
        };
        match policy {
            FloatPolicy::None => {
                fields.insert(key.clone(), FieldValue::Float(v));
            }
            FloatPolicy::Drop => {}
            FloatPolicy::Replace => {
                let sanitized = if v == f64::NEG_INFINITY {
                    -replacement
                } else {
                    replacement
                };
                fields.insert(key.clone(), FieldValue::Float(sanitized));
            }
        }
    }

    Document {
        timestamp_ns: metric.timestamp_ns,
        measurement_name: metric.name.clone(),
        tags: metric.tags.clone(),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Metric;

    // 2024-03-05T00:00:00Z
    const MARCH_5_2024_NS: i64 = 1_709_596_800_000_000_000;

    fn sample_metric() -> Metric {
        Metric::new("cpu", MARCH_5_2024_NS, 1)
            .with_tag("host", "web01")
            .with_field("usage", FieldValue::Float(42.5))
            .with_field("cores", FieldValue::Integer(8))
    }

    #[test]
    fn test_encode_wire_layout() {
        let doc = encode_document(&sample_metric(), FloatPolicy::None, 0.0);
        let json = serde_json::to_value(&doc).expect("serialize");

        assert_eq!(json["@timestamp"], "2024-03-05T00:00:00Z");
        assert_eq!(json["measurement_name"], "cpu");
        assert_eq!(json["tag"]["host"], "web01");
        assert_eq!(json["cpu"]["usage"], 42.5);
        assert_eq!(json["cpu"]["cores"], 8);
    }

    #[test]
    fn test_encode_empty_tag_map_still_present() {
        let metric = Metric::new("mem", MARCH_5_2024_NS, 1)
            .with_field("used", FieldValue::Integer(100));
        let doc = encode_document(&metric, FloatPolicy::None, 0.0);
        let json = serde_json::to_value(&doc).expect("serialize");

        assert!(json["tag"].as_object().expect("tag object").is_empty());
        assert_eq!(json["measurement_name"], "mem");
    }

    #[test]
    fn test_encode_pass_through_keeps_non_finite() {
        let metric = Metric::new("cpu", MARCH_5_2024_NS, 1)
            .with_field("bad", FieldValue::Float(f64::NAN));
        let doc = encode_document(&metric, FloatPolicy::None, 0.0);

        match doc.fields.get("bad") {
            Some(FieldValue::Float(v)) => assert!(v.is_nan()),
            other => panic!("expected NaN float, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_drop_removes_non_finite_only() {
        let metric = sample_metric()
            .with_field("nan", FieldValue::Float(f64::NAN))
            .with_field("inf", FieldValue::Float(f64::INFINITY))
            .with_field("ninf", FieldValue::Float(f64::NEG_INFINITY));
        let doc = encode_document(&metric, FloatPolicy::Drop, 0.0);

        assert!(!doc.fields.contains_key("nan"));
        assert!(!doc.fields.contains_key("inf"));
        assert!(!doc.fields.contains_key("ninf"));
        assert_eq!(doc.fields.get("usage"), Some(&FieldValue::Float(42.5)));
        assert_eq!(doc.fields.get("cores"), Some(&FieldValue::Integer(8)));
    }

    #[test]
    fn test_encode_replace_mirrors_sign() {
        let metric = Metric::new("cpu", MARCH_5_2024_NS, 1)
            .with_field("nan", FieldValue::Float(f64::NAN))
            .with_field("inf", FieldValue::Float(f64::INFINITY))
            .with_field("ninf", FieldValue::Float(f64::NEG_INFINITY))
            .with_field("fine", FieldValue::Float(1.25));
        let doc = encode_document(&metric, FloatPolicy::Replace, 3.14);

        assert_eq!(doc.fields.get("nan"), Some(&FieldValue::Float(3.14)));
        assert_eq!(doc.fields.get("inf"), Some(&FieldValue::Float(3.14)));
        assert_eq!(doc.fields.get("ninf"), Some(&FieldValue::Float(-3.14)));
        assert_eq!(doc.fields.get("fine"), Some(&FieldValue::Float(1.25)));
    }

    #[test]
    fn test_encode_does_not_mutate_metric() {
        let metric = Metric::new("cpu", MARCH_5_2024_NS, 1)
            .with_field("bad", FieldValue::Float(f64::NAN));
        let _ = encode_document(&metric, FloatPolicy::Drop, 0.0);

        match metric.fields.get("bad") {
            Some(FieldValue::Float(v)) => assert!(v.is_nan()),
            other => panic!("expected original NaN intact, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_non_float_values_untouched() {
        let metric = Metric::new("status", MARCH_5_2024_NS, 1)
            .with_field("msg", FieldValue::String("ok".to_string()))
            .with_field("up", FieldValue::Boolean(true))
            .with_field("count", FieldValue::Integer(-3));
        let doc = encode_document(&metric, FloatPolicy::Replace, 9.9);

        assert_eq!(
            doc.fields.get("msg"),
            Some(&FieldValue::String("ok".to_string()))
        );
        assert_eq!(doc.fields.get("up"), Some(&FieldValue::Boolean(true)));
        assert_eq!(doc.fields.get("count"), Some(&FieldValue::Integer(-3)));
    }

    #[test]
    fn test_float_policy_parses_from_config_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: FloatPolicy,
        }
        let parse = |s: &str| -> FloatPolicy {
            serde_yaml::from_str::<Wrapper>(&format!("policy: \"{}\"", s))
                .expect("parse")
                .policy
        };
        assert_eq!(parse("none"), FloatPolicy::None);
        assert_eq!(parse(""), FloatPolicy::None);
        assert_eq!(parse("drop"), FloatPolicy::Drop);
        assert_eq!(parse("replace"), FloatPolicy::Replace);

        assert!(serde_yaml::from_str::<Wrapper>("policy: \"bogus\"").is_err());
    }
}
