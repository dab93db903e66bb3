//! Export/import format for the pattern store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Cluster, Sample};

/// Plain serializable copy of a pattern store's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSnapshot {
    pub clusters: Vec<Cluster>,
    pub samples: Vec<Sample>,
    /// Samples accepted since the last cluster pass
    #[serde(default)]
    pub pending: usize,
}

impl PatternSnapshot {
    /// Parse an untyped blob, checking its shape field by field.
    ///
    /// Each violation maps to its own error variant so callers can tell a
    /// null blob from a blob with a bad `clusters` or `samples` field.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = match value {
            Value::Null => return Err(Error::SnapshotMissing),
            Value::Object(object) => object,
            other => return Err(Error::SnapshotNotObject(kind_of(other).to_string())),
        };

        if !matches!(object.get("clusters"), Some(Value::Array(_))) {
            return Err(Error::ClustersNotSequence);
        }
        if !matches!(object.get("samples"), Some(Value::Array(_))) {
            return Err(Error::SamplesNotSequence);
        }

        Ok(serde_json::from_value(value.clone())?)
    }

    /// Serialize to an untyped blob
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_blob() {
        let err = PatternSnapshot::from_value(&Value::Null).unwrap_err();
        assert!(matches!(err, Error::SnapshotMissing));
    }

    #[test]
    fn test_non_object_blob() {
        let err = PatternSnapshot::from_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::SnapshotNotObject(ref kind) if kind == "an array"));
    }

    #[test]
    fn test_missing_clusters() {
        let err = PatternSnapshot::from_value(&json!({})).unwrap_err();
        assert!(matches!(err, Error::ClustersNotSequence));

        let err = PatternSnapshot::from_value(&json!({ "clusters": 3, "samples": [] })).unwrap_err();
        assert!(matches!(err, Error::ClustersNotSequence));
    }

    #[test]
    fn test_missing_samples() {
        let err = PatternSnapshot::from_value(&json!({ "clusters": [] })).unwrap_err();
        assert!(matches!(err, Error::SamplesNotSequence));
    }

    #[test]
    fn test_malformed_records() {
        let err = PatternSnapshot::from_value(&json!({ "clusters": [], "samples": [{ "id": 1 }] }))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_pending_defaults_to_zero() {
        let snapshot = PatternSnapshot::from_value(&json!({ "clusters": [], "samples": [] })).unwrap();
        assert_eq!(snapshot.pending, 0);

        let snapshot =
            PatternSnapshot::from_value(&json!({ "clusters": [], "samples": [], "pending": 2 }))
                .unwrap();
        assert_eq!(snapshot.pending, 2);
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let snapshot = PatternSnapshot::from_value(&json!({ "clusters": [], "samples": [] })).unwrap();
        assert_eq!(snapshot, PatternSnapshot::default());
    }
}
