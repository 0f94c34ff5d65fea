use std::collections::HashMap;

use crate::errors::StoreError;

/// Pure encode/decode pair between an in-memory map and the persisted text
/// column. Keeping this behind a trait leaves the blob store representation
/// agnostic; any encoding that round-trips the map satisfies the contract.
pub trait ValueCodec {
    /// Serialize a map to its column text. Fails with
    /// [`StoreError::Serialization`] if a value cannot be represented, which
    /// should not occur for plain strings.
    fn encode(&self, values: &HashMap<String, String>) -> Result<String, StoreError>;

    /// Parse column text back into a map. Malformed text fails with
    /// [`StoreError::Deserialization`]; callers treat that as fatal to the
    /// read, with no partial recovery.
    fn decode(&self, text: &str) -> Result<HashMap<String, String>, StoreError>;
}

/// Change-tracking comparator: two maps are equal iff they hold exactly the
/// same key/value pairs, independent of insertion order.
pub fn maps_equal(a: &HashMap<String, String>, b: &HashMap<String, String>) -> bool {
    a == b
}

/// Default codec storing the map as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    fn encode(&self, values: &HashMap<String, String>) -> Result<String, StoreError> {
        serde_json::to_string(values).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<HashMap<String, String>, StoreError> {
        serde_json::from_str(text).map_err(|e| StoreError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HashMap<String, String> {
        HashMap::from([
            ("Name".to_string(), "Khalid".to_string()),
            ("Status".to_string(), "Awesome".to_string()),
        ])
    }

    #[test]
    fn json_round_trip() {
        let codec = JsonCodec;
        let m = sample();
        let decoded = codec.decode(&codec.encode(&m).unwrap()).unwrap();
        assert!(maps_equal(&m, &decoded));
    }

    #[test]
    fn empty_map_round_trip() {
        let codec = JsonCodec;
        let m = HashMap::new();
        let decoded = codec.decode(&codec.encode(&m).unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn malformed_text_is_a_deserialization_error() {
        let err = JsonCodec.decode("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }

    #[test]
    fn maps_equal_ignores_insertion_order() {
        let mut a = HashMap::new();
        a.insert("a".to_string(), "1".to_string());
        a.insert("b".to_string(), "2".to_string());
        let mut b = HashMap::new();
        b.insert("b".to_string(), "2".to_string());
        b.insert("a".to_string(), "1".to_string());
        assert!(maps_equal(&a, &b));
    }

    #[test]
    fn maps_equal_is_case_sensitive_on_keys() {
        let a = HashMap::from([("Name".to_string(), "x".to_string())]);
        let b = HashMap::from([("name".to_string(), "x".to_string())]);
        assert!(!maps_equal(&a, &b));
    }
}
