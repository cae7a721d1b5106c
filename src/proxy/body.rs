//! Request body mutation.
//!
//! The inbound body must decode as a JSON object. [`inject_creator_id`]
//! sets `creator_id` to the device identifier (overwriting any value the
//! caller supplied) and re-serializes the object. The whole body is one
//! JSON document: anything but whitespace after the object is malformed.

use serde_json::{Map, Value};

use crate::error::ForwardError;

pub const CREATOR_ID_FIELD: &str = "creator_id";

/// Decode `body` as a JSON object, stamp it with `device_id`, and re-encode it.
pub fn inject_creator_id(body: &[u8], device_id: &str) -> Result<Vec<u8>, ForwardError> {
    let mut object: Map<String, Value> =
        serde_json::from_slice(body).map_err(ForwardError::InvalidBody)?;

    object.insert(
        CREATOR_ID_FIELD.to_string(),
        Value::String(device_id.to_string()),
    );

    serde_json::to_vec(&object).map_err(ForwardError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn adds_creator_id() {
        let out = inject_creator_id(br#"{"a":1,"nested":{"b":[1,2]}}"#, "dev-1").unwrap();
        assert_eq!(
            decode(&out),
            serde_json::json!({"a": 1, "nested": {"b": [1, 2]}, "creator_id": "dev-1"})
        );
    }

    #[test]
    fn overwrites_existing_creator_id() {
        let out = inject_creator_id(br#"{"creator_id":"someone-else"}"#, "dev-1").unwrap();
        assert_eq!(decode(&out), serde_json::json!({"creator_id": "dev-1"}));
    }

    #[test]
    fn overwrites_non_string_creator_id() {
        let out = inject_creator_id(br#"{"creator_id":{"forged":true}}"#, "dev-1").unwrap();
        assert_eq!(decode(&out)["creator_id"], "dev-1");
    }

    #[test]
    fn empty_object_is_accepted() {
        let out = inject_creator_id(b"{}", "dev-1").unwrap();
        assert_eq!(out, br#"{"creator_id":"dev-1"}"#);
    }

    #[test]
    fn rejects_non_objects() {
        let bodies: [&[u8]; 5] = [b"[1,2]", b"42", b"\"text\"", b"null", b"true"];
        for body in bodies {
            let err = inject_creator_id(body, "dev-1").unwrap_err();
            assert!(
                matches!(err, ForwardError::InvalidBody(_)),
                "expected InvalidBody for {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(matches!(
            inject_creator_id(b"", "dev-1"),
            Err(ForwardError::InvalidBody(_))
        ));
        assert!(matches!(
            inject_creator_id(b"{\"a\":", "dev-1"),
            Err(ForwardError::InvalidBody(_))
        ));
        assert!(matches!(
            inject_creator_id(b"{} {}", "dev-1"),
            Err(ForwardError::InvalidBody(_))
        ));
    }

    #[test]
    fn trailing_data_after_object_is_malformed() {
        assert!(matches!(
            inject_creator_id(br#"{"a":1} x"#, "dev-1"),
            Err(ForwardError::InvalidBody(_))
        ));
        let out = inject_creator_id(b"{\"a\":1} \n", "dev-1").unwrap();
        assert_eq!(decode(&out)["a"], 1);
    }

    #[test]
    fn keys_are_emitted_in_sorted_order() {
        let out = inject_creator_id(br#"{"z":1,"a":2}"#, "d").unwrap();
        assert_eq!(out, br#"{"a":2,"creator_id":"d","z":1}"#);
    }
}
