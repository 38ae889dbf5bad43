//! Canonical JSON — the deterministic byte representation signatures cover.
//!
//! Matrix canonical JSON: keys sorted lexicographically, no insignificant
//! whitespace. The payload an identity server signs is its lookup response
//! *without* the `signatures` object, so adding or reordering signatures never
//! changes the signed bytes.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{error::IdentityError, types::ThreePidAssertion};

/// Produce canonical JSON (sorted keys, no extra whitespace).
pub fn canonical_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

/// The exact byte payload each listed signer must have signed.
pub fn signing_payload(assertion: &ThreePidAssertion) -> Result<Vec<u8>, IdentityError> {
    let mut value = serde_json::to_value(assertion)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("signatures");
    }
    Ok(canonical_json(&value).into_bytes())
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: serde_json::Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_keys(v)))
                .collect::<BTreeMap<_, _>>()
                .into_iter()
                .collect();
            Value::Object(sorted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_recursively() {
        let v = json!({"b": 1, "a": {"d": 2, "c": 3}});
        assert_eq!(canonical_json(&v), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn signing_payload_is_stable_under_signature_changes() {
        let mut assertion = ThreePidAssertion {
            ts: 100,
            not_before: 100,
            not_after: 200,
            medium: "email".into(),
            address: "alice@example.org".into(),
            mxid: "@alice:example.org".into(),
            signatures: Default::default(),
        };
        let before = signing_payload(&assertion).unwrap();

        assertion
            .signatures
            .entry("id.example.com".into())
            .or_default()
            .insert("ed25519:0".into(), "c2lnbmF0dXJl".into());
        assertion
            .signatures
            .entry("id.other.tld".into())
            .or_default()
            .insert("ed25519:1".into(), "b3RoZXJzaWc".into());
        let after = signing_payload(&assertion).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn signing_payload_has_deterministic_field_order() {
        let assertion = ThreePidAssertion {
            ts: 100,
            not_before: 100,
            not_after: 200,
            medium: "email".into(),
            address: "alice@example.org".into(),
            mxid: String::new(),
            signatures: Default::default(),
        };
        let payload = String::from_utf8(signing_payload(&assertion).unwrap()).unwrap();
        assert_eq!(
            payload,
            r#"{"address":"alice@example.org","medium":"email","mxid":"","not_after":200,"not_before":100,"ts":100}"#,
        );
    }
}
