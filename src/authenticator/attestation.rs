use super::AuthenticatorError;
use ciborium::value::Value;

/// Build a "packed" self-attestation object over the given authenticator
/// data and DER signature.
pub(crate) fn build_attestation_object(
    auth_data: &[u8],
    der_sig: &[u8],
) -> Result<Vec<u8>, AuthenticatorError> {
    let map = Value::Map(vec![
        (
            Value::Text("fmt".to_string()),
            Value::Text("packed".to_string()),
        ),
        (
            Value::Text("attStmt".to_string()),
            Value::Map(vec![
                (
                    Value::Text("alg".to_string()),
                    Value::Integer((-7i64).into()),
                ),
                (
                    Value::Text("sig".to_string()),
                    Value::Bytes(der_sig.to_vec()),
                ),
            ]),
        ),
        (
            Value::Text("authData".to_string()),
            Value::Bytes(auth_data.to_vec()),
        ),
    ]);
    let mut buf = Vec::new();
    ciborium::into_writer(&map, &mut buf).map_err(|e| AuthenticatorError::Cbor(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attestation_object_shape() {
        let auth_data = vec![0x01u8; 37];
        let sig = vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];
        let obj = build_attestation_object(&auth_data, &sig).unwrap();

        let val: Value = ciborium::from_reader(obj.as_slice()).expect("valid CBOR");
        let Value::Map(map) = val else { panic!("not a map") };
        let get = |key: &str| -> Option<&Value> {
            map.iter().find_map(|(k, v)| match k {
                Value::Text(s) if s == key => Some(v),
                _ => None,
            })
        };

        assert!(matches!(get("fmt"), Some(Value::Text(s)) if s == "packed"));
        assert!(matches!(get("authData"), Some(Value::Bytes(b)) if b == &auth_data));
        let Some(Value::Map(stmt)) = get("attStmt") else {
            panic!("attStmt missing")
        };
        assert!(stmt
            .iter()
            .any(|(k, v)| matches!((k, v), (Value::Text(s), Value::Bytes(b)) if s == "sig" && b == &sig)));
    }
}
