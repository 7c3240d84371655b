use ciborium::value::Value;

pub(crate) const FLAG_UP: u8 = 0x01;
pub(crate) const FLAG_UV: u8 = 0x04;
pub(crate) const FLAG_AT: u8 = 0x40;

/// Build authenticatorData for makeCredential (AT flag set, attested
/// credential data appended).
pub(crate) fn build_make_credential_auth_data(
    rp_id_hash: &[u8; 32],
    user_verified: bool,
    credential_id: &[u8; 16],
    public_key_x: &[u8; 32],
    public_key_y: &[u8; 32],
) -> Vec<u8> {
    let cose_key = encode_cose_key(public_key_x, public_key_y);
    let mut flags = FLAG_UP | FLAG_AT;
    if user_verified {
        flags |= FLAG_UV;
    }
    let mut data = Vec::new();
    data.extend_from_slice(rp_id_hash);
    data.push(flags);
    data.extend_from_slice(&[0, 0, 0, 0]); // signCount starts at 0
    data.extend_from_slice(&crate::config::AAGUID);
    data.extend_from_slice(&(credential_id.len() as u16).to_be_bytes());
    data.extend_from_slice(credential_id);
    data.extend_from_slice(&cose_key);
    data
}

/// Build authenticatorData for getAssertion (no attested credential data).
pub(crate) fn build_get_assertion_auth_data(
    rp_id_hash: &[u8; 32],
    user_verified: bool,
    sign_count: u32,
) -> Vec<u8> {
    let mut flags = FLAG_UP;
    if user_verified {
        flags |= FLAG_UV;
    }
    let mut data = Vec::new();
    data.extend_from_slice(rp_id_hash);
    data.push(flags);
    data.extend_from_slice(&sign_count.to_be_bytes());
    data
}

/// Encode a P-256 public key as a COSE_Key CBOR map (kty=2, alg=-7, crv=1, x, y).
pub(crate) fn encode_cose_key(x: &[u8; 32], y: &[u8; 32]) -> Vec<u8> {
    let map = Value::Map(vec![
        (Value::Integer(1i64.into()), Value::Integer(2i64.into())),
        (Value::Integer(3i64.into()), Value::Integer((-7i64).into())),
        (Value::Integer((-1i64).into()), Value::Integer(1i64.into())),
        (Value::Integer((-2i64).into()), Value::Bytes(x.to_vec())),
        (Value::Integer((-3i64).into()), Value::Bytes(y.to_vec())),
    ]);
    let mut buf = Vec::new();
    ciborium::into_writer(&map, &mut buf).expect("COSE key encoding is infallible");
    buf
}
