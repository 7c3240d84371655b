use serde::Serialize;
use sha2::{Digest, Sha256};

pub(crate) const TYPE_CREATE: &str = "webauthn.create";
pub(crate) const TYPE_GET: &str = "webauthn.get";

/// Collected client data per the WebAuthn algorithm. Field order is part of
/// the wire contract: the serialized bytes are hashed into the signed
/// payload, so serialization must be byte-stable.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectedClientData<'a> {
    #[serde(rename = "type")]
    type_: &'a str,
    challenge: &'a str,
    origin: &'a str,
    cross_origin: bool,
}

/// Serialize client data canonically and hash it. Returns the JSON bytes
/// (returned to the relying party) and the SHA-256 digest (signed by the
/// authenticator).
pub(crate) fn collect_client_data(
    type_: &str,
    challenge: &str,
    origin: &str,
    cross_origin: bool,
) -> (Vec<u8>, [u8; 32]) {
    let data = CollectedClientData {
        type_,
        challenge,
        origin,
        cross_origin,
    };
    let json = serde_json::to_vec(&data).expect("client data serialization is infallible");
    let hash = Sha256::digest(&json).into();
    (json, hash)
}
