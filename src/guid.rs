use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use once_cell::sync::Lazy;
use regex::Regex;

static GUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-([0-9a-f]{4}-){3}[0-9a-f]{12}$").expect("GUID pattern is valid")
});

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("not a valid GUID: {0:?}")]
    InvalidGuid(String),
    #[error("not a valid base64url credential id")]
    InvalidBase64,
    #[error("credential id must be 16 bytes, got {0}")]
    InvalidLength(usize),
}

/// Parse the canonical dashed 8-4-4-4-12 form into raw bytes.
/// Big-endian byte layout per field group, case-insensitive input.
pub fn to_raw(guid: &str) -> Result<[u8; 16], FormatError> {
    let lower = guid.to_ascii_lowercase();
    if !GUID_RE.is_match(&lower) {
        return Err(FormatError::InvalidGuid(guid.to_string()));
    }
    let mut raw = [0u8; 16];
    let mut hex = lower.bytes().filter(|&b| b != b'-');
    for byte in raw.iter_mut() {
        let hi = hex_val(hex.next().expect("regex guarantees 32 hex digits"));
        let lo = hex_val(hex.next().expect("regex guarantees 32 hex digits"));
        *byte = (hi << 4) | lo;
    }
    Ok(raw)
}

/// Format raw bytes as a canonical dashed GUID. The output is re-validated
/// against the same pattern `to_raw` accepts before it is returned.
pub fn to_standard(raw: &[u8; 16]) -> Result<String, FormatError> {
    let hex: String = raw.iter().map(|b| format!("{b:02x}")).collect();
    let guid = format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32],
    );
    if !GUID_RE.is_match(&guid) {
        return Err(FormatError::InvalidGuid(guid));
    }
    Ok(guid)
}

/// URL-safe unpadded base64 of the raw form, per WebAuthn wire convention.
pub fn to_b64(raw: &[u8; 16]) -> String {
    URL_SAFE_NO_PAD.encode(raw)
}

pub fn from_b64(id: &str) -> Result<[u8; 16], FormatError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(id.as_bytes())
        .map_err(|_| FormatError::InvalidBase64)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| FormatError::InvalidLength(bytes.len()))
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => unreachable!("regex guarantees lowercase hex"),
    }
}
