use hkdf::Hkdf;
use sha2::{Digest, Sha256};

use super::wordlist::WORDS;
use super::AuthRequestError;

const PHRASE_WORDS: usize = 6;

/// Derive the human-verifiable fingerprint phrase for an (email, public key)
/// pair. Both sides of the handshake compute this independently to detect a
/// substituted key; it must be identical for equivalent inputs, so the email
/// is trimmed and lowercased before use.
pub fn fingerprint_phrase(email: &str, public_key_der: &[u8]) -> Result<String, AuthRequestError> {
    let material = email.trim().to_lowercase();
    let key_fingerprint = Sha256::digest(public_key_der);

    let hk = Hkdf::<Sha256>::from_prk(&key_fingerprint).map_err(|_| AuthRequestError::Crypto)?;
    let mut okm = [0u8; 32];
    hk.expand(material.as_bytes(), &mut okm)
        .map_err(|_| AuthRequestError::Crypto)?;

    let phrase: Vec<&str> = okm[..PHRASE_WORDS]
        .iter()
        .map(|&b| WORDS[b as usize])
        .collect();
    Ok(phrase.join("-"))
}
