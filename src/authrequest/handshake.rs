use std::time::Instant;

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;

use super::fingerprint::fingerprint_phrase;
use super::types::{
    AuthRequest, AuthRequestResponse, AuthRequestType, MasterKey, PendingAuthRequest, UserKey,
};
use super::AuthRequestError;
use crate::config::ClientConfig;

const MIN_KEY_BITS: usize = 2048;
const ACCESS_CODE_LEN: usize = 25;

/// Answer sent back by the approving device. Key material is present only
/// on approval, and exactly one wrapping path produced it.
#[derive(Debug, Clone)]
pub struct AuthRequestReply {
    pub id: String,
    pub request_approved: bool,
    /// base64 RSA ciphertext of the master key or user key
    pub key: Option<String>,
    /// base64 RSA ciphertext of the master-key hash, master-key path only
    pub master_password_hash: Option<String>,
}

/// Symmetric key material held by the approving device. Which wrapping path
/// runs depends on whether a master key and its hash are both present
/// (TDE and admin flows have no master key).
#[derive(Debug, Clone)]
pub struct DeviceKeys {
    pub user_key: UserKey,
    pub master_key: Option<MasterKey>,
    pub master_key_hash: Option<String>,
}

/// Asymmetric key wrapping for device-approval login. A fresh keypair is
/// generated per login attempt; the private key never leaves the
/// originating device.
pub struct AuthRequestCrypto {
    key_bits: usize,
}

impl AuthRequestCrypto {
    pub fn new(key_bits: usize) -> Result<Self, AuthRequestError> {
        if key_bits < MIN_KEY_BITS {
            return Err(AuthRequestError::KeyTooSmall(key_bits));
        }
        Ok(Self { key_bits })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, AuthRequestError> {
        Self::new(config.rsa_key_bits)
    }

    /// Build a new outbound auth request: fresh RSA keypair, fingerprint
    /// phrase, high-entropy access code. The returned `PendingAuthRequest`
    /// has no id yet; the caller assigns the server-issued id before
    /// inserting it into the pending cache.
    pub fn build_auth_request(
        &self,
        email: &str,
        device_identifier: &str,
        request_type: AuthRequestType,
    ) -> Result<(AuthRequest, PendingAuthRequest), AuthRequestError> {
        let mut rng = rand::rngs::OsRng;
        let private = RsaPrivateKey::new(&mut rng, self.key_bits)
            .map_err(|_| AuthRequestError::Crypto)?;
        let public = RsaPublicKey::from(&private);

        let public_key_der = public
            .to_public_key_der()
            .map_err(|_| AuthRequestError::InvalidKey)?
            .into_vec();
        let private_key_der = private
            .to_pkcs8_der()
            .map_err(|_| AuthRequestError::InvalidKey)?
            .as_bytes()
            .to_vec();

        let access_code = generate_access_code();
        let phrase = fingerprint_phrase(email, &public_key_der)?;
        tracing::info!(request_type = ?request_type, "auth request built");

        let request = AuthRequest {
            email: email.to_string(),
            device_identifier: device_identifier.to_string(),
            public_key: B64.encode(&public_key_der),
            request_type,
            access_code: access_code.clone(),
        };
        let pending = PendingAuthRequest {
            id: String::new(),
            request_type,
            public_key_der,
            private_key_der,
            access_code,
            fingerprint_phrase: phrase,
            created_at: Instant::now(),
        };
        Ok((request, pending))
    }

    /// Approve or deny a request from another device. On approval exactly
    /// one wrapping path runs: master key plus hash when this device holds
    /// them, otherwise the raw user key.
    pub fn approve_or_deny(
        &self,
        approve: bool,
        response: &AuthRequestResponse,
        keys: &DeviceKeys,
    ) -> Result<AuthRequestReply, AuthRequestError> {
        if response.id.is_empty() {
            return Err(AuthRequestError::MissingField("id"));
        }
        if response.public_key.is_empty() {
            return Err(AuthRequestError::MissingField("publicKey"));
        }
        if !approve {
            return Ok(AuthRequestReply {
                id: response.id.clone(),
                request_approved: false,
                key: None,
                master_password_hash: None,
            });
        }

        let der = B64
            .decode(&response.public_key)
            .map_err(|_| AuthRequestError::InvalidKey)?;
        let public =
            RsaPublicKey::from_public_key_der(&der).map_err(|_| AuthRequestError::InvalidKey)?;
        let mut rng = rand::rngs::OsRng;

        let (key, master_password_hash) = match (&keys.master_key, &keys.master_key_hash) {
            (Some(master_key), Some(hash)) => {
                let wrapped_key = public
                    .encrypt(&mut rng, Oaep::new::<Sha1>(), &master_key.0)
                    .map_err(|_| AuthRequestError::Crypto)?;
                let wrapped_hash = public
                    .encrypt(&mut rng, Oaep::new::<Sha1>(), hash.as_bytes())
                    .map_err(|_| AuthRequestError::Crypto)?;
                (B64.encode(wrapped_key), Some(B64.encode(wrapped_hash)))
            }
            _ => {
                let wrapped_key = public
                    .encrypt(&mut rng, Oaep::new::<Sha1>(), &keys.user_key.0)
                    .map_err(|_| AuthRequestError::Crypto)?;
                (B64.encode(wrapped_key), None)
            }
        };

        tracing::info!(id = %response.id, "auth request approved");
        Ok(AuthRequestReply {
            id: response.id.clone(),
            request_approved: true,
            key: Some(key),
            master_password_hash,
        })
    }

    /// Unwrap a user key with the locally held private key.
    pub fn decrypt_user_key(
        &self,
        key_ciphertext: &str,
        private_key_der: &[u8],
    ) -> Result<UserKey, AuthRequestError> {
        Ok(UserKey(decrypt_oaep(key_ciphertext, private_key_der)?))
    }

    /// Unwrap a master key and its hash with the locally held private key.
    pub fn decrypt_master_key_and_hash(
        &self,
        key_ciphertext: &str,
        hash_ciphertext: &str,
        private_key_der: &[u8],
    ) -> Result<(MasterKey, String), AuthRequestError> {
        let master_key = MasterKey(decrypt_oaep(key_ciphertext, private_key_der)?);
        let hash_bytes = decrypt_oaep(hash_ciphertext, private_key_der)?;
        let hash = String::from_utf8(hash_bytes).map_err(|_| AuthRequestError::Crypto)?;
        Ok((master_key, hash))
    }
}

fn decrypt_oaep(ciphertext_b64: &str, private_key_der: &[u8]) -> Result<Vec<u8>, AuthRequestError> {
    let ciphertext = B64
        .decode(ciphertext_b64)
        .map_err(|_| AuthRequestError::Crypto)?;
    let private = RsaPrivateKey::from_pkcs8_der(private_key_der)
        .map_err(|_| AuthRequestError::InvalidKey)?;
    private
        .decrypt(Oaep::new::<Sha1>(), &ciphertext)
        .map_err(|_| AuthRequestError::Crypto)
}

fn generate_access_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ACCESS_CODE_LEN)
        .map(char::from)
        .collect()
}
