use std::time::Instant;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthRequestType {
    AuthenticateAndUnlock,
    AdminApproval,
}

/// Outbound auth request as posted to the server. Carries only the public
/// half of the keypair; the private key stays in the pending cache on the
/// originating device.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub email: String,
    pub device_identifier: String,
    /// base64 of the SubjectPublicKeyInfo DER
    pub public_key: String,
    pub request_type: AuthRequestType,
    pub access_code: String,
}

/// Server-side view of a request, polled or pushed back to the requester.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequestResponse {
    pub id: String,
    pub public_key: String,
    /// base64 RSA ciphertext of the user key or master key, set on approval
    pub key: Option<String>,
    /// base64 RSA ciphertext of the master-key hash; present only when `key`
    /// wraps a master key
    pub master_password_hash: Option<String>,
    pub request_approved: bool,
    pub is_answered: bool,
    pub creation_date: Option<String>,
}

/// Locally held state for an in-flight request. The private key and access
/// code are highly sensitive; this struct only ever lives inside the
/// expiring `PendingRequestCache`.
#[derive(Clone)]
pub struct PendingAuthRequest {
    pub id: String,
    pub request_type: AuthRequestType,
    pub public_key_der: Vec<u8>,
    pub private_key_der: Vec<u8>,
    pub access_code: String,
    pub fingerprint_phrase: String,
    pub created_at: Instant,
}

impl std::fmt::Debug for PendingAuthRequest {
    // Never leak key material through Debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAuthRequest")
            .field("id", &self.id)
            .field("request_type", &self.request_type)
            .field("fingerprint_phrase", &self.fingerprint_phrase)
            .finish_non_exhaustive()
    }
}

/// Decrypted symmetric user key. Distinct from `MasterKey` so the two can
/// never be interchanged downstream.
#[derive(Clone, PartialEq, Eq)]
pub struct UserKey(pub Vec<u8>);

#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey(pub Vec<u8>);

impl std::fmt::Debug for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserKey(..)")
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MasterKey(..)")
    }
}
