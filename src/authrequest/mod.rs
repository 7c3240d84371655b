pub mod api;
pub mod types;

mod cache;
mod fingerprint;
mod handshake;
mod wordlist;

pub use cache::PendingRequestCache;
pub use fingerprint::fingerprint_phrase;
pub use handshake::{AuthRequestCrypto, AuthRequestReply, DeviceKeys};
pub use types::{
    AuthRequest, AuthRequestResponse, AuthRequestType, MasterKey, PendingAuthRequest, UserKey,
};

/// Errors from the auth-request handshake. Decryption failures are
/// deliberately opaque: `Crypto` carries no detail about why key unwrapping
/// failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthRequestError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("key size below minimum: {0} bits")]
    KeyTooSmall(usize),
    #[error("invalid key encoding")]
    InvalidKey,
    #[error("cryptographic operation failed")]
    Crypto,
    #[error("request not found or already consumed")]
    NotFound,
    #[error("transport: {0}")]
    Transport(String),
}
