pub mod types;

pub(crate) mod client_data;
pub(crate) mod timeout;

mod assert;
mod create;

pub use types::{
    AssertCredentialParams, AssertCredentialResult, AuthenticatorSelection, CreateCredentialParams,
    CreateCredentialResult, CredentialDescriptorParam, CredProps, PublicKeyCredentialParam,
    ResidentKeyRequirement, RpParam, UserParam, UserVerification,
};

use crate::config::ClientConfig;
use url::Url;

/// Errors surfaced to the relying-party side of the client engine.
/// `FallbackRequested` is expected control flow, not a failure: it tells the
/// caller to use a non-emulated path and is a distinct variant so callers
/// can branch without string-matching.
#[derive(Debug, thiserror::Error)]
pub enum Fido2ClientError {
    #[error("fallback requested")]
    FallbackRequested,
    #[error("the operation either timed out or was not allowed")]
    NotAllowed,
    #[error("security: {0}")]
    Security(&'static str),
    #[error("invalid parameter: {0}")]
    Type(&'static str),
    #[error("no supported key algorithms were found")]
    NotSupported,
    #[error("invalid state")]
    InvalidState,
    #[error("operation aborted")]
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    LoggedOut,
    Locked,
    Unlocked,
}

/// External collaborators consumed by the engine: feature flag, auth status
/// and excluded-domain lookups. Implemented by the embedding application.
pub trait ClientEnvironment: Send + Sync {
    fn passkeys_enabled(&self) -> bool;
    fn auth_status(&self) -> AuthStatus;
    fn is_excluded_domain(&self, hostname: &str) -> bool;
}

/// Opaque identity of the calling surface (tab, window, process). The engine
/// passes it through to the authenticator untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerContext {
    pub caller_id: u64,
}

/// WebAuthn client protocol engine. Validates requests against the WebAuthn
/// algorithm, builds client-data hashes, drives the authenticator and maps
/// raw results back to the wire contract.
pub struct Fido2Client<A, E> {
    authenticator: A,
    env: E,
    config: ClientConfig,
}

impl<A, E> Fido2Client<A, E> {
    pub fn new(authenticator: A, env: E, config: ClientConfig) -> Self {
        Self {
            authenticator,
            env,
            config,
        }
    }
}

/// Parse an origin into its hostname, enforcing https. Plain-http localhost
/// is tolerated only when configured.
pub(crate) fn parse_origin(
    origin: &str,
    allow_insecure_localhost: bool,
) -> Result<String, Fido2ClientError> {
    let url = Url::parse(origin)
        .map_err(|_| Fido2ClientError::Security("origin is not a valid https origin"))?;
    let host = url
        .host_str()
        .ok_or(Fido2ClientError::Security("origin is not a valid https origin"))?
        .to_ascii_lowercase();
    let is_localhost = host == "localhost" || host.ends_with(".localhost");
    if url.scheme() != "https" && !(allow_insecure_localhost && is_localhost) {
        return Err(Fido2ClientError::Security("origin is not a valid https origin"));
    }
    Ok(host)
}
