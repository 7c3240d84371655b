pub mod types;

pub(crate) mod attestation;
pub(crate) mod auth_data;
mod emulator;
mod store;

pub use emulator::EmulatedAuthenticator;
pub use store::{CredentialRecord, CredentialStore};
pub use types::{
    GetAssertionRequest, GetAssertionResult, MakeCredentialRequest, MakeCredentialResult,
    PublicKeyCredentialDescriptor, RpEntity, SelectedCredential, UserEntity,
};

use crate::abort::AbortSignal;
use crate::client::CallerContext;

/// Internal authenticator failures. The client engine re-classifies
/// everything except `InvalidState` into an opaque "not allowed" before it
/// reaches a relying party, so variants here may carry detail for logging.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticatorError {
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,
    #[error("invalid state")]
    InvalidState,
    #[error("no credentials")]
    NoCredentials,
    #[error("operation aborted")]
    Aborted,
    #[error("crypto: {0}")]
    Crypto(String),
    #[error("cbor: {0}")]
    Cbor(String),
}

/// The authenticator side of WebAuthn: makeCredential / getAssertion over
/// opaque byte buffers, independent of web-platform concepts. One
/// implementation per platform backing store.
#[async_trait::async_trait]
pub trait Fido2Authenticator: Send + Sync {
    async fn make_credential(
        &self,
        params: MakeCredentialRequest,
        ctx: &CallerContext,
        abort: &AbortSignal,
    ) -> Result<MakeCredentialResult, AuthenticatorError>;

    async fn get_assertion(
        &self,
        params: GetAssertionRequest,
        ctx: &CallerContext,
        abort: &AbortSignal,
    ) -> Result<GetAssertionResult, AuthenticatorError>;
}

#[async_trait::async_trait]
impl<T: Fido2Authenticator + ?Sized> Fido2Authenticator for std::sync::Arc<T> {
    async fn make_credential(
        &self,
        params: MakeCredentialRequest,
        ctx: &CallerContext,
        abort: &AbortSignal,
    ) -> Result<MakeCredentialResult, AuthenticatorError> {
        (**self).make_credential(params, ctx, abort).await
    }

    async fn get_assertion(
        &self,
        params: GetAssertionRequest,
        ctx: &CallerContext,
        abort: &AbortSignal,
    ) -> Result<GetAssertionResult, AuthenticatorError> {
        (**self).get_assertion(params, ctx, abort).await
    }
}
