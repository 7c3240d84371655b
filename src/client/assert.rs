use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use super::client_data::{collect_client_data, TYPE_GET};
use super::create::{decode_credential_id, derive_require_user_verification};
use super::timeout::arm_abort_timeout;
use super::types::{AssertCredentialParams, AssertCredentialResult};
use super::{
    parse_origin, AuthStatus, CallerContext, ClientEnvironment, Fido2Client, Fido2ClientError,
};
use crate::abort::{AbortController, AbortReason};
use crate::authenticator::{
    AuthenticatorError, Fido2Authenticator, GetAssertionRequest, PublicKeyCredentialDescriptor,
};
use crate::guid;

impl<A, E> Fido2Client<A, E>
where
    A: Fido2Authenticator,
    E: ClientEnvironment,
{
    /// Assert an existing credential per the WebAuthn authentication
    /// algorithm. Same validation skeleton as creation minus the user and
    /// algorithm steps; an empty allow list selects the discoverable flow.
    pub async fn assert_credential(
        &self,
        params: AssertCredentialParams,
        ctx: &CallerContext,
        abort: AbortController,
    ) -> Result<AssertCredentialResult, Fido2ClientError> {
        // 1. Feature and auth gates
        if self.env.auth_status() == AuthStatus::LoggedOut || !self.env.passkeys_enabled() {
            tracing::warn!("passkey emulation unavailable, requesting fallback");
            return Err(Fido2ClientError::FallbackRequested);
        }

        // 2. Cross-origin ancestor frames are not allowed to assert
        if !params.same_origin_with_ancestors {
            tracing::warn!("rejected cross-origin assert request");
            return Err(Fido2ClientError::NotAllowed);
        }

        // 3. Origin must be a parsable https origin
        let hostname = parse_origin(&params.origin, self.config.allow_insecure_localhost)?;

        // 4. Excluded domains bail out before any hashing happens
        if self.env.is_excluded_domain(&hostname) {
            tracing::info!(hostname = %hostname, "domain excluded, requesting fallback");
            return Err(Fido2ClientError::FallbackRequested);
        }

        // 5. rp id defaults to the origin hostname and must match it
        let rp_id = params.rp_id.clone().unwrap_or_else(|| hostname.clone());
        if !crate::rpid::is_valid_rp_id(&rp_id, &params.origin) {
            tracing::warn!(rp_id = %rp_id, origin = %params.origin, "rp.id rejected for origin");
            return Err(Fido2ClientError::Security(
                "rp.id cannot be used with the current origin",
            ));
        }

        // 6. Canonical client data and its hash
        let (client_data_json, client_data_hash) = collect_client_data(
            TYPE_GET,
            &params.challenge,
            &params.origin,
            !params.same_origin_with_ancestors,
        );

        // 7. Textual allow list into binary descriptors
        let allow_list: Vec<PublicKeyCredentialDescriptor> = params
            .allowed_credential_ids
            .iter()
            .map(|id| {
                Ok(PublicKeyCredentialDescriptor {
                    id: decode_credential_id(id)?.to_vec(),
                    transports: vec![],
                })
            })
            .collect::<Result<_, Fido2ClientError>>()?;

        // 8. Already-signalled abort fails before the authenticator runs
        let signal = abort.signal();
        if signal.is_aborted() {
            return Err(Fido2ClientError::Aborted);
        }
        let timeout = arm_abort_timeout(&abort, params.user_verification, params.timeout);

        let request = GetAssertionRequest {
            rp_id,
            hash: client_data_hash.to_vec(),
            allow_credential_descriptor_list: allow_list,
            require_user_verification: derive_require_user_verification(params.user_verification),
        };

        // 9. Invoke the authenticator; internal failures stay opaque
        let result = match self.authenticator.get_assertion(request, ctx, &signal).await {
            Ok(result) => result,
            Err(err) => {
                if signal.reason() == Some(AbortReason::UserRequestedFallback) {
                    return Err(Fido2ClientError::FallbackRequested);
                }
                return Err(match err {
                    AuthenticatorError::InvalidState => Fido2ClientError::InvalidState,
                    other => {
                        tracing::warn!(error = %other, "authenticator failed");
                        Fido2ClientError::NotAllowed
                    }
                });
            }
        };

        // 10. A cancelled operation never returns a late success
        if signal.is_aborted() {
            tracing::info!("discarding result completed after abort");
            return Err(Fido2ClientError::Aborted);
        }
        timeout.clear();

        Ok(AssertCredentialResult {
            credential_id: guid::to_b64(&result.selected_credential.id),
            authenticator_data: URL_SAFE_NO_PAD.encode(&result.authenticator_data),
            client_data_json: URL_SAFE_NO_PAD.encode(&client_data_json),
            signature: URL_SAFE_NO_PAD.encode(&result.signature),
            user_handle: result
                .selected_credential
                .user_handle
                .map(|h| URL_SAFE_NO_PAD.encode(h)),
        })
    }
}
