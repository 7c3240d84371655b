use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use super::client_data::{collect_client_data, TYPE_CREATE};
use super::timeout::arm_abort_timeout;
use super::types::{
    AuthenticatorSelection, CreateCredentialParams, CreateCredentialResult, CredProps,
    ResidentKeyRequirement, UserVerification,
};
use super::{
    parse_origin, AuthStatus, CallerContext, ClientEnvironment, Fido2Client, Fido2ClientError,
};
use crate::abort::{AbortController, AbortReason};
use crate::authenticator::types::{ALG_ES256, ALG_RS256};
use crate::authenticator::{
    AuthenticatorError, Fido2Authenticator, MakeCredentialRequest, PublicKeyCredentialDescriptor,
    RpEntity, UserEntity,
};
use crate::guid;

impl<A, E> Fido2Client<A, E>
where
    A: Fido2Authenticator,
    E: ClientEnvironment,
{
    /// Create a new credential per the WebAuthn registration algorithm.
    ///
    /// The validation ladder runs strictly in order: cheap checks must
    /// reject before any cryptographic or stateful work happens.
    pub async fn create_credential(
        &self,
        params: CreateCredentialParams,
        ctx: &CallerContext,
        abort: AbortController,
    ) -> Result<CreateCredentialResult, Fido2ClientError> {
        // 1. Feature and auth gates: signal fallback, not failure
        if self.env.auth_status() == AuthStatus::LoggedOut || !self.env.passkeys_enabled() {
            tracing::warn!("passkey emulation unavailable, requesting fallback");
            return Err(Fido2ClientError::FallbackRequested);
        }

        // 2. Cross-origin ancestor frames are not allowed to register
        if !params.same_origin_with_ancestors {
            tracing::warn!("rejected cross-origin create request");
            return Err(Fido2ClientError::NotAllowed);
        }

        // 3. user.id must decode to 1..=64 bytes
        let user_id = URL_SAFE_NO_PAD
            .decode(params.user.id.as_bytes())
            .map_err(|_| Fido2ClientError::Type("user.id is not valid base64url"))?;
        if user_id.is_empty() || user_id.len() > 64 {
            tracing::warn!(len = user_id.len(), "invalid user.id length");
            return Err(Fido2ClientError::Type("user.id length must be 1..=64 bytes"));
        }

        // 4. Origin must be a parsable https origin
        let hostname = parse_origin(&params.origin, self.config.allow_insecure_localhost)?;

        // 5. Excluded domains bail out before any hashing happens
        if self.env.is_excluded_domain(&hostname) {
            tracing::info!(hostname = %hostname, "domain excluded, requesting fallback");
            return Err(Fido2ClientError::FallbackRequested);
        }

        // 6. rp.id defaults to the origin hostname and must match it
        let rp_id = params.rp.id.clone().unwrap_or_else(|| hostname.clone());
        if !crate::rpid::is_valid_rp_id(&rp_id, &params.origin) {
            tracing::warn!(rp_id = %rp_id, origin = %params.origin, "rp.id rejected for origin");
            return Err(Fido2ClientError::Security(
                "rp.id cannot be used with the current origin",
            ));
        }

        // 7. Filter requested algorithms; an empty request gets the defaults
        let algorithms: Vec<i32> = if params.pub_key_cred_params.is_empty() {
            vec![ALG_ES256, ALG_RS256]
        } else {
            params
                .pub_key_cred_params
                .iter()
                .filter(|p| p.alg == ALG_ES256 && p.type_ == "public-key")
                .map(|p| p.alg)
                .collect()
        };
        if algorithms.is_empty() {
            tracing::warn!("no compatible algorithms requested");
            return Err(Fido2ClientError::NotSupported);
        }

        // 8. Canonical client data and its hash
        let (client_data_json, client_data_hash) = collect_client_data(
            TYPE_CREATE,
            &params.challenge,
            &params.origin,
            !params.same_origin_with_ancestors,
        );

        // 9. Already-signalled abort fails before the authenticator runs
        let signal = abort.signal();
        if signal.is_aborted() {
            return Err(Fido2ClientError::Aborted);
        }

        // 10. Timeout is a scheduled abort of the same token
        let selection = params.authenticator_selection.clone().unwrap_or_default();
        let timeout = arm_abort_timeout(&abort, selection.user_verification, params.timeout);

        let require_resident_key = derive_require_resident_key(&selection);
        let exclude_list = map_descriptors(&params.exclude_credentials)?;
        let request = MakeCredentialRequest {
            hash: client_data_hash.to_vec(),
            rp: RpEntity {
                id: rp_id.clone(),
                name: params.rp.name.clone(),
            },
            user: UserEntity {
                id: user_id,
                name: params.user.name.clone(),
                display_name: params.user.display_name.clone(),
            },
            require_resident_key,
            require_user_verification: derive_require_user_verification(
                selection.user_verification,
            ),
            cred_types_and_pub_key_algs: algorithms,
            exclude_credential_descriptor_list: exclude_list,
        };

        // 11. Invoke the authenticator; internal failures stay opaque
        let result = match self.authenticator.make_credential(request, ctx, &signal).await {
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

        // 12. A cancelled operation never returns a late success
        if signal.is_aborted() {
            tracing::info!("discarding result completed after abort");
            return Err(Fido2ClientError::Aborted);
        }
        timeout.clear();

        // 13. Map raw buffers to the wire contract
        let transports = if self.config.transport_hint_domains.iter().any(|d| d == &rp_id) {
            vec!["internal".to_string(), "usb".to_string()]
        } else {
            vec!["internal".to_string()]
        };
        Ok(CreateCredentialResult {
            credential_id: guid::to_b64(&result.credential_id),
            attestation_object: URL_SAFE_NO_PAD.encode(&result.attestation_object),
            auth_data: URL_SAFE_NO_PAD.encode(&result.auth_data),
            client_data_json: URL_SAFE_NO_PAD.encode(&client_data_json),
            public_key: URL_SAFE_NO_PAD.encode(&result.public_key),
            public_key_algorithm: result.public_key_algorithm,
            transports,
            cred_props: params.cred_props.then_some(CredProps {
                rk: require_resident_key,
            }),
        })
    }
}

fn derive_require_resident_key(selection: &AuthenticatorSelection) -> bool {
    match selection.resident_key {
        Some(ResidentKeyRequirement::Required) | Some(ResidentKeyRequirement::Preferred) => true,
        Some(ResidentKeyRequirement::Discouraged) => false,
        None => selection.require_resident_key,
    }
}

pub(crate) fn derive_require_user_verification(uv: Option<UserVerification>) -> bool {
    !matches!(uv, Some(UserVerification::Discouraged))
}

/// Decode textual credential ids into raw descriptors. Accepts the base64url
/// wire form and the dashed GUID form interchangeably.
pub(crate) fn map_descriptors(
    descriptors: &[super::types::CredentialDescriptorParam],
) -> Result<Vec<PublicKeyCredentialDescriptor>, Fido2ClientError> {
    descriptors
        .iter()
        .map(|d| {
            let raw = decode_credential_id(&d.id)?;
            Ok(PublicKeyCredentialDescriptor {
                id: raw.to_vec(),
                transports: d.transports.clone(),
            })
        })
        .collect()
}

pub(crate) fn decode_credential_id(id: &str) -> Result<[u8; 16], Fido2ClientError> {
    guid::from_b64(id)
        .or_else(|_| guid::to_raw(id))
        .map_err(|_| Fido2ClientError::Type("credential id is not a valid identifier"))
}
