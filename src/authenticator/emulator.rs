use std::sync::{Arc, Mutex};

use p256::ecdsa::{signature::Signer, Signature, SigningKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey};
use rand::Rng;
use sha2::{Digest, Sha256};

use super::attestation::build_attestation_object;
use super::auth_data::{build_get_assertion_auth_data, build_make_credential_auth_data};
use super::store::{CredentialRecord, CredentialStore};
use super::types::{
    GetAssertionRequest, GetAssertionResult, MakeCredentialRequest, MakeCredentialResult,
    SelectedCredential, ALG_ES256,
};
use super::{AuthenticatorError, Fido2Authenticator};
use crate::abort::AbortSignal;
use crate::client::CallerContext;

/// Software authenticator over an in-memory credential store. Keys are
/// in-process P-256; only ES256 is produced.
pub struct EmulatedAuthenticator {
    store: Arc<Mutex<CredentialStore>>,
}

impl EmulatedAuthenticator {
    pub fn new(store: Arc<Mutex<CredentialStore>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<Mutex<CredentialStore>> {
        Arc::clone(&self.store)
    }
}

#[async_trait::async_trait]
impl Fido2Authenticator for EmulatedAuthenticator {
    async fn make_credential(
        &self,
        req: MakeCredentialRequest,
        _ctx: &CallerContext,
        abort: &AbortSignal,
    ) -> Result<MakeCredentialResult, AuthenticatorError> {
        // 1. Validate algorithm
        if !req.cred_types_and_pub_key_algs.contains(&ALG_ES256) {
            return Err(AuthenticatorError::UnsupportedAlgorithm);
        }

        // 2. Compute rp_id_hash, check exclude list and existing discoverable
        //    credential for this (rp, user) pair
        let rp_id_hash: [u8; 32] = Sha256::digest(req.rp.id.as_bytes()).into();
        {
            let guard = self.store.lock().unwrap();
            for exc in &req.exclude_credential_descriptor_list {
                if let Some(cred) = guard.get_by_id(&exc.id) {
                    if cred.rp_id_hash == rp_id_hash {
                        return Err(AuthenticatorError::InvalidState);
                    }
                }
            }
            if req.require_resident_key
                && guard.find_discoverable(&rp_id_hash, &req.user.id).is_some()
            {
                return Err(AuthenticatorError::InvalidState);
            }
        }

        // 3. Abort check before any key material is produced
        if abort.is_aborted() {
            return Err(AuthenticatorError::Aborted);
        }

        // 4. Fresh credential id and P-256 key
        let credential_id: [u8; 16] = rand::thread_rng().r#gen();
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        let private_key_der = signing_key
            .to_pkcs8_der()
            .map_err(|e| AuthenticatorError::Crypto(e.to_string()))?
            .as_bytes()
            .to_vec();
        let verifying_key = signing_key.verifying_key();
        let public_key_der = verifying_key
            .to_public_key_der()
            .map_err(|e| AuthenticatorError::Crypto(e.to_string()))?
            .into_vec();
        let point = verifying_key.to_encoded_point(false);
        let (x, y) = match (point.x(), point.y()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(AuthenticatorError::Crypto("point at infinity".into())),
        };
        let x: [u8; 32] = x
            .as_slice()
            .try_into()
            .map_err(|_| AuthenticatorError::Crypto("bad point encoding".into()))?;
        let y: [u8; 32] = y
            .as_slice()
            .try_into()
            .map_err(|_| AuthenticatorError::Crypto("bad point encoding".into()))?;

        // 5. Build authenticator data and sign the self-attestation
        let auth_data = build_make_credential_auth_data(
            &rp_id_hash,
            req.require_user_verification,
            &credential_id,
            &x,
            &y,
        );
        let mut to_sign = auth_data.clone();
        to_sign.extend_from_slice(&req.hash);
        let sig: Signature = signing_key.sign(&to_sign);
        let attestation_object = build_attestation_object(&auth_data, sig.to_der().as_bytes())?;

        // 6. Abort re-check; nothing is committed on cancellation
        if abort.is_aborted() {
            return Err(AuthenticatorError::Aborted);
        }

        // 7. Commit
        let record = CredentialRecord {
            credential_id,
            rp_id: req.rp.id.clone(),
            rp_id_hash,
            rp_name: req.rp.name.clone(),
            user_id: req.user.id.clone(),
            user_name: req.user.name.clone(),
            user_display: req.user.display_name.clone(),
            private_key_der,
            sign_count: 0,
            discoverable: req.require_resident_key,
        };
        if !self.store.lock().unwrap().add(record) {
            return Err(AuthenticatorError::InvalidState);
        }
        tracing::info!(rp_id = %req.rp.id, "credential created");

        Ok(MakeCredentialResult {
            credential_id,
            attestation_object,
            auth_data,
            public_key: public_key_der,
            public_key_algorithm: ALG_ES256,
        })
    }

    async fn get_assertion(
        &self,
        req: GetAssertionRequest,
        _ctx: &CallerContext,
        abort: &AbortSignal,
    ) -> Result<GetAssertionResult, AuthenticatorError> {
        let rp_id_hash: [u8; 32] = Sha256::digest(req.rp_id.as_bytes()).into();

        // Select a credential: allow list first, otherwise any discoverable
        // credential for the RP
        let cred = {
            let guard = self.store.lock().unwrap();
            let found = if !req.allow_credential_descriptor_list.is_empty() {
                req.allow_credential_descriptor_list.iter().find_map(|desc| {
                    guard
                        .get_by_id(&desc.id)
                        .filter(|c| c.rp_id_hash == rp_id_hash)
                })
            } else {
                guard
                    .get_by_rp_hash(&rp_id_hash)
                    .into_iter()
                    .find(|c| c.discoverable)
            };
            match found {
                Some(c) => c.clone(),
                None => return Err(AuthenticatorError::NoCredentials),
            }
        };

        if abort.is_aborted() {
            return Err(AuthenticatorError::Aborted);
        }

        let sign_count = self
            .store
            .lock()
            .unwrap()
            .increment_counter(&cred.credential_id)
            .ok_or(AuthenticatorError::NoCredentials)?;

        let signing_key = SigningKey::from_pkcs8_der(&cred.private_key_der)
            .map_err(|e| AuthenticatorError::Crypto(e.to_string()))?;
        let authenticator_data =
            build_get_assertion_auth_data(&rp_id_hash, req.require_user_verification, sign_count);
        let mut to_sign = authenticator_data.clone();
        to_sign.extend_from_slice(&req.hash);
        let sig: Signature = signing_key.sign(&to_sign);
        tracing::info!(rp_id = %req.rp_id, count = sign_count, "assertion signed");

        Ok(GetAssertionResult {
            selected_credential: SelectedCredential {
                id: cred.credential_id,
                user_handle: cred.discoverable.then(|| cred.user_id.clone()),
            },
            authenticator_data,
            signature: sig.to_der().as_bytes().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abort::{AbortController, AbortReason};
    use crate::authenticator::types::{PublicKeyCredentialDescriptor, RpEntity, UserEntity};

    fn make_req(rp_id: &str, user_id: &[u8], resident: bool) -> MakeCredentialRequest {
        MakeCredentialRequest {
            hash: vec![0x0Fu8; 32],
            rp: RpEntity {
                id: rp_id.to_string(),
                name: None,
            },
            user: UserEntity {
                id: user_id.to_vec(),
                name: Some("alice".into()),
                display_name: Some("Alice".into()),
            },
            require_resident_key: resident,
            require_user_verification: true,
            cred_types_and_pub_key_algs: vec![ALG_ES256],
            exclude_credential_descriptor_list: vec![],
        }
    }

    fn authenticator() -> EmulatedAuthenticator {
        EmulatedAuthenticator::new(Arc::new(Mutex::new(CredentialStore::new())))
    }

    #[tokio::test]
    async fn test_make_credential_commits_record() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        let result = auth
            .make_credential(make_req("example.com", b"u1", true), &CallerContext::default(), &signal)
            .await
            .unwrap();

        assert_eq!(result.public_key_algorithm, ALG_ES256);
        assert!(!result.attestation_object.is_empty());
        let store = auth.store();
        let guard = store.lock().unwrap();
        assert_eq!(guard.credential_count(), 1);
        assert!(guard.get_by_id(&result.credential_id).is_some());
    }

    #[tokio::test]
    async fn test_make_credential_rejects_unsupported_algs() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        let mut req = make_req("example.com", b"u1", false);
        req.cred_types_and_pub_key_algs = vec![-257];
        let err = auth
            .make_credential(req, &CallerContext::default(), &signal)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticatorError::UnsupportedAlgorithm));
    }

    #[tokio::test]
    async fn test_make_credential_duplicate_resident_is_invalid_state() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        auth.make_credential(make_req("example.com", b"u1", true), &CallerContext::default(), &signal)
            .await
            .unwrap();
        let err = auth
            .make_credential(make_req("example.com", b"u1", true), &CallerContext::default(), &signal)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticatorError::InvalidState));
    }

    #[tokio::test]
    async fn test_make_credential_excluded_is_invalid_state() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        let first = auth
            .make_credential(make_req("example.com", b"u1", false), &CallerContext::default(), &signal)
            .await
            .unwrap();

        let mut req = make_req("example.com", b"u2", false);
        req.exclude_credential_descriptor_list = vec![PublicKeyCredentialDescriptor {
            id: first.credential_id.to_vec(),
            transports: vec![],
        }];
        let err = auth
            .make_credential(req, &CallerContext::default(), &signal)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticatorError::InvalidState));
    }

    #[tokio::test]
    async fn test_make_credential_abort_commits_nothing() {
        let auth = authenticator();
        let ctl = AbortController::new();
        ctl.abort(AbortReason::Explicit);
        let err = auth
            .make_credential(make_req("example.com", b"u1", true), &CallerContext::default(), &ctl.signal())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticatorError::Aborted));
        assert_eq!(auth.store().lock().unwrap().credential_count(), 0);
    }

    #[tokio::test]
    async fn test_get_assertion_allow_list() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        let made = auth
            .make_credential(make_req("example.com", b"u1", false), &CallerContext::default(), &signal)
            .await
            .unwrap();

        let result = auth
            .get_assertion(
                GetAssertionRequest {
                    rp_id: "example.com".into(),
                    hash: vec![0x0Fu8; 32],
                    allow_credential_descriptor_list: vec![
                        PublicKeyCredentialDescriptor {
                            id: made.credential_id.to_vec(),
                            transports: vec![],
                        },
                    ],
                    require_user_verification: false,
                },
                &CallerContext::default(),
                &signal,
            )
            .await
            .unwrap();

        assert_eq!(result.selected_credential.id, made.credential_id);
        // Non-discoverable credentials carry no user handle.
        assert!(result.selected_credential.user_handle.is_none());
        assert!(!result.signature.is_empty());
    }

    #[tokio::test]
    async fn test_get_assertion_discoverable_flow() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        auth.make_credential(make_req("example.com", b"u1", true), &CallerContext::default(), &signal)
            .await
            .unwrap();

        let result = auth
            .get_assertion(
                GetAssertionRequest {
                    rp_id: "example.com".into(),
                    hash: vec![0x0Fu8; 32],
                    allow_credential_descriptor_list: vec![],
                    require_user_verification: true,
                },
                &CallerContext::default(),
                &signal,
            )
            .await
            .unwrap();

        assert_eq!(result.selected_credential.user_handle.as_deref(), Some(&b"u1"[..]));
        // Counter starts at 1 for the first assertion.
        let count = u32::from_be_bytes(result.authenticator_data[33..37].try_into().unwrap());
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_get_assertion_no_credentials() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        let err = auth
            .get_assertion(
                GetAssertionRequest {
                    rp_id: "example.com".into(),
                    hash: vec![0u8; 32],
                    allow_credential_descriptor_list: vec![],
                    require_user_verification: false,
                },
                &CallerContext::default(),
                &signal,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticatorError::NoCredentials));
    }

    #[tokio::test]
    async fn test_get_assertion_wrong_rp_rejected() {
        let auth = authenticator();
        let signal = AbortController::new().signal();
        let made = auth
            .make_credential(make_req("example.com", b"u1", false), &CallerContext::default(), &signal)
            .await
            .unwrap();

        // Allow-listed id exists but belongs to a different RP.
        let err = auth
            .get_assertion(
                GetAssertionRequest {
                    rp_id: "other.com".into(),
                    hash: vec![0u8; 32],
                    allow_credential_descriptor_list: vec![
                        PublicKeyCredentialDescriptor {
                            id: made.credential_id.to_vec(),
                            transports: vec![],
                        },
                    ],
                    require_user_verification: false,
                },
                &CallerContext::default(),
                &signal,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthenticatorError::NoCredentials));
    }
}
