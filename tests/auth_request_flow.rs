//! Device-approval login flow: one device posts an auth request, the other
//! approves it, and the requester unwraps the key material through the
//! one-shot pending cache.

use std::sync::Mutex;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as B64, Engine};

use fidoxide::authrequest::api::AuthRequestApi;
use fidoxide::authrequest::{
    fingerprint_phrase, AuthRequest, AuthRequestCrypto, AuthRequestError, AuthRequestResponse,
    AuthRequestType, DeviceKeys, MasterKey, PendingRequestCache, UserKey,
};

/// In-memory stand-in for the auth-request endpoints: assigns ids on post
/// and replays the approver's answer on poll.
#[derive(Default)]
struct FakeServer {
    posted: Mutex<Option<AuthRequest>>,
    answer: Mutex<Option<(String, Option<String>, bool)>>,
}

impl FakeServer {
    fn record_answer(&self, key: Option<String>, hash: Option<String>, approved: bool) {
        *self.answer.lock().unwrap() = Some((key.unwrap_or_default(), hash, approved));
    }

    fn response(&self) -> AuthRequestResponse {
        let posted = self.posted.lock().unwrap();
        let request = posted.as_ref().expect("nothing posted");
        let answer = self.answer.lock().unwrap();
        let (key, hash, approved) = match answer.as_ref() {
            Some((k, h, a)) => (
                (!k.is_empty()).then(|| k.clone()),
                h.clone(),
                *a,
            ),
            None => (None, None, false),
        };
        AuthRequestResponse {
            id: "req-42".into(),
            public_key: request.public_key.clone(),
            key,
            master_password_hash: hash,
            request_approved: approved,
            is_answered: answer.is_some(),
            creation_date: None,
        }
    }
}

#[async_trait::async_trait]
impl AuthRequestApi for FakeServer {
    async fn post_auth_request(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthRequestResponse, AuthRequestError> {
        *self.posted.lock().unwrap() = Some(request.clone());
        Ok(self.response())
    }

    async fn post_admin_auth_request(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthRequestResponse, AuthRequestError> {
        self.post_auth_request(request).await
    }

    async fn get_auth_request(
        &self,
        id: &str,
    ) -> Result<Option<AuthRequestResponse>, AuthRequestError> {
        Ok((id == "req-42").then(|| self.response()))
    }

    async fn get_auth_response(
        &self,
        id: &str,
        access_code: &str,
    ) -> Result<Option<AuthRequestResponse>, AuthRequestError> {
        let posted = self.posted.lock().unwrap();
        let granted = posted
            .as_ref()
            .is_some_and(|r| id == "req-42" && r.access_code == access_code);
        drop(posted);
        Ok(granted.then(|| self.response()))
    }
}

const TTL: Duration = Duration::from_secs(300);

#[tokio::test]
async fn test_user_key_login_flow() {
    let server = FakeServer::default();
    let crypto = AuthRequestCrypto::new(2048).unwrap();
    let cache = PendingRequestCache::new(TTL);

    // Requesting device: build, post, remember under the server id.
    let (request, mut pending) = crypto
        .build_auth_request("alice@example.com", "device-a", AuthRequestType::AuthenticateAndUnlock)
        .unwrap();
    let posted = server.post_auth_request(&request).await.unwrap();
    pending.id = posted.id.clone();
    cache.insert(pending);

    // Approving device: fetch, check the fingerprint, wrap its user key.
    let seen = server.get_auth_request(&posted.id).await.unwrap().unwrap();
    let approver_phrase = fingerprint_phrase(
        "alice@example.com",
        &B64.decode(&seen.public_key).unwrap(),
    )
    .unwrap();
    let user_key = UserKey(vec![0x5Au8; 64]);
    let reply = crypto
        .approve_or_deny(
            true,
            &seen,
            &DeviceKeys {
                user_key: user_key.clone(),
                master_key: None,
                master_key_hash: None,
            },
        )
        .unwrap();
    server.record_answer(reply.key, reply.master_password_hash, true);

    // Requesting device: poll with the access code, consume, unwrap.
    let answered = server
        .get_auth_response("req-42", &request.access_code)
        .await
        .unwrap()
        .unwrap();
    assert!(answered.request_approved);

    let pending = cache.consume(&answered.id).unwrap();
    // Both devices derived the same phrase from the same public key.
    assert_eq!(pending.fingerprint_phrase, approver_phrase);

    let unwrapped = crypto
        .decrypt_user_key(answered.key.as_deref().unwrap(), &pending.private_key_der)
        .unwrap();
    assert_eq!(unwrapped, user_key);

    // The pending entry is gone; a replayed answer cannot be redeemed.
    assert!(matches!(cache.consume("req-42"), Err(AuthRequestError::NotFound)));
}

#[tokio::test]
async fn test_master_key_login_flow() {
    let server = FakeServer::default();
    let crypto = AuthRequestCrypto::new(2048).unwrap();
    let cache = PendingRequestCache::new(TTL);

    let (request, mut pending) = crypto
        .build_auth_request("bob@example.com", "device-b", AuthRequestType::AuthenticateAndUnlock)
        .unwrap();
    let posted = server.post_auth_request(&request).await.unwrap();
    pending.id = posted.id.clone();
    cache.insert(pending);

    let seen = server.get_auth_request(&posted.id).await.unwrap().unwrap();
    let master_key = MasterKey(vec![0x77u8; 32]);
    let reply = crypto
        .approve_or_deny(
            true,
            &seen,
            &DeviceKeys {
                user_key: UserKey(vec![0u8; 64]),
                master_key: Some(master_key.clone()),
                master_key_hash: Some("kdf-hash".into()),
            },
        )
        .unwrap();
    server.record_answer(reply.key, reply.master_password_hash, true);

    let answered = server
        .get_auth_response("req-42", &request.access_code)
        .await
        .unwrap()
        .unwrap();
    let pending = cache.consume(&answered.id).unwrap();
    let (unwrapped, hash) = crypto
        .decrypt_master_key_and_hash(
            answered.key.as_deref().unwrap(),
            answered.master_password_hash.as_deref().unwrap(),
            &pending.private_key_der,
        )
        .unwrap();
    assert_eq!(unwrapped, master_key);
    assert_eq!(hash, "kdf-hash");
}

#[tokio::test]
async fn test_denied_request_carries_no_key() {
    let server = FakeServer::default();
    let crypto = AuthRequestCrypto::new(2048).unwrap();

    let (request, _) = crypto
        .build_auth_request("alice@example.com", "device-a", AuthRequestType::AuthenticateAndUnlock)
        .unwrap();
    let posted = server.post_auth_request(&request).await.unwrap();

    let seen = server.get_auth_request(&posted.id).await.unwrap().unwrap();
    let reply = crypto
        .approve_or_deny(
            false,
            &seen,
            &DeviceKeys {
                user_key: UserKey(vec![1u8; 64]),
                master_key: None,
                master_key_hash: None,
            },
        )
        .unwrap();
    assert!(!reply.request_approved);
    server.record_answer(reply.key, reply.master_password_hash, false);

    let answered = server
        .get_auth_response("req-42", &request.access_code)
        .await
        .unwrap()
        .unwrap();
    assert!(!answered.request_approved);
    assert!(answered.key.is_none());
}

#[tokio::test]
async fn test_wrong_access_code_gets_nothing() {
    let server = FakeServer::default();
    let crypto = AuthRequestCrypto::new(2048).unwrap();

    let (request, _) = crypto
        .build_auth_request("alice@example.com", "device-a", AuthRequestType::AuthenticateAndUnlock)
        .unwrap();
    server.post_auth_request(&request).await.unwrap();

    let polled = server.get_auth_response("req-42", "wrong-code").await.unwrap();
    assert!(polled.is_none());
}

#[tokio::test]
async fn test_second_request_invalidates_first() {
    let crypto = AuthRequestCrypto::new(2048).unwrap();
    let cache = PendingRequestCache::new(TTL);

    let (_, mut first) = crypto
        .build_auth_request("alice@example.com", "device-a", AuthRequestType::AuthenticateAndUnlock)
        .unwrap();
    first.id = "req-1".into();
    cache.insert(first);

    let (_, mut second) = crypto
        .build_auth_request("alice@example.com", "device-a", AuthRequestType::AuthenticateAndUnlock)
        .unwrap();
    second.id = "req-2".into();
    cache.insert(second);

    assert!(matches!(cache.consume("req-1"), Err(AuthRequestError::NotFound)));
    assert!(cache.consume("req-2").is_ok());
}
