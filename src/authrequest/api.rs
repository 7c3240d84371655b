use super::types::{AuthRequest, AuthRequestResponse};
use super::AuthRequestError;

/// Opaque RPC collaborator for the auth-request transport. Implementations
/// live outside this crate (HTTP client, test double). The push/poll
/// notification channel that wakes a waiting flow only ever carries a
/// request id — key material never crosses this boundary.
#[async_trait::async_trait]
pub trait AuthRequestApi: Send + Sync {
    async fn post_auth_request(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthRequestResponse, AuthRequestError>;

    async fn post_admin_auth_request(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthRequestResponse, AuthRequestError>;

    /// Fetch a request by id (authenticated caller). `None` when the server
    /// no longer knows the id — the caller clears its pending state and
    /// starts over.
    async fn get_auth_request(
        &self,
        id: &str,
    ) -> Result<Option<AuthRequestResponse>, AuthRequestError>;

    /// Fetch a request's state by id plus access code (unauthenticated
    /// polling by the requesting device).
    async fn get_auth_response(
        &self,
        id: &str,
        access_code: &str,
    ) -> Result<Option<AuthRequestResponse>, AuthRequestError>;
}
