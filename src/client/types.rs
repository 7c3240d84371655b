//! Wire-facing parameter and result types. All byte fields cross this
//! boundary as URL-safe unpadded base64 text per WebAuthn convention; the
//! engine decodes to raw bytes before talking to the authenticator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
    Required,
    Preferred,
    Discouraged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResidentKeyRequirement {
    Required,
    Preferred,
    Discouraged,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpParam {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParam {
    /// base64url
    pub id: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialParam {
    pub alg: i32,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescriptorParam {
    /// base64url
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub transports: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelection {
    pub resident_key: Option<ResidentKeyRequirement>,
    #[serde(default)]
    pub require_resident_key: bool,
    pub user_verification: Option<UserVerification>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialParams {
    pub origin: String,
    pub same_origin_with_ancestors: bool,
    /// base64url, passed through into the client data untouched
    pub challenge: String,
    pub rp: RpParam,
    pub user: UserParam,
    #[serde(default)]
    pub pub_key_cred_params: Vec<PublicKeyCredentialParam>,
    #[serde(default)]
    pub exclude_credentials: Vec<CredentialDescriptorParam>,
    pub authenticator_selection: Option<AuthenticatorSelection>,
    pub timeout: Option<u64>,
    #[serde(default)]
    pub cred_props: bool,
    #[serde(default)]
    pub fallback_supported: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CredProps {
    pub rk: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialResult {
    pub credential_id: String,
    pub attestation_object: String,
    pub auth_data: String,
    pub client_data_json: String,
    pub public_key: String,
    pub public_key_algorithm: i32,
    pub transports: Vec<String>,
    pub cred_props: Option<CredProps>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertCredentialParams {
    pub origin: String,
    pub same_origin_with_ancestors: bool,
    /// base64url
    pub challenge: String,
    pub rp_id: Option<String>,
    /// base64url or dashed-GUID credential ids; empty means discoverable flow
    #[serde(default)]
    pub allowed_credential_ids: Vec<String>,
    pub user_verification: Option<UserVerification>,
    pub timeout: Option<u64>,
    #[serde(default)]
    pub fallback_supported: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertCredentialResult {
    pub credential_id: String,
    pub authenticator_data: String,
    pub client_data_json: String,
    pub signature: String,
    pub user_handle: Option<String>,
}
