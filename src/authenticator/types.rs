//! Authenticator-facing request/result structs. Everything at this boundary
//! is raw bytes; textual encodings stop at the client engine.

pub const ALG_ES256: i32 = -7;
pub const ALG_RS256: i32 = -257;

#[derive(Debug, Clone)]
pub struct RpEntity {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserEntity {
    pub id: Vec<u8>,
    pub name: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PublicKeyCredentialDescriptor {
    pub id: Vec<u8>,
    pub transports: Vec<String>,
}

#[derive(Debug)]
pub struct MakeCredentialRequest {
    pub hash: Vec<u8>,
    pub rp: RpEntity,
    pub user: UserEntity,
    pub require_resident_key: bool,
    pub require_user_verification: bool,
    pub cred_types_and_pub_key_algs: Vec<i32>,
    pub exclude_credential_descriptor_list: Vec<PublicKeyCredentialDescriptor>,
}

#[derive(Debug)]
pub struct MakeCredentialResult {
    pub credential_id: [u8; 16],
    pub attestation_object: Vec<u8>,
    pub auth_data: Vec<u8>,
    /// SubjectPublicKeyInfo DER of the new credential key.
    pub public_key: Vec<u8>,
    pub public_key_algorithm: i32,
}

#[derive(Debug)]
pub struct GetAssertionRequest {
    pub rp_id: String,
    pub hash: Vec<u8>,
    pub allow_credential_descriptor_list: Vec<PublicKeyCredentialDescriptor>,
    pub require_user_verification: bool,
}

#[derive(Debug)]
pub struct SelectedCredential {
    pub id: [u8; 16],
    pub user_handle: Option<Vec<u8>>,
}

#[derive(Debug)]
pub struct GetAssertionResult {
    pub selected_credential: SelectedCredential,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
}
