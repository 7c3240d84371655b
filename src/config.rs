use std::time::Duration;

pub const AAGUID: [u8; 16] = [
    0xd5, 0x48, 0x82, 0x6e, 0x79, 0xb4, 0x4d, 0xb5, 0xa2, 0xd7, 0x8d, 0x01, 0x00, 0x00, 0x00,
    0x02,
];

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Accept plain-http localhost origins (local development only).
    pub allow_insecure_localhost: bool,
    /// RP IDs whose created credentials advertise ["internal", "usb"]
    /// transports instead of ["internal"]. Some relying parties refuse
    /// platform-only hints; kept as configuration, not policy.
    pub transport_hint_domains: Vec<String>,
    /// RSA modulus size for auth-request keypairs. 2048 is the enforced
    /// minimum.
    pub rsa_key_bits: usize,
    /// How long a pending auth request's private key and access code stay
    /// consumable before the cache expires them.
    pub pending_request_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            allow_insecure_localhost: false,
            transport_hint_domains: vec!["google.com".to_string()],
            rsa_key_bits: 2048,
            pending_request_ttl: Duration::from_secs(5 * 60),
        }
    }
}
