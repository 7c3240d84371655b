use std::collections::HashMap;

/// One emulated credential. The private key is PKCS#8 DER for a P-256
/// signing key; it never leaves this process.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub credential_id: [u8; 16],
    pub rp_id: String,
    pub rp_id_hash: [u8; 32],
    pub rp_name: Option<String>,
    pub user_id: Vec<u8>,
    pub user_name: Option<String>,
    pub user_display: Option<String>,
    pub private_key_der: Vec<u8>,
    pub sign_count: u32,
    pub discoverable: bool,
}

/// In-memory credential store backing the emulated authenticator. Durable
/// storage is out of scope for this crate; callers that want persistence
/// own it outside the authenticator boundary.
#[derive(Debug, Default)]
pub struct CredentialStore {
    by_id: HashMap<[u8; 16], CredentialRecord>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Duplicate credential ids are rejected.
    pub fn add(&mut self, record: CredentialRecord) -> bool {
        if self.by_id.contains_key(&record.credential_id) {
            return false;
        }
        self.by_id.insert(record.credential_id, record);
        true
    }

    pub fn get_by_id(&self, id: &[u8]) -> Option<&CredentialRecord> {
        let id: [u8; 16] = id.try_into().ok()?;
        self.by_id.get(&id)
    }

    /// All credentials for an RP, discoverable-first.
    pub fn get_by_rp_hash(&self, rp_id_hash: &[u8; 32]) -> Vec<&CredentialRecord> {
        let mut found: Vec<&CredentialRecord> = self
            .by_id
            .values()
            .filter(|c| &c.rp_id_hash == rp_id_hash)
            .collect();
        found.sort_by_key(|c| !c.discoverable);
        found
    }

    /// Look up an existing discoverable credential for this (rp, user) pair.
    pub fn find_discoverable(&self, rp_id_hash: &[u8; 32], user_id: &[u8]) -> Option<&CredentialRecord> {
        self.by_id
            .values()
            .find(|c| c.discoverable && &c.rp_id_hash == rp_id_hash && c.user_id == user_id)
    }

    /// Bump and return the signature counter for a credential.
    pub fn increment_counter(&mut self, id: &[u8; 16]) -> Option<u32> {
        let record = self.by_id.get_mut(id)?;
        record.sign_count = record.sign_count.wrapping_add(1);
        Some(record.sign_count)
    }

    pub fn credential_count(&self) -> usize {
        self.by_id.len()
    }
}
