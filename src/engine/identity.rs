// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Owner identity management.
//!
//! The owner identity is the disposable custodial wallet: an opaque
//! 32-byte secret plus the public address derived from it. The secret is
//! never logged and never serialized into API responses; it leaves this
//! module only as the relay credential. Secret and address are always
//! generated and persisted together.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain separator for address derivation.
const ADDRESS_DOMAIN: &[u8] = b"veilpay-owner-v1";

/// Filename of the persisted identity under the data directory.
const IDENTITY_FILE: &str = "owner_identity.json";

/// Errors raised by identity generation and persistence.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("identity store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored identity is corrupt: {0}")]
    Corrupt(String),
}

/// The custodial owner identity.
pub struct OwnerIdentity {
    secret: [u8; 32],
    address: String,
}

impl OwnerIdentity {
    /// Generate a fresh identity from the OS entropy source.
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        let address = derive_address(&secret);
        Self { secret, address }
    }

    /// Rebuild an identity from stored parts, verifying that the address
    /// still matches the secret it was derived from.
    fn from_parts(secret: [u8; 32], address: String) -> Result<Self, IdentityError> {
        let expected = derive_address(&secret);
        if expected != address {
            return Err(IdentityError::Corrupt(
                "address does not match stored secret".to_string(),
            ));
        }
        Ok(Self { secret, address })
    }

    /// The derived public address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Hex encoding of the secret, used only as the relay credential.
    /// Must never appear in logs or API responses.
    pub(crate) fn secret_hex(&self) -> String {
        hex::encode(self.secret)
    }
}

impl std::fmt::Debug for OwnerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerIdentity")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Derive the public address for a secret.
fn derive_address(secret: &[u8; 32]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(secret);
    let digest = hasher.finalize();
    hex::encode(&digest[..20])
}

/// Persistence seam for the owner identity.
///
/// Secure storage is an external concern; the engine only requires that
/// secret and address are stored and loaded as one unit.
pub trait SecretStore: Send + Sync {
    fn load(&self) -> Result<Option<OwnerIdentity>, IdentityError>;
    fn save(&self, identity: &OwnerIdentity) -> Result<(), IdentityError>;
}

/// On-disk serialized form. Secret and address travel together, always.
#[derive(Serialize, Deserialize)]
struct StoredIdentity {
    secret: String,
    address: String,
}

/// File-backed secret store under the configured data directory.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(IDENTITY_FILE),
        }
    }
}

impl SecretStore for FileSecretStore {
    fn load(&self) -> Result<Option<OwnerIdentity>, IdentityError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredIdentity = serde_json::from_str(&raw)?;
        let bytes = hex::decode(&stored.secret)
            .map_err(|e| IdentityError::Corrupt(format!("secret is not hex: {e}")))?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| IdentityError::Corrupt("secret has wrong length".to_string()))?;

        OwnerIdentity::from_parts(secret, stored.address).map(Some)
    }

    fn save(&self, identity: &OwnerIdentity) -> Result<(), IdentityError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredIdentity {
            secret: identity.secret_hex(),
            address: identity.address.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        // Write-then-rename so a crash never leaves a half-written secret.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Load the persisted identity, or generate and persist a fresh one.
pub fn load_or_generate(store: &dyn SecretStore) -> Result<OwnerIdentity, IdentityError> {
    if let Some(identity) = store.load()? {
        return Ok(identity);
    }
    let identity = OwnerIdentity::generate();
    store.save(&identity)?;
    Ok(identity)
}
