//! Credential Store
//! Mission: Durable username -> password-hash records in a single JSON document

use crate::auth::error::AuthError;
use bcrypt::DEFAULT_COST;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MIN_PASSWORD_LENGTH: usize = 10;
pub const MAX_PASSWORD_LENGTH: usize = 160;

/// One account in the credential document.
/// Serialized shape: `{"name": "...", "hash": "...", "pass_set": true}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub hash: Option<String>,
    pub pass_set: bool,
}

/// Password hashing seam. Production uses bcrypt; tests can swap in a
/// cheaper cost without touching store logic.
pub trait PasswordScheme: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// bcrypt only digests the first 72 bytes of input; the 160-byte
/// password ceiling bounds what the store accepts, not how many bytes
/// feed the hash.
pub struct BcryptScheme {
    cost: u32,
}

impl BcryptScheme {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordScheme for BcryptScheme {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost).map_err(|_| AuthError::SaveUsers)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

/// File-backed user database. The document on disk is the sole source of
/// truth; every operation is a fresh load (and save, for mutations).
///
/// Mutations are serialized through `write_lock` so concurrent
/// create/delete/change_password calls cannot clobber each other's
/// read-modify-write cycles.
pub struct CredentialStore {
    path: PathBuf,
    scheme: Box<dyn PasswordScheme>,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>, scheme: Box<dyn PasswordScheme>) -> Self {
        Self {
            path: path.into(),
            scheme,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the credential document. A missing file is a
    /// caller-visible failure; seeding the default document is the
    /// bootstrap's job, not ours.
    pub fn load(&self) -> Result<BTreeMap<String, UserRecord>, AuthError> {
        let raw = fs::read_to_string(&self.path).map_err(|_| AuthError::LoadUsers)?;
        serde_json::from_str(&raw).map_err(|_| AuthError::LoadUsers)
    }

    /// Serialize and replace the document. Writes go to a sibling temp file
    /// first and are renamed into place so a crash mid-write cannot leave a
    /// corrupt document behind. Owner-only permissions are re-applied after
    /// every save.
    fn save(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(users).map_err(|_| AuthError::SaveUsers)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|_| AuthError::SaveUsers)?;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
            .map_err(|_| AuthError::SaveUsers)?;
        fs::rename(&tmp, &self.path).map_err(|_| AuthError::SaveUsers)?;

        Ok(())
    }

    /// Check a password against the stored hash for `username`.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let users = self.load()?;
        let user = users.get(username).ok_or(AuthError::UserNotFound)?;
        let hash = user.hash.as_deref().ok_or(AuthError::NoHash)?;

        if !self.scheme.verify(password, hash) {
            return Err(AuthError::InvalidPassword);
        }

        Ok(())
    }

    pub fn create(&self, username: &str, password: &str) -> Result<(), AuthError> {
        check_password_length(password)?;

        let _guard = self.write_lock.lock();

        let mut users = self.load()?;
        if users.contains_key(username) {
            return Err(AuthError::UserExists);
        }

        let hash = self.scheme.hash(password)?;
        users.insert(
            username.to_string(),
            UserRecord {
                name: username.to_string(),
                hash: Some(hash),
                pass_set: true,
            },
        );

        self.save(&users)?;
        info!("✅ Created user: {}", username);
        Ok(())
    }

    pub fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        check_password_length(new_password)?;

        let _guard = self.write_lock.lock();

        let mut users = self.load()?;
        let user = users.get_mut(username).ok_or(AuthError::UserNotFound)?;

        let hash = user.hash.as_deref().ok_or(AuthError::NoHash)?;
        if !self.scheme.verify(old_password, hash) {
            return Err(AuthError::InvalidPassword);
        }

        user.hash = Some(self.scheme.hash(new_password)?);
        user.pass_set = true;

        self.save(&users)?;
        info!("🔑 Password changed: {}", username);
        Ok(())
    }

    pub fn delete(&self, username: &str) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock();

        let mut users = self.load()?;
        if users.remove(username).is_none() {
            return Err(AuthError::UserNotFound);
        }

        self.save(&users)?;
        info!("🗑️  Deleted user: {}", username);
        Ok(())
    }

    /// Bootstrap helper: create the parent directory (0700) and, if the
    /// document does not exist yet, seed it with a single admin record.
    /// Returns true when a fresh document was written.
    pub fn seed_default(&self, username: &str, password: &str) -> anyhow::Result<bool> {
        use anyhow::Context;

        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).context("Failed to create credential directory")?;
                fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
                    .context("Failed to set credential directory permissions")?;
            }
        }

        if self.path.exists() {
            return Ok(false);
        }

        let hash = self
            .scheme
            .hash(password)
            .context("Failed to hash default password")?;

        let mut users = BTreeMap::new();
        users.insert(
            username.to_string(),
            UserRecord {
                name: username.to_string(),
                hash: Some(hash),
                pass_set: true,
            },
        );

        self.save(&users)
            .context("Failed to write default credential document")?;

        info!("🔐 Default user created (username: {})", username);
        warn!("⚠️  CHANGE DEFAULT PASSWORD AFTER FIRST LOGIN!");
        Ok(true)
    }
}

fn check_password_length(password: &str) -> Result<(), AuthError> {
    let len = password.len();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(AuthError::PasswordLength);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (CredentialStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("passwd.json");
        // Min cost keeps the hashing rounds out of the test runtime
        let store = CredentialStore::new(path, Box::new(BcryptScheme::with_cost(4)));
        store.seed_default("admin", "password").unwrap();
        (store, dir)
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(
            dir.path().join("nope.json"),
            Box::new(BcryptScheme::with_cost(4)),
        );
        assert_eq!(store.load().unwrap_err(), AuthError::LoadUsers);
    }

    #[test]
    fn test_seed_creates_document_once() {
        let (store, _dir) = create_test_store();

        // Second seed is a no-op
        assert!(!store.seed_default("admin", "password").unwrap());

        let users = store.load().unwrap();
        assert_eq!(users.len(), 1);
        let admin = &users["admin"];
        assert_eq!(admin.name, "admin");
        assert!(admin.pass_set);
        assert!(admin.hash.is_some());
    }

    #[test]
    fn test_document_permissions() {
        let (store, _dir) = create_test_store();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_verify_password() {
        let (store, _dir) = create_test_store();

        assert!(store.verify_password("admin", "password").is_ok());
        assert_eq!(
            store.verify_password("admin", "wrong").unwrap_err(),
            AuthError::InvalidPassword
        );
        assert_eq!(
            store.verify_password("nobody", "password").unwrap_err(),
            AuthError::UserNotFound
        );
    }

    #[test]
    fn test_verify_without_hash_fails() {
        let (store, _dir) = create_test_store();

        let mut users = store.load().unwrap();
        users.get_mut("admin").unwrap().hash = None;
        store.save(&users).unwrap();

        assert_eq!(
            store.verify_password("admin", "password").unwrap_err(),
            AuthError::NoHash
        );
    }

    #[test]
    fn test_create_and_verify_user() {
        let (store, _dir) = create_test_store();

        store.create("operator", "operatorpass").unwrap();
        assert!(store.verify_password("operator", "operatorpass").is_ok());
    }

    #[test]
    fn test_create_duplicate_leaves_original_intact() {
        let (store, _dir) = create_test_store();

        store.create("operator", "operatorpass").unwrap();
        assert_eq!(
            store.create("operator", "otherpassword").unwrap_err(),
            AuthError::UserExists
        );

        // Original password still verifies
        assert!(store.verify_password("operator", "operatorpass").is_ok());
    }

    #[test]
    fn test_password_length_bounds() {
        let (store, _dir) = create_test_store();

        // 9 and 161 bytes rejected before any I/O
        assert_eq!(
            store.create("u1", &"a".repeat(9)).unwrap_err(),
            AuthError::PasswordLength
        );
        assert_eq!(
            store.create("u2", &"a".repeat(161)).unwrap_err(),
            AuthError::PasswordLength
        );

        // 10 and 160 accepted
        store.create("u3", &"a".repeat(10)).unwrap();
        store.create("u4", &"a".repeat(160)).unwrap();
    }

    #[test]
    fn test_bcrypt_digests_first_72_bytes() {
        // Documented limitation: inputs sharing their first 72 bytes
        // verify against the same hash
        let scheme = BcryptScheme::with_cost(4);
        let hash = scheme.hash(&("a".repeat(72) + "tail-one")).unwrap();
        assert!(scheme.verify(&("a".repeat(72) + "tail-two"), &hash));
    }

    #[test]
    fn test_change_password() {
        let (store, _dir) = create_test_store();

        store
            .change_password("admin", "password", "betterpassword")
            .unwrap();

        assert!(store.verify_password("admin", "betterpassword").is_ok());
        assert_eq!(
            store.verify_password("admin", "password").unwrap_err(),
            AuthError::InvalidPassword
        );
    }

    #[test]
    fn test_change_password_requires_old() {
        let (store, _dir) = create_test_store();

        assert_eq!(
            store
                .change_password("admin", "wrong", "betterpassword")
                .unwrap_err(),
            AuthError::InvalidPassword
        );
        assert_eq!(
            store
                .change_password("nobody", "password", "betterpassword")
                .unwrap_err(),
            AuthError::UserNotFound
        );
    }

    #[test]
    fn test_delete_user() {
        let (store, _dir) = create_test_store();

        store.create("operator", "operatorpass").unwrap();
        store.delete("operator").unwrap();

        assert_eq!(
            store.verify_password("operator", "operatorpass").unwrap_err(),
            AuthError::UserNotFound
        );
        assert_eq!(store.delete("operator").unwrap_err(), AuthError::UserNotFound);
    }

    #[test]
    fn test_document_shape_on_disk() {
        let (store, _dir) = create_test_store();

        let raw = fs::read_to_string(store.path()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();

        let admin = &doc["admin"];
        assert_eq!(admin["name"], "admin");
        assert_eq!(admin["pass_set"], true);
        assert!(admin["hash"].is_string());
    }
}
