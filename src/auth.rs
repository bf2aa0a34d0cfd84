use sha2::{Digest, Sha256};

use crate::database::{Database, DatabaseError};
use crate::models::User;

/// One-way digest for credential storage: SHA-256, lowercase hex.
/// Unsalted, matching the digests already present in existing databases;
/// a salted scheme would require a stored-credential migration.
pub fn hash_password(plaintext: &str) -> String {
    format!("{:x}", Sha256::digest(plaintext.as_bytes()))
}

/// Outcome of a registration attempt. Duplicate usernames are a normal
/// rejection, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created(i64),
    AlreadyExists,
}

/// Registration, credential verification and profile lookup over the users
/// table. Lookups that find nothing report it in the return value; the only
/// errors surfaced are storage failures.
pub struct UserStore<'a> {
    db: &'a Database,
}

impl<'a> UserStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new account. The username is trimmed and checked for a
    /// case-insensitive collision before inserting; only the password digest
    /// is stored.
    pub fn register(
        &self,
        first_name: &str,
        last_name: &str,
        course: &str,
        year_level: &str,
        username: &str,
        password: &str,
    ) -> Result<RegisterOutcome, DatabaseError> {
        let username = username.trim();
        if self.is_username_taken(username)? {
            return Ok(RegisterOutcome::AlreadyExists);
        }

        let user = User {
            id: None,
            username: username.to_string(),
            password_hash: hash_password(password),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            course: course.to_string(),
            year_level: year_level.to_string(),
        };
        let id = self.db.insert_user(&user)?;
        Ok(RegisterOutcome::Created(id))
    }

    /// An empty or whitespace-only username is always reported as taken
    pub fn is_username_taken(&self, username: &str) -> Result<bool, DatabaseError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(true);
        }
        Ok(self.db.find_user(username)?.is_some())
    }

    /// Compare the password digest against the stored one. An unknown
    /// username verifies as false, never as an error.
    pub fn verify_credentials(&self, username: &str, password: &str) -> Result<bool, DatabaseError> {
        match self.db.find_user(username)? {
            Some(user) => Ok(user.password_hash == hash_password(password)),
            None => Ok(false),
        }
    }

    pub fn get_profile(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.db.find_user(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.db");
        let db = Database::new(path.to_str().expect("utf-8 path")).expect("open db");
        (dir, db)
    }

    fn register_mia(store: &UserStore, username: &str) -> RegisterOutcome {
        store
            .register("Mia", "Reyes", "BSCS", "2", username, "hunter2")
            .expect("register")
    }

    #[test]
    fn digest_is_sha256_lowercase_hex() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        // Deterministic across calls
        assert_eq!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn duplicate_usernames_differing_by_case_or_whitespace_are_rejected() {
        let (_dir, db) = open_db();
        let store = UserStore::new(&db);

        assert!(matches!(
            register_mia(&store, "mia"),
            RegisterOutcome::Created(_)
        ));
        assert_eq!(register_mia(&store, "MIA"), RegisterOutcome::AlreadyExists);
        assert_eq!(
            register_mia(&store, "  mia  "),
            RegisterOutcome::AlreadyExists
        );
    }

    #[test]
    fn empty_username_is_always_taken() {
        let (_dir, db) = open_db();
        let store = UserStore::new(&db);
        assert!(store.is_username_taken("").expect("check"));
        assert!(store.is_username_taken("   ").expect("check"));
        assert_eq!(register_mia(&store, "   "), RegisterOutcome::AlreadyExists);
    }

    #[test]
    fn verify_credentials_matches_digest_only() {
        let (_dir, db) = open_db();
        let store = UserStore::new(&db);
        register_mia(&store, "mia");

        assert!(store.verify_credentials("mia", "hunter2").expect("verify"));
        assert!(store
            .verify_credentials(" MIA ", "hunter2")
            .expect("verify trimmed case-insensitive lookup"));
        assert!(!store.verify_credentials("mia", "wrong").expect("verify"));
        assert!(!store.verify_credentials("nobody", "hunter2").expect("verify"));
    }

    #[test]
    fn plaintext_password_is_never_stored() {
        let (_dir, db) = open_db();
        let store = UserStore::new(&db);
        register_mia(&store, "mia");

        let profile = store.get_profile("mia").expect("lookup").expect("found");
        assert_eq!(profile.password_hash, hash_password("hunter2"));
        assert_ne!(profile.password_hash, "hunter2");
    }

    #[test]
    fn profile_lookup_miss_is_none() {
        let (_dir, db) = open_db();
        let store = UserStore::new(&db);
        assert!(store.get_profile("nobody").expect("lookup").is_none());
    }
}
