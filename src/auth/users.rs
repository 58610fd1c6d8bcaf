//! In-memory user accounts for the task API

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;

use crate::error::{AppError, Result};

/// Registry of registered users, keyed by username
pub struct UserRegistry {
    users: DashMap<String, String>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Register a new user; fails with `Conflict` when the name is taken
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        if self.users.contains_key(username) {
            return Err(AppError::Conflict("User exists".to_string()));
        }

        // hash outside the shard lock; the entry re-checks for a concurrent winner
        let hash = hash_password(password)?;
        match self.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AppError::Conflict("User exists".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(hash);
                info!(username = %username, "User registered");
                Ok(())
            }
        }
    }

    /// Check a username/password pair
    pub fn verify(&self, username: &str, password: &str) -> Result<()> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let stored = self
            .users
            .get(username)
            .map(|entry| entry.value().clone())
            .ok_or_else(invalid)?;
        let parsed = PasswordHash::new(&stored)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| invalid())
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}
