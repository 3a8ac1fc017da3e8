//! Authentication - identity creation and verification
//!
//! Gatekeeper for the record store: registration validates names, email
//! format and uniqueness, and password strength before anything is written.
//! Passwords are hashed with Argon2id (PHC string format) at registration
//! and verified against the stored hash at login; the plaintext never
//! reaches disk.
//!
//! Login deliberately returns the same `None` for an unknown email and a
//! wrong password so callers cannot enumerate accounts.

use argon2::{
    password_hash::{rand_core, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use regex::Regex;
use tracing::debug;

use crate::error::VaultError;
use crate::store::{RecordStore, User};

/// Symbols accepted (and one required) in passwords
const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Authentication service backed by the record store
pub struct AuthService<'a> {
    store: &'a RecordStore,
    name_pattern: Regex,
    email_pattern: Regex,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self {
            store,
            name_pattern: Regex::new(r"^[A-Za-z]+$").unwrap(),
            email_pattern: Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap(),
        }
    }

    /// Register a new user, validating every rule before persisting
    pub fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, VaultError> {
        if !self.valid_name(first_name) {
            return Err(VaultError::Validation {
                field: "first name",
                rule: "must be non-empty and contain only letters",
            });
        }
        if !self.valid_name(last_name) {
            return Err(VaultError::Validation {
                field: "last name",
                rule: "must be non-empty and contain only letters",
            });
        }
        if !self.valid_email(email) {
            return Err(VaultError::Validation {
                field: "email",
                rule: "must look like local@domain.tld",
            });
        }
        if !self.email_unique(email) {
            return Err(VaultError::Validation {
                field: "email",
                rule: "already registered",
            });
        }
        if !valid_password(password) {
            return Err(VaultError::Validation {
                field: "password",
                rule: "must be 5+ chars with lowercase, uppercase, digit, and one of @$!%*?&",
            });
        }

        let hash = hash_password(password)?;
        let user = User::new(first_name, last_name, email, &hash);
        self.store.persist_user(&user)?;

        debug!("Registered user {}", user.id);
        Ok(user)
    }

    /// Authenticate by email and password
    ///
    /// Returns `None` for both an unknown email and a wrong password.
    pub fn login(&self, email: &str, password: &str) -> Option<User> {
        let user = self.store.find_user_by_email(email)?;
        if verify_password(password, &user.password) {
            Some(user)
        } else {
            None
        }
    }

    /// Non-blank and composed entirely of ASCII letters
    pub fn valid_name(&self, name: &str) -> bool {
        !name.trim().is_empty() && self.name_pattern.is_match(name)
    }

    /// Matches the local@domain.tld shape
    pub fn valid_email(&self, email: &str) -> bool {
        self.email_pattern.is_match(email)
    }

    /// No stored user has this exact email
    pub fn email_unique(&self, email: &str) -> bool {
        self.store.find_user_by_email(email).is_none()
    }
}

/// Password strength rule: at least one lowercase, one uppercase, one digit,
/// one of `@$!%*?&`, length 5+, and no characters outside that alphabet
pub fn valid_password(password: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;

    for c in password.chars() {
        if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if PASSWORD_SYMBOLS.contains(c) {
            symbol = true;
        } else {
            return false;
        }
    }

    password.len() >= 5 && lower && upper && digit && symbol
}

/// Hash a password with Argon2id and a fresh random salt
fn hash_password(password: &str) -> Result<String, VaultError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| VaultError::Persistence(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC hash string
fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
