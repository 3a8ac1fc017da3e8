//! Record store - JSON file persistence for users and property sets
//!
//! Both collections live as whole-file JSON documents in the data directory:
//! - Users: users.json, an array of user records
//! - Property sets: properties.json, an array of per-user key/value maps
//!
//! Every mutation follows the same protocol: load the full collection,
//! change one entry, rewrite the whole file. Record counts are small and
//! there is no concurrent writer, so write amplification is a non-issue.
//! Writes go through a temp file and rename so a crash mid-write never
//! truncates the live collection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::VaultError;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique id, assigned once at construction
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Login key, unique across all users (exact match)
    pub email: String,
    /// Argon2id PHC hash of the password, never the plaintext
    pub password: String,
}

impl User {
    /// Construct a new user with a fresh v4 UUID id
    pub fn new(first_name: &str, last_name: &str, email: &str, password_hash: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
        }
    }
}

/// One user's key/value property set as persisted on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub user_id: String,
    pub properties: HashMap<String, String>,
}

/// The record store - sole reader/writer of the backing files
pub struct RecordStore {
    /// Directory holding users.json and properties.json
    data_dir: PathBuf,
}

impl RecordStore {
    /// Create a store rooted at the given data directory
    pub fn new(data_dir: &Path) -> Result<Self, VaultError> {
        fs::create_dir_all(data_dir).map_err(|e| {
            VaultError::Persistence(format!(
                "Failed to create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    fn properties_path(&self) -> PathBuf {
        self.data_dir.join("properties.json")
    }

    /// Load the full user collection; missing or unreadable file is empty
    pub fn load_users(&self) -> Vec<User> {
        load_collection(&self.users_path())
    }

    /// First user with an exactly matching email, if any
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.load_users().into_iter().find(|u| u.email == email)
    }

    /// Append a user to the collection and rewrite the backing file
    pub fn persist_user(&self, user: &User) -> Result<(), VaultError> {
        let mut users = self.load_users();
        users.push(user.clone());
        write_collection(&self.users_path(), &users)?;
        debug!("Persisted user {} ({} total)", user.id, users.len());
        Ok(())
    }

    /// The property set for a user, or an empty map if they have none
    pub fn load_properties(&self, user_id: &str) -> HashMap<String, String> {
        let records: Vec<PropertyRecord> = load_collection(&self.properties_path());
        records
            .into_iter()
            .find(|r| r.user_id == user_id)
            .map(|r| r.properties)
            .unwrap_or_default()
    }

    /// Replace (or insert) a user's property set and rewrite the backing file
    pub fn save_properties(
        &self,
        user_id: &str,
        properties: &HashMap<String, String>,
    ) -> Result<(), VaultError> {
        let mut records: Vec<PropertyRecord> = load_collection(&self.properties_path());

        match records.iter_mut().find(|r| r.user_id == user_id) {
            Some(record) => record.properties = properties.clone(),
            None => records.push(PropertyRecord {
                user_id: user_id.to_string(),
                properties: properties.clone(),
            }),
        }

        write_collection(&self.properties_path(), &records)
    }
}

/// Read a whole collection; any read or parse failure degrades to empty
fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => {
            warn!("Unreadable collection {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Rewrite a whole collection via temp file + rename
fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<(), VaultError> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| VaultError::Persistence(format!("Failed to serialize collection: {}", e)))?;

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, json).map_err(|e| {
        VaultError::Persistence(format!("Failed to write {}: {}", tmp_path.display(), e))
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        VaultError::Persistence(format!("Failed to replace {}: {}", path.display(), e))
    })
}
