//! Property manager - CRUD over one user's key/value property set
//!
//! Thin orchestration atop the record store, scoped to a single
//! authenticated user id. Every mutation reloads the set, changes one key,
//! and saves the whole set back.

use std::collections::HashMap;

use crate::error::VaultError;
use crate::store::RecordStore;

/// Key/value property CRUD for one authenticated user
pub struct PropertyManager<'a> {
    store: &'a RecordStore,
    user_id: String,
}

impl<'a> PropertyManager<'a> {
    pub fn new(store: &'a RecordStore, user_id: &str) -> Self {
        Self {
            store,
            user_id: user_id.to_string(),
        }
    }

    /// Insert a new property; rejects keys that already exist
    pub fn create(&self, key: &str, value: &str) -> Result<(), VaultError> {
        let mut properties = self.store.load_properties(&self.user_id);

        if properties.contains_key(key) {
            return Err(VaultError::AlreadyExists(key.to_string()));
        }

        properties.insert(key.to_string(), value.to_string());
        self.store.save_properties(&self.user_id, &properties)
    }

    /// The user's current property set, as an owned copy
    pub fn list(&self) -> HashMap<String, String> {
        self.store.load_properties(&self.user_id)
    }

    /// Replace the value of an existing property
    pub fn update(&self, key: &str, new_value: &str) -> Result<(), VaultError> {
        let mut properties = self.store.load_properties(&self.user_id);

        if !properties.contains_key(key) {
            return Err(VaultError::NotFound(key.to_string()));
        }

        properties.insert(key.to_string(), new_value.to_string());
        self.store.save_properties(&self.user_id, &properties)
    }

    /// Remove an existing property
    pub fn delete(&self, key: &str) -> Result<(), VaultError> {
        let mut properties = self.store.load_properties(&self.user_id);

        if properties.remove(key).is_none() {
            return Err(VaultError::NotFound(key.to_string()));
        }

        self.store.save_properties(&self.user_id, &properties)
    }
}

/// Key format rule shared with front ends: letters, digits, underscores
pub fn valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthService;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_store(test_name: &str) -> (RecordStore, PathBuf) {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = env::temp_dir().join(format!(
            "vault_props_test_{}_{}_{}",
            std::process::id(),
            test_name,
            counter
        ));
        let _ = fs::remove_dir_all(&temp_dir);
        let store = RecordStore::new(&temp_dir).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_create_and_list() {
        let (store, temp_dir) = temp_store("create_list");
        let manager = PropertyManager::new(&store, "user-x");

        manager.create("color", "blue").unwrap();
        manager.create("size", "large").unwrap();

        let props = manager.list();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("color"), Some(&"blue".to_string()));
        assert_eq!(props.get("size"), Some(&"large".to_string()));

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_create_existing_key() {
        let (store, temp_dir) = temp_store("create_existing");
        let manager = PropertyManager::new(&store, "user-x");

        manager.create("color", "blue").unwrap();

        let err = manager.create("color", "red").unwrap_err();
        assert_eq!(err, VaultError::AlreadyExists("color".to_string()));

        // Stored value unchanged
        assert_eq!(manager.list().get("color"), Some(&"blue".to_string()));

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_update() {
        let (store, temp_dir) = temp_store("update");
        let manager = PropertyManager::new(&store, "user-x");

        manager.create("color", "blue").unwrap();
        manager.update("color", "red").unwrap();
        assert_eq!(manager.list().get("color"), Some(&"red".to_string()));

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_update_and_delete_missing_key() {
        let (store, temp_dir) = temp_store("missing");
        let manager = PropertyManager::new(&store, "user-x");

        manager.create("color", "blue").unwrap();

        let err = manager.update("shape", "round").unwrap_err();
        assert_eq!(err, VaultError::NotFound("shape".to_string()));

        let err = manager.delete("shape").unwrap_err();
        assert_eq!(err, VaultError::NotFound("shape".to_string()));

        // Store unchanged either way
        let props = manager.list();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("color"), Some(&"blue".to_string()));

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_users_do_not_share_properties() {
        let (store, temp_dir) = temp_store("isolation");

        let alice = PropertyManager::new(&store, "user-alice");
        let bob = PropertyManager::new(&store, "user-bob");

        alice.create("color", "blue").unwrap();
        bob.create("color", "green").unwrap();

        assert_eq!(alice.list().get("color"), Some(&"blue".to_string()));
        assert_eq!(bob.list().get("color"), Some(&"green".to_string()));

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_list_is_a_copy() {
        let (store, temp_dir) = temp_store("copy");
        let manager = PropertyManager::new(&store, "user-x");

        manager.create("color", "blue").unwrap();
        let before = manager.list();

        manager.update("color", "red").unwrap();

        // Earlier snapshot does not observe the mutation
        assert_eq!(before.get("color"), Some(&"blue".to_string()));

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_valid_keys() {
        assert!(valid_key("color"));
        assert!(valid_key("api_key_2"));

        assert!(!valid_key(""));
        assert!(!valid_key("api-key"));
        assert!(!valid_key("api key"));
        assert!(!valid_key("clé"));
    }

    #[test]
    fn test_end_to_end() {
        let (store, temp_dir) = temp_store("end_to_end");
        let auth = AuthService::new(&store);

        let user = auth.register("Tess", "Tester", "t@t.com", "Abcd1@").unwrap();
        let logged_in = auth.login("t@t.com", "Abcd1@").unwrap();
        assert_eq!(logged_in.id, user.id);

        let manager = PropertyManager::new(&store, &logged_in.id);

        manager.create("color", "blue").unwrap();
        let props = manager.list();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("color"), Some(&"blue".to_string()));

        manager.update("color", "red").unwrap();
        assert_eq!(manager.list().get("color"), Some(&"red".to_string()));

        manager.delete("color").unwrap();
        assert!(manager.list().is_empty());

        let _ = fs::remove_dir_all(&temp_dir);
    }
}
