//! Credential storage
//!
//! Durable named-secret storage for provider credentials. The default
//! backend is the operating system's native credential store (Keychain on
//! macOS, Secret Service on Linux, Windows Credential Manager on Windows);
//! [`MemoryStore`] backs tests and embedders that bring their own
//! persistence.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, ZauthError};

/// Service name under which keyring entries are grouped
const KEYRING_SERVICE: &str = "zauth";

/// Durable named-secret store
///
/// `set` has overwrite semantics and no versioning. Implementations must be
/// safe for concurrent use on distinct keys; the auth flow writes a given
/// key at most once per session.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Store a secret under `key`, replacing any existing value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve the secret stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Credential store backed by the OS keyring
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    /// Use a custom keyring service name instead of the default
    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = keyring::Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        tracing::debug!("Stored credential for {}", key);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = keyring::Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory credential store for tests and embedders
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ZauthError::Storage("credential store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| ZauthError::Storage("credential store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("TOKEN").unwrap(), None);

        store.set("TOKEN", "first").unwrap();
        assert_eq!(store.get("TOKEN").unwrap(), Some("first".to_string()));
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("TOKEN", "first").unwrap();
        store.set("TOKEN", "second").unwrap();
        assert_eq!(store.get("TOKEN").unwrap(), Some("second".to_string()));
    }

    #[test]
    fn test_memory_store_distinct_keys() {
        let store = MemoryStore::new();
        store.set("A", "1").unwrap();
        store.set("B", "2").unwrap();
        assert_eq!(store.get("A").unwrap(), Some("1".to_string()));
        assert_eq!(store.get("B").unwrap(), Some("2".to_string()));
    }

    #[test]
    #[serial]
    #[ignore = "requires an OS keyring"]
    fn test_keyring_store_roundtrip() {
        let store = KeyringStore::with_service("zauth-test");
        store.set("ZAUTH_TEST_TOKEN", "tok").unwrap();
        assert_eq!(
            store.get("ZAUTH_TEST_TOKEN").unwrap(),
            Some("tok".to_string())
        );
    }
}
