//! Holds, persists and validates the API key.

use crate::credential::obfuscate::{deobfuscate, obfuscate};
use crate::credential::storage::KeyValueStore;
use crate::error::{Result, StudioError};
use crate::remote::StudioClient;
use std::fmt;
use std::sync::Arc;

/// Storage slot holding the obfuscated key.
pub const STORAGE_KEY: &str = "studio_transformer_v2_key";

/// An API key that the remote service accepted.
///
/// Only [`CredentialStore`] hands these out.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedCredential {
    secret: String,
}

impl ValidatedCredential {
    pub(crate) fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The raw key, for building outbound requests.
    pub fn expose(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ValidatedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCredential")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Result of probing a candidate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCheck {
    /// The service accepted the key.
    Valid,
    /// The service reported the key as invalid.
    InvalidKey,
    /// The key could not be checked.
    Unreachable(String),
}

impl KeyCheck {
    /// Returns true only for [`KeyCheck::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Where the store stands with respect to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    /// No key stored or entered.
    Missing,
    /// A key is known but has not passed validation.
    Unvalidated,
    /// A key passed validation this session.
    Validated,
}

/// Owns the single API key used for all remote calls.
pub struct CredentialStore {
    storage: Box<dyn KeyValueStore>,
    client: Arc<dyn StudioClient>,
    validated: Option<ValidatedCredential>,
    candidate: Option<String>,
    last_check: Option<KeyCheck>,
}

impl CredentialStore {
    /// Creates a store over `storage`, validating keys with `client`.
    pub fn new(storage: Box<dyn KeyValueStore>, client: Arc<dyn StudioClient>) -> Self {
        Self {
            storage,
            client,
            validated: None,
            candidate: None,
            last_check: None,
        }
    }

    /// Loads the persisted key and validates it without surfacing errors.
    pub async fn initialize(&mut self) -> KeyStatus {
        let Some(secret) = self.load_persisted() else {
            tracing::debug!("no persisted API key");
            self.last_check = None;
            return self.status();
        };

        let check = self.check(&secret).await;
        if check.is_valid() {
            tracing::debug!("persisted API key validated");
            self.validated = Some(ValidatedCredential::new(secret));
            self.candidate = None;
        } else {
            tracing::debug!(?check, "persisted API key did not validate");
            self.candidate = Some(secret);
        }
        self.last_check = Some(check);
        self.status()
    }

    /// Reads and deobfuscates the stored key.
    pub fn load_persisted(&self) -> Option<String> {
        let stored = match self.storage.get(STORAGE_KEY) {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!("could not read stored API key: {e}");
                return None;
            }
        };
        let secret = deobfuscate(&stored);
        if secret.is_empty() {
            tracing::warn!("stored API key is malformed; ignoring it");
            return None;
        }
        Some(secret)
    }

    /// Obfuscates `secret` and overwrites the stored slot.
    pub fn persist(&mut self, secret: &str) -> Result<()> {
        self.storage.set(STORAGE_KEY, &obfuscate(secret))
    }

    /// Probes the service with `secret`.
    pub async fn check(&self, secret: &str) -> KeyCheck {
        match self.client.probe(secret).await {
            Ok(()) => KeyCheck::Valid,
            Err(e) if e.is_invalid_key() => {
                tracing::warn!(client = self.client.name(), "API key rejected: {e}");
                KeyCheck::InvalidKey
            }
            Err(e) => {
                tracing::warn!(client = self.client.name(), "API key validation failed: {e}");
                KeyCheck::Unreachable(e.user_message())
            }
        }
    }

    /// Returns true only if the service accepts `secret`.
    pub async fn validate(&self, secret: &str) -> bool {
        self.check(secret).await.is_valid()
    }

    /// Validates a user-entered key; on success persists and adopts it.
    ///
    /// On failure the previously validated key, if any, stays in effect.
    pub async fn submit(&mut self, secret: &str) -> Result<ValidatedCredential> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(StudioError::InvalidRequest("API key is empty".into()));
        }

        match self.check(secret).await {
            KeyCheck::Valid => {}
            KeyCheck::InvalidKey => return Err(StudioError::InvalidKey),
            KeyCheck::Unreachable(reason) => return Err(StudioError::ValidationFailed(reason)),
        }

        if let Err(e) = self.persist(secret) {
            tracing::warn!("API key validated but could not be saved: {e}");
        }
        let credential = ValidatedCredential::new(secret);
        self.validated = Some(credential.clone());
        self.candidate = None;
        Ok(credential)
    }

    /// Current key status.
    pub fn status(&self) -> KeyStatus {
        if self.validated.is_some() {
            KeyStatus::Validated
        } else if self.candidate.is_some() {
            KeyStatus::Unvalidated
        } else {
            KeyStatus::Missing
        }
    }

    /// The validated key, if any.
    pub fn credential(&self) -> Option<&ValidatedCredential> {
        self.validated.as_ref()
    }

    /// Outcome of the probe made by the last [`CredentialStore::initialize`].
    pub fn last_check(&self) -> Option<&KeyCheck> {
        self.last_check.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::storage::MemoryStore;
    use crate::testing::FakeClient;

    fn store_with(client: &Arc<FakeClient>, storage: MemoryStore) -> CredentialStore {
        CredentialStore::new(Box::new(storage), client.clone())
    }

    fn storage_holding(value: &str) -> MemoryStore {
        let mut storage = MemoryStore::new();
        storage.set(STORAGE_KEY, value).unwrap();
        storage
    }

    #[test]
    fn test_persist_then_load() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, MemoryStore::new());

        assert_eq!(store.load_persisted(), None);
        store.persist("first-key").unwrap();
        store.persist("good-key").unwrap();
        assert_eq!(store.load_persisted().as_deref(), Some("good-key"));
    }

    #[test]
    fn test_stored_value_is_obfuscated() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, MemoryStore::new());
        store.persist("good-key").unwrap();

        let raw = store.storage.get(STORAGE_KEY).unwrap().unwrap();
        assert_ne!(raw, "good-key");
        assert!(!raw.contains("good-key"));
    }

    #[test]
    fn test_malformed_storage_reads_as_absent() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let store = store_with(&client, storage_holding("plain-good-key"));
        assert_eq!(store.load_persisted(), None);
    }

    #[tokio::test]
    async fn test_check_distinguishes_causes() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let store = store_with(&client, MemoryStore::new());

        assert_eq!(store.check("good-key").await, KeyCheck::Valid);
        assert_eq!(store.check("bad-key").await, KeyCheck::InvalidKey);
        assert!(matches!(
            store.check(FakeClient::OFFLINE_KEY).await,
            KeyCheck::Unreachable(_)
        ));

        assert!(store.validate("good-key").await);
        assert!(!store.validate("bad-key").await);
        assert!(!store.validate(FakeClient::OFFLINE_KEY).await);
    }

    #[tokio::test]
    async fn test_initialize_validates_persisted_key() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, storage_holding(&obfuscate("good-key")));

        assert_eq!(store.initialize().await, KeyStatus::Validated);
        assert_eq!(store.credential().unwrap().expose(), "good-key");
        assert_eq!(client.probes(), 1);
    }

    #[tokio::test]
    async fn test_initialize_failure_is_silent() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, storage_holding(&obfuscate("stale-key")));

        assert_eq!(store.initialize().await, KeyStatus::Unvalidated);
        assert!(store.credential().is_none());
    }

    #[tokio::test]
    async fn test_initialize_records_probe_outcome() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, storage_holding(&obfuscate("stale-key")));

        store.initialize().await;
        assert_eq!(store.last_check(), Some(&KeyCheck::InvalidKey));
        assert_eq!(client.probes(), 1);

        let mut store = store_with(&client, MemoryStore::new());
        store.initialize().await;
        assert_eq!(store.last_check(), None);
    }

    #[tokio::test]
    async fn test_initialize_without_key_skips_probe() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, MemoryStore::new());

        assert_eq!(store.initialize().await, KeyStatus::Missing);
        assert_eq!(client.probes(), 0);
    }

    #[tokio::test]
    async fn test_submit_persists_valid_key() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, MemoryStore::new());

        let credential = store.submit("  good-key \n").await.unwrap();
        assert_eq!(credential.expose(), "good-key");
        assert_eq!(store.status(), KeyStatus::Validated);
        assert_eq!(store.load_persisted().as_deref(), Some("good-key"));
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_previous_key() {
        let client = Arc::new(FakeClient::accepting("good-key"));
        let mut store = store_with(&client, MemoryStore::new());
        store.submit("good-key").await.unwrap();

        let err = store.submit("bad-key").await.unwrap_err();
        assert!(matches!(err, StudioError::InvalidKey));
        let err = store.submit(FakeClient::OFFLINE_KEY).await.unwrap_err();
        assert!(matches!(err, StudioError::ValidationFailed(_)));
        let err = store.submit("   ").await.unwrap_err();
        assert!(matches!(err, StudioError::InvalidRequest(_)));

        assert_eq!(store.credential().unwrap().expose(), "good-key");
        assert_eq!(store.load_persisted().as_deref(), Some("good-key"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = ValidatedCredential::new("super-secret");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("redacted"));
    }
}
