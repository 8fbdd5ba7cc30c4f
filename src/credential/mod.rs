//! API key obfuscation, persistence and validation.

mod obfuscate;
mod storage;
mod store;

pub use obfuscate::{deobfuscate, obfuscate};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{CredentialStore, KeyCheck, KeyStatus, ValidatedCredential, STORAGE_KEY};
