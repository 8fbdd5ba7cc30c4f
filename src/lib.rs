#![warn(missing_docs)]
//! studioshot - Turn everyday photos into studio-quality shots.
//!
//! The crate pairs a small credential store (obfuscated, persisted,
//! validated API key) with a state machine that sends one photo and one
//! style preset to a Gemini image model and tracks the outcome.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use studioshot::{
//!     CredentialStore, FileStore, GeminiClient, Orchestrator, SourceImage, StyleCatalog,
//! };
//!
//! #[tokio::main]
//! async fn main() -> studioshot::Result<()> {
//!     let client = Arc::new(GeminiClient::builder().build()?);
//!     let mut keys = CredentialStore::new(
//!         Box::new(FileStore::new("storage.json")),
//!         client.clone(),
//!     );
//!     keys.initialize().await;
//!     let credential = match keys.credential().cloned() {
//!         Some(credential) => credential,
//!         None => keys.submit("my-api-key").await?,
//!     };
//!
//!     let mut studio = Orchestrator::new(client, StyleCatalog::builtin());
//!     studio.set_credential(credential)?;
//!     studio.set_image(SourceImage::from_path("me.jpg")?)?;
//!     studio.select_style("vintage-film")?;
//!
//!     if let Some(image) = studio.run().await?.image() {
//!         image.save("studio.png")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `studioshot` command-line front end

pub mod config;
pub mod credential;
mod error;
pub mod image;
pub mod orchestrator;
pub mod prompt;
pub mod remote;
mod request;
pub mod style;

#[cfg(test)]
mod testing;

// Re-export error types at crate root
pub use error::{Blocker, Result, StudioError, GENERATION_FAILED_MESSAGE, INVALID_KEY_MESSAGE};

pub use config::{StudioConfig, StudioConfigBuilder};
pub use credential::{
    CredentialStore, FileStore, KeyCheck, KeyStatus, KeyValueStore, MemoryStore,
    ValidatedCredential,
};
pub use image::{GeneratedImage, GenerationMetadata, ImageFormat, SourceImage};
pub use orchestrator::{Orchestrator, Status, TransformState};
pub use remote::{GeminiClient, GeminiClientBuilder, GeminiModel, StudioClient};
pub use request::TransformationRequest;
pub use style::{StyleCatalog, StyleDescriptor};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::credential::{CredentialStore, KeyValueStore, ValidatedCredential};
    pub use crate::error::{Result, StudioError};
    pub use crate::image::{GeneratedImage, SourceImage};
    pub use crate::orchestrator::{Orchestrator, TransformState};
    pub use crate::remote::{GeminiClient, StudioClient};
    pub use crate::style::StyleCatalog;
}
