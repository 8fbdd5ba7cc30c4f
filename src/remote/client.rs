//! Remote client trait.

use crate::error::Result;
use crate::image::GeneratedImage;
use crate::request::TransformationRequest;
use async_trait::async_trait;

/// Capability for talking to the hosted image model.
///
/// The API key is passed on every call; clients do not hold credentials.
#[async_trait]
pub trait StudioClient: Send + Sync {
    /// Sends a minimal request to check that `api_key` is accepted.
    async fn probe(&self, api_key: &str) -> Result<()>;

    /// Restyles the request's image and returns the first image produced.
    async fn transform(
        &self,
        api_key: &str,
        request: &TransformationRequest,
    ) -> Result<GeneratedImage>;

    /// Returns the name of this client for display.
    fn name(&self) -> &str;
}
