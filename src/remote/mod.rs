//! Remote image service access.

mod client;
mod gemini;

pub use client::StudioClient;
pub use gemini::{GeminiClient, GeminiClientBuilder, GeminiModel, DEFAULT_BASE_URL, PROBE_MODEL};
