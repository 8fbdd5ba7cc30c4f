//! In-process stand-in for the remote service.

use crate::error::{Result, StudioError};
use crate::image::{GeneratedImage, GenerationMetadata};
use crate::remote::StudioClient;
use crate::request::TransformationRequest;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the fake answers to a transform call.
#[derive(Debug, Clone)]
pub(crate) enum FakeOutcome {
    Image(String),
    NoImage,
    InvalidKey,
    Service(String),
    Forbidden(String),
    Unreachable,
}

pub(crate) struct FakeClient {
    accepted: String,
    outcome: Mutex<FakeOutcome>,
    probes: AtomicUsize,
    transforms: AtomicUsize,
    last_request: Mutex<Option<TransformationRequest>>,
}

impl FakeClient {
    /// A key that makes the probe fail as if the network were down.
    pub(crate) const OFFLINE_KEY: &'static str = "offline-key";

    pub(crate) fn accepting(key: &str) -> Self {
        Self {
            accepted: key.to_string(),
            outcome: Mutex::new(FakeOutcome::Image("Zm9v".into())),
            probes: AtomicUsize::new(0),
            transforms: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn respond_with(&self, outcome: FakeOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub(crate) fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub(crate) fn transforms(&self) -> usize {
        self.transforms.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<TransformationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl StudioClient for FakeClient {
    async fn probe(&self, api_key: &str) -> Result<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if api_key == Self::OFFLINE_KEY {
            return Err(StudioError::Api {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        if api_key != self.accepted {
            return Err(StudioError::InvalidKey);
        }
        Ok(())
    }

    async fn transform(
        &self,
        api_key: &str,
        request: &TransformationRequest,
    ) -> Result<GeneratedImage> {
        self.transforms.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if api_key != self.accepted {
            return Err(StudioError::InvalidKey);
        }
        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            FakeOutcome::Image(payload) => {
                GeneratedImage::from_base64_png(&payload, GenerationMetadata::default())
            }
            FakeOutcome::NoImage => Err(StudioError::GenerationFailed(
                "no image data in response".into(),
            )),
            FakeOutcome::InvalidKey => Err(StudioError::InvalidKey),
            FakeOutcome::Service(message) => Err(StudioError::Api {
                status: 500,
                message,
            }),
            FakeOutcome::Forbidden(message) => Err(StudioError::Auth(message)),
            FakeOutcome::Unreachable => {
                let e = reqwest::Client::new()
                    .get("not a url")
                    .send()
                    .await
                    .unwrap_err();
                Err(StudioError::Network(e))
            }
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}
