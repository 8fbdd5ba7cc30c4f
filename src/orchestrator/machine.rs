//! State machine driving one transformation attempt at a time.

use crate::credential::ValidatedCredential;
use crate::error::{Blocker, Result, StudioError};
use crate::image::{GeneratedImage, SourceImage};
use crate::orchestrator::progress::{ProgressTicker, DEFAULT_PROGRESS_INTERVAL, LOADING_MESSAGES};
use crate::orchestrator::state::{Status, TransformState};
use crate::remote::StudioClient;
use crate::request::TransformationRequest;
use crate::style::{StyleCatalog, StyleDescriptor};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Collects inputs, runs transformations and tracks their outcome.
///
/// Only one attempt can be in flight; inputs are frozen while it runs.
pub struct Orchestrator {
    client: Arc<dyn StudioClient>,
    catalog: StyleCatalog,
    selected: usize,
    credential: Option<ValidatedCredential>,
    image: Option<SourceImage>,
    instructions: String,
    state: TransformState,
    ticker: Option<ProgressTicker>,
    progress_interval: Duration,
}

impl Orchestrator {
    /// Creates an idle orchestrator with the catalog's first style selected.
    pub fn new(client: Arc<dyn StudioClient>, catalog: StyleCatalog) -> Self {
        Self {
            client,
            catalog,
            selected: 0,
            credential: None,
            image: None,
            instructions: String::new(),
            state: TransformState::Idle,
            ticker: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Sets how often the progress message rotates.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Current state.
    pub fn state(&self) -> &TransformState {
        &self.state
    }

    /// Current status tag.
    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// The style catalog.
    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// The selected style.
    pub fn selected_style(&self) -> &StyleDescriptor {
        &self.catalog.styles()[self.selected]
    }

    /// The loaded source image.
    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    /// Free-text instructions for the next attempt.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Whether a validated credential is available.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    fn ensure_idle_inputs(&self) -> Result<()> {
        if self.state.is_loading() {
            return Err(StudioError::Rejected(Blocker::InFlight));
        }
        Ok(())
    }

    /// Adopts a credential accepted by the credential store.
    pub fn set_credential(&mut self, credential: ValidatedCredential) -> Result<()> {
        self.ensure_idle_inputs()?;
        self.credential = Some(credential);
        Ok(())
    }

    /// Loads a new source image, discarding any previous outcome.
    pub fn set_image(&mut self, image: SourceImage) -> Result<()> {
        self.ensure_idle_inputs()?;
        self.image = Some(image);
        self.state = TransformState::Idle;
        Ok(())
    }

    /// Replaces the free-text instructions.
    pub fn set_instructions(&mut self, instructions: impl Into<String>) -> Result<()> {
        self.ensure_idle_inputs()?;
        self.instructions = instructions.into();
        Ok(())
    }

    /// Selects a style by id.
    pub fn select_style(&mut self, id: &str) -> Result<()> {
        self.ensure_idle_inputs()?;
        self.selected = self
            .catalog
            .position(id)
            .ok_or_else(|| StudioError::InvalidRequest(format!("unknown style: {id}")))?;
        Ok(())
    }

    /// What currently prevents [`Orchestrator::begin`], if anything.
    pub fn blocker(&self) -> Option<Blocker> {
        if self.state.is_loading() {
            Some(Blocker::InFlight)
        } else if self.image.is_none() {
            Some(Blocker::NoImage)
        } else if self.credential.is_none() {
            Some(Blocker::NotValidated)
        } else {
            None
        }
    }

    /// Enters `Loading` and returns the request to send.
    ///
    /// Rejected without any state change when no image is loaded, no
    /// credential has been validated, or an attempt is already running.
    /// Must be called inside a tokio runtime; otherwise it fails with
    /// [`StudioError::Runtime`] and the state stays as it was.
    pub fn begin(&mut self) -> Result<TransformationRequest> {
        if let Some(blocker) = self.blocker() {
            tracing::debug!(%blocker, "transformation start rejected");
            return Err(StudioError::Rejected(blocker));
        }
        let image = self
            .image
            .clone()
            .ok_or(StudioError::Rejected(Blocker::NoImage))?;

        let ticker = ProgressTicker::start(LOADING_MESSAGES.len(), self.progress_interval)?;
        let request =
            TransformationRequest::new(image, self.selected_style(), self.instructions.clone());
        self.ticker = Some(ticker);
        self.state = TransformState::Loading;
        tracing::debug!(style = %request.style_id(), "transformation started");
        Ok(request)
    }

    /// Sends `request` to the remote service. Does not change state.
    pub async fn execute(&self, request: &TransformationRequest) -> Result<GeneratedImage> {
        let credential = self
            .credential
            .as_ref()
            .ok_or(StudioError::Rejected(Blocker::NotValidated))?;
        self.client.transform(credential.expose(), request).await
    }

    /// Resolves the running attempt with its outcome.
    ///
    /// Outcomes arriving outside `Loading` are ignored.
    pub fn finish(&mut self, outcome: Result<GeneratedImage>) -> &TransformState {
        if !self.state.is_loading() {
            tracing::warn!(status = %self.state.status(), "ignoring outcome outside loading");
            return &self.state;
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }

        self.state = match outcome {
            Ok(image) => {
                tracing::info!(
                    style = %self.selected_style().id,
                    size_bytes = image.size(),
                    duration_ms = ?image.metadata.duration_ms,
                    "transformation succeeded"
                );
                TransformState::Success(image)
            }
            Err(e) => {
                tracing::error!(style = %self.selected_style().id, "transformation failed: {e}");
                TransformState::Error(e.user_message())
            }
        };
        &self.state
    }

    /// Runs one full attempt: begin, remote call, finish.
    pub async fn run(&mut self) -> Result<&TransformState> {
        let request = self.begin()?;
        let outcome = self.execute(&request).await;
        Ok(self.finish(outcome))
    }

    /// Returns to `Idle`, clearing the image, outcome and instructions.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_idle_inputs()?;
        self.image = None;
        self.instructions.clear();
        self.state = TransformState::Idle;
        Ok(())
    }

    /// The rotating status message, only while loading.
    pub fn progress_message(&self) -> Option<&'static str> {
        let ticker = self.ticker.as_ref().filter(|_| self.state.is_loading())?;
        LOADING_MESSAGES.get(ticker.index()).copied()
    }

    /// Index updates for the rotating message, only while loading.
    ///
    /// The receiver reports closed once the attempt resolves.
    pub fn progress_updates(&self) -> Option<watch::Receiver<usize>> {
        self.ticker.as_ref().map(ProgressTicker::subscribe)
    }
}
