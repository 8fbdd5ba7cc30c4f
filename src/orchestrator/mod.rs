//! Transformation state machine and progress messages.

mod machine;
mod progress;
mod state;

pub use machine::Orchestrator;
pub use progress::{ProgressTicker, DEFAULT_PROGRESS_INTERVAL, LOADING_MESSAGES};
pub use state::{Status, TransformState};
