//! Pipeline module.
//!
//! Wires the loader, cleaner, deriver, reporter, charts and writer into a
//! single run.

mod builder;
pub mod progress;

pub use builder::{COMPLETION_MESSAGE, Pipeline, PipelineBuilder, PipelineResult};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
