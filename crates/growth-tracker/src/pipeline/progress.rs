//! Progress reporting for the tracker pipeline.
//!
//! The pipeline emits a [`ProgressUpdate`] at the start and end of every
//! stage. Updates go to an optional [`ProgressReporter`]; the CLI does not
//! install one, library callers may.
//!
//! # Example
//!
//! ```rust,ignore
//! use growth_tracker::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a tracker run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the input spreadsheet
    Loading,
    /// Filling, deduplicating and normalizing
    Cleaning,
    /// Computing net subscribers
    Deriving,
    /// Aggregating and printing the summary
    Reporting,
    /// Rendering the charts
    Visualizing,
    /// Writing the cleaned table
    Writing,
    /// Run completed successfully
    Complete,
    /// Run failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Cleaning => "Cleaning Data",
            Self::Deriving => "Deriving Columns",
            Self::Reporting => "Reporting",
            Self::Visualizing => "Rendering Charts",
            Self::Writing => "Writing Output",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run taken by this stage (0.0 - 1.0).
    ///
    /// The working stages sum to 1.0; terminal states weigh nothing.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::Cleaning => 0.20,
            Self::Deriving => 0.05,
            Self::Reporting => 0.10,
            Self::Visualizing => 0.35,
            Self::Writing => 0.15,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Cleaning => 0.15,
            Self::Deriving => 0.35,
            Self::Reporting => 0.40,
            Self::Visualizing => 0.50,
            Self::Writing => 0.85,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from a running pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use growth_tracker::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("{}: {}", update.stage.display_name(), update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
