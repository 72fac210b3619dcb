//! The tracker pipeline and its builder.
//!
//! Stages run once, in order: load, clean, derive, report, visualize, write.

use crate::charts::ChartRenderer;
use crate::cleaner::{DataCleaner, verify_cleaned};
use crate::config::{ConfigValidationError, TrackerConfig};
use crate::derive::add_net_subscribers;
use crate::error::Result;
use crate::loader::{TableLoader, missing_value_counts};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{
    ReportGenerator, ReportParams, SummaryReport, write_missing_values, write_summary,
};
use crate::writer::TableWriter;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Final console line of a successful run.
pub const COMPLETION_MESSAGE: &str = "Script executed successfully. Cleaned data and charts saved.";

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub report: SummaryReport,
    pub output_file: PathBuf,
    /// Rendered chart images, empty when rendering was disabled.
    pub charts: Vec<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub duration_ms: u64,
}

/// The tracker pipeline.
///
/// Use [`Pipeline::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use growth_tracker::{Pipeline, TrackerConfig};
///
/// let config = TrackerConfig::builder()
///     .input("metrics.csv")
///     .render_charts(false)
///     .build()?;
///
/// let result = Pipeline::builder().config(config).build()?.run()?;
/// println!("{} rows written to {}", result.report.rows, result.output_file.display());
/// ```
pub struct Pipeline {
    config: TrackerConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Run every stage, printing the console report to stdout.
    pub fn run(&self) -> Result<PipelineResult> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }

    /// Run every stage, printing the console report to `out`.
    ///
    /// Any I/O failure is fatal; no partial output is cleaned up.
    pub fn run_to(&self, out: &mut impl Write) -> Result<PipelineResult> {
        match self.run_internal(out) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage_started(&self, stage: PipelineStage, message: &str) {
        info!("{}", message);
        self.report_progress(ProgressUpdate::new(stage, 0.0, message));
    }

    fn stage_finished(&self, stage: PipelineStage, message: impl Into<String>) {
        self.report_progress(ProgressUpdate::new(stage, 1.0, message));
    }

    fn run_internal(&self, out: &mut impl Write) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let config = &self.config;

        // Step 1: Load
        self.stage_started(PipelineStage::Loading, "Loading input spreadsheet...");
        let df = TableLoader::load(&config.input)?;
        let missing_values = missing_value_counts(&df);
        write_missing_values(out, &missing_values)?;
        self.stage_finished(
            PipelineStage::Loading,
            format!("Loaded {} rows, {} columns", df.height(), df.width()),
        );

        // Step 2: Clean
        self.stage_started(PipelineStage::Cleaning, "Cleaning data...");
        let (df, cleaning) = self.cleaner.clean(df)?;
        verify_cleaned(&df)?;
        self.stage_finished(
            PipelineStage::Cleaning,
            format!("{} rows after cleaning", df.height()),
        );

        // Step 3: Derive
        self.stage_started(PipelineStage::Deriving, "Deriving net subscribers...");
        let df = add_net_subscribers(df)?;
        self.stage_finished(PipelineStage::Deriving, "Net subscribers derived");

        // Step 4: Report
        self.stage_started(PipelineStage::Reporting, "Summarizing...");
        let report = ReportGenerator::build_report(
            &df,
            ReportParams {
                input_file: &config.input,
                output_file: &config.output,
                missing_values,
                cleaning,
            },
        )?;
        write_summary(out, &report)?;
        let report_file = if config.emit_report {
            Some(ReportGenerator::write_report_to_file(
                &report,
                &config.report_path(),
            )?)
        } else {
            None
        };
        self.stage_finished(PipelineStage::Reporting, "Summary complete");

        // Step 5: Visualize
        let charts = if config.render_charts {
            self.stage_started(PipelineStage::Visualizing, "Rendering charts...");
            let charts = ChartRenderer::new(config).render_all(&df)?;
            self.stage_finished(
                PipelineStage::Visualizing,
                format!("Rendered {} charts", charts.len()),
            );
            charts
        } else {
            info!("Skipping chart rendering (disabled)");
            Vec::new()
        };

        // Step 6: Write
        self.stage_started(PipelineStage::Writing, "Writing cleaned data...");
        TableWriter::write(&df, &config.output)?;
        self.stage_finished(PipelineStage::Writing, "Cleaned data written");

        writeln!(out, "{}", COMPLETION_MESSAGE)?;

        Ok(PipelineResult {
            report,
            output_file: config.output.clone(),
            charts,
            report_file,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<TrackerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during the run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner: DataCleaner,
        })
    }
}
