use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, instrument, warn};

use crate::deblur_pipeline::{
    common::error::{RestoreError, Result},
    io::{ImageSink, ImageSource},
    orchestration::comparison_pipeline::{ComparisonPipeline, ImageReport},
};

/// Outcome of one batch entry.
#[derive(Debug)]
pub enum BatchItem {
    Processed(ImageReport),
    /// Input missing or not decodable; nothing was written.
    Skipped { input: PathBuf, reason: String },
    Failed { input: PathBuf, error: RestoreError },
}

impl BatchItem {
    pub fn input(&self) -> &Path {
        match self {
            BatchItem::Processed(report) => &report.input,
            BatchItem::Skipped { input, .. } | BatchItem::Failed { input, .. } => input,
        }
    }
}

/// Per-input outcomes, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.items.iter().filter(|i| matches!(i, BatchItem::Processed(_))).count()
    }

    pub fn skipped(&self) -> usize {
        self.items.iter().filter(|i| matches!(i, BatchItem::Skipped { .. })).count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| matches!(i, BatchItem::Failed { .. })).count()
    }

    pub fn outputs(&self) -> Vec<&Path> {
        self.items
            .iter()
            .filter_map(|item| match item {
                BatchItem::Processed(report) => Some(report.output.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn log_summary(&self) {
        info!(
            processed = self.processed(),
            skipped = self.skipped(),
            failed = self.failed(),
            "Batch complete"
        );
    }
}

fn classify(input: &Path, result: Result<ImageReport>) -> BatchItem {
    match result {
        Ok(report) => BatchItem::Processed(report),
        Err(e) if e.is_skippable() => {
            warn!(input = %input.display(), "Skipping: {}", e);
            BatchItem::Skipped {
                input: input.to_path_buf(),
                reason: e.to_string(),
            }
        }
        Err(e) => {
            error!(input = %input.display(), "Processing failed: {}", e);
            BatchItem::Failed {
                input: input.to_path_buf(),
                error: e,
            }
        }
    }
}

impl<S: ImageSource, W: ImageSink> ComparisonPipeline<S, W> {
    /// Processes every input in order. A bad entry never stops the batch.
    #[instrument(skip_all, fields(count = inputs.len()))]
    pub fn process_batch<P: AsRef<Path>>(&self, inputs: &[P]) -> BatchReport {
        let items = inputs
            .iter()
            .map(|input| {
                let input = input.as_ref();
                classify(input, self.process_image(input))
            })
            .collect();

        let report = BatchReport { items };
        report.log_summary();
        report
    }

    /// Like [`process_batch`](Self::process_batch), with images spread over
    /// the rayon pool. Items keep input order.
    #[instrument(skip_all, fields(count = inputs.len()))]
    pub fn process_batch_parallel<P: AsRef<Path> + Sync>(&self, inputs: &[P]) -> BatchReport
    where
        S: Sync,
        W: Sync,
    {
        let items = inputs
            .par_iter()
            .map(|input| {
                let input = input.as_ref();
                classify(input, self.process_image(input))
            })
            .collect();

        let report = BatchReport { items };
        report.log_summary();
        report
    }
}
