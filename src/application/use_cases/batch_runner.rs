//! Batch runner
//!
//! Sequential fold over a comment collection: one classification per input,
//! input order preserved, individual failures degrade to the empty
//! classification instead of aborting the batch.

use crate::application::use_cases::classifier::ClassifyUseCase;
use crate::domain::classification::{ClassificationResult, Comment};
use crate::domain::taxonomy::TaxonomyIndex;
use tracing::info;

/// Receives fractional progress after each classified comment. The sink
/// itself (terminal, UI, log) is outside the pipeline's responsibility.
pub trait ProgressSink {
    fn report(&self, fraction: f64, status: &str);
}

/// Sink that drops every report. Used when no progress display is wired.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn report(&self, _fraction: f64, _status: &str) {}
}

pub struct BatchRunner<'a> {
    classifier: &'a ClassifyUseCase,
    progress: &'a dyn ProgressSink,
}

impl<'a> BatchRunner<'a> {
    pub fn new(classifier: &'a ClassifyUseCase, progress: &'a dyn ProgressSink) -> Self {
        Self {
            classifier,
            progress,
        }
    }

    /// Classify every comment in order. Each item completes fully, retries
    /// and backoff included, before the next begins.
    pub async fn run(
        &self,
        comments: &[Comment],
        system_prompt: &str,
        taxonomy: &TaxonomyIndex,
    ) -> Vec<ClassificationResult> {
        let total = comments.len();
        let mut results = Vec::with_capacity(total);
        let mut degraded = 0usize;

        for (idx, comment) in comments.iter().enumerate() {
            let classification = self
                .classifier
                .execute(comment, system_prompt, taxonomy)
                .await;
            if classification.is_empty() {
                degraded += 1;
            }
            results.push(ClassificationResult {
                comment: comment.clone(),
                classification,
            });

            let fraction = (idx + 1) as f64 / total as f64;
            let status = format!("Processing comment {} of {}", idx + 1, total);
            self.progress.report(fraction, &status);
        }

        info!(
            total,
            degraded,
            "Batch complete ({} comments degraded to empty classification)",
            degraded
        );
        results
    }
}
