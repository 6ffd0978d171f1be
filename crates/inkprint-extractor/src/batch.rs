//! Batch processing: verify, extract, clean

use crate::cleaning::build_table;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::AuthorExtractor;
use crate::types::{ImageOutcome, Progress};
use crate::verifier::AuthorVerifier;
use inkprint_domain::{
    AuthorshipVerdict, ContentTable, EncodedImage, ExtractionResult, ImageBatch, LlmProvider,
};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Runs the two-stage pipeline over an image batch
///
/// Images are handled one at a time, in source-then-intra-source order. For
/// each image the verifier runs first; the extractor only runs on a
/// `Present` verdict.
pub struct BatchProcessor<P> {
    provider: P,
    config: ExtractorConfig,
}

impl<P> BatchProcessor<P>
where
    P: LlmProvider,
    P::Error: Display,
{
    /// Create a new BatchProcessor
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Start a run that yields one [`Progress`] checkpoint per image
    ///
    /// Nothing is sent to the model until the run is iterated. Call
    /// [`BatchRun::finish`] to obtain the table.
    ///
    /// # Errors
    ///
    /// `ExtractorError::Validation` for a blank author, an empty batch or a
    /// batch above `max_images`.
    pub fn start<'a>(
        &'a self,
        author: &str,
        batch: &'a ImageBatch,
    ) -> Result<BatchRun<'a, P>, ExtractorError> {
        let author = author.trim();
        if author.is_empty() {
            return Err(ExtractorError::Validation(
                "author name must not be empty".to_string(),
            ));
        }
        if batch.is_empty() {
            return Err(ExtractorError::Validation("no images to process".to_string()));
        }
        let total = batch.total_images();
        if total > self.config.max_images {
            return Err(ExtractorError::Validation(format!(
                "batch has {} images (max: {})",
                total, self.config.max_images
            )));
        }

        info!(
            "Starting extraction for author '{}' over {} image(s) from {} source(s)",
            author,
            total,
            batch.source_count()
        );

        Ok(BatchRun {
            verifier: AuthorVerifier::new(&self.provider),
            extractor: AuthorExtractor::new(&self.provider),
            author: author.to_string(),
            redact_prefix: &self.config.redact_prefix,
            items: batch.iter().collect::<Vec<_>>().into_iter(),
            processed: 0,
            total,
            results: Vec::new(),
        })
    }

    /// Process the whole batch and return the cleaned table
    pub fn process(&self, author: &str, batch: &ImageBatch) -> Result<ContentTable, ExtractorError> {
        self.process_with(author, batch, |_| {})
    }

    /// Process the whole batch, reporting every checkpoint to `on_progress`
    pub fn process_with<F>(
        &self,
        author: &str,
        batch: &ImageBatch,
        mut on_progress: F,
    ) -> Result<ContentTable, ExtractorError>
    where
        F: FnMut(&Progress),
    {
        let mut run = self.start(author, batch)?;
        for progress in run.by_ref() {
            on_progress(&progress);
        }
        Ok(run.finish())
    }
}

/// An in-flight batch; each `next()` processes exactly one image
pub struct BatchRun<'a, P> {
    verifier: AuthorVerifier<&'a P>,
    extractor: AuthorExtractor<&'a P>,
    author: String,
    redact_prefix: &'a str,
    items: std::vec::IntoIter<(&'a str, usize, &'a EncodedImage)>,
    processed: usize,
    total: usize,
    results: Vec<ExtractionResult>,
}

impl<'a, P> BatchRun<'a, P>
where
    P: LlmProvider,
    P::Error: Display,
{
    /// Images processed so far
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Images in the batch
    pub fn total(&self) -> usize {
        self.total
    }

    /// Author the run extracts for (trimmed)
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Process any remaining images and build the cleaned table
    pub fn finish(mut self) -> ContentTable {
        for _ in self.by_ref() {}

        let table = build_table(&self.author, &self.results, self.redact_prefix);
        info!(
            "Extraction complete: {} image(s), {} row(s) for '{}'",
            self.processed,
            table.len(),
            self.author
        );
        table
    }

    fn process_image(&mut self, image: &EncodedImage) -> ImageOutcome {
        match self.verifier.verify(&self.author, image) {
            Ok(AuthorshipVerdict::Present) => {
                let result = self.extractor.extract(&self.author, image);
                let fragments = result.content.len();
                self.results.push(result);
                ImageOutcome::Extracted { fragments }
            }
            Ok(AuthorshipVerdict::Absent) => {
                self.results.push(ExtractionResult::empty());
                ImageOutcome::Absent
            }
            Err(e) => {
                warn!("Verification failed, skipping image: {}", e);
                ImageOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

impl<'a, P> Iterator for BatchRun<'a, P>
where
    P: LlmProvider,
    P::Error: Display,
{
    type Item = Progress;

    fn next(&mut self) -> Option<Self::Item> {
        let (source, index, image) = self.items.next()?;

        let outcome = self.process_image(image);
        self.processed += 1;
        debug!(
            "Processed {} of {} images ({}#{}: {:?})",
            self.processed, self.total, source, index, outcome
        );

        Some(Progress {
            processed: self.processed,
            total: self.total,
            source: source.to_string(),
            index,
            outcome,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}
