//! Progress and outcome types for batch processing

/// What happened to one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Verification said the author is not credited; extraction was skipped
    Absent,

    /// Verification passed and extraction returned this many fragments
    /// (zero when extraction degraded)
    Extracted {
        /// Number of raw fragments, before cleaning
        fragments: usize,
    },

    /// Verification failed at the transport level; the image contributes
    /// nothing
    Failed {
        /// Error description for the caller's error channel
        error: String,
    },
}

/// Checkpoint emitted after each processed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Images processed so far, including this one
    pub processed: usize,

    /// Images in the batch
    pub total: usize,

    /// Source the image belongs to
    pub source: String,

    /// Position of the image within its source
    pub index: usize,

    /// Result for this image
    pub outcome: ImageOutcome,
}

impl Progress {
    /// Fraction of the batch done, in `[0.0, 1.0]`
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }

    /// True when this checkpoint is the last one of the batch
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}
