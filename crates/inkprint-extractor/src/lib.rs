//! Inkprint Extractor
//!
//! Finds the text a named author wrote in a batch of screenshots.
//!
//! # Overview
//!
//! Every image goes through two vision-model calls. A cheap yes/no
//! verification asks whether the author is credited at all; only on "yes"
//! does the extraction call ask for that author's verbatim content. The
//! fragments are then redacted, de-blanked and de-duplicated into a
//! [`ContentTable`](inkprint_domain::ContentTable).
//!
//! # Architecture
//!
//! ```text
//! ImageBatch → AuthorVerifier → (yes) AuthorExtractor → normalize → build_table
//!                             → (no)  skip
//! ```
//!
//! The resulting text can be fed to the [`KeywordAnalyzer`] for keyword and
//! search-site suggestions.
//!
//! # Example Usage
//!
//! ```
//! use inkprint_extractor::{BatchProcessor, ExtractorConfig, PromptBuilder};
//! use inkprint_domain::{EncodedImage, ImageBatch};
//! use inkprint_llm::MockProvider;
//!
//! let llm = MockProvider::new("no");
//! let prompts = PromptBuilder::new("alice");
//! llm.add_response(prompts.verification(), "yes");
//! llm.add_response(prompts.extraction(), r#"{"content": ["hello there"]}"#);
//!
//! let mut batch = ImageBatch::new();
//! batch.push("thread.png", EncodedImage::new("aW1n"));
//!
//! let processor = BatchProcessor::new(llm, ExtractorConfig::default());
//! let table = processor
//!     .process_with("alice", &batch, |p| println!("{}/{}", p.processed, p.total))
//!     .unwrap();
//!
//! assert_eq!(table.rows()[0].content, "hello there");
//! ```

#![warn(missing_docs)]

mod batch;
mod cache;
mod cleaning;
mod config;
mod error;
mod extractor;
mod keywords;
mod loader;
mod normalizer;
mod prompt;
mod types;
mod verifier;


pub use batch::{BatchProcessor, BatchRun};
pub use cache::{CacheKey, ExtractionCache};
pub use cleaning::{build_table, redact_tokens};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::AuthorExtractor;
pub use keywords::{KeywordAnalyzer, KeywordReport};
pub use loader::load_images;
pub use normalizer::normalize;
pub use prompt::{keyword_prompt, website_system_prompt, website_user_prompt, PromptBuilder};
pub use types::{ImageOutcome, Progress};
pub use verifier::AuthorVerifier;
