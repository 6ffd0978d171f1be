//! Inkprint Domain Layer
//!
//! Value types and trait seams shared by every Inkprint crate. Nothing in
//! here performs I/O; model transports, screenshot clients and the CLI live
//! in the infrastructure crates.
//!
//! ## Key Concepts
//!
//! - **EncodedImage**: a base64 still image, sent one per vision call
//! - **ImageBatch**: images grouped by the file they came from
//! - **AuthorshipVerdict**: fail-closed yes/no outcome of verification
//! - **ExtractionResult**: content fragments attributed to an author in one image
//! - **ContentTable**: cleaned, de-duplicated `(author, content)` rows
//!
//! ## Architecture
//!
//! - Pure data and invariants only
//! - `LlmProvider` is the single boundary towards language models

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod image;
pub mod traits;

// Re-exports for convenience
pub use content::{AuthorshipVerdict, ContentRow, ContentTable, ExtractionResult};
pub use image::{EncodedImage, ImageBatch};
pub use traits::{LlmProvider, ResponseFormat, TextCompletionRequest};
