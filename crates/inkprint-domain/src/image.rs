//! Image module - encoded screenshots and their grouping by source file

use std::fmt;

/// A self-contained still image, base64-encoded (standard alphabet, padded)
///
/// The payload is what vision requests embed in a `data:image/png;base64,`
/// URL, so it is stored already encoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Wrap an already base64-encoded payload
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    /// The base64 payload
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the encoded payload in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for EncodedImage {
    // Payloads are megabytes of base64; never dump them into logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedImage({} bytes)", self.0.len())
    }
}

/// Images grouped by source identifier (usually a filename)
///
/// Sources keep insertion order and images keep their order within a
/// source. The pipeline verifies every image on its own, so ordering is
/// only preserved for callers that want to reconstruct context.
///
/// # Examples
///
/// ```
/// use inkprint_domain::{EncodedImage, ImageBatch};
///
/// let mut batch = ImageBatch::new();
/// batch.push("thread.zip/page1.png", EncodedImage::new("aGVsbG8="));
/// batch.push("thread.zip/page1.png", EncodedImage::new("d29ybGQ="));
/// batch.push("reply.png", EncodedImage::new("Zm9v"));
///
/// assert_eq!(batch.source_count(), 2);
/// assert_eq!(batch.total_images(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBatch {
    sources: Vec<(String, Vec<EncodedImage>)>,
}

impl ImageBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an image to a source, creating the source on first use
    pub fn push(&mut self, source: impl Into<String>, image: EncodedImage) {
        let source = source.into();
        match self.sources.iter_mut().find(|(name, _)| *name == source) {
            Some((_, images)) => images.push(image),
            None => self.sources.push((source, vec![image])),
        }
    }

    /// Number of distinct sources
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of images across all sources
    pub fn total_images(&self) -> usize {
        self.sources.iter().map(|(_, images)| images.len()).sum()
    }

    /// True when the batch holds no images at all
    pub fn is_empty(&self) -> bool {
        self.total_images() == 0
    }

    /// Source names in insertion order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(name, _)| name.as_str())
    }

    /// Images of one source, if present
    pub fn images_for(&self, source: &str) -> Option<&[EncodedImage]> {
        self.sources
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, images)| images.as_slice())
    }

    /// Every image in source-then-intra-source order, with its source name
    /// and position inside that source
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize, &EncodedImage)> {
        self.sources.iter().flat_map(|(name, images)| {
            images
                .iter()
                .enumerate()
                .map(move |(idx, image)| (name.as_str(), idx, image))
        })
    }
}
