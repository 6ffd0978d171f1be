//! Turn per-image extraction results into the final content table

use inkprint_domain::{ContentRow, ContentTable, ExtractionResult};

/// Remove whitespace-separated tokens starting with `prefix`
///
/// Remaining tokens keep their order and are re-joined with single spaces,
/// so surrounding and repeated whitespace is normalized as a side effect.
///
/// # Examples
///
/// ```
/// use inkprint_extractor::redact_tokens;
///
/// let cleaned = redact_tokens("see https://x.io/a for  details ", "https://");
/// assert_eq!(cleaned, "see for details");
/// ```
pub fn redact_tokens(content: &str, prefix: &str) -> String {
    content
        .split_whitespace()
        .filter(|token| !token.starts_with(prefix))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten results into rows for `author` and clean them
///
/// Steps, in order:
/// 1. redact tokens starting with `redact_prefix`
/// 2. drop `null` fragments
/// 3. drop fragments that are empty or whitespace-only
/// 4. drop exact duplicate `(author, content)` rows, keeping the first
pub fn build_table<'a, I>(author: &str, results: I, redact_prefix: &str) -> ContentTable
where
    I: IntoIterator<Item = &'a ExtractionResult>,
{
    let mut table = ContentTable::new();

    let fragments = results
        .into_iter()
        .flat_map(|result| result.content.iter())
        .filter_map(|fragment| fragment.as_deref().map(|text| redact_tokens(text, redact_prefix)))
        .filter(|text| !text.trim().is_empty());

    for content in fragments {
        // push() rejects duplicates
        table.push(ContentRow::new(author, content));
    }

    table
}
