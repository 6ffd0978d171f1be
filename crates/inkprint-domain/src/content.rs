//! Content module - verdicts, extraction results and the final content table

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of the verification stage
///
/// Matching is fail-closed: only an exact (case-normalized, trimmed) "yes"
/// counts as presence. Anything else, including "Yes." or "yes, twice", is
/// treated as absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorshipVerdict {
    /// The author is visibly credited in the image
    Present,
    /// The author is not credited, or the answer was not a clean "yes"
    Absent,
}

impl AuthorshipVerdict {
    /// Interpret a raw model answer
    ///
    /// # Examples
    ///
    /// ```
    /// use inkprint_domain::AuthorshipVerdict;
    ///
    /// assert_eq!(AuthorshipVerdict::from_response("Yes "), AuthorshipVerdict::Present);
    /// assert_eq!(AuthorshipVerdict::from_response("no"), AuthorshipVerdict::Absent);
    /// assert_eq!(AuthorshipVerdict::from_response("maybe"), AuthorshipVerdict::Absent);
    /// ```
    pub fn from_response(response: &str) -> Self {
        if response.trim().to_lowercase() == "yes" {
            AuthorshipVerdict::Present
        } else {
            AuthorshipVerdict::Absent
        }
    }

    /// True for [`AuthorshipVerdict::Present`]
    pub fn is_present(&self) -> bool {
        matches!(self, AuthorshipVerdict::Present)
    }
}

/// Content fragments attributed to an author within a single image
///
/// Always present, possibly empty. A `None` entry stands for a `null` the
/// model put into its `content` array; the cleaning pipeline drops those.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Verbatim fragments, in the order the model returned them
    pub content: Vec<Option<String>>,
}

impl ExtractionResult {
    /// A result with no content
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from plain strings
    pub fn from_strings<I, S>(content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: content.into_iter().map(|s| Some(s.into())).collect(),
        }
    }

    /// True when no fragment was extracted
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One `(author, content)` row of the output table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRow {
    /// Author the content is attributed to
    pub author: String,
    /// One content fragment
    pub content: String,
}

impl ContentRow {
    /// Create a new row
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }
}

/// Cleaned rows in discovery order
///
/// Invariants, enforced by [`ContentTable::push`]:
/// - no row has empty or whitespace-only content
/// - no two rows share the same `(author, content)` pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTable {
    rows: Vec<ContentRow>,
    seen: HashSet<ContentRow>,
}

impl ContentTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row unless it is blank or already present
    ///
    /// Returns `true` when the row was added.
    pub fn push(&mut self, row: ContentRow) -> bool {
        if row.content.trim().is_empty() || self.seen.contains(&row) {
            return false;
        }
        self.seen.insert(row.clone());
        self.rows.push(row);
        true
    }

    /// Rows in discovery order
    pub fn rows(&self) -> &[ContentRow] {
        &self.rows
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, ContentRow> {
        self.rows.iter()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All content joined by single spaces, the hand-off format for keyword
    /// analysis
    pub fn joined_content(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Consume the table, returning its rows
    pub fn into_rows(self) -> Vec<ContentRow> {
        self.rows
    }
}

impl Serialize for ContentTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.rows)
    }
}

impl FromIterator<ContentRow> for ContentTable {
    fn from_iter<T: IntoIterator<Item = ContentRow>>(iter: T) -> Self {
        let mut table = ContentTable::new();
        for row in iter {
            table.push(row);
        }
        table
    }
}

impl<'a> IntoIterator for &'a ContentTable {
    type Item = &'a ContentRow;
    type IntoIter = std::slice::Iter<'a, ContentRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_is_case_and_space_insensitive() {
        assert_eq!(AuthorshipVerdict::from_response("YES"), AuthorshipVerdict::Present);
        assert_eq!(AuthorshipVerdict::from_response("  yes\n"), AuthorshipVerdict::Present);
        assert!(AuthorshipVerdict::from_response("Yes ").is_present());
    }

    #[test]
    fn test_verdict_fails_closed() {
        for answer in ["no", "maybe", "yes.", "Yes, the author appears", "", "y"] {
            assert_eq!(
                AuthorshipVerdict::from_response(answer),
                AuthorshipVerdict::Absent,
                "answer {:?} should not count as presence",
                answer
            );
        }
    }

    #[test]
    fn test_extraction_result_from_strings() {
        let result = ExtractionResult::from_strings(["a", "b"]);
        assert_eq!(result.content, vec![Some("a".to_string()), Some("b".to_string())]);
        assert!(ExtractionResult::empty().is_empty());
    }

    #[test]
    fn test_table_rejects_blank_and_duplicates() {
        let mut table = ContentTable::new();
        assert!(table.push(ContentRow::new("alice", "hello")));
        assert!(!table.push(ContentRow::new("alice", "hello")));
        assert!(!table.push(ContentRow::new("alice", "   ")));
        assert!(!table.push(ContentRow::new("alice", "")));
        assert!(table.push(ContentRow::new("bob", "hello")));

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].author, "bob");
    }

    #[test]
    fn test_table_keeps_discovery_order() {
        let table: ContentTable = ["c", "a", "b", "a"]
            .into_iter()
            .map(|c| ContentRow::new("alice", c))
            .collect();

        let contents: Vec<_> = table.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["c", "a", "b"]);
        assert_eq!(table.joined_content(), "c a b");
    }
}
