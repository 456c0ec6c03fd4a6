//! # Search Matching
//!
//! Case-insensitive substring matching of query terms against record fields,
//! producing short context snippets for the result table.
//!
//! Offsets are counted in characters, not bytes, so snippets never split a
//! multi-byte character.

use crate::primitives::{ELLIPSIS, LABEL_FIELD, SNIPPET_RADIUS};
use crate::{NodeId, Record};
use serde::Serialize;
use serde_json::Value;

/// Fields skipped unless the caller asks otherwise.
pub const DEFAULT_EXCLUDED: &[&str] = &[LABEL_FIELD];

// =============================================================================
// TYPES
// =============================================================================

/// One matched field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSnippet {
    pub field: String,
    pub excerpt: String,
}

/// A matching record: its id, label and snippets in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub node_id: NodeId,
    pub label: Option<String>,
    pub snippets: Vec<FieldSnippet>,
}

impl SearchMatch {
    /// Snippet of a given field.
    #[must_use]
    pub fn snippet(&self, field: &str) -> Option<&str> {
        self.snippets
            .iter()
            .find(|snippet| snippet.field == field)
            .map(|snippet| snippet.excerpt.as_str())
    }
}

/// State of the search result panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchPanel {
    #[default]
    Idle,
    Pending { query: String },
    NoMatch { query: String },
    Results { query: String, rows: Vec<SearchMatch> },
    Failed { query: String, message: String },
}

impl SearchPanel {
    /// Result rows, empty unless results are shown.
    #[must_use]
    pub fn rows(&self) -> &[SearchMatch] {
        match self {
            Self::Results { rows, .. } => rows,
            _ => &[],
        }
    }
}

// =============================================================================
// MATCHER
// =============================================================================

/// Matches a record against query terms.
pub trait Matcher {
    /// Snippets of `record` for `terms`, or `None` if no field matched.
    fn match_record(&self, record: &Record, terms: &[String], excluded: &[&str]) -> Option<SearchMatch>;

    /// Match every record, keeping matches only, ordered by node id.
    fn match_all(&self, records: &[Record], terms: &[String], excluded: &[&str]) -> Vec<SearchMatch> {
        let mut matches: Vec<SearchMatch> = records
            .iter()
            .filter_map(|record| self.match_record(record, terms, excluded))
            .collect();
        matches.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        matches
    }
}

/// The default matcher: first occurrence, fixed radius window.
#[derive(Debug, Clone, Copy)]
pub struct SnippetMatcher {
    radius: usize,
}

impl Default for SnippetMatcher {
    fn default() -> Self {
        Self {
            radius: SNIPPET_RADIUS,
        }
    }
}

impl SnippetMatcher {
    #[must_use]
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Snippet around the first case-insensitive occurrence of `term`.
    ///
    /// The window spans `radius` characters on each side of the match start,
    /// clipped to the value; `...` marks each clipped side.
    #[must_use]
    pub fn snippet(&self, value: &str, term: &str) -> Option<String> {
        let haystack: Vec<char> = value.chars().collect();
        let folded: Vec<char> = haystack.iter().map(|c| fold(*c)).collect();
        let needle: Vec<char> = term.chars().map(fold).collect();

        if needle.is_empty() || needle.len() > folded.len() {
            return None;
        }

        let location = folded
            .windows(needle.len())
            .position(|window| window == needle.as_slice())?;

        let len = haystack.len();
        let start = location.saturating_sub(self.radius);
        let end = (location + self.radius).min(len);

        let mut excerpt = String::new();
        if start != 0 {
            excerpt.push_str(ELLIPSIS);
        }
        excerpt.extend(&haystack[start..end]);
        if end != len {
            excerpt.push_str(ELLIPSIS);
        }
        Some(excerpt)
    }
}

impl Matcher for SnippetMatcher {
    fn match_record(&self, record: &Record, terms: &[String], excluded: &[&str]) -> Option<SearchMatch> {
        let snippets: Vec<FieldSnippet> = record
            .fields()
            .into_iter()
            .filter(|(field, value)| !value.is_empty() && !excluded.contains(field))
            .filter_map(|(field, value)| {
                terms
                    .iter()
                    .filter(|term| !term.trim().is_empty())
                    .find_map(|term| self.snippet(&value, term))
                    .map(|excerpt| FieldSnippet {
                        field: field.to_string(),
                        excerpt,
                    })
            })
            .collect();

        if snippets.is_empty() {
            return None;
        }

        Some(SearchMatch {
            node_id: record.id(),
            label: record.label().map(str::to_string),
            snippets,
        })
    }
}

/// Single-char case fold keeping character offsets aligned.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

// =============================================================================
// QUERIES & RESPONSES
// =============================================================================

/// Split a query string into non-empty terms.
#[must_use]
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}

/// Parse a search response.
///
/// The service may prepend a header object carrying the `queryArray` it
/// matched with; when present those terms replace the locally split ones.
/// Entries that are not records are skipped.
#[must_use]
pub fn parse_search_response(payload: Vec<Value>) -> (Option<Vec<String>>, Vec<Record>) {
    let mut terms = None;
    let mut records = Vec::new();

    for (index, item) in payload.into_iter().enumerate() {
        if index == 0
            && let Some(array) = item.get("queryArray").and_then(Value::as_array)
        {
            terms = Some(
                array
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            );
            continue;
        }
        match Record::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!(error = %e, "skipping search entry"),
        }
    }

    (terms, records)
}

// =============================================================================
// TESTS
// =============================================================================
