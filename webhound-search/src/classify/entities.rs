//! Pluggable named-entity recognition.
//!
//! The classifier holds an optional [`EntityRecognizer`]. The built-in
//! [`GazetteerRecognizer`] matches configured term lists as whole words; a
//! statistical model can be plugged in behind the same trait.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::SearchError;

/// One recognised span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// The span text as it appears in the input.
    pub text: String,
    /// Entity label, e.g. `ORG` or `PERSON`.
    pub label: String,
}

/// Finds named entities in text.
pub trait EntityRecognizer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Recognise entities in `text`, in order of appearance.
    ///
    /// # Errors
    ///
    /// Implementations may fail; the classifier degrades a failure to an
    /// empty entity map.
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, SearchError>;
}

/// Whole-word, case-insensitive matching against per-label term lists.
#[derive(Debug, Clone)]
pub struct GazetteerRecognizer {
    labels: Vec<(String, Regex)>,
}

impl GazetteerRecognizer {
    /// Compile one alternation per label. Labels without terms are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if a compiled pattern exceeds the
    /// regex size limit.
    pub fn new(entities: &BTreeMap<String, Vec<String>>) -> Result<Self, SearchError> {
        let mut labels = Vec::with_capacity(entities.len());
        for (label, terms) in entities {
            if terms.is_empty() {
                continue;
            }
            let alternation = terms
                .iter()
                .map(|t| bounded(t.trim()))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = Regex::new(&format!("(?i)(?:{alternation})")).map_err(|e| {
                SearchError::Config(format!("entity label {label} cannot be compiled: {e}"))
            })?;
            labels.push((label.clone(), pattern));
        }
        Ok(Self { labels })
    }

    /// Number of labels with at least one term.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

/// Escape `term`, anchoring each edge at a word boundary only where the
/// edge character is itself a word character.
fn bounded(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let start = if term.starts_with(is_word) { r"\b" } else { "" };
    let end = if term.ends_with(is_word) { r"\b" } else { "" };
    format!("{start}{}{end}", regex::escape(term))
}

impl EntityRecognizer for GazetteerRecognizer {
    fn name(&self) -> &str {
        "gazetteer"
    }

    fn recognize(&self, text: &str) -> Result<Vec<Entity>, SearchError> {
        let mut found: Vec<(usize, Entity)> = Vec::new();
        for (label, pattern) in &self.labels {
            for m in pattern.find_iter(text) {
                found.push((
                    m.start(),
                    Entity {
                        text: m.as_str().to_owned(),
                        label: label.clone(),
                    },
                ));
            }
        }
        found.sort_by_key(|(start, _)| *start);
        Ok(found.into_iter().map(|(_, entity)| entity).collect())
    }
}
