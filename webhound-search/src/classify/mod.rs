//! Content classification.
//!
//! [`Classifier::classify`] is a pure function of (text, query, config):
//! keyword categories, query-mention counting, social-platform patterns and
//! optional entity recognition. The classifier is `Send + Sync` and can be
//! shared across tasks behind an `Arc`.

pub mod config;
pub mod entities;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

pub use config::{DetectionConfig, KeywordCategory, PlatformPattern, FORUM_CATEGORY, NEWS_CATEGORY};
pub use entities::{Entity, EntityRecognizer, GazetteerRecognizer};

use crate::error::SearchError;

/// Fixed-shape classification of one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    /// The `forum` category fired.
    pub is_forum: bool,
    /// The `news` category fired.
    pub is_news: bool,
    /// Every configured category that fired, including forum and news.
    pub matched_categories: BTreeSet<String>,
    /// Non-overlapping, case-insensitive occurrences of the query.
    pub query_mentions: usize,
    /// Platforms whose pattern matched.
    pub social_platforms_detected: BTreeSet<String>,
    /// Recognised span text → label. Empty without a recognizer.
    pub entities: BTreeMap<String, String>,
}

/// Keyword, mention, platform and entity analysis over text.
#[derive(Clone)]
pub struct Classifier {
    config: Arc<DetectionConfig>,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("config", &self.config)
            .field("recognizer", &self.recognizer.as_ref().map(|r| r.name().to_owned()))
            .finish()
    }
}

impl Classifier {
    /// Classifier without entity recognition.
    pub fn new(config: Arc<DetectionConfig>) -> Self {
        Self {
            config,
            recognizer: None,
        }
    }

    /// Classifier with a [`GazetteerRecognizer`] wired in when the config
    /// defines entity terms.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the gazetteer cannot be compiled.
    pub fn from_config(config: Arc<DetectionConfig>) -> Result<Self, SearchError> {
        let recognizer: Option<Arc<dyn EntityRecognizer>> = if config.entities().is_empty() {
            None
        } else {
            Some(Arc::new(GazetteerRecognizer::new(config.entities())?))
        };
        Ok(Self { config, recognizer })
    }

    /// Replace the entity recognizer.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// The shared detection configuration.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Classify `text` against the configuration and `query`.
    pub fn classify(&self, text: &str, query: &str) -> DetectionResult {
        let folded = text.to_lowercase();

        let matched_categories: BTreeSet<String> = self
            .config
            .categories()
            .iter()
            .filter(|category| category.keywords.iter().any(|k| folded.contains(k.as_str())))
            .map(|category| category.name.clone())
            .collect();

        let social_platforms_detected = self
            .config
            .platforms()
            .iter()
            .filter(|platform| platform.pattern.is_match(text))
            .map(|platform| platform.name.clone())
            .collect();

        DetectionResult {
            is_forum: matched_categories.contains(FORUM_CATEGORY),
            is_news: matched_categories.contains(NEWS_CATEGORY),
            matched_categories,
            query_mentions: count_mentions(&folded, &query.to_lowercase()),
            social_platforms_detected,
            entities: self.entities(text),
        }
    }

    fn entities(&self, text: &str) -> BTreeMap<String, String> {
        let Some(recognizer) = &self.recognizer else {
            return BTreeMap::new();
        };
        match recognizer.recognize(text) {
            Ok(found) => {
                let mut map = BTreeMap::new();
                for entity in found {
                    map.entry(entity.text).or_insert(entity.label);
                }
                map
            }
            Err(e) => {
                tracing::warn!(recognizer = recognizer.name(), "entity recognition failed: {e}");
                BTreeMap::new()
            }
        }
    }
}

/// Non-overlapping, left-to-right occurrences of `needle` in `haystack`.
///
/// Both arguments are expected to be case-folded already. An empty needle
/// yields 0.
pub fn count_mentions(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
