//! Detection configuration: keyword categories, platform patterns, entity terms.
//!
//! Loaded once at startup and shared read-only. Every problem (unreadable
//! file, malformed JSON, blank names, empty keywords, invalid regex) is
//! reported here, never during classification.
//!
//! Two JSON layouts are accepted:
//!
//! ```json
//! { "categories": { "forum": ["forum", "board"] },
//!   "platforms":  { "twitter": "twitter\\.com" },
//!   "entities":   { "ORG": ["Mozilla"] } }
//! ```
//!
//! or a flat `{ "platform": "pattern" }` map, which keeps the default
//! categories and defines platforms only.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::SearchError;

/// Category whose flag becomes `is_forum`.
pub const FORUM_CATEGORY: &str = "forum";

/// Category whose flag becomes `is_news`.
pub const NEWS_CATEGORY: &str = "news";

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (FORUM_CATEGORY, &["forum", "board", "community"]),
    (NEWS_CATEGORY, &["news", "breaking", "headline"]),
];

const DEFAULT_PLATFORMS: &[(&str, &str)] = &[
    ("facebook", r"facebook\.com"),
    ("instagram", r"instagram\.com"),
    ("linkedin", r"linkedin\.com"),
    ("reddit", r"reddit\.com"),
    ("tiktok", r"tiktok\.com"),
    ("twitter", r"twitter\.com|\bx\.com/"),
    ("youtube", r"youtube\.com|youtu\.be"),
];

/// A named list of lowercased keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCategory {
    /// Category name, e.g. `forum`.
    pub name: String,
    /// Keywords, already lowercased, in configured order.
    pub keywords: Vec<String>,
}

/// A named social-platform regex.
#[derive(Debug, Clone)]
pub struct PlatformPattern {
    /// Platform name reported when the pattern matches.
    pub name: String,
    /// Compiled pattern. Case sensitivity is whatever the pattern encodes.
    pub pattern: Regex,
}

/// Immutable detection configuration.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    categories: Vec<KeywordCategory>,
    platforms: Vec<PlatformPattern>,
    entities: BTreeMap<String, Vec<String>>,
}

/// Top-level keys of the structured layout.
const STRUCTURED_KEYS: &[&str] = &["categories", "platforms", "entities"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructuredConfig {
    #[serde(default)]
    categories: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    platforms: BTreeMap<String, String>,
    #[serde(default)]
    entities: BTreeMap<String, Vec<String>>,
}

impl DetectionConfig {
    /// Build and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for blank names, blank keywords or
    /// terms, or an invalid platform regex.
    pub fn new<C, K, P>(
        categories: C,
        platforms: P,
        entities: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, SearchError>
    where
        C: IntoIterator<Item = (String, K)>,
        K: IntoIterator<Item = String>,
        P: IntoIterator<Item = (String, String)>,
    {
        let mut compiled_categories = Vec::new();
        for (name, keywords) in categories {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(SearchError::Config("category name must not be empty".into()));
            }
            let mut lowered = Vec::new();
            for keyword in keywords {
                let keyword = keyword.to_lowercase();
                if keyword.trim().is_empty() {
                    return Err(SearchError::Config(format!(
                        "category {name} contains an empty keyword"
                    )));
                }
                lowered.push(keyword);
            }
            compiled_categories.push(KeywordCategory {
                name,
                keywords: lowered,
            });
        }

        let mut compiled_platforms = Vec::new();
        for (name, pattern) in platforms {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(SearchError::Config("platform name must not be empty".into()));
            }
            if pattern.is_empty() {
                return Err(SearchError::Config(format!(
                    "platform {name} has an empty pattern"
                )));
            }
            let pattern = Regex::new(&pattern).map_err(|e| {
                SearchError::Config(format!("platform {name} has an invalid pattern: {e}"))
            })?;
            compiled_platforms.push(PlatformPattern { name, pattern });
        }

        for (label, terms) in &entities {
            if label.trim().is_empty() {
                return Err(SearchError::Config("entity label must not be empty".into()));
            }
            if terms.iter().any(|t| t.trim().is_empty()) {
                return Err(SearchError::Config(format!(
                    "entity label {label} contains an empty term"
                )));
            }
        }

        Ok(Self {
            categories: compiled_categories,
            platforms: compiled_platforms,
            entities,
        })
    }

    /// Parse a JSON document in either supported layout.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the JSON is malformed or invalid.
    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        let malformed = |e: serde_json::Error| {
            SearchError::Config(format!("malformed detection config: {e}"))
        };
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(malformed)?;

        // Anything that is not a plain name → pattern map is read as the
        // structured layout so its errors name the offending field.
        let structured = object.keys().any(|k| STRUCTURED_KEYS.contains(&k.as_str()))
            || object.values().any(|v| !v.is_string());

        let value = serde_json::Value::Object(object);
        if structured {
            let cfg: StructuredConfig = serde_json::from_value(value).map_err(malformed)?;
            let categories = cfg.categories.unwrap_or_else(default_categories);
            Self::new(categories, cfg.platforms, cfg.entities)
        } else {
            let platforms: BTreeMap<String, String> =
                serde_json::from_value(value).map_err(malformed)?;
            Self::new(default_categories(), platforms, BTreeMap::new())
        }
    }

    /// Load from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!(
                "cannot read detection config {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            categories = config.categories.len(),
            platforms = config.platforms.len(),
            entity_labels = config.entities.len(),
            "detection config loaded"
        );
        Ok(config)
    }

    /// Keyword categories in configured order.
    pub fn categories(&self) -> &[KeywordCategory] {
        &self.categories
    }

    /// Platform patterns in configured order.
    pub fn platforms(&self) -> &[PlatformPattern] {
        &self.platforms
    }

    /// Entity label → terms, for building a gazetteer recognizer.
    pub fn entities(&self) -> &BTreeMap<String, Vec<String>> {
        &self.entities
    }
}

impl Default for DetectionConfig {
    /// Built-in forum/news keywords and common social platforms.
    fn default() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, keywords)| KeywordCategory {
                name: (*name).to_owned(),
                keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            })
            .collect();
        let platforms = DEFAULT_PLATFORMS
            .iter()
            // Built-in patterns are known-valid constants.
            .filter_map(|(name, pattern)| {
                Regex::new(pattern).ok().map(|pattern| PlatformPattern {
                    name: (*name).to_owned(),
                    pattern,
                })
            })
            .collect();
        Self {
            categories,
            platforms,
            entities: BTreeMap::new(),
        }
    }
}

fn default_categories() -> BTreeMap<String, Vec<String>> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, keywords)| {
            (
                (*name).to_owned(),
                keywords.iter().map(|k| (*k).to_owned()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_has_forum_news_and_platforms() {
        let config = DetectionConfig::default();
        let names: Vec<&str> = config.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["forum", "news"]);
        assert_eq!(config.platforms().len(), DEFAULT_PLATFORMS.len());
        assert!(config.entities().is_empty());
    }

    #[test]
    fn structured_json_parsed() {
        let config = DetectionConfig::from_json(
            r#"{
                "categories": {"forum": ["Forum"], "blog": ["blog", "post"]},
                "platforms": {"twitter": "twitter\\.com"},
                "entities": {"ORG": ["Mozilla"]}
            }"#,
        )
        .expect("valid config");
        assert_eq!(config.categories().len(), 2);
        let forum = config
            .categories()
            .iter()
            .find(|c| c.name == "forum")
            .expect("forum");
        assert_eq!(forum.keywords, vec!["forum"]);
        assert_eq!(config.platforms()[0].name, "twitter");
        assert_eq!(config.entities()["ORG"], vec!["Mozilla"]);
    }

    #[test]
    fn structured_without_categories_keeps_defaults() {
        let config = DetectionConfig::from_json(r#"{"platforms": {"reddit": "reddit\\.com"}}"#)
            .expect("valid");
        assert_eq!(config.categories().len(), 2);
        assert_eq!(config.platforms().len(), 1);
    }

    #[test]
    fn flat_platform_map_accepted() {
        let config = DetectionConfig::from_json(
            r#"{"twitter": "twitter\\.com", "facebook": "facebook\\.com"}"#,
        )
        .expect("valid");
        let names: Vec<&str> = config.platforms().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["facebook", "twitter"]);
        assert_eq!(config.categories().len(), 2);
    }

    #[test]
    fn invalid_regex_fails_fast() {
        let err = DetectionConfig::from_json(r#"{"platforms": {"bad": "([unclosed"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("platform bad has an invalid pattern"));
    }

    #[test]
    fn malformed_json_fails_fast() {
        let err = DetectionConfig::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("malformed detection config"));
    }

    #[test]
    fn wrong_value_types_rejected() {
        assert!(DetectionConfig::from_json(r#"{"twitter": 42}"#).is_err());
    }

    #[test]
    fn misspelled_section_named_in_error() {
        let err = DetectionConfig::from_json(r#"{"platfroms": {"reddit": "reddit\\.com"}}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown field `platfroms`"), "{err}");
    }

    #[test]
    fn structured_section_type_error_explained() {
        let err = DetectionConfig::from_json(r#"{"entities": {"ORG": "Mozilla"}}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid type"), "{err}");
    }

    #[test]
    fn blank_platform_name_rejected() {
        let err = DetectionConfig::from_json(r#"{"platforms": {" ": "x"}}"#).unwrap_err();
        assert!(err.to_string().contains("platform name"));
    }

    #[test]
    fn empty_keyword_rejected() {
        let err = DetectionConfig::from_json(r#"{"categories": {"news": ["news", ""]}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("empty keyword"));
    }

    #[test]
    fn empty_entity_term_rejected() {
        let err = DetectionConfig::from_json(r#"{"entities": {"ORG": [""]}}"#).unwrap_err();
        assert!(err.to_string().contains("empty term"));
    }

    #[test]
    fn missing_file_fails_fast() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DetectionConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read detection config"));
    }

    #[test]
    fn file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"youtube": "youtube\\.com"}}"#).expect("write");
        let config = DetectionConfig::from_file(file.path()).expect("load");
        assert_eq!(config.platforms()[0].name, "youtube");
    }
}
