//! Optional query filters: date range, language and country.
//!
//! Filters are a best-effort passthrough. Each engine dialect encodes the
//! filters it understands into extra query parameters and silently ignores
//! the rest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the engine expects filters and pagination to be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDialect {
    /// Google web search (`tbs`, `hl`, `gl`, `start`).
    Google,
    /// Bing (`filters`, `setlang`, `cc`, `first`).
    Bing,
    /// DuckDuckGo HTML endpoint (`df`, `kl`, `s`).
    DuckDuckGo,
    /// Startpage (`language`, `page`).
    Startpage,
    /// Unknown engine: no filters, `start` pagination.
    #[default]
    Generic,
}

/// Recency restriction for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// Past 24 hours.
    Day,
    /// Past week.
    Week,
    /// Past month.
    Month,
    /// Past year.
    Year,
}

impl DateRange {
    fn letter(self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
            Self::Year => "y",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "past 24 hours",
            Self::Week => "past week",
            Self::Month => "past month",
            Self::Year => "past year",
        })
    }
}

impl FromStr for DateRange {
    type Err = String;

    /// Accepts free-form phrases such as `"past 24 hours"`, `"last week"`,
    /// `"month"` or single letters `d`/`w`/`m`/`y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let phrase = lowered
            .strip_prefix("past ")
            .or_else(|| lowered.strip_prefix("last "))
            .unwrap_or(&lowered)
            .trim();
        match phrase {
            "d" | "day" | "24h" | "24 hours" | "24 hrs" | "today" => Ok(Self::Day),
            "w" | "week" | "7 days" => Ok(Self::Week),
            "m" | "month" | "30 days" => Ok(Self::Month),
            "y" | "year" | "12 months" | "365 days" => Ok(Self::Year),
            _ => Err(format!("unrecognised date range: {s}")),
        }
    }
}

/// Filters accepted with a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Recency restriction.
    pub date_range: Option<DateRange>,
    /// Two-letter language code, e.g. `en`.
    pub language: Option<String>,
    /// Two-letter country code, e.g. `US`.
    pub country: Option<String>,
}

impl SearchFilters {
    /// Build filters from raw user input. Blank values are treated as absent;
    /// an unrecognised date range is logged and dropped.
    pub fn from_raw(date_range: Option<&str>, language: Option<&str>, country: Option<&str>) -> Self {
        let date_range = non_blank(date_range).and_then(|raw| match raw.parse::<DateRange>() {
            Ok(range) => Some(range),
            Err(reason) => {
                tracing::warn!(%reason, "ignoring date range filter");
                None
            }
        });
        Self {
            date_range,
            language: non_blank(language).map(str::to_lowercase),
            country: non_blank(country).map(str::to_uppercase),
        }
    }

    /// Returns `true` when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.language.is_none() && self.country.is_none()
    }

    /// Extra query parameters for the given dialect.
    pub fn query_params(&self, dialect: FilterDialect) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        match dialect {
            FilterDialect::Google => {
                if let Some(range) = self.date_range {
                    params.push(("tbs", format!("qdr:{}", range.letter())));
                }
                if let Some(ref lang) = self.language {
                    params.push(("hl", lang.clone()));
                }
                if let Some(ref country) = self.country {
                    params.push(("gl", country.to_lowercase()));
                }
            }
            FilterDialect::Bing => {
                // Bing has no past-year preset.
                let freshness = match self.date_range {
                    Some(DateRange::Day) => Some("ez1"),
                    Some(DateRange::Week) => Some("ez2"),
                    Some(DateRange::Month) => Some("ez3"),
                    Some(DateRange::Year) | None => None,
                };
                if let Some(code) = freshness {
                    params.push(("filters", format!("ex1:\"{code}\"")));
                }
                if let Some(ref lang) = self.language {
                    params.push(("setlang", lang.clone()));
                }
                if let Some(ref country) = self.country {
                    params.push(("cc", country.clone()));
                }
            }
            FilterDialect::DuckDuckGo => {
                if let Some(range) = self.date_range {
                    params.push(("df", range.letter().to_owned()));
                }
                // DDG regions pair a country with a language, e.g. `us-en`.
                if let (Some(country), Some(lang)) = (&self.country, &self.language) {
                    params.push(("kl", format!("{}-{}", country.to_lowercase(), lang)));
                }
            }
            FilterDialect::Startpage => {
                if let Some(ref lang) = self.language {
                    params.push(("language", lang.clone()));
                }
            }
            FilterDialect::Generic => {}
        }
        params
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_parses_free_form_phrases() {
        assert_eq!("past 24 hours".parse::<DateRange>(), Ok(DateRange::Day));
        assert_eq!("Last Week".parse::<DateRange>(), Ok(DateRange::Week));
        assert_eq!("month".parse::<DateRange>(), Ok(DateRange::Month));
        assert_eq!("y".parse::<DateRange>(), Ok(DateRange::Year));
        assert!("fortnight".parse::<DateRange>().is_err());
    }

    #[test]
    fn from_raw_treats_blank_as_absent() {
        let filters = SearchFilters::from_raw(Some("  "), Some(""), None);
        assert!(filters.is_empty());
    }

    #[test]
    fn from_raw_drops_unknown_date_range() {
        let filters = SearchFilters::from_raw(Some("someday"), Some("EN"), Some("us"));
        assert!(filters.date_range.is_none());
        assert_eq!(filters.language.as_deref(), Some("en"));
        assert_eq!(filters.country.as_deref(), Some("US"));
    }

    fn all_filters() -> SearchFilters {
        SearchFilters {
            date_range: Some(DateRange::Week),
            language: Some("en".into()),
            country: Some("US".into()),
        }
    }

    #[test]
    fn google_params() {
        let params = all_filters().query_params(FilterDialect::Google);
        assert_eq!(
            params,
            vec![
                ("tbs", "qdr:w".to_string()),
                ("hl", "en".to_string()),
                ("gl", "us".to_string()),
            ]
        );
    }

    #[test]
    fn bing_params_skip_unsupported_year() {
        let filters = SearchFilters {
            date_range: Some(DateRange::Year),
            ..Default::default()
        };
        assert!(filters.query_params(FilterDialect::Bing).is_empty());

        let params = all_filters().query_params(FilterDialect::Bing);
        assert!(params.contains(&("filters", "ex1:\"ez2\"".to_string())));
        assert!(params.contains(&("cc", "US".to_string())));
    }

    #[test]
    fn duckduckgo_region_needs_both_parts() {
        let lang_only = SearchFilters {
            language: Some("en".into()),
            ..Default::default()
        };
        assert!(lang_only.query_params(FilterDialect::DuckDuckGo).is_empty());

        let params = all_filters().query_params(FilterDialect::DuckDuckGo);
        assert!(params.contains(&("kl", "us-en".to_string())));
        assert!(params.contains(&("df", "w".to_string())));
    }

    #[test]
    fn generic_dialect_ignores_filters() {
        assert!(all_filters().query_params(FilterDialect::Generic).is_empty());
    }
}
