//! Common row shapes shared by the source adapters and the merge pipeline.
//!
//! Every source maps its raw JSON into one of the per-source row types below.
//! Absent upstream values become the literal placeholders `"N/A"` or
//! `"Unknown"`, never omitted keys; citation cells stay raw (possibly null)
//! until the normalization step coerces them to numbers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Placeholder for absent string fields
pub const NA: &str = "N/A";

/// Placeholder for absent author/institution names
pub const UNKNOWN: &str = "Unknown";

/// Which API a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    OpenAlex,
    CrossRef,
    SemanticScholar,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::OpenAlex => "openalex",
            SourceKind::CrossRef => "crossref",
            SourceKind::SemanticScholar => "semanticscholar",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication year as delivered by a source: a number, or raw text
/// (including the `"N/A"` placeholder when the source omitted it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

impl YearValue {
    /// The `"N/A"` placeholder
    pub fn na() -> Self {
        YearValue::Text(NA.to_string())
    }

    pub fn is_na(&self) -> bool {
        matches!(self, YearValue::Text(t) if t == NA)
    }

    /// Lenient numeric view, used by the chart aggregator. Rows whose year
    /// is the placeholder or fails to parse are dropped from chart domains.
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            YearValue::Number(n) => Some(*n),
            YearValue::Text(t) => {
                let t = t.trim();
                if let Ok(n) = t.parse::<i64>() {
                    return Some(n);
                }
                t.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64)
            }
        }
    }
}

impl Default for YearValue {
    fn default() -> Self {
        YearValue::na()
    }
}

impl fmt::Display for YearValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearValue::Number(n) => write!(f, "{}", n),
            YearValue::Text(t) => f.write_str(t),
        }
    }
}

/// Citation cell as returned by a source, before numeric coercion.
///
/// OpenAlex may deliver `null`, which is preserved here and only zeroed by
/// the normalizer; the other sources default absent counts to `0` at the
/// adapter boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCitations(pub Option<Value>);

impl RawCitations {
    /// A missing/null cell
    pub fn missing() -> Self {
        RawCitations(None)
    }

    /// A concrete count
    pub fn count(n: u64) -> Self {
        RawCitations(Some(Value::from(n)))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.0, None | Some(Value::Null))
    }

    /// Coerce to a non-negative number; anything unparsable becomes `0`.
    pub fn coerce(&self) -> f64 {
        let parsed = match &self.0 {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0))
            .unwrap_or(0.0)
    }
}

/// Row produced by the OpenAlex adapter. Carries the source-specific
/// `Citations_OpenAlex` field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAlexRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "Year")]
    pub year: YearValue,
    #[serde(rename = "Type")]
    pub work_type: String,
    #[serde(rename = "Citations_OpenAlex")]
    pub citations: RawCitations,
    #[serde(rename = "DOI")]
    pub doi: String,
}

/// Row produced by the CrossRef adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossrefRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "Year")]
    pub year: YearValue,
    #[serde(rename = "Type")]
    pub work_type: String,
    #[serde(rename = "Citations")]
    pub citations: RawCitations,
    #[serde(rename = "DOI")]
    pub doi: String,
}

/// Row produced by the Semantic Scholar adapter. Venue maps to Institution;
/// additionally carries the landing URL and an open-access PDF URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "Year")]
    pub year: YearValue,
    #[serde(rename = "Citations")]
    pub citations: RawCitations,
    pub url: String,
    pub download_pdf: String,
}

/// Normalized common row. Citation columns a source never populates stay
/// `None` so the merge step can distinguish a missing cell from a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub source: SourceKind,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "Year")]
    pub year: YearValue,
    #[serde(rename = "Type")]
    pub work_type: Option<String>,
    #[serde(rename = "Citations_OpenAlex")]
    pub citations_openalex: Option<f64>,
    #[serde(rename = "Citations")]
    pub citations: Option<f64>,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    pub url: Option<String>,
    pub download_pdf: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_year_numeric_views() {
        assert_eq!(YearValue::Number(2020).as_numeric(), Some(2020));
        assert_eq!(YearValue::Text("2019".to_string()).as_numeric(), Some(2019));
        assert_eq!(YearValue::Text(" 2018 ".to_string()).as_numeric(), Some(2018));
        assert_eq!(YearValue::Text("2017.0".to_string()).as_numeric(), Some(2017));
        assert_eq!(YearValue::na().as_numeric(), None);
        assert_eq!(YearValue::Text("unknown".to_string()).as_numeric(), None);
        assert!(YearValue::na().is_na());
        assert!(!YearValue::Number(2020).is_na());
    }

    #[test]
    fn test_year_untagged_deserialize() {
        let y: YearValue = serde_json::from_value(json!(2021)).expect("number year");
        assert_eq!(y, YearValue::Number(2021));
        let y: YearValue = serde_json::from_value(json!("N/A")).expect("text year");
        assert!(y.is_na());
    }

    #[test]
    fn test_citation_coercion() {
        assert_eq!(RawCitations::count(5).coerce(), 5.0);
        assert_eq!(RawCitations(Some(json!("12"))).coerce(), 12.0);
        assert_eq!(RawCitations(Some(json!("not a number"))).coerce(), 0.0);
        assert_eq!(RawCitations(Some(json!(null))).coerce(), 0.0);
        assert_eq!(RawCitations::missing().coerce(), 0.0);
        assert_eq!(RawCitations(Some(json!(-3))).coerce(), 0.0);
        assert!(RawCitations::missing().is_missing());
        assert!(RawCitations(Some(json!(null))).is_missing());
        assert!(!RawCitations::count(0).is_missing());
    }
}
