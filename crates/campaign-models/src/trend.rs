use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding a trend's percentage growth rate (e.g. `"18%"`).
pub const GROWTH_RATE_KEY: &str = "growth_rate";

/// Scalar metadata attached to a stored trend document.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A trend document as stored in, and returned by, the vector index.
///
/// `content` is conventionally `"<trend-name>: <description>"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl TrendDocument {
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// The trend name: everything before the first `:` of the content.
    pub fn name(&self) -> &str {
        self.content
            .split_once(':')
            .map(|(name, _)| name)
            .unwrap_or(&self.content)
    }

    /// The raw growth rate as display text, if the document carries one.
    pub fn growth_rate_text(&self) -> Option<String> {
        match self.metadata.get(GROWTH_RATE_KEY)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The growth rate as a float. `None` when absent or unparseable.
    pub fn growth_rate(&self) -> Option<f64> {
        match self.metadata.get(GROWTH_RATE_KEY)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => parse_growth_rate(s),
            _ => None,
        }
    }
}

/// Parse a percentage string such as `"12.5%"` into `12.5`.
pub fn parse_growth_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches('%')
        .trim_end()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// One row of the trend CSV consumed by the ingestion utility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendRecord {
    pub trend: String,
    pub description: String,
    #[serde(default)]
    pub growth_rate: Option<String>,
}

impl TrendRecord {
    /// Map the row to the document stored in the index.
    /// An empty growth rate cell omits the metadata key.
    pub fn into_document(self) -> TrendDocument {
        let mut metadata = Metadata::new();
        if let Some(rate) = self.growth_rate.filter(|r| !r.trim().is_empty()) {
            metadata.insert(
                GROWTH_RATE_KEY.to_string(),
                serde_json::Value::String(rate.trim().to_string()),
            );
        }
        TrendDocument {
            content: format!("{}: {}", self.trend.trim(), self.description.trim()),
            metadata,
        }
    }
}

/// Dashboard table row. A missing growth rate renders as "N/A".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendRow {
    pub name: String,
    pub growth_rate: Option<String>,
}

/// Dashboard bar-chart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendBar {
    pub name: String,
    pub growth_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_rate(content: &str, rate: serde_json::Value) -> TrendDocument {
        let mut metadata = Metadata::new();
        metadata.insert(GROWTH_RATE_KEY.to_string(), rate);
        TrendDocument::new(content, metadata)
    }

    #[test]
    fn parses_percentage_strings() {
        assert_eq!(parse_growth_rate("12.5%"), Some(12.5));
        assert_eq!(parse_growth_rate("18%"), Some(18.0));
        assert_eq!(parse_growth_rate(" 7 % "), Some(7.0));
        assert_eq!(parse_growth_rate("40"), Some(40.0));
        assert_eq!(parse_growth_rate("fast"), None);
        assert_eq!(parse_growth_rate(""), None);
    }

    #[test]
    fn name_is_text_before_first_colon() {
        let doc = TrendDocument::new("Reusable Packaging: Growing demand: 2024", Metadata::new());
        assert_eq!(doc.name(), "Reusable Packaging");

        let bare = TrendDocument::new("Live Shopping", Metadata::new());
        assert_eq!(bare.name(), "Live Shopping");
    }

    #[test]
    fn growth_rate_from_string_or_number() {
        let s = doc_with_rate("A: a", serde_json::json!("12.5%"));
        assert_eq!(s.growth_rate(), Some(12.5));
        assert_eq!(s.growth_rate_text().as_deref(), Some("12.5%"));

        let n = doc_with_rate("B: b", serde_json::json!(9));
        assert_eq!(n.growth_rate(), Some(9.0));
        assert_eq!(n.growth_rate_text().as_deref(), Some("9"));
    }

    #[test]
    fn missing_growth_rate_is_tolerated() {
        let doc = TrendDocument::new("C: c", Metadata::new());
        assert_eq!(doc.growth_rate(), None);
        assert_eq!(doc.growth_rate_text(), None);
    }

    #[test]
    fn record_maps_to_document() {
        let record = TrendRecord {
            trend: "Reusable Packaging".to_string(),
            description: "Growing demand".to_string(),
            growth_rate: Some("18%".to_string()),
        };
        let doc = record.into_document();
        assert_eq!(doc.content, "Reusable Packaging: Growing demand");
        assert_eq!(doc.metadata.len(), 1);
        assert_eq!(doc.metadata[GROWTH_RATE_KEY], serde_json::json!("18%"));
    }

    #[test]
    fn record_without_growth_rate_omits_key() {
        let record = TrendRecord {
            trend: "Voice Commerce".to_string(),
            description: "Smart speakers".to_string(),
            growth_rate: Some("  ".to_string()),
        };
        assert!(record.into_document().metadata.is_empty());
    }
}
