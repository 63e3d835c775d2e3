//! Configuration structures for the receipt pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RasidError;
use crate::models::receipt::SemanticRole;

/// Main configuration for the rasid pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RasidConfig {
    /// Row normalization and batch configuration.
    pub batch: BatchConfig,

    /// Spreadsheet ingest configuration.
    pub ingest: IngestConfig,

    /// Receipt rendering configuration.
    pub render: RenderConfig,
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of data rows read from a table.
    pub max_rows: usize,

    /// Header aliases per semantic role, in priority order.
    pub role_aliases: RoleAliases,

    /// Cell values treated as missing (compared case-insensitively after trimming).
    pub null_markers: Vec<String>,

    /// Work description used when the work cell is missing.
    pub default_work: String,

    /// Capacity of the amount-in-words cache (0 disables caching).
    pub words_cache_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_rows: 50,
            role_aliases: RoleAliases::default(),
            null_markers: vec!["".to_string(), "nan".to_string(), "none".to_string()],
            default_work: "Electric Work".to_string(),
            words_cache_size: 128,
        }
    }
}

impl BatchConfig {
    /// True if the (trimmed) value is one of the configured null markers.
    pub fn is_null_marker(&self, value: &str) -> bool {
        let value = value.trim();
        self.null_markers
            .iter()
            .any(|m| m.trim().eq_ignore_ascii_case(value))
    }
}

/// Ordered header aliases for each semantic role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAliases {
    pub payee: Vec<String>,
    pub amount: Vec<String>,
    pub work: Vec<String>,
}

impl Default for RoleAliases {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }

        Self {
            payee: owned(&["Payee Name", "PayeeName", "Name", "Contractor", "Payee"]),
            amount: owned(&["Amount", "Value", "Cost", "Payment", "Total"]),
            work: owned(&["Work", "Description", "Item", "Project", "Job"]),
        }
    }
}

impl RoleAliases {
    /// Aliases for a role in priority order.
    pub fn for_role(&self, role: SemanticRole) -> &[String] {
        match role {
            SemanticRole::Payee => &self.payee,
            SemanticRole::Amount => &self.amount,
            SemanticRole::Work => &self.work,
        }
    }
}

/// Spreadsheet ingest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Accepted file extensions (lowercase, without the dot).
    pub allowed_extensions: Vec<String>,

    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,

    /// Worksheet to read (default: first sheet).
    pub sheet: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ["xlsx", "xlsm", "xls", "ods", "csv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 10 * 1024 * 1024,
            sheet: None,
        }
    }
}

/// Fixed text printed on every receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Form title.
    pub title: String,

    /// Rules the form refers to.
    pub rules_reference: String,

    /// Issuing division.
    pub division: String,

    /// Office the payee receives the money from.
    pub payer: String,

    /// Account head the payment is charged to.
    pub chargeable_head: String,

    /// Designation printed after the payee name.
    pub payee_designation: String,

    /// Currency label before figures.
    pub currency_label: String,

    /// Currency name before words.
    pub currency_words: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "HAND RECEIPT (RPWA 28)".to_string(),
            rules_reference: "(Referred to in PWF&A Rules 418,424,436 & 438)".to_string(),
            division: "PWD Electric Division, Udaipur".to_string(),
            payer: "The Executive Engineer PWD Electric Division, Udaipur".to_string(),
            chargeable_head: "8443 [EMD- Refund]".to_string(),
            payee_designation: "Electric Contractor".to_string(),
            currency_label: "Rs.".to_string(),
            currency_words: "Rupees".to_string(),
        }
    }
}

impl RasidConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RasidError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RasidError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RasidConfig::default();
        assert_eq!(config.batch.max_rows, 50);
        assert_eq!(config.batch.default_work, "Electric Work");
        assert_eq!(config.batch.role_aliases.for_role(SemanticRole::Payee)[0], "Payee Name");
        assert_eq!(config.ingest.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_null_markers() {
        let config = BatchConfig::default();
        assert!(config.is_null_marker(""));
        assert!(config.is_null_marker("  NaN "));
        assert!(config.is_null_marker("None"));
        assert!(!config.is_null_marker("Nancy"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RasidConfig =
            serde_json::from_str(r#"{"batch": {"max_rows": 10}}"#).unwrap();
        assert_eq!(config.batch.max_rows, 10);
        assert_eq!(config.batch.null_markers.len(), 3);
        assert_eq!(config.render.chargeable_head, "8443 [EMD- Refund]");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RasidConfig::default();
        config.batch.default_work = "Civil Work".to_string();
        config.save(&path).unwrap();

        let loaded = RasidConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch.default_work, "Civil Work");
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            RasidConfig::from_file(&path),
            Err(RasidError::Config(_))
        ));
        assert!(matches!(
            RasidConfig::from_file(&dir.path().join("missing.json")),
            Err(RasidError::Io(_))
        ));
    }
}
