//! Scoring template
//!
//! A template fixes the maximum points per category and carries a version
//! string. The default template is the built-in category table; an
//! alternative can be loaded from a TOML file. The template's canonical
//! serialization feeds the template hash.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GradeError, Result};

/// Scoring template: category maxima plus a version tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template version recorded in result metadata
    pub version: String,
    /// Maximum points per category; BTreeMap keeps serialization stable
    pub categories: BTreeMap<String, f64>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let categories = [
            ("naming", 10.0),
            ("pagination", 10.0),
            ("http", 15.0),
            ("caching", 10.0),
            ("envelope", 15.0),
            ("i18n", 10.0),
            ("async", 10.0),
            ("webhooks", 10.0),
            ("extensions", 10.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        TemplateConfig {
            version: "2.4.0".to_string(),
            categories,
        }
    }
}

impl TemplateConfig {
    /// Load a template from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GradeError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let template: TemplateConfig = toml::from_str(&content)?;
        template.validate()?;
        Ok(template)
    }

    fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(GradeError::InvalidTemplate {
                reason: "version must not be empty".to_string(),
            });
        }
        if self.categories.is_empty() {
            return Err(GradeError::InvalidTemplate {
                reason: "at least one category is required".to_string(),
            });
        }
        for (category, max) in &self.categories {
            if !max.is_finite() || *max < 0.0 {
                return Err(GradeError::InvalidTemplate {
                    reason: format!("category '{}' has invalid max points {}", category, max),
                });
            }
        }
        Ok(())
    }

    /// Maximum points for a category, if the template defines it
    pub fn category_max(&self, category: &str) -> Option<f64> {
        self.categories.get(category).copied()
    }

    /// Canonical serialization used for template hashing
    pub fn canonical_bytes(&self) -> String {
        // BTreeMap ordering makes this deterministic
        toml::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_sums_to_100() {
        let template = TemplateConfig::default();
        let total: f64 = template.categories.values().sum();
        assert!((total - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.toml");
        std::fs::write(
            &path,
            "version = \"9.9.9\"\n\n[categories]\nnaming = 50.0\nhttp = 50.0\n",
        )
        .unwrap();

        let template = TemplateConfig::load(&path).unwrap();
        assert_eq!(template.version, "9.9.9");
        assert_eq!(template.category_max("naming"), Some(50.0));
        assert_eq!(template.category_max("caching"), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TemplateConfig::load(Path::new("/does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, GradeError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_invalid_template_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.toml");
        std::fs::write(&path, "version = \"\"\n\n[categories]\nnaming = 10.0\n").unwrap();
        assert!(matches!(
            TemplateConfig::load(&path).unwrap_err(),
            GradeError::InvalidTemplate { .. }
        ));

        std::fs::write(&path, "version = \"1\"\n\n[categories]\nnaming = -4.0\n").unwrap();
        assert!(matches!(
            TemplateConfig::load(&path).unwrap_err(),
            GradeError::InvalidTemplate { .. }
        ));
    }

    #[test]
    fn test_canonical_bytes_stable() {
        let a = TemplateConfig::default();
        let b = TemplateConfig::default();
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
        assert!(!a.canonical_bytes().is_empty());
    }
}
