use crate::error::Error;
use config::{Config, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholders the naming template must carry.
pub const NAMING_PLACEHOLDERS: &[&str] = &[
    "{project_id}",
    "{type_code}",
    "{sequence}",
    "{description}",
    "{revision}",
    "{ext}",
];

/// Category used when an extension has no `file_type_mapping` entry.
pub const FALLBACK_CATEGORY: &str = "misc";
/// Subfolder used when a category has no `folder_structure` entry.
pub const FALLBACK_FOLDER: &str = "Misc";

/// Rules driving project numbering, folder layout and file renaming.
///
/// Loaded from a TOML or JSON file with every key required; the defaults
/// below match the standard engineering-archive conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRules {
    pub project_prefix: String,
    pub project_digits: usize,
    pub revision_format: String,
    pub folder_structure: BTreeMap<String, String>,
    pub file_type_mapping: BTreeMap<String, String>,
    pub naming_convention: String,
}

impl Default for TransformRules {
    fn default() -> Self {
        let folder_structure = BTreeMap::from(
            [
                ("drawings", "Drawings"),
                ("documentation", "Documentation"),
                ("bom", "BOM"),
                ("standards", "Standards"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        let file_type_mapping = BTreeMap::from(
            [
                (".dwg", "drawings"),
                (".pdf", "documentation"),
                (".xlsx", "bom"),
                (".xls", "bom"),
                (".doc", "documentation"),
                (".docx", "documentation"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        Self {
            project_prefix: "P".to_string(),
            project_digits: 3,
            revision_format: "R{number}".to_string(),
            folder_structure,
            file_type_mapping,
            naming_convention: "{project_id}-{type_code}-{sequence}_{description}_{revision}.{ext}"
                .to_string(),
        }
    }
}

impl TransformRules {
    /// Load a custom rule set from disk. Missing keys, unparseable files
    /// and invalid templates are all startup-time errors; no file is
    /// touched afterwards.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let settings = Config::builder()
            .add_source(ConfigFile::from(path.to_path_buf()))
            .build()
            .map_err(|err| Error::MalformedRules(err.to_string()))?;
        let rules: TransformRules = settings
            .try_deserialize()
            .map_err(|err| Error::MalformedRules(err.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.project_digits == 0 {
            return Err(Error::MalformedRules(
                "project_digits must be at least 1".to_string(),
            ));
        }
        for placeholder in NAMING_PLACEHOLDERS {
            if !self.naming_convention.contains(placeholder) {
                return Err(Error::MalformedRules(format!(
                    "naming_convention is missing the {} placeholder",
                    placeholder
                )));
            }
        }
        if !self.revision_format.contains("{number}") {
            return Err(Error::MalformedRules(
                "revision_format is missing the {number} placeholder".to_string(),
            ));
        }
        for category in self.file_type_mapping.values() {
            if category != FALLBACK_CATEGORY && !self.folder_structure.contains_key(category) {
                return Err(Error::MalformedRules(format!(
                    "file_type_mapping category '{}' has no folder_structure entry",
                    category
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_rules_validate() {
        TransformRules::default().validate().unwrap();
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let rules = TransformRules {
            naming_convention: "{project_id}-{type_code}.{ext}".to_string(),
            ..Default::default()
        };
        assert!(matches!(rules.validate(), Err(Error::MalformedRules(_))));
    }

    #[test]
    fn test_unmapped_category_is_rejected() {
        let mut rules = TransformRules::default();
        rules
            .file_type_mapping
            .insert(".step".to_string(), "models".to_string());
        assert!(matches!(rules.validate(), Err(Error::MalformedRules(_))));
    }

    #[test]
    fn test_load_rejects_missing_keys() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("rules.toml");
        fs::write(&path, "project_prefix = \"X\"\n").unwrap();
        assert!(matches!(
            TransformRules::load(&path),
            Err(Error::MalformedRules(_))
        ));
    }

    #[test]
    fn test_load_full_rule_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("rules.toml");
        fs::write(
            &path,
            r#"
project_prefix = "ENG"
project_digits = 4
revision_format = "Rev{number}"
naming_convention = "{project_id}_{type_code}_{sequence}_{description}_{revision}.{ext}"

[folder_structure]
drawings = "CAD"
documentation = "Docs"
bom = "BOM"

[file_type_mapping]
".dwg" = "drawings"
".pdf" = "documentation"
".xlsx" = "bom"
"#,
        )
        .unwrap();

        let rules = TransformRules::load(&path).unwrap();
        assert_eq!(rules.project_prefix, "ENG");
        assert_eq!(rules.project_digits, 4);
        assert_eq!(rules.folder_structure["drawings"], "CAD");
        assert_eq!(rules.file_type_mapping[".dwg"], "drawings");
    }
}
