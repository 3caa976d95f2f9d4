//! Generator options, usually read from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("tab_size must be between 1 and 16, got {0}")]
    InvalidTabSize(usize),
}

/// How generated private fields are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNaming {
    /// `connectionString`, assigned through `this.`
    #[default]
    CamelCase,
    /// `_connectionString`
    Underscore,
}

impl FieldNaming {
    pub fn field_name(self, name: &str) -> String {
        match self {
            Self::CamelCase => name.to_string(),
            Self::Underscore => format!("_{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    pub tab_size: usize,
    pub use_tabs: bool,
    pub repository_suffix: String,
    pub field_naming: FieldNaming,
    pub default_schema: String,
    pub class_namespace: String,
    /// Falls back to `class_namespace`.
    pub repository_namespace: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            use_tabs: false,
            repository_suffix: "Repository".to_string(),
            field_naming: FieldNaming::CamelCase,
            default_schema: "public".to_string(),
            class_namespace: "Generated".to_string(),
            repository_namespace: None,
        }
    }
}

impl GeneratorOptions {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.tab_size) {
            return Err(ConfigError::InvalidTabSize(self.tab_size));
        }
        Ok(())
    }

    /// One level of indentation.
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.tab_size)
        }
    }

    pub fn repository_namespace(&self) -> &str {
        self.repository_namespace
            .as_deref()
            .unwrap_or(&self.class_namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::from_toml_str("").unwrap();
        assert_eq!(options, GeneratorOptions::default());
        assert_eq!(options.indent_unit(), "    ");
        assert_eq!(options.repository_namespace(), "Generated");
    }

    #[test]
    fn test_parse_all_fields() {
        let options = GeneratorOptions::from_toml_str(
            r#"
            tab_size = 2
            use_tabs = true
            repository_suffix = "Repo"
            field_naming = "underscore"
            default_schema = "app"
            class_namespace = "Shop.Models"
            repository_namespace = "Shop.Data"
            "#,
        )
        .unwrap();
        assert_eq!(options.indent_unit(), "\t");
        assert_eq!(options.repository_suffix, "Repo");
        assert_eq!(options.field_naming.field_name("connectionString"), "_connectionString");
        assert_eq!(options.default_schema, "app");
        assert_eq!(options.repository_namespace(), "Shop.Data");
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(matches!(
            GeneratorOptions::from_toml_str("tabsize = 2"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_rejects_zero_tab_size() {
        assert!(matches!(
            GeneratorOptions::from_toml_str("tab_size = 0"),
            Err(ConfigError::InvalidTabSize(0))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "class_namespace = \"Billing\"").unwrap();
        let options = GeneratorOptions::load(file.path()).unwrap();
        assert_eq!(options.class_namespace, "Billing");

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            GeneratorOptions::load(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
