//! Project configuration (`tablegen.toml`).
//!
//! ```toml
//! schema = "schema.json"
//!
//! [codegen]
//! language = "typescript"
//! output = "src/schema.ts"
//! validators = true
//! header = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codegen::{Compiler, Language};
use crate::error::{TablegenError, TablegenResult};

/// Name of the project-local config file.
pub const CONFIG_FILE: &str = "tablegen.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablegenConfig {
    /// Path to the schema description.
    #[serde(default)]
    pub schema: Option<PathBuf>,
    #[serde(default)]
    pub codegen: CodegenConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodegenConfig {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub validators: bool,
    #[serde(default = "default_true")]
    pub header: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            language: None,
            output: None,
            validators: true,
            header: true,
        }
    }
}

impl TablegenConfig {
    pub fn from_toml_str(content: &str) -> TablegenResult<Self> {
        toml::from_str(content).map_err(|e| TablegenError::Config(e.to_string()))
    }

    /// Read a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> TablegenResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TablegenError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// `./tablegen.toml`, else the per-user config, else defaults.
    pub fn load() -> TablegenResult<Self> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// First existing config file in lookup order.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("tablegen").join("config.toml"))
            .filter(|p| p.exists())
    }

    /// Configured language, TypeScript when unset.
    pub fn language(&self) -> TablegenResult<Language> {
        match &self.codegen.language {
            Some(name) => name.parse(),
            None => Ok(Language::TypeScript),
        }
    }

    /// Apply command-line overrides. `None` keeps the configured value.
    pub fn merge_cli(
        mut self,
        schema: Option<PathBuf>,
        language: Option<String>,
        output: Option<PathBuf>,
        no_validators: bool,
    ) -> Self {
        if schema.is_some() {
            self.schema = schema;
        }
        if language.is_some() {
            self.codegen.language = language;
        }
        if output.is_some() {
            self.codegen.output = output;
        }
        if no_validators {
            self.codegen.validators = false;
        }
        self
    }

    pub fn compiler(&self) -> TablegenResult<Compiler> {
        Ok(Compiler::new(self.language()?)
            .with_validators(self.codegen.validators)
            .with_header(self.codegen.header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TablegenConfig::from_toml_str("").unwrap();
        assert_eq!(config, TablegenConfig::default());
        assert!(config.codegen.validators);
        assert!(config.codegen.header);
        assert_eq!(config.language().unwrap(), Language::TypeScript);
    }

    #[test]
    fn test_full_file() {
        let config = TablegenConfig::from_toml_str(
            r#"
schema = "db/schema.json"

[codegen]
language = "js"
output = "src/schema.js"
validators = false
"#,
        )
        .unwrap();
        assert_eq!(config.schema, Some(PathBuf::from("db/schema.json")));
        assert_eq!(config.language().unwrap(), Language::JavaScript);
        assert_eq!(config.codegen.output, Some(PathBuf::from("src/schema.js")));
        assert!(!config.codegen.validators);
        assert!(config.codegen.header);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            TablegenConfig::from_toml_str("schema = ["),
            Err(TablegenError::Config(_))
        ));
        assert!(matches!(
            TablegenConfig::from_toml_str("unknown_key = 1"),
            Err(TablegenError::Config(_))
        ));
    }

    #[test]
    fn test_bad_language_surfaces_unsupported() {
        let config = TablegenConfig::from_toml_str("[codegen]\nlanguage = \"python\"").unwrap();
        assert!(matches!(
            config.language(),
            Err(TablegenError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let config = TablegenConfig::from_toml_str("[codegen]\nlanguage = \"typescript\"")
            .unwrap()
            .merge_cli(None, Some("javascript".into()), Some("out.js".into()), true);
        assert_eq!(config.language().unwrap(), Language::JavaScript);
        assert_eq!(config.codegen.output, Some(PathBuf::from("out.js")));
        assert!(!config.codegen.validators);
        assert_eq!(config.compiler().unwrap().language(), Language::JavaScript);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = TablegenConfig::load_from(Path::new("/nonexistent/tablegen.toml")).unwrap();
        assert_eq!(config, TablegenConfig::default());
    }
}
