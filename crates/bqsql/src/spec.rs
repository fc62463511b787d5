//! Query builder spec: repeated columns and the caller's query template.
//!
//! The spec is plain configuration. The template is carried along for the
//! caller and never interpreted here; the repeated set decides whether a
//! nested projection renders as `STRUCT(...)` or `ARRAY(... UNNEST(...))`.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Repeated columns and the SQL template a query is built from.
///
/// Loaded from TOML:
///
/// ```toml
/// template = "SELECT %s FROM `table` WHERE %s"
/// repeated = ["Events", "NFe.infNFe.det"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBuilderSpec {
    /// Dotted paths of array-typed columns.
    #[serde(default, alias = "repeated_columns")]
    pub repeated: BTreeSet<String>,

    /// Opaque query template owned by the caller.
    #[serde(default, alias = "sql_query")]
    pub template: String,
}

impl QueryBuilderSpec {
    /// Create a spec with the given template and no repeated columns.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            repeated: BTreeSet::new(),
            template: template.into(),
        }
    }

    /// Mark a dotted path as repeated.
    pub fn with_repeated(mut self, path: impl Into<String>) -> Self {
        self.repeated.insert(path.into());
        self
    }

    /// Mark several dotted paths as repeated.
    pub fn with_repeated_columns<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repeated.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Whether the full dotted path names a repeated column.
    pub fn is_repeated(&self, path: &str) -> bool {
        self.repeated.contains(path)
    }

    /// Check that every repeated path is a well-formed dotted path.
    pub fn validate(&self) -> Result<()> {
        for path in &self.repeated {
            if path.split('.').any(str::is_empty) {
                return Err(Error::invalid_spec(format!(
                    "repeated column '{path}' has an empty segment"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a spec from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let spec: Self = toml::from_str(content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Parse and validate a spec from JSON.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load a spec file. `.json` files are read as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let spec = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        tracing::debug!(
            path = %path.display(),
            repeated = spec.repeated.len(),
            "Loaded query builder spec"
        );
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_methods() {
        let spec = QueryBuilderSpec::new("SELECT 1")
            .with_repeated("Events")
            .with_repeated_columns(["NFe.infNFe.det", "Manifestations"]);

        assert_eq!(spec.template, "SELECT 1");
        assert!(spec.is_repeated("Events"));
        assert!(spec.is_repeated("NFe.infNFe.det"));
        assert!(spec.is_repeated("Manifestations"));
        assert!(!spec.is_repeated("NFe"));
        assert!(!spec.is_repeated("det"));
    }

    #[test]
    fn test_validate_rejects_empty_segment() {
        let spec = QueryBuilderSpec::default().with_repeated("a..b");
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(_)));

        let spec = QueryBuilderSpec::default().with_repeated(".Events");
        assert!(spec.validate().is_err());

        let spec = QueryBuilderSpec::default().with_repeated("NFe.infNFe.det");
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str() {
        let spec = QueryBuilderSpec::from_toml_str(
            r#"
            template = "SELECT %s FROM %s WHERE %s"
            repeated = ["Events", "NFe.infNFe.det"]
            "#,
        )
        .unwrap();

        assert_eq!(spec.template, "SELECT %s FROM %s WHERE %s");
        assert_eq!(spec.repeated.len(), 2);
        assert!(spec.is_repeated("NFe.infNFe.det"));
    }

    #[test]
    fn test_from_toml_str_aliases() {
        let spec = QueryBuilderSpec::from_toml_str(
            r#"
            sql_query = "SELECT 1"
            repeated_columns = ["Events"]
            "#,
        )
        .unwrap();

        assert_eq!(spec.template, "SELECT 1");
        assert!(spec.is_repeated("Events"));
    }

    #[test]
    fn test_from_toml_str_invalid_path() {
        let err = QueryBuilderSpec::from_toml_str(r#"repeated = ["Events..Date"]"#).unwrap_err();
        assert!(err.is_config_error());
        assert!(matches!(err, Error::InvalidSpec(_)));
    }

    #[test]
    fn test_from_json_str() {
        let spec = QueryBuilderSpec::from_json_str(
            r#"{"template": "SELECT 1", "repeated": ["Events"]}"#,
        )
        .unwrap();
        assert!(spec.is_repeated("Events"));

        let err = QueryBuilderSpec::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_file_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("spec.toml");
        let mut file = std::fs::File::create(&toml_path).unwrap();
        writeln!(file, "template = \"SELECT 1\"\nrepeated = [\"Events\"]").unwrap();
        let spec = QueryBuilderSpec::from_file(&toml_path).unwrap();
        assert!(spec.is_repeated("Events"));

        let json_path = dir.path().join("spec.json");
        std::fs::write(&json_path, r#"{"repeated": ["Owners"]}"#).unwrap();
        let spec = QueryBuilderSpec::from_file(&json_path).unwrap();
        assert!(spec.is_repeated("Owners"));
        assert_eq!(spec.template, "");
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = QueryBuilderSpec::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let spec = QueryBuilderSpec::new("SELECT %s").with_repeated_columns(["A", "B.c"]);
        let text = toml::to_string(&spec).unwrap();
        let back = QueryBuilderSpec::from_toml_str(&text).unwrap();
        assert_eq!(back, spec);
    }
}
