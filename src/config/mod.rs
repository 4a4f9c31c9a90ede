use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::compiler::{Compiler, DEFAULT_EXACT_SUFFIX, FieldSet};

/// Compiler settings read from a YAML/JSON file and `MUTO_*` variables.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CompilerConfig {
    /// Fields matched exactly, without the exact-match subfield.
    #[serde(default)]
    pub not_analyzed_fields: Vec<String>,
    #[serde(default = "default_exact_suffix")]
    pub exact_suffix: String,
}

fn default_exact_suffix() -> String {
    DEFAULT_EXACT_SUFFIX.to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            not_analyzed_fields: Vec::new(),
            exact_suffix: default_exact_suffix(),
        }
    }
}

impl CompilerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::from_sources(Some(path))
    }

    /// Environment only, or file then environment when `path` is given.
    pub fn from_sources(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::from_sources_with_env(path, None)
    }

    /// Like [`CompilerConfig::from_sources`], reading `MUTO_*` variables from
    /// `env` instead of the process environment when it is given.
    pub fn from_sources_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> anyhow::Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("MUTO")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("not_analyzed_fields")
                    .source(env),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn fields(&self) -> FieldSet {
        self.not_analyzed_fields.iter().cloned().collect()
    }

    pub fn compiler(&self) -> Compiler {
        Compiler::new().with_exact_suffix(self.exact_suffix.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults() {
        let config = CompilerConfig::default();
        assert!(config.fields().is_empty());
        assert_eq!(config.compiler().exact_suffix(), "keyword");
    }

    #[test]
    fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "not_analyzed_fields: [foo, status]\nexact_suffix: raw").unwrap();

        let config = CompilerConfig::from_sources_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.not_analyzed_fields, vec!["foo", "status"]);
        assert_eq!(config.exact_suffix, "raw");
        assert!(config.fields().contains("status"));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "not_analyzed_fields: [foo]").unwrap();

        let config = CompilerConfig::from_sources_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.exact_suffix, "keyword");
    }

    #[test]
    fn reads_environment_lists() {
        let config = CompilerConfig::from_sources_with_env(
            None,
            env(&[
                ("MUTO_NOT_ANALYZED_FIELDS", "foo,status"),
                ("MUTO_EXACT_SUFFIX", "raw"),
            ]),
        )
        .unwrap();
        assert_eq!(config.not_analyzed_fields, vec!["foo", "status"]);
        assert_eq!(config.exact_suffix, "raw");
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "not_analyzed_fields: [foo]\nexact_suffix: raw").unwrap();

        let config = CompilerConfig::from_sources_with_env(
            Some(file.path()),
            env(&[("MUTO_NOT_ANALYZED_FIELDS", "title")]),
        )
        .unwrap();
        assert_eq!(config.not_analyzed_fields, vec!["title"]);
        assert_eq!(config.exact_suffix, "raw");
    }
}
