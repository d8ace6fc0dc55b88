use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use codegen::ExclusionPolicy;

use crate::bundle::BundleConfig;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "spectest.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings from `spectest.toml`. Command-line flags take precedence.
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Specification document to extract examples from.
    pub spec: Option<PathBuf>,

    /// Previously generated module with expected output per example.
    pub reference: Option<PathBuf>,

    /// Where to write the generated test module.
    pub output: Option<PathBuf>,

    /// Where to write the sample article.
    pub sample: Option<PathBuf>,

    pub module_name: Option<String>,

    #[serde(default)]
    pub allow_empty: bool,

    /// Replaces the built-in exclusion policy.
    pub exclude: Option<ExclusionPolicy>,

    pub bundle: Option<BundleConfig>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config.rebased(&base_dir))
    }

    /// Load the named config, or `spectest.toml` if it exists, or fall back to defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn rebased(mut self, base_dir: &Path) -> Self {
        let rebase = |path: Option<PathBuf>| path.map(|p| base_dir.join(p));
        self.spec = rebase(self.spec);
        self.reference = rebase(self.reference);
        self.output = rebase(self.output);
        self.sample = rebase(self.sample);
        if let Some(bundle) = self.bundle.as_mut() {
            bundle.working_dir = base_dir.join(&bundle.working_dir);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_settings() {
        let config = Config::from_toml("").unwrap();
        assert!(config.spec.is_none());
        assert!(config.exclude.is_none());
        assert!(config.bundle.is_none());
        assert!(!config.allow_empty);
    }

    #[test]
    fn full_config_parses() {
        let config = Config::from_toml(
            r#"
spec = "spec.txt"
reference = "TestsOk.elm"
output = "SpecTests.elm"
sample = "sample.html"
module_name = "Spec"
allow_empty = true

[exclude]
sections = ["HTML blocks"]
examples = [296]

[bundle]
working_dir = "demo"
compile = ["elm", "make", "Main.elm", "--output=../main.js"]
"#,
        )
        .unwrap();
        assert_eq!(config.spec, Some(PathBuf::from("spec.txt")));
        assert_eq!(config.module_name.as_deref(), Some("Spec"));
        assert!(config.allow_empty);

        let policy = config.exclude.unwrap();
        assert_eq!(policy.excluded_numbers().collect::<Vec<_>>(), vec![296]);

        let bundle = config.bundle.unwrap();
        assert_eq!(bundle.compile[..2], ["elm", "make"]);
        assert_eq!(bundle.minify[0], "uglifyjs");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("specification = \"spec.txt\"\n").is_err());
    }

    #[test]
    fn paths_are_relative_to_the_config_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join(DEFAULT_CONFIG);
        std::fs::write(&path, "spec = \"docs/spec.txt\"\n[bundle]\nworking_dir = \"demo\"\n")
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.spec, Some(dir.path().join("docs/spec.txt")));
        assert_eq!(config.bundle.unwrap().working_dir, dir.path().join("demo"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let err = Config::discover(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
