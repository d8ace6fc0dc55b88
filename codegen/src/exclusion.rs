use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use spectest::Example;

use crate::error::GenerateError;
use crate::files;

const BUILTIN: &str = include_str!("../exclusions.toml");

/// Which examples to leave out of the sample article.
///
/// An example is excluded when its section is listed or its number is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExclusionPolicy {
    #[serde(default)]
    sections: BTreeSet<String>,
    #[serde(default)]
    examples: BTreeSet<u32>,
}

impl ExclusionPolicy {
    /// The policy shipped in `exclusions.toml`.
    pub fn builtin() -> Self {
        Self::from_toml(BUILTIN).expect("built-in exclusion policy is valid TOML")
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let text = files::read_input(path)?;
        Self::from_toml(&text).map_err(|source| GenerateError::Policy {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.sections.insert(section.into());
        self
    }

    pub fn with_example(mut self, number: u32) -> Self {
        self.examples.insert(number);
        self
    }

    pub fn excludes(&self, example: &Example) -> bool {
        self.examples.contains(&example.number) || self.sections.contains(&example.section)
    }

    pub fn excluded_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.examples.iter().copied()
    }

    pub fn excluded_sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.as_str())
    }
}
