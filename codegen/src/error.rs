use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid exclusion policy '{}': {source}", .path.display())]
    Policy {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid module name '{0}': expected capitalized names joined by '.'")]
    ModuleName(String),

    /// The specification document produced no examples at all.
    #[error("no examples found in the specification document")]
    NoExamples,
}
