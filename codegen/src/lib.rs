pub mod error;
pub mod exclusion;
pub mod files;
pub mod generator;
pub mod literal;
pub mod sample;
pub mod test_module;

pub use error::GenerateError;
pub use exclusion::ExclusionPolicy;
pub use generator::{Artifacts, GenerateOptions, generate};
