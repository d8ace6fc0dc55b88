pub mod example;
pub mod parser;
pub mod reference;

pub use example::Example;
pub use reference::{ReferenceEntry, ReferenceMap};
