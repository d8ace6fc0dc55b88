pub mod diagnostic;
pub mod reference;
pub mod spec;

pub use diagnostic::{DiagnosticKind, ParseDiagnostic};
pub use reference::ReferenceExtractor;
pub use spec::SpecParser;

/// The result of one scan: the extracted value plus any warnings.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub value: T,
    pub warnings: Vec<ParseDiagnostic>,
}

/// Rewrite `\r\n` and lone `\r` as `\n` so patterns only deal with one line ending.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
