use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// What a scanner noticed. Every kind is a warning: scanning never fails
/// outright, it skips text that does not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An opening fence with no `.` separator or closing fence after it.
    Unterminated,

    /// An opening fence that ended up inside the body of example `by`.
    Swallowed { by: u32 },

    /// A second reference group for `number`. The later group is kept.
    DuplicateReference { number: u32 },

    /// A reference group whose class attribute does not fit an example number.
    NumberOutOfRange { text: String },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Unterminated => write!(f, "unterminated example block"),
            DiagnosticKind::Swallowed { by } => {
                write!(f, "example block swallowed by example {}", by)
            }
            DiagnosticKind::DuplicateReference { number } => {
                write!(f, "duplicate reference entry for example {}", number)
            }
            DiagnosticKind::NumberOutOfRange { text } => {
                write!(f, "example number {} is out of range", text)
            }
        }
    }
}

/// A skipped region of an input document that looks like it was meant to match.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    pub kind: DiagnosticKind,
    pub span: Range<usize>,
    pub file_id: usize,
    /// Where the cause lives, when it is somewhere other than `span`.
    pub related: Option<Range<usize>>,
}

impl ParseDiagnostic {
    pub fn new(kind: DiagnosticKind, span: Range<usize>, file_id: usize) -> Self {
        ParseDiagnostic {
            kind,
            span,
            file_id,
            related: None,
        }
    }

    pub fn with_related(mut self, span: Range<usize>) -> Self {
        self.related = Some(span);
        self
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    fn notes(&self) -> Vec<String> {
        match &self.kind {
            DiagnosticKind::Unterminated => {
                vec!["expected a `.` line followed by a closing line of 32 backticks".to_string()]
            }
            DiagnosticKind::Swallowed { by } => vec![format!(
                "example {} has no `.` separator or closing fence before this line",
                by
            )],
            DiagnosticKind::DuplicateReference { .. } => {
                vec!["the last entry for a number wins".to_string()]
            }
            DiagnosticKind::NumberOutOfRange { .. } => {
                vec!["the group is skipped".to_string()]
            }
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let mut labels = vec![Label::primary(self.file_id, self.span.clone())];
        if let Some(related) = &self.related {
            let label = Label::secondary(self.file_id, related.clone());
            labels.push(match self.kind {
                DiagnosticKind::Swallowed { by } => {
                    label.with_message(format!("example {} starts here", by))
                }
                DiagnosticKind::DuplicateReference { .. } => {
                    label.with_message("first entry is here")
                }
                _ => label,
            });
        }

        Diagnostic::warning()
            .with_message(self.message())
            .with_labels(labels)
            .with_notes(self.notes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::diagnostic::{LabelStyle, Severity};

    #[test]
    fn swallowed_block_points_at_both_openers() {
        let diagnostic = ParseDiagnostic::new(DiagnosticKind::Swallowed { by: 7 }, 50..90, 0)
            .with_related(0..40)
            .to_diagnostic();

        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.message, "example block swallowed by example 7");
        assert_eq!(diagnostic.labels.len(), 2);
        assert_eq!(diagnostic.labels[0].style, LabelStyle::Primary);
        assert_eq!(diagnostic.labels[0].range, 50..90);
        assert_eq!(diagnostic.labels[1].style, LabelStyle::Secondary);
        assert_eq!(diagnostic.labels[1].message, "example 7 starts here");
        assert!(diagnostic.notes[0].contains("example 7"));
    }

    #[test]
    fn each_kind_has_its_own_note() {
        let kinds = [
            DiagnosticKind::Unterminated,
            DiagnosticKind::Swallowed { by: 1 },
            DiagnosticKind::DuplicateReference { number: 1 },
            DiagnosticKind::NumberOutOfRange {
                text: "99999999999".to_string(),
            },
        ];
        let notes: Vec<String> = kinds
            .into_iter()
            .map(|kind| ParseDiagnostic::new(kind, 0..1, 0).to_diagnostic().notes.remove(0))
            .collect();

        let mut unique = notes.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), notes.len());
    }
}
