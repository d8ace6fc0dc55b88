use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::example::Example;
use crate::parser::{DiagnosticKind, ParseDiagnostic, Parsed, normalize_line_endings};

/// Lines from this marker to the end of the document are not test data.
pub const END_MARKER: &str = "<!-- END TESTS -->";

static END_OF_TESTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?m)^{}", regex::escape(END_MARKER))).expect("end marker pattern")
});

// Groups 1 and 2 belong to an example block, group 3 to a heading.
// The block alternative comes first so heading-like lines inside a block stay in its body.
static EXAMPLE_OR_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^`{32} example\n(?s:(.*?))^\.\n(?s:(.*?))^`{32}$",
        r"|^#{1,6} +(.*)$",
    ))
    .expect("example pattern")
});

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^`{32} example$").expect("opening fence pattern"));

/// Extracts numbered examples from a specification document.
pub struct SpecParser {
    source: String,
    file_id: usize,
}

impl SpecParser {
    pub fn new(source: &str, file_id: usize) -> Self {
        SpecParser {
            source: normalize_line_endings(source),
            file_id,
        }
    }

    /// The normalized document text. Example and warning spans index into this.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Scan the document once, left to right, and return its examples in order.
    pub fn parse(&self) -> Parsed<Vec<Example>> {
        let tests = self.test_region();

        let state = EXAMPLE_OR_HEADING
            .captures_iter(tests)
            .fold(ScanState::default(), ScanState::step);

        let warnings = self.unmatched_openers(tests, &state.examples);
        Parsed {
            value: state.examples,
            warnings,
        }
    }

    /// Everything before the end marker line, or the whole document if there is none.
    fn test_region(&self) -> &str {
        match END_OF_TESTS.find(&self.source) {
            Some(marker) => &self.source[..marker.start()],
            None => &self.source,
        }
    }

    /// Opening fence lines that did not start an example.
    fn unmatched_openers(&self, tests: &str, examples: &[Example]) -> Vec<ParseDiagnostic> {
        let mut warnings = Vec::new();
        let mut remaining = examples.iter().peekable();

        for opener in OPENING_FENCE.find_iter(tests) {
            // Examples and openers are both in document order.
            while remaining.next_if(|e| e.span.end <= opener.start()).is_some() {}

            match remaining.peek() {
                Some(example) if example.span.start == opener.start() => {}
                Some(example) if example.span.contains(&opener.start()) => {
                    let kind = DiagnosticKind::Swallowed { by: example.number };
                    let swallower = example.span.start..example.span.start + opener.len();
                    warnings.push(
                        ParseDiagnostic::new(kind, opener.range(), self.file_id)
                            .with_related(swallower),
                    );
                }
                _ => {
                    warnings.push(ParseDiagnostic::new(
                        DiagnosticKind::Unterminated,
                        opener.range(),
                        self.file_id,
                    ));
                }
            }
        }

        warnings
    }
}

#[derive(Default)]
struct ScanState {
    examples: Vec<Example>,
    section: String,
    count: u32,
}

impl ScanState {
    fn step(mut self, caps: Captures<'_>) -> Self {
        if let Some(heading) = caps.get(3) {
            // Taken verbatim; only an empty heading leaves the section alone.
            if !heading.as_str().is_empty() {
                self.section = heading.as_str().to_string();
            }
            return self;
        }

        let (Some(block), Some(input), Some(output)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            return self;
        };

        self.count += 1;
        self.examples.push(Example {
            number: self.count,
            section: self.section.clone(),
            input: input.as_str().to_string(),
            expected_output: output.as_str().to_string(),
            span: block.range(),
        });
        self
    }
}
