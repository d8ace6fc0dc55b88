use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::{DiagnosticKind, ParseDiagnostic, Parsed, normalize_line_endings};
use crate::reference::{ReferenceEntry, ReferenceMap};

// A list item of the form `    [ div [ class "N" ]` (or `    , div ...`) followed by
// its children, which end at the first line of eight spaces and a `]`.
static WRAPPER_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^    [\[,] div \[ class "([0-9]+)" \]\n((?s:.*?)\n        \])"#)
        .expect("wrapper group pattern")
});

/// Extracts numbered expected-output fragments from a reference module.
pub struct ReferenceExtractor {
    source: String,
    file_id: usize,
}

impl ReferenceExtractor {
    pub fn new(source: &str, file_id: usize) -> Self {
        ReferenceExtractor {
            source: normalize_line_endings(source),
            file_id,
        }
    }

    /// The normalized module text. Warning spans index into this.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parse(&self) -> Parsed<ReferenceMap> {
        let mut map = ReferenceMap::new();
        let mut warnings = Vec::new();
        let mut first_seen: BTreeMap<u32, Range<usize>> = BTreeMap::new();

        for caps in WRAPPER_GROUP.captures_iter(&self.source) {
            let (Some(number), Some(body)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            let Ok(value) = number.as_str().parse::<u32>() else {
                let kind = DiagnosticKind::NumberOutOfRange {
                    text: number.as_str().to_string(),
                };
                warnings.push(ParseDiagnostic::new(kind, number.range(), self.file_id));
                continue;
            };

            let replaced = map.insert(ReferenceEntry {
                number: value,
                html: body.as_str().to_string(),
            });
            let first = first_seen.entry(value).or_insert_with(|| number.range());
            if replaced.is_some() {
                let kind = DiagnosticKind::DuplicateReference { number: value };
                warnings.push(
                    ParseDiagnostic::new(kind, number.range(), self.file_id)
                        .with_related(first.clone()),
                );
            }
        }

        Parsed {
            value: map,
            warnings,
        }
    }
}
