use spectest::{Example, ReferenceMap};

use crate::literal::string_literal;

pub const DEFAULT_MODULE_NAME: &str = "Spec";

/// Stands in for the expected output of examples with no reference entry.
const EMPTY_LIST: &str = "        []";

/// Render the Elm test module: one `testEq` entry per example, in document order.
///
/// Each entry carries the example number, an empty attribute list, the example
/// input as a string literal, and the reference fragment for that number.
pub fn render(module_name: &str, examples: &[Example], references: &ReferenceMap) -> String {
    let mut code = preamble(module_name);

    if examples.is_empty() {
        code.push_str("    []\n");
        return code;
    }

    for (index, example) in examples.iter().enumerate() {
        let opener = if index == 0 { "[ " } else { ", " };
        let expected = references
            .get(example.number)
            .map_or(EMPTY_LIST, |entry| entry.html.as_str());
        code.push_str(&format!(
            "    {}testEq {}\n        []\n        {}\n{}\n\n",
            opener,
            example.number,
            string_literal(&example.input),
            expected
        ));
    }

    code.push_str("    ]\n");
    code
}

fn preamble(module_name: &str) -> String {
    format!(
        "module {} exposing (..)\n\n\
         import Html exposing (..)\n\
         import Test.Helpers exposing (..)\n\n\n\
         run : List (Output msg)\n\
         run =\n",
        module_name
    )
}

/// Elm module names are dot-separated segments that each start with an uppercase letter.
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars.next().is_some_and(|c| c.is_ascii_uppercase())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
