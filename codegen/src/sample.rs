use spectest::Example;

use crate::exclusion::ExclusionPolicy;

/// Render the sample article: each example's reference rendering, untouched,
/// in a `<div>` tagged with its number. Excluded examples are skipped.
pub fn render(examples: &[Example], policy: &ExclusionPolicy) -> String {
    let mut html = String::from("<article>");
    for example in examples.iter().filter(|e| !policy.excludes(e)) {
        html.push_str(&format!(
            "<div class=\"{}\">\n{}</div>\n\n",
            example.number, example.expected_output
        ));
    }
    html.push_str("</article>");
    html
}
