use std::collections::BTreeSet;

use spectest::{Example, ReferenceMap};

use crate::error::GenerateError;
use crate::exclusion::ExclusionPolicy;
use crate::sample;
use crate::test_module::{self, DEFAULT_MODULE_NAME};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Name of the generated Elm module.
    pub module_name: String,
    /// Accept a specification document with no examples instead of failing.
    pub allow_empty: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            allow_empty: false,
        }
    }
}

/// The two generated texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub test_module: String,
    pub sample_document: String,
}

/// Merge parsed examples with reference fragments and the exclusion policy.
pub fn generate(
    examples: &[Example],
    references: &ReferenceMap,
    policy: &ExclusionPolicy,
    options: &GenerateOptions,
) -> Result<Artifacts, GenerateError> {
    if !test_module::is_valid_module_name(&options.module_name) {
        return Err(GenerateError::ModuleName(options.module_name.clone()));
    }
    if examples.is_empty() && !options.allow_empty {
        return Err(GenerateError::NoExamples);
    }

    report_correlation(examples, references, policy);

    Ok(Artifacts {
        test_module: test_module::render(&options.module_name, examples, references),
        sample_document: sample::render(examples, policy),
    })
}

/// Log how well the three inputs line up. Mismatches are not errors.
fn report_correlation(examples: &[Example], references: &ReferenceMap, policy: &ExclusionPolicy) {
    let numbers: BTreeSet<u32> = examples.iter().map(|e| e.number).collect();

    for entry in references.iter().filter(|e| !numbers.contains(&e.number)) {
        tracing::warn!(number = entry.number, "reference entry matches no example");
    }

    let missing = examples
        .iter()
        .filter(|e| !references.contains(e.number))
        .count();
    if missing > 0 {
        tracing::info!(missing, "examples without a reference entry get an empty list");
    }

    for number in policy.excluded_numbers().filter(|n| !numbers.contains(n)) {
        tracing::debug!(number, "excluded example does not exist");
    }
    for section in policy
        .excluded_sections()
        .filter(|s| !examples.iter().any(|e| e.section == *s))
    {
        tracing::debug!(section, "excluded section does not exist");
    }

    let excluded = examples.iter().filter(|e| policy.excludes(e)).count();
    tracing::info!(
        examples = examples.len(),
        references = references.len(),
        excluded,
        "generating artifacts"
    );
}
