use std::ops::Range;

/// One numbered test case taken from a fenced example block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Sequential number, starting at 1, in document order.
    pub number: u32,
    /// Text of the closest preceding heading, or empty if none was seen.
    pub section: String,
    /// Text before the `.` separator line, verbatim.
    pub input: String,
    /// Text after the `.` separator line, verbatim.
    pub expected_output: String,
    /// Byte span of the whole block in the normalized document.
    pub span: Range<usize>,
}
