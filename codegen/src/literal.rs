/// Encode `text` as a double-quoted Elm string literal.
///
/// Backslash, double quote, newline, carriage return and tab get their short
/// escapes. Any other control character becomes a `\u{XXXX}` escape. Everything
/// else, including markup characters and non-ASCII text, is copied as is.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:04X}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
