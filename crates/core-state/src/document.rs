//! Plain-text document framing: newline-split on load, newline-join on save.

/// Split file content into line texts.
///
/// Lines are separated by `\n`; a `\r` left at the end of a line (CRLF files)
/// is dropped. A trailing newline yields a final empty line, which the
/// padding on load and trimming on save absorb.
pub fn split_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

/// Newline-join line texts, dropping trailing empty lines.
///
/// An entirely empty document serializes to the empty string (one empty line).
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let keep = lines
        .iter()
        .rposition(|l| !l.as_ref().is_empty())
        .map_or(0, |i| i + 1);
    let mut out = String::new();
    for (i, line) in lines[..keep].iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}
