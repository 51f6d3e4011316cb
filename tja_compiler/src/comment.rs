/// Cuts `line` at the first `//` or `;`.
pub fn strip_inline_comment(line: &str) -> &str {
    let cut = [line.find("//"), line.find(';')]
        .into_iter()
        .flatten()
        .min();
    match cut {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Comment-stripping pass over a whole document. Lines emptied by stripping
/// stay as blank lines; every line loses its trailing whitespace.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(strip_inline_comment(line).trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_at_earliest_marker() {
        assert_eq!(strip_inline_comment("1112,//3424"), "1112,");
        assert_eq!(strip_inline_comment("10;x//y"), "10");
        assert_eq!(strip_inline_comment("a//b;c"), "a");
        assert_eq!(strip_inline_comment("plain"), "plain");
        assert_eq!(strip_inline_comment("a/b"), "a/b");
    }

    #[test]
    fn emptied_lines_are_kept_blank() {
        let text = "#START\n// only comment\n1011,  ; tail\n#END";
        assert_eq!(strip_comments(text), "#START\n\n1011,\n#END\n");
    }

    #[test]
    fn stripping_is_idempotent() {
        let text = "TITLE:x // y\r\n\n  ;z\n1,2,3   \n";
        let once = strip_comments(text);
        assert_eq!(strip_comments(&once), once);
    }
}
