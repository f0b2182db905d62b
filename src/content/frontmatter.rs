use std::collections::BTreeMap;

/// A document split into its `key: value` header and the remaining body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub meta: BTreeMap<String, String>,
    pub body: String,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Value for `key`, or `None` when absent or empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

/// Parse an optional leading `---` block.
///
/// The block must open on the first line and close at the first later line that is exactly
/// `---` followed by a line break; otherwise the whole input is the body. Inside the block,
/// lines of the form `word: value` become entries (value trimmed, later keys win). Other lines
/// are ignored. Both `\n` and `\r\n` line endings are accepted.
pub fn parse_front_matter(raw: &str) -> FrontMatter {
    let Some((block, body)) = split_block(raw) else {
        return FrontMatter {
            meta: BTreeMap::new(),
            body: raw.to_owned(),
        };
    };

    let mut meta = BTreeMap::new();
    for line in block.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some((k, v)) = parse_entry(line) {
            meta.insert(k.to_owned(), v.to_owned());
        }
    }
    FrontMatter {
        meta,
        body: body.to_owned(),
    }
}

fn strip_newline(s: &str) -> Option<&str> {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n'))
}

fn split_block(raw: &str) -> Option<(&str, &str)> {
    let rest = strip_newline(raw.strip_prefix("---")?)?;
    // Earliest closing fence wins, so a `\r\n` fence is found at its `\r`.
    for (i, _) in rest.char_indices() {
        let tail = &rest[i..];
        let Some(after_nl) = strip_newline(tail) else {
            continue;
        };
        let Some(after_fence) = after_nl.strip_prefix("---") else {
            continue;
        };
        if let Some(body) = strip_newline(after_fence) {
            return Some((&rest[..i], body));
        }
    }
    None
}

fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let key = &line[..colon];
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }
    // Leading whitespace may include line separators; the value itself may not.
    let value = line[colon + 1..].trim_start_matches(is_js_space);
    if value.contains(['\r', '\u{2028}', '\u{2029}']) {
        return None;
    }
    Some((key, value.trim_end_matches(is_js_space)))
}

fn is_js_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_body() {
        let fm = parse_front_matter("---\ntitle: Maya\nicon: M\n---\nBody text");
        assert_eq!(fm.get("title"), Some("Maya"));
        assert_eq!(fm.get("icon"), Some("M"));
        assert_eq!(fm.meta.len(), 2);
        assert_eq!(fm.body, "Body text");
    }

    #[test]
    fn missing_block_keeps_whole_input() {
        let raw = "# Heading\n\ntitle: not meta";
        let fm = parse_front_matter(raw);
        assert!(fm.meta.is_empty());
        assert_eq!(fm.body, raw);
    }

    #[test]
    fn unterminated_block_is_body() {
        let raw = "---\ntitle: Maya\nBody";
        assert_eq!(parse_front_matter(raw).body, raw);
        // The closing fence needs a line break after it.
        let raw = "---\ntitle: Maya\n---";
        assert!(parse_front_matter(raw).meta.is_empty());
    }

    #[test]
    fn crlf_and_whitespace() {
        let fm = parse_front_matter("---\r\ntitle:   Unreal Engine  \r\nsubtitle:\r\n---\r\nline 1\r\nline 2");
        assert_eq!(fm.get("title"), Some("Unreal Engine"));
        assert_eq!(fm.get("subtitle"), Some(""));
        assert_eq!(fm.non_empty("subtitle"), None);
        assert_eq!(fm.body, "line 1\r\nline 2");
    }

    #[test]
    fn first_closing_fence_wins_and_junk_lines_are_skipped() {
        let fm = parse_front_matter(
            "---\nicon: UE\n- not a key\nbad key: x\nicon: U5\n---\nA\n---\nB",
        );
        assert_eq!(fm.get("icon"), Some("U5"));
        assert_eq!(fm.meta.len(), 1);
        assert_eq!(fm.body, "A\n---\nB");
    }

    #[test]
    fn empty_block() {
        let fm = parse_front_matter("---\n\n---\nbody");
        assert!(fm.meta.is_empty());
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn leading_line_separator_is_whitespace() {
        let fm = parse_front_matter("---\nk:\u{2028}v\ntitle: a\u{2029}b\n---\n");
        assert_eq!(fm.get("k"), Some("v"));
        assert_eq!(fm.get("title"), None);
    }

    #[test]
    fn value_keeps_inner_colons() {
        let fm = parse_front_matter("---\nsubtitle: a: b\n---\n");
        assert_eq!(fm.get("subtitle"), Some("a: b"));
        assert_eq!(fm.body, "");
    }
}
