//! A small HTML fragment parser for rendered markdown.
//!
//! Only what section building needs: a forgiving tokenizer, a node tree that remembers the
//! source text of every tag, and re-serialization of the tree with nodes removed. Markup is
//! never normalized; untouched regions round-trip byte for byte.

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Start tags that implicitly close an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    /// Comments, doctypes and processing instructions, kept verbatim.
    Other(&'a str),
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        raw: &'a str,
        self_closing: bool,
    },
    End {
        name: String,
        raw: &'a str,
    },
}

pub(crate) fn tokenize(html: &str) -> Vec<Token<'_>> {
    let bytes = html.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }
        let rest = &html[pos..];
        if rest.starts_with("<!--") {
            flush_text(&mut out, html, text_start, pos);
            let end = rest.find("-->").map_or(html.len(), |i| pos + i + 3);
            out.push(Token::Other(&html[pos..end]));
            pos = end;
            text_start = pos;
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            flush_text(&mut out, html, text_start, pos);
            let end = rest.find('>').map_or(html.len(), |i| pos + i + 1);
            out.push(Token::Other(&html[pos..end]));
            pos = end;
            text_start = pos;
        } else if rest.starts_with("</") && rest[2..].starts_with(|c: char| c.is_ascii_alphabetic())
        {
            flush_text(&mut out, html, text_start, pos);
            let end = rest.find('>').map_or(html.len(), |i| pos + i + 1);
            let name = tag_name(&html[pos + 2..end]);
            out.push(Token::End {
                name,
                raw: &html[pos..end],
            });
            pos = end;
            text_start = pos;
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            flush_text(&mut out, html, text_start, pos);
            let (token, end) = start_tag(html, pos);
            let raw_text_name = match &token {
                Token::Start {
                    name, self_closing, ..
                } if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) => {
                    Some(name.clone())
                }
                _ => None,
            };
            out.push(token);
            pos = end;
            text_start = pos;
            if let Some(name) = raw_text_name {
                let close = format!("</{name}");
                let lower = html[pos..].to_ascii_lowercase();
                let text_end = lower.find(&close).map_or(html.len(), |i| pos + i);
                flush_text(&mut out, html, pos, text_end);
                pos = text_end;
                text_start = pos;
            }
        } else {
            pos += 1;
        }
    }
    flush_text(&mut out, html, text_start, html.len());
    out
}

fn flush_text<'a>(out: &mut Vec<Token<'a>>, html: &'a str, from: usize, to: usize) {
    if to > from {
        out.push(Token::Text(&html[from..to]));
    }
}

fn tag_name(s: &str) -> String {
    s.chars()
        .take_while(|c| !c.is_ascii_whitespace() && *c != '/' && *c != '>')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Parse a start tag at `start` (which points at `<`). Returns the token and the byte offset
/// just past the closing `>`.
fn start_tag(html: &str, start: usize) -> (Token<'_>, usize) {
    let bytes = html.as_bytes();
    let mut pos = start + 1;
    while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && !matches!(bytes[pos], b'/' | b'>')
    {
        pos += 1;
    }
    let name = html[start + 1..pos].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        match bytes[pos] {
            b'>' => {
                pos += 1;
                break;
            }
            b'/' => {
                pos += 1;
                if bytes.get(pos) == Some(&b'>') {
                    self_closing = true;
                }
                continue;
            }
            _ => {}
        }

        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        let attr_name = html[name_start..pos].to_ascii_lowercase();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut value = String::new();
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos) {
                Some(&q @ (b'"' | b'\'')) => {
                    let v_start = pos + 1;
                    let v_end = html[v_start..]
                        .find(char::from(q))
                        .map_or(html.len(), |i| v_start + i);
                    value = html[v_start..v_end].to_owned();
                    pos = (v_end + 1).min(html.len());
                }
                _ => {
                    let v_start = pos;
                    while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>'
                    {
                        pos += 1;
                    }
                    value = html[v_start..pos].to_owned();
                }
            }
        }
        if !attr_name.is_empty() && !attrs.iter().any(|(n, _)| *n == attr_name) {
            attrs.push((attr_name, value));
        }
    }

    (
        Token::Start {
            name,
            attrs,
            raw: &html[start..pos],
            self_closing,
        },
        pos,
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Root,
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        start: String,
        end: Option<String>,
    },
    Text(String),
    Other(String),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) removed: bool,
}

/// An HTML fragment as a node arena; index 0 is the container.
#[derive(Clone, Debug)]
pub(crate) struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub(crate) fn parse(html: &str) -> Self {
        let mut frag = Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                removed: false,
            }],
        };
        let mut open: Vec<usize> = vec![0];

        for token in tokenize(html) {
            match token {
                Token::Text(t) => {
                    let parent = *open.last().unwrap_or(&0);
                    frag.push(parent, NodeKind::Text(t.to_owned()));
                }
                Token::Other(t) => {
                    let parent = *open.last().unwrap_or(&0);
                    frag.push(parent, NodeKind::Other(t.to_owned()));
                }
                Token::Start {
                    name,
                    attrs,
                    raw,
                    self_closing,
                } => {
                    if CLOSES_P.contains(&name.as_str())
                        && let Some(depth) = open.iter().rposition(|&i| frag.is_element(i, "p"))
                    {
                        open.truncate(depth);
                    }
                    let parent = *open.last().unwrap_or(&0);
                    let is_void = VOID_ELEMENTS.contains(&name.as_str());
                    let idx = frag.push(
                        parent,
                        NodeKind::Element {
                            name,
                            attrs,
                            start: raw.to_owned(),
                            end: None,
                        },
                    );
                    if !is_void && !self_closing {
                        open.push(idx);
                    }
                }
                Token::End { name, raw } => {
                    let Some(depth) = open.iter().rposition(|&i| frag.is_element(i, &name)) else {
                        // Stray end tag.
                        continue;
                    };
                    let idx = open[depth];
                    if let NodeKind::Element { end, .. } = &mut frag.nodes[idx].kind {
                        *end = Some(raw.to_owned());
                    }
                    open.truncate(depth);
                }
            }
        }
        frag
    }

    fn push(&mut self, parent: usize, kind: NodeKind) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            removed: false,
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    pub(crate) fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn is_element(&self, idx: usize, tag: &str) -> bool {
        matches!(&self.nodes[idx].kind, NodeKind::Element { name, .. } if name == tag)
    }

    pub(crate) fn attr(&self, idx: usize, attr: &str) -> Option<&str> {
        match &self.nodes[idx].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == attr)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Element indices named `tag` in document order.
    pub(crate) fn elements(&self, tag: &str) -> Vec<usize> {
        let mut out = Vec::new();
        self.walk(0, &mut |i| {
            if self.is_element(i, tag) {
                out.push(i);
            }
        });
        out
    }

    fn walk(&self, idx: usize, f: &mut impl FnMut(usize)) {
        for &c in &self.nodes[idx].children {
            f(c);
            self.walk(c, f);
        }
    }

    pub(crate) fn has_ancestor(&self, idx: usize, tag: &str) -> bool {
        let mut cur = self.nodes[idx].parent;
        while let Some(p) = cur {
            if self.is_element(p, tag) {
                return true;
            }
            cur = self.nodes[p].parent;
        }
        false
    }

    pub(crate) fn remove(&mut self, idx: usize) {
        self.nodes[idx].removed = true;
    }

    /// Serialize the live nodes under the container.
    pub(crate) fn to_html(&self) -> String {
        let mut out = String::new();
        for &c in &self.nodes[0].children {
            self.write_node(c, &mut out);
        }
        out
    }

    fn write_node(&self, idx: usize, out: &mut String) {
        let node = &self.nodes[idx];
        if node.removed {
            return;
        }
        match &node.kind {
            NodeKind::Root => {}
            NodeKind::Text(t) | NodeKind::Other(t) => out.push_str(t),
            NodeKind::Element {
                name, start, end, ..
            } => {
                out.push_str(start);
                for &c in &node.children {
                    self.write_node(c, out);
                }
                match end {
                    Some(end) => out.push_str(end),
                    None if !VOID_ELEMENTS.contains(&name.as_str())
                        && !start.ends_with("/>") =>
                    {
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                    None => {}
                }
            }
        }
    }
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(s: &str) -> String {
    s.replace('"', "&quot;")
}

/// Escape plain text for element content or attributes.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
