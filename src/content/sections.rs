//! Splits a rendered tool document into page sections.
//!
//! The body is cut at every `<hr>`. A chunk that contains images becomes a two-column section
//! (image stack on one side, remaining text on the other); any other chunk is a full-width text
//! section.

use crate::content::html::{Fragment, escape_attr};

/// An image pulled out of a section's text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionImage {
    pub src: String,
    pub alt: String,
}

impl SectionImage {
    pub fn to_html(&self) -> String {
        format!(
            r#"<img src="{}" alt="{}" class="project-card__gallery-img">"#,
            escape_attr(&self.src),
            escape_attr(&self.alt)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Section {
    /// Image column plus the chunk's remaining markup.
    Split {
        images: Vec<SectionImage>,
        text_html: String,
    },
    /// No images; the chunk verbatim.
    Full { html: String },
}

impl Section {
    pub fn images(&self) -> &[SectionImage] {
        match self {
            Self::Split { images, .. } => images,
            Self::Full { .. } => &[],
        }
    }

    pub fn text_html(&self) -> &str {
        match self {
            Self::Split { text_html, .. } => text_html,
            Self::Full { html } => html,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Split { images, text_html } => {
                let imgs = images
                    .iter()
                    .map(SectionImage::to_html)
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "<div class=\"tool-page__section\">\n\
                     <div class=\"tool-page__section-img\">\n{imgs}\n</div>\n\
                     <div class=\"tool-page__section-text\">\n{text_html}\n</div>\n\
                     </div>\n"
                )
            }
            Self::Full { html } => format!(
                "<div class=\"tool-page__section tool-page__section--full\">\n\
                 <div class=\"tool-page__section-text\">\n{html}\n</div>\n\
                 </div>\n"
            ),
        }
    }
}

/// Cut `html` at `<hr>`, `<hr/>` and `<hr />` (any case, any whitespace before the slash);
/// chunks are trimmed and empty ones dropped. Tags with attributes are not separators.
pub fn split_chunks(html: &str) -> Vec<&str> {
    let bytes = html.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        match hr_len(&bytes[pos..]) {
            Some(len) => {
                chunks.push(&html[start..pos]);
                pos += len;
                start = pos;
            }
            None => pos += 1,
        }
    }
    chunks.push(&html[start..]);
    chunks
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Length of an `<hr\s*/?>` separator at the start of `b`.
fn hr_len(b: &[u8]) -> Option<usize> {
    if b.len() < 4 || b[0] != b'<' || !b[1..3].eq_ignore_ascii_case(b"hr") {
        return None;
    }
    let mut i = 3;
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    if b.get(i) == Some(&b'/') {
        i += 1;
    }
    (b.get(i) == Some(&b'>')).then_some(i + 1)
}

/// Build one section per chunk.
///
/// Images are collected in two passes, both in document order: first every `<img>` whose
/// parent is a `<p>` (the whole `<p>` is dropped from the text when the image is its only child
/// node, otherwise just the image), then every `<img>` with no `<p>` ancestor. An image nested
/// deeper inside a `<p>` stays in the text.
pub fn build_sections(html: &str) -> Vec<Section> {
    split_chunks(html).into_iter().map(build_section).collect()
}

fn build_section(chunk: &str) -> Section {
    let mut frag = Fragment::parse(chunk);
    let imgs = frag.elements("img");

    let mut images = Vec::new();
    let mut removals = Vec::new();
    for &img in &imgs {
        let Some(parent) = frag.node(img).parent else {
            continue;
        };
        if !frag.is_element(parent, "p") {
            continue;
        }
        images.push(section_image(&frag, img));
        if frag.node(parent).children.len() == 1 {
            removals.push(parent);
        } else {
            removals.push(img);
        }
    }
    for &img in &imgs {
        if !frag.has_ancestor(img, "p") {
            images.push(section_image(&frag, img));
            removals.push(img);
        }
    }

    if images.is_empty() {
        return Section::Full {
            html: chunk.to_owned(),
        };
    }
    for idx in removals {
        frag.remove(idx);
    }
    Section::Split {
        images,
        text_html: frag.to_html().trim().to_owned(),
    }
}

fn section_image(frag: &Fragment, img: usize) -> SectionImage {
    SectionImage {
        src: frag.attr(img, "src").unwrap_or_default().to_owned(),
        alt: frag.attr(img, "alt").unwrap_or_default().to_owned(),
    }
}

/// First `<img>` anywhere in `html`, in document order.
pub fn first_image(html: &str) -> Option<SectionImage> {
    let frag = Fragment::parse(html);
    let img = *frag.elements("img").first()?;
    Some(section_image(&frag, img))
}

/// Full section markup followed by the page footer.
pub fn sections_to_html(sections: &[Section]) -> String {
    let mut out: String = sections.iter().map(Section::to_html).collect();
    out.push_str("<div class=\"tool-page__footer\"></div>");
    out
}

/// `build_sections` then `sections_to_html`.
pub fn render_sections(html: &str) -> String {
    sections_to_html(&build_sections(html))
}
