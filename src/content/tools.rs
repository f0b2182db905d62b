use std::collections::BTreeMap;

use crate::assets::source::{AssetRequest, AssetSource, unix_millis};
use crate::content::frontmatter::parse_front_matter;
use crate::content::html::{escape_attr, escape_text};
use crate::content::markdown::MarkdownRenderer;
use crate::content::sections::first_image;
use crate::foundation::error::{EngraveError, EngraveResult};

/// Keys of the tool documents shown on the page by default.
pub const DEFAULT_TOOL_KEYS: [&str; 3] = ["ue", "maya", "mb"];

const PREVIEW_LABEL: &str = "点击查看详情";
const PREVIEW_ACTION: &str = "查看 →";

/// Relative path of a tool document.
pub fn tool_document_path(key: &str) -> String {
    format!("content/tools/{key}.md")
}

/// A loaded tool document: header fields with defaults applied and the body as HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolData {
    pub key: String,
    pub icon: String,
    pub title: String,
    pub subtitle: String,
    pub html: String,
}

impl ToolData {
    /// Build from raw markdown. Missing or empty `icon`, `title` and `subtitle` default to the
    /// uppercased key, the key and the empty string.
    pub fn from_markdown(key: &str, raw: &str, markdown: &dyn MarkdownRenderer) -> Self {
        let doc = parse_front_matter(raw);
        tracing::debug!(key, meta = ?doc.meta, "loaded tool document");
        Self {
            key: key.to_owned(),
            icon: doc
                .non_empty("icon")
                .map_or_else(|| key.to_uppercase(), str::to_owned),
            title: doc.non_empty("title").unwrap_or(key).to_owned(),
            subtitle: doc.non_empty("subtitle").unwrap_or_default().to_owned(),
            html: markdown.render(&doc.body),
        }
    }
}

/// Hover preview for a tool card, built from the first image of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolPreview {
    pub key: String,
    pub image_src: String,
    pub html: String,
}

impl ToolPreview {
    fn new(data: &ToolData, image_src: String) -> Self {
        let html = format!(
            "<div class=\"tool-card__preview\">\n\
             <img src=\"{}\" alt=\"{}\" class=\"tool-card__preview-img\">\n\
             <div class=\"tool-card__preview-footer\">\n\
             <span class=\"tool-card__preview-label\">{PREVIEW_LABEL}</span>\n\
             <span class=\"tool-card__preview-action\">{PREVIEW_ACTION}</span>\n\
             </div>\n\
             </div>",
            escape_attr(&image_src),
            escape_text(&data.title),
        );
        Self {
            key: data.key.clone(),
            image_src,
            html,
        }
    }
}

/// Loads tool documents on demand and keeps every successful load.
///
/// Failed loads are logged and retried on the next request.
pub struct ToolCatalog {
    source: Box<dyn AssetSource>,
    markdown: Box<dyn MarkdownRenderer>,
    keys: Vec<String>,
    cache: BTreeMap<String, ToolData>,
    clock: fn() -> u64,
}

impl ToolCatalog {
    pub fn new(
        source: Box<dyn AssetSource>,
        markdown: Box<dyn MarkdownRenderer>,
        keys: Vec<String>,
    ) -> Self {
        Self {
            source,
            markdown,
            keys,
            cache: BTreeMap::new(),
            clock: unix_millis,
        }
    }

    /// Replace the cache-buster clock.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn cached(&self, key: &str) -> Option<&ToolData> {
        self.cache.get(key)
    }

    /// The document for `key`, fetched with a cache-busting query on first use. Failures are
    /// logged and yield `None`.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self, key: &str) -> Option<&ToolData> {
        if !self.cache.contains_key(key) {
            match self.fetch(key) {
                Ok(data) => {
                    self.cache.insert(key.to_owned(), data);
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "failed to load tool data");
                    return None;
                }
            }
        }
        self.cache.get(key)
    }

    fn fetch(&self, key: &str) -> EngraveResult<ToolData> {
        let request = AssetRequest::cache_busted(&tool_document_path(key), (self.clock)())?;
        let bytes = self.source.fetch(&request)?;
        let raw = String::from_utf8(bytes)
            .map_err(|e| EngraveError::content(format!("'{}' is not UTF-8: {e}", request.path())))?;
        Ok(ToolData::from_markdown(key, &raw, self.markdown.as_ref()))
    }

    /// Load every configured key and build previews for those with an image, in key order.
    pub fn previews(&mut self) -> Vec<ToolPreview> {
        let keys = self.keys.clone();
        let mut out = Vec::new();
        for key in &keys {
            let Some(data) = self.load(key) else {
                continue;
            };
            if let Some(img) = first_image(&data.html) {
                out.push(ToolPreview::new(data, img.src));
            }
        }
        out
    }
}
