use crate::content::sections::render_sections;
use crate::content::tools::{ToolCatalog, ToolData};
use crate::page::{ClickTarget, Key, ScrollLock};

/// What the tool page shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolView {
    pub key: String,
    pub icon: String,
    pub title: String,
    pub subtitle: String,
    /// Section markup built from the document body.
    pub content_html: String,
}

impl ToolView {
    pub fn from_data(data: &ToolData) -> Self {
        Self {
            key: data.key.clone(),
            icon: data.icon.clone(),
            title: data.title.clone(),
            subtitle: data.subtitle.clone(),
            content_html: render_sections(&data.html),
        }
    }
}

/// Full-screen tool detail page.
#[derive(Clone, Debug, Default)]
pub struct ToolModal {
    view: Option<ToolView>,
    open: bool,
    scroll_top: f64,
}

impl ToolModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Last populated content. Kept after closing so the close transition has something to show.
    pub fn view(&self) -> Option<&ToolView> {
        self.view.as_ref()
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Scroll position inside the tool page.
    pub fn set_scroll_top(&mut self, top: f64) {
        self.scroll_top = top.max(0.0);
    }

    /// Populate from `key` and show. A document that fails to load leaves the modal untouched.
    pub fn open(&mut self, key: &str, catalog: &mut ToolCatalog, lock: &mut ScrollLock) -> bool {
        let Some(data) = catalog.load(key) else {
            return false;
        };
        self.view = Some(ToolView::from_data(data));
        self.scroll_top = 0.0;
        self.open = true;
        lock.lock();
        true
    }

    pub fn close(&mut self, lock: &mut ScrollLock) {
        if self.open {
            self.open = false;
            lock.unlock();
        }
    }

    /// Returns `true` when the click was consumed.
    pub fn handle_click(
        &mut self,
        target: &ClickTarget,
        catalog: &mut ToolCatalog,
        lock: &mut ScrollLock,
    ) -> bool {
        if let Some(key) = &target.tool_card {
            return self.open(key, catalog, lock);
        }
        if target.close_control && self.open {
            self.close(lock);
            return true;
        }
        false
    }

    pub fn handle_key(&mut self, key: &Key, lock: &mut ScrollLock) {
        if *key == Key::Escape {
            self.close(lock);
        }
    }
}
