//! Page orchestration.
//!
//! [`App`] wires the components together the way the page boots: the preloader runs while
//! the logo and fonts load, then the hero timeline, cursor, navigation and tool previews come
//! alive. Hosts feed it clock ticks, scroll offsets and input events and read back the state
//! to apply.

use std::sync::Arc;

use crate::assets::source::{AssetSource, fetch_logo};
use crate::config::SiteConfig;
use crate::content::markdown::MarkdownRenderer;
use crate::content::tools::{ToolCatalog, ToolPreview};
use crate::foundation::core::ViewportMetrics;
use crate::page::cursor::{Cursor, CursorFrame};
use crate::page::lightbox::Lightbox;
use crate::page::modal::ToolModal;
use crate::page::nav::{NavState, Navigation, ParallaxLayer};
use crate::page::preloader::{Preloader, PreloaderEvent};
use crate::page::timeline::{ScrollBinding, TimelineId, TimelineScheduler};
use crate::page::{ClickTarget, ElementHandle, Key, ScrollLock};
use crate::render::engraving::EngravingRenderer;

/// Progress reported once the logo request starts.
pub const PROGRESS_LOGO_STARTED: f64 = 30.0;
/// Progress reported once the logo resolves.
pub const PROGRESS_LOGO_DONE: f64 = 70.0;
/// Grace period after the logo before the bar is told to finish.
pub const FONT_SETTLE_MS: f64 = 300.0;

/// Collaborators the page needs, built once by the host.
pub struct AppContext {
    pub config: SiteConfig,
    pub assets: Arc<dyn AssetSource>,
    pub markdown: Box<dyn MarkdownRenderer>,
    pub scheduler: Box<dyn TimelineScheduler>,
}

/// Handles to the page elements that were found. A missing handle disables its component.
#[derive(Clone, Debug, Default)]
pub struct PageElements {
    pub preloader: Option<ElementHandle>,
    pub hero_canvas: Option<ElementHandle>,
    pub cursor: Option<ElementHandle>,
    pub nav: Option<ElementHandle>,
    pub tool_page: Option<ElementHandle>,
    pub lightbox: Option<ElementHandle>,
    /// Parallax elements with their raw `data-speed` attribute.
    pub parallax: Vec<(ElementHandle, String)>,
}

impl PageElements {
    /// Every element present, with the page's usual ids and no parallax layers.
    pub fn standard() -> Self {
        Self {
            preloader: Some(ElementHandle::new("preloader")),
            hero_canvas: Some(ElementHandle::new("heroCanvas")),
            cursor: Some(ElementHandle::new("cursor")),
            nav: Some(ElementHandle::new("nav")),
            tool_page: Some(ElementHandle::new("toolPage")),
            lightbox: Some(ElementHandle::new("lightbox")),
            parallax: Vec::new(),
        }
    }
}

/// State produced by one animation frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub preloader_event: Option<PreloaderEvent>,
    /// Hero progress drawn this frame.
    pub hero_progress: Option<f64>,
    pub cursor: Option<CursorFrame>,
    pub nav: Option<NavState>,
}

pub struct App {
    config: SiteConfig,
    assets: Arc<dyn AssetSource>,
    scheduler: Box<dyn TimelineScheduler>,
    metrics: ViewportMetrics,
    hero_top: f64,
    scroll_lock: ScrollLock,
    preloader: Option<Preloader>,
    engraving: Option<EngravingRenderer>,
    cursor: Option<Cursor>,
    nav: Option<Navigation>,
    parallax: Vec<(ElementHandle, ParallaxLayer)>,
    modal: Option<ToolModal>,
    lightbox: Option<Lightbox>,
    catalog: ToolCatalog,
    previews: Vec<ToolPreview>,
    hero_timeline: Option<TimelineId>,
    finish_at: Option<f64>,
    started: bool,
}

impl App {
    pub fn new(ctx: AppContext, elements: PageElements, metrics: ViewportMetrics) -> Self {
        let AppContext {
            config,
            assets,
            markdown,
            scheduler,
        } = ctx;
        let catalog = ToolCatalog::new(
            Box::new(Arc::clone(&assets)),
            markdown,
            config.tool_keys.clone(),
        );
        let mut scroll_lock = ScrollLock::default();
        if elements.preloader.is_some() {
            scroll_lock.lock();
        }
        Self {
            engraving: elements
                .hero_canvas
                .as_ref()
                .map(|_| EngravingRenderer::new(config.engraving(), metrics)),
            preloader: elements.preloader.as_ref().map(|_| Preloader::new()),
            cursor: elements
                .cursor
                .as_ref()
                .map(|_| Cursor::new(metrics.width(), metrics.height())),
            nav: elements
                .nav
                .as_ref()
                .map(|_| Navigation::new(config.scroll_length)),
            parallax: elements
                .parallax
                .into_iter()
                .map(|(handle, speed)| (handle, ParallaxLayer::from_attr(&speed)))
                .collect(),
            modal: elements.tool_page.as_ref().map(|_| ToolModal::new()),
            lightbox: elements.lightbox.as_ref().map(|_| Lightbox::new()),
            config,
            assets,
            scheduler,
            metrics,
            hero_top: 0.0,
            scroll_lock,
            catalog,
            previews: Vec::new(),
            hero_timeline: None,
            finish_at: None,
            started: false,
        }
    }

    /// Replace the clock used for tool document cache-busters.
    pub fn with_catalog_clock(mut self, clock: fn() -> u64) -> Self {
        self.catalog = self.catalog.with_clock(clock);
        self
    }

    /// Document offset of the hero section; the scroll binding starts here.
    pub fn set_hero_top(&mut self, top: f64) {
        self.hero_top = top;
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn preloader(&self) -> Option<&Preloader> {
        self.preloader.as_ref()
    }

    pub fn engraving(&self) -> Option<&EngravingRenderer> {
        self.engraving.as_ref()
    }

    pub fn modal(&self) -> Option<&ToolModal> {
        self.modal.as_ref()
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn previews(&self) -> &[ToolPreview] {
        &self.previews
    }

    /// Load the logo and schedule the preloader finish. A failed logo selects the emblem.
    pub fn load_assets(&mut self, now_ms: f64) {
        if let Some(p) = &mut self.preloader {
            p.set_progress(PROGRESS_LOGO_STARTED);
        }
        if let Some(engraving) = &mut self.engraving {
            let ticket = engraving.begin_logo_load();
            let logo = fetch_logo(self.assets.as_ref(), &self.config.logo_path);
            engraving.complete_logo_load(ticket, logo);
        }
        if let Some(p) = &mut self.preloader {
            p.set_progress(PROGRESS_LOGO_DONE);
        }
        self.finish_at = Some(now_ms + FONT_SETTLE_MS);
    }

    /// Advance one animation frame.
    ///
    /// `now_ms` is the frame clock, `scroll_y` the page scroll offset and `dt` the seconds
    /// since the previous frame.
    pub fn frame(&mut self, now_ms: f64, scroll_y: f64, dt: f64) -> FrameReport {
        let mut report = FrameReport::default();

        if let Some(at) = self.finish_at
            && now_ms >= at
        {
            self.finish_at = None;
            if let Some(p) = &mut self.preloader {
                p.set_progress(100.0);
            }
        }

        if self.preloader.is_some() {
            report.preloader_event = self.preloader.as_mut().and_then(|p| p.update(now_ms));
            match report.preloader_event {
                Some(PreloaderEvent::Hidden) => self.scroll_lock.unlock(),
                Some(PreloaderEvent::Done) => self.start(),
                _ => {}
            }
        } else if !self.started && self.finish_at.is_none() {
            self.start();
        }

        if self.started {
            let updates = self.scheduler.poll(scroll_y, dt);
            if let Some(id) = self.hero_timeline
                && let Some(update) = updates.iter().find(|u| u.id == id)
                && let Some(engraving) = &mut self.engraving
            {
                engraving.draw(update.progress);
                report.hero_progress = Some(update.progress);
            }
        }

        report.cursor = self.cursor.as_mut().map(Cursor::update);
        let vh = self.metrics.height();
        report.nav = self.nav.as_mut().map(|nav| nav.update(scroll_y, vh));
        report
    }

    fn start(&mut self) {
        self.started = true;
        if let Some(engraving) = &mut self.engraving {
            let binding =
                ScrollBinding::hero(self.hero_top, self.metrics.height(), self.config.scroll_length);
            self.hero_timeline = Some(self.scheduler.create_scroll_bound_timeline(binding));
            engraving.draw(0.0);
        }
        self.previews = self.catalog.previews();
        tracing::debug!(previews = self.previews.len(), "page started");
    }

    /// Route a click. The lightbox sees it first, then the tool page.
    pub fn handle_click(&mut self, target: &ClickTarget) -> bool {
        if let Some(lightbox) = &mut self.lightbox
            && lightbox.handle_click(target, &mut self.scroll_lock)
        {
            return true;
        }
        match &mut self.modal {
            Some(modal) => modal.handle_click(target, &mut self.catalog, &mut self.scroll_lock),
            None => false,
        }
    }

    /// Escape closes both overlays.
    pub fn handle_key(&mut self, key: &Key) {
        if let Some(lightbox) = &mut self.lightbox {
            lightbox.handle_key(key, &mut self.scroll_lock);
        }
        if let Some(modal) = &mut self.modal {
            modal.handle_key(key, &mut self.scroll_lock);
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(cursor) = &mut self.cursor {
            cursor.pointer_move(x, y);
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(cursor) = &mut self.cursor {
            cursor.pointer_leave();
        }
    }

    pub fn set_hover(&mut self, hover: bool) {
        if let Some(cursor) = &mut self.cursor {
            cursor.set_hover(hover);
        }
    }

    /// Parallax translations for every layer whose box the host can measure.
    ///
    /// `measure` returns the `(top, height)` of a layer's parent in viewport coordinates.
    pub fn parallax_offsets(
        &self,
        mut measure: impl FnMut(&ElementHandle) -> Option<(f64, f64)>,
    ) -> Vec<(ElementHandle, f64)> {
        let vh = self.metrics.height();
        self.parallax
            .iter()
            .filter_map(|(handle, layer)| {
                let (top, height) = measure(handle)?;
                Some((handle.clone(), layer.offset(top, height, vh)))
            })
            .collect()
    }

    pub fn resize(&mut self, metrics: ViewportMetrics) {
        self.metrics = metrics;
        if let Some(engraving) = &mut self.engraving {
            engraving.resize(metrics);
        }
    }
}
