#![forbid(unsafe_code)]
//! Scroll-driven engraving reveal for a portfolio page hero, plus the page behavior around it.
//!
//! The core is [`EngravingRenderer`]: given a progress value in `[0, 1]` it repaints a
//! premultiplied RGBA8 frame in which a tinted logo (or a procedural emblem when the logo is
//! unavailable) is revealed through opening scan-lines under a golden aurora and vignette.
//!
//! Around it sit the pieces the page needs: a progress smoother for the preloader and cursor,
//! tool documents parsed from front matter and markdown into section layouts, and small state
//! machines for the modal, lightbox, navigation and pointer effects. [`App`] wires them
//! together.

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod content;
pub mod foundation;
pub mod page;
pub mod render;

pub use animation::smooth::{SmoothedScalar, advance};
pub use app::{App, AppContext, FrameReport, PageElements};
pub use assets::decode::LogoImage;
pub use assets::source::{AssetSource, DirAssetSource, MemoryAssetSource};
pub use config::SiteConfig;
pub use content::markdown::{CommonMarkRenderer, MarkdownRenderer};
pub use content::tools::{ToolCatalog, ToolData};
pub use foundation::color::Color;
pub use foundation::core::ViewportMetrics;
pub use foundation::error::{EngraveError, EngraveResult};
pub use page::timeline::{LinearScrollScheduler, ScrollBinding, TimelineScheduler};
pub use render::engraving::{EngravingConfig, EngravingRenderer, LogoTicket};
pub use render::surface::Surface;
