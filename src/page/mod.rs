//! Page behavior as plain state machines.
//!
//! Nothing here touches a DOM. Hosts translate events into [`ClickTarget`]s and [`Key`]s,
//! call the components, and apply the resulting state to their own elements.

pub mod cursor;
pub mod lightbox;
pub mod modal;
pub mod nav;
pub mod pointer;
pub mod preloader;
pub mod timeline;

use crate::content::sections::SectionImage;

/// Opaque handle to a host page element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Whether the page body may scroll. Last writer wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollLock {
    locked: bool,
}

impl ScrollLock {
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// What a click landed on, resolved by the host from the event target and its ancestors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// Key of the enclosing tool card.
    pub tool_card: Option<String>,
    /// Inside the tool page's close control.
    pub close_control: bool,
    /// An enclosing gallery image.
    pub gallery_image: Option<SectionImage>,
    /// Exactly the enlarged lightbox image.
    pub lightbox_image: bool,
    /// Anywhere inside the lightbox overlay.
    pub inside_lightbox: bool,
}

impl ClickTarget {
    pub fn tool_card(key: impl Into<String>) -> Self {
        Self {
            tool_card: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn close_control() -> Self {
        Self {
            close_control: true,
            ..Self::default()
        }
    }

    pub fn gallery_image(image: SectionImage) -> Self {
        Self {
            gallery_image: Some(image),
            ..Self::default()
        }
    }

    pub fn lightbox_image() -> Self {
        Self {
            lightbox_image: true,
            inside_lightbox: true,
            ..Self::default()
        }
    }

    pub fn lightbox_backdrop() -> Self {
        Self {
            inside_lightbox: true,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}
