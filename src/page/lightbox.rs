use crate::content::sections::SectionImage;
use crate::page::{ClickTarget, Key, ScrollLock};

/// Enlarged view of a gallery image.
#[derive(Clone, Debug, Default)]
pub struct Lightbox {
    image: Option<SectionImage>,
    open: bool,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn image(&self) -> Option<&SectionImage> {
        self.image.as_ref()
    }

    pub fn open(&mut self, image: SectionImage, lock: &mut ScrollLock) {
        self.image = Some(image);
        self.open = true;
        lock.lock();
    }

    pub fn close(&mut self, lock: &mut ScrollLock) {
        if self.open {
            self.open = false;
            lock.unlock();
        }
    }

    /// Returns `true` when the click was consumed.
    pub fn handle_click(&mut self, target: &ClickTarget, lock: &mut ScrollLock) -> bool {
        if self.open {
            if target.inside_lightbox && !target.lightbox_image {
                self.close(lock);
                return true;
            }
            return target.inside_lightbox;
        }
        match &target.gallery_image {
            Some(image) => {
                self.open(image.clone(), lock);
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: &Key, lock: &mut ScrollLock) {
        if *key == Key::Escape {
            self.close(lock);
        }
    }
}
