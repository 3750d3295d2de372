//! Share image URLs for goods records
//!
//! The storefront shows a shareable poster per goods record. Rendering
//! the poster happens elsewhere; this module only decides the URL that
//! gets stored on the goods row.

use std::sync::Arc;

/// Produces the share image URL for a goods record
pub trait ShareImage: Send + Sync + 'static {
    /// `None` means no share image is available.
    fn share_url(&self, goods_id: i32, pic_url: &str, name: &str) -> Option<String>;
}

/// Share images disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShareImage;

impl ShareImage for NoShareImage {
    fn share_url(&self, _goods_id: i32, _pic_url: &str, _name: &str) -> Option<String> {
        None
    }
}

/// Share images served from `{base_url}/goods/{id}.png`
#[derive(Debug, Clone)]
pub struct TemplateShareImage {
    base_url: String,
}

impl TemplateShareImage {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url }
    }
}

impl ShareImage for TemplateShareImage {
    fn share_url(&self, goods_id: i32, _pic_url: &str, _name: &str) -> Option<String> {
        if self.base_url.is_empty() {
            return None;
        }
        Some(format!("{}/goods/{}.png", self.base_url, goods_id))
    }
}

/// Pick the share image source from an optional base URL.
pub fn from_base_url(base_url: Option<&str>) -> Arc<dyn ShareImage> {
    match base_url.filter(|b| !b.is_empty()) {
        Some(base) => Arc::new(TemplateShareImage::new(base)),
        None => Arc::new(NoShareImage),
    }
}
