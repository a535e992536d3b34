use crate::api::PropertyApi;
use crate::detail::gallery::Gallery;
use crate::dom::{EventTarget, Region};
use crate::models::PropertyDetail;
use crate::render::detail as markup;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

pub const DETAIL_ID: &str = "detail";

/// Detail page controller: one property record and its gallery
pub struct DetailController {
    api: Arc<dyn PropertyApi>,
    property_id: i64,
    state: Mutex<DetailState>,
}

#[derive(Debug, Clone)]
struct DetailState {
    detail: Region,
    property: Option<PropertyDetail>,
    gallery: Gallery,
}

impl DetailController {
    pub fn new(api: Arc<dyn PropertyApi>, property_id: i64) -> Self {
        Self {
            api,
            property_id,
            state: Mutex::new(DetailState {
                detail: Region::new(DETAIL_ID),
                property: None,
                gallery: Gallery::new(),
            }),
        }
    }

    pub fn property_id(&self) -> i64 {
        self.property_id
    }

    /// Page-load entry point. Any failure replaces the whole detail view.
    pub async fn init(&self) {
        self.lock().detail.set_html(markup::loading());

        info!("Loading property {}", self.property_id);
        let result = self.api.property_detail(self.property_id).await;

        let mut state = self.lock();
        match result {
            Ok(property) => {
                state.gallery.render(&property.images);
                state.property = Some(property);
                state.redraw();
            }
            Err(e) => {
                warn!("Property {} failed to load: {:?}", self.property_id, e);
                state.property = None;
                state.gallery = Gallery::new();
                state.detail.set_html(markup::failure(&e.to_string()));
            }
        }
    }

    /// The one click listener bound to the detail container. Thumbnail
    /// clicks swap the main image; everything else is ignored.
    pub fn on_click(&self, target: &EventTarget) -> bool {
        let mut state = self.lock();
        if state.property.is_none() || !state.gallery.handle_click(target) {
            return false;
        }
        state.redraw();
        true
    }

    pub fn detail(&self) -> Region {
        self.lock().detail.clone()
    }

    pub fn gallery(&self) -> Gallery {
        self.lock().gallery.clone()
    }

    pub fn property(&self) -> Option<PropertyDetail> {
        self.lock().property.clone()
    }

    fn lock(&self) -> MutexGuard<'_, DetailState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DetailState {
    fn redraw(&mut self) {
        if let Some(property) = &self.property {
            let html = markup::property(property, &self.gallery.markup());
            self.detail.set_html(html);
        }
    }
}
