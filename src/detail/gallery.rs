use crate::dom::EventTarget;
use crate::models::PropertyImage;
use crate::render::escape_html;

pub const NO_IMAGES: &str = "<p class='meta'>No images available.</p>";
pub const THUMB_CLASS: &str = "gallery-thumb";
pub const MAIN_CLASS: &str = "gallery-main";

/// Renderable image with a usable source
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

/// Main image plus thumbnail strip with exactly one active thumbnail.
///
/// The strip lists every renderable image in backend order, the active one
/// included. [`Gallery::handle_click`] is the single listener for the whole
/// gallery container; it identifies thumbnails by their `data-index`
/// attribute, so re-rendering never requires rebinding anything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gallery {
    images: Vec<GalleryImage>,
    active: usize,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the gallery's data. The first image flagged primary starts
    /// active, or the first image when none is flagged. Images without a
    /// source are dropped before either rule applies.
    pub fn render(&mut self, images: &[PropertyImage]) {
        let usable: Vec<(&PropertyImage, &str)> = images
            .iter()
            .filter_map(|img| img.source().map(|src| (img, src)))
            .collect();

        self.active = usable
            .iter()
            .position(|(img, _)| img.is_primary)
            .unwrap_or(0);
        self.images = usable
            .into_iter()
            .map(|(img, src)| GalleryImage {
                src: src.to_string(),
                alt: img.alt_text.clone().unwrap_or_default(),
            })
            .collect();
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn active_index(&self) -> Option<usize> {
        (!self.images.is_empty()).then_some(self.active)
    }

    pub fn active_image(&self) -> Option<&GalleryImage> {
        self.images.get(self.active)
    }

    /// Make thumbnail `index` the main image. Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Delegated click handler; returns whether the click selected a thumbnail
    pub fn handle_click(&mut self, target: &EventTarget) -> bool {
        let Some(index) = target
            .closest(THUMB_CLASS)
            .and_then(|thumb| thumb.attr("data-index"))
            .and_then(|raw| raw.parse::<usize>().ok())
        else {
            return false;
        };
        self.select(index)
    }

    pub fn markup(&self) -> String {
        let Some(main) = self.active_image() else {
            return NO_IMAGES.to_string();
        };

        let thumbs: String = self
            .images
            .iter()
            .enumerate()
            .map(|(i, img)| {
                let class = if i == self.active {
                    format!("card-img {THUMB_CLASS} active")
                } else {
                    format!("card-img {THUMB_CLASS}")
                };
                format!(
                    r#"<img class="{class}" data-index="{i}" style="height:120px;border-radius:12px;" src="{}" alt="{}">"#,
                    escape_html(&img.src),
                    escape_html(&img.alt),
                )
            })
            .collect();

        format!(
            r#"
      <div style="display:grid; gap:12px;">
        <img class="card-img {MAIN_CLASS}" style="height:340px;border-radius:12px;" src="{}" alt="{}">
        <div class="grid">{thumbs}</div>
      </div>
    "#,
            escape_html(&main.src),
            escape_html(&main.alt),
        )
    }
}
