pub mod controller;
pub mod gallery;

pub use controller::DetailController;
pub use gallery::{Gallery, GalleryImage};
