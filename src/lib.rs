//! Page controllers for the property listings site: location search with
//! autocomplete and paging, and the property detail page with its gallery.

pub mod api;
pub mod config;
pub mod detail;
pub mod dom;
pub mod models;
pub mod render;
pub mod search;

#[cfg(test)]
mod testing;

pub use api::{ApiError, HttpPropertyApi, PropertyApi};
pub use config::AppConfig;
pub use detail::DetailController;
pub use search::SearchController;
