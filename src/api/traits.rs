use crate::api::ApiError;
use crate::models::{LocationSuggestion, PropertyDetail, PropertyPage};
use async_trait::async_trait;

/// Read-only view of the listings backend.
///
/// Page controllers only talk to this trait, so they can run against the
/// real HTTP API or an in-memory stand-in.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// `GET /api/locations/autocomplete/?q=<query>`
    async fn autocomplete(&self, query: &str) -> Result<Vec<LocationSuggestion>, ApiError>;

    /// `GET /api/properties/?location=<name>&page=<page>`
    async fn list_properties(&self, location: &str, page: u32)
        -> Result<PropertyPage, ApiError>;

    /// `GET /api/properties/<id>/`
    async fn property_detail(&self, id: i64) -> Result<PropertyDetail, ApiError>;
}
