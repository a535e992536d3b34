//! In-memory backend used by controller tests.

use crate::api::{ApiError, Endpoint, PropertyApi};
use crate::models::{LocationSuggestion, PropertyDetail, PropertyPage, PropertySummary};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Autocomplete(String),
    List(String, u32),
    Detail(i64),
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    suggestions: Mutex<HashMap<String, Result<Vec<LocationSuggestion>, ApiError>>>,
    pages: Mutex<HashMap<(String, u32), (Duration, Result<PropertyPage, ApiError>)>>,
    details: Mutex<HashMap<i64, (Duration, Result<PropertyDetail, ApiError>)>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn with_suggestions(self, query: &str, names: &[&str]) -> Self {
        let items = names.iter().map(|n| LocationSuggestion::named(*n)).collect();
        self.suggestions.lock().unwrap().insert(query.to_string(), Ok(items));
        self
    }

    pub fn with_suggestion_error(self, query: &str, err: ApiError) -> Self {
        self.suggestions.lock().unwrap().insert(query.to_string(), Err(err));
        self
    }

    pub fn with_page(self, location: &str, page: u32, result: Result<PropertyPage, ApiError>) -> Self {
        self.with_slow_page(location, page, Duration::ZERO, result)
    }

    pub fn with_slow_page(
        self,
        location: &str,
        page: u32,
        delay: Duration,
        result: Result<PropertyPage, ApiError>,
    ) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((location.to_string(), page), (delay, result));
        self
    }

    pub fn with_detail(self, id: i64, result: Result<PropertyDetail, ApiError>) -> Self {
        self.with_slow_detail(id, Duration::ZERO, result)
    }

    pub fn with_slow_detail(
        self,
        id: i64,
        delay: Duration,
        result: Result<PropertyDetail, ApiError>,
    ) -> Self {
        self.details.lock().unwrap().insert(id, (delay, result));
        self
    }
}

#[async_trait]
impl PropertyApi for FakeApi {
    async fn autocomplete(&self, query: &str) -> Result<Vec<LocationSuggestion>, ApiError> {
        self.calls.lock().unwrap().push(Call::Autocomplete(query.to_string()));
        let canned = self.suggestions.lock().unwrap().get(query).cloned();
        canned.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_properties(&self, location: &str, page: u32) -> Result<PropertyPage, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::List(location.to_string(), page));
        let canned = self
            .pages
            .lock()
            .unwrap()
            .get(&(location.to_string(), page))
            .cloned();
        match canned {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(not_found(Endpoint::PropertyList)),
        }
    }

    async fn property_detail(&self, id: i64) -> Result<PropertyDetail, ApiError> {
        self.calls.lock().unwrap().push(Call::Detail(id));
        let canned = self.details.lock().unwrap().get(&id).cloned();
        match canned {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(not_found(Endpoint::PropertyDetail)),
        }
    }
}

pub fn not_found(endpoint: Endpoint) -> ApiError {
    ApiError::Status {
        endpoint,
        status: 404,
        detail: Some("Not found".to_string()),
    }
}

pub fn summary(title: &str, location: &str) -> PropertySummary {
    let slug = title.to_lowercase().replace(' ', "-");
    PropertySummary {
        id: None,
        external_id: None,
        title: title.to_string(),
        address: format!("{title} Road"),
        country: "Bangladesh".to_string(),
        location_name: location.to_string(),
        location_slug: location.to_lowercase(),
        slug,
        primary_image_url: None,
    }
}

pub fn page_of(items: Vec<PropertySummary>, next: bool, previous: bool) -> PropertyPage {
    PropertyPage {
        results: items,
        next: next.then(|| "http://api/properties/?page=next".to_string()),
        previous: previous.then(|| "http://api/properties/?page=prev".to_string()),
    }
}

/// Let spawned tasks run to their next await point.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
