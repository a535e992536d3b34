use serde::{Deserialize, Serialize};

/// Location suggestion returned by the autocomplete endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSuggestion {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl LocationSuggestion {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            slug: None,
        }
    }
}

/// Body of `GET /api/locations/autocomplete/`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub results: Vec<LocationSuggestion>,
}

/// One search result card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub external_id: Option<String>,
    pub title: String,
    pub address: String,
    pub country: String,
    pub location_name: String,
    pub location_slug: String,
    pub slug: String,
    #[serde(default)]
    pub primary_image_url: Option<String>,
}

impl PropertySummary {
    /// Canonical detail page path, shared with the server-side router
    pub fn detail_path(&self) -> String {
        format!("/properties/{}/{}/", self.location_slug, self.slug)
    }
}

/// Body of `GET /api/properties/`
///
/// `next` and `previous` are the backend's page links; only their presence
/// matters to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyPage {
    pub results: Vec<PropertySummary>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl PropertyPage {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Location embedded in a property detail record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyLocation {
    pub name: String,
}

/// Image attached to a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyImage {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

impl PropertyImage {
    /// Source URL, if the image has one worth rendering
    pub fn source(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Body of `GET /api/properties/<id>/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDetail {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub external_id: Option<String>,
    pub title: String,
    pub address: String,
    pub country: String,
    #[serde(default)]
    pub location: Option<PropertyLocation>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<PropertyImage>,
}

impl PropertyDetail {
    pub fn location_name(&self) -> &str {
        self.location.as_ref().map(|l| l.name.as_str()).unwrap_or("")
    }
}

/// Error envelope produced by the backend's exception handler
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub error: Option<ErrorPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorEnvelope {
    pub fn detail(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.detail.as_deref())
            .filter(|d| !d.is_empty())
    }
}
