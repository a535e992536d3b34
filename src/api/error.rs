use std::fmt;
use thiserror::Error;

/// Backend endpoint a request was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Autocomplete,
    PropertyList,
    PropertyDetail,
}

impl Endpoint {
    /// Message shown when the backend gives no usable `error.detail`
    pub fn fallback_message(self) -> &'static str {
        match self {
            Endpoint::Autocomplete => "Failed to fetch suggestions",
            Endpoint::PropertyList => "Failed to fetch properties",
            Endpoint::PropertyDetail => "Failed to fetch property details",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Autocomplete => "autocomplete",
            Endpoint::PropertyList => "property list",
            Endpoint::PropertyDetail => "property detail",
        };
        f.write_str(name)
    }
}

/// Failure of a backend call.
///
/// `Display` is the message a page shows to the user, so it never carries
/// transport internals; those stay in the variant fields for logging.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Failed to fetch")]
    Transport { endpoint: Endpoint, reason: String },

    #[error("{}", status_message(.endpoint, .detail))]
    Status {
        endpoint: Endpoint,
        status: u16,
        detail: Option<String>,
    },

    #[error("{}", .endpoint.fallback_message())]
    Malformed { endpoint: Endpoint, reason: String },
}

fn status_message<'a>(endpoint: &Endpoint, detail: &'a Option<String>) -> &'a str {
    detail.as_deref().unwrap_or(endpoint.fallback_message())
}

impl ApiError {
    pub fn transport(endpoint: Endpoint, err: impl fmt::Display) -> Self {
        ApiError::Transport {
            endpoint,
            reason: err.to_string(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Malformed { endpoint, .. } => *endpoint,
        }
    }
}
