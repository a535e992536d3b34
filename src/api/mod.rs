pub mod client;
pub mod error;
pub mod traits;

pub use client::{decode_response, HttpPropertyApi};
pub use error::{ApiError, Endpoint};
pub use traits::PropertyApi;
