pub mod detail;
pub mod escape;
pub mod search;

pub use escape::escape_html;
