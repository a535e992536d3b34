pub mod controller;
pub mod debounce;
pub mod page;
pub mod sequence;
pub mod session;

pub use controller::{PageDirection, SearchController};
pub use debounce::Debouncer;
pub use page::SearchPage;
pub use sequence::{RequestSequence, Ticket};
pub use session::SearchSession;
