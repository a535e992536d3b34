use crate::dom::Region;
use crate::models::LocationSuggestion;
use crate::render::search::PaginationControls;

pub const INPUT_ID: &str = "locationInput";
pub const SUGGESTIONS_ID: &str = "suggestions";
pub const META_ID: &str = "searchMeta";
pub const RESULTS_ID: &str = "results";
pub const PAGINATION_ID: &str = "pagination";

/// Home page elements the search controller writes to
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub input_value: String,
    pub suggestions: Region,
    /// Items currently rendered in `suggestions`, in display order
    pub visible_suggestions: Vec<LocationSuggestion>,
    pub meta: Region,
    pub results: Region,
    pub pagination: Region,
    pub controls: Option<PaginationControls>,
}

impl Default for SearchPage {
    fn default() -> Self {
        let mut suggestions = Region::new(SUGGESTIONS_ID);
        suggestions.hide();
        Self {
            input_value: String::new(),
            suggestions,
            visible_suggestions: Vec::new(),
            meta: Region::new(META_ID),
            results: Region::new(RESULTS_ID),
            pagination: Region::new(PAGINATION_ID),
            controls: None,
        }
    }
}

impl SearchPage {
    pub fn suggestions_open(&self) -> bool {
        !self.suggestions.is_hidden() && !self.visible_suggestions.is_empty()
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.pagination.clear();
        self.controls = None;
    }
}
