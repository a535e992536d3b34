/// Page-lifetime search state: the chosen location and the page shown for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    selected_location: String,
    current_page: u32,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self {
            selected_location: String::new(),
            current_page: 1,
        }
    }
}

impl SearchSession {
    pub fn selected_location(&self) -> &str {
        &self.selected_location
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_location.is_empty()
    }

    pub fn select(&mut self, name: impl Into<String>) {
        self.selected_location = name.into();
    }

    pub fn clear_selection(&mut self) {
        self.selected_location.clear();
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Pages are 1-based; anything lower is clamped to 1.
    pub fn set_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }
}
