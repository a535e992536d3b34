//! Markup for the home page: suggestion panel, result cards, pagination.

use crate::models::{LocationSuggestion, PropertySummary};
use crate::render::escape_html;

pub const SEARCH_INSTRUCTION: &str = "Type a location name first.";
pub const LOADING: &str = "Loading...";

pub fn suggestions(items: &[LocationSuggestion]) -> String {
    items
        .iter()
        .map(|loc| {
            let name = escape_html(&loc.name);
            format!(r#"<div class="suggestion" data-name="{name}">{name}</div>"#)
        })
        .collect()
}

/// Status line shown above a successful page of results (plain text)
pub fn result_summary(count: usize, page: u32, location: &str) -> String {
    format!("Showing {count} results (page {page}) for \"{location}\"")
}

pub fn property_cards(items: &[PropertySummary]) -> String {
    items.iter().map(property_card).collect()
}

fn property_card(p: &PropertySummary) -> String {
    let img = match p.primary_image_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => format!(
            r#"<img class="card-img" src="{}" alt="Primary image">"#,
            escape_html(url)
        ),
        None => r#"<div class="card-img"></div>"#.to_string(),
    };

    format!(
        r#"
      <a class="card" href="{href}">
        {img}
        <div class="card-body">
          <p class="card-title">{title}</p>
          <p class="card-sub">{address}, {country}</p>
          <p class="card-sub">Location: {location}</p>
        </div>
      </a>
    "#,
        href = escape_html(&p.detail_path()),
        title = escape_html(&p.title),
        address = escape_html(&p.address),
        country = escape_html(&p.country),
        location = escape_html(&p.location_name),
    )
}

/// Previous/Next availability as reported by the backend for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationControls {
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationControls {
    pub fn markup(&self) -> String {
        format!(
            r#"<button class="page-btn" data-page="previous"{}>Previous</button><button class="page-btn" data-page="next"{}>Next</button>"#,
            disabled_attr(!self.has_previous),
            disabled_attr(!self.has_next),
        )
    }
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}
