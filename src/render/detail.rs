use crate::models::PropertyDetail;
use crate::render::escape_html;

pub const NO_DESCRIPTION: &str = "No description";

pub fn loading() -> String {
    "<p class='meta'>Loading...</p>".to_string()
}

pub fn failure(message: &str) -> String {
    format!(r#"<p class="meta">{}</p>"#, escape_html(message))
}

/// Whole detail card; `gallery` is already-rendered gallery markup.
pub fn property(p: &PropertyDetail, gallery: &str) -> String {
    let description = p
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION);

    format!(
        r#"
      <div class="card" style="padding:14px;">
        <h1 style="margin:0 0 8px;">{title}</h1>
        <p class="meta" style="margin:0 0 12px;">
          {address}, {country} • Location: {location}
        </p>
        <div class="gallery" id="gallery">{gallery}</div>
        <h3 style="margin:16px 0 6px;">Description</h3>
        <p style="margin:0; color: var(--muted);">{description}</p>
      </div>
    "#,
        title = escape_html(&p.title),
        address = escape_html(&p.address),
        country = escape_html(&p.country),
        location = escape_html(p.location_name()),
        description = escape_html(description),
    )
}
