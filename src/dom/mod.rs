//! Minimal page model the controllers render into.
//!
//! A [`Region`] stands in for one container element whose inner markup is
//! replaced wholesale. An [`EventTarget`] describes the element a click landed
//! on together with its ancestors, which is all a delegated listener needs.

use crate::render::escape_html;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
}

/// Container element addressed by id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    id: String,
    html: String,
    hidden: bool,
}

impl Region {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: String::new(),
            hidden: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    /// Equivalent of assigning `textContent`: the text is escaped first.
    pub fn set_text(&mut self, text: &str) {
        self.html = escape_html(text);
    }

    pub fn clear(&mut self) {
        self.html.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The container itself, for use as an event-target ancestor
    pub fn element(&self) -> Element {
        Element::new("div").with_id(&self.id)
    }
}

/// Snapshot of one element's tag, id, classes and attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn from_ref(node: ElementRef<'_>) -> Self {
        let value = node.value();
        Self {
            tag: value.name().to_string(),
            id: value.id().map(str::to_string),
            classes: value.classes().map(str::to_string).collect(),
            attributes: value
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Element a click landed on, plus its ancestors nearest-first
#[derive(Debug, Clone, PartialEq)]
pub struct EventTarget {
    pub element: Element,
    pub ancestors: Vec<Element>,
}

impl EventTarget {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            ancestors: Vec::new(),
        }
    }

    /// Find the first element matching `selector` in rendered markup and
    /// describe it as a click target.
    pub fn locate(markup: &str, selector: &str) -> Result<Option<Self>, DomError> {
        let selector =
            Selector::parse(selector).map_err(|_| DomError::InvalidSelector(selector.to_string()))?;
        let fragment = Html::parse_fragment(markup);

        let Some(node) = fragment.select(&selector).next() else {
            return Ok(None);
        };

        let ancestors = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .map(Element::from_ref)
            // the fragment parser wraps everything in a synthetic <html>
            .filter(|el| el.tag != "html")
            .collect();

        Ok(Some(Self {
            element: Element::from_ref(node),
            ancestors,
        }))
    }

    /// Append an outer ancestor, e.g. the region the markup was rendered into
    pub fn inside(mut self, container: Element) -> Self {
        self.ancestors.push(container);
        self
    }

    /// Like `Element.closest`: the target itself or its nearest ancestor
    /// carrying `class`.
    pub fn closest(&self, class: &str) -> Option<&Element> {
        std::iter::once(&self.element)
            .chain(self.ancestors.iter())
            .find(|el| el.has_class(class))
    }

    /// Whether the target is the element with `id` or lies inside it
    pub fn is_within(&self, id: &str) -> bool {
        std::iter::once(&self.element)
            .chain(self.ancestors.iter())
            .any(|el| el.id.as_deref() == Some(id))
    }
}
