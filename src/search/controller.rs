use crate::api::PropertyApi;
use crate::config::AppConfig;
use crate::dom::EventTarget;
use crate::models::LocationSuggestion;
use crate::render::search::{self as markup, PaginationControls};
use crate::search::debounce::Debouncer;
use crate::search::page::{SearchPage, INPUT_ID, SUGGESTIONS_ID};
use crate::search::sequence::{RequestSequence, Ticket};
use crate::search::session::SearchSession;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Which pagination button was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// Home page controller: autocomplete, location selection, paged results.
///
/// Cloning is cheap and every clone drives the same page. Handlers must run
/// inside a tokio runtime because autocomplete fetches are spawned.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn PropertyApi>,
    min_query_len: usize,
    debouncer: Debouncer,
    suggestion_requests: RequestSequence,
    search_requests: RequestSequence,
    suggestions_in_flight: AtomicUsize,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    session: SearchSession,
    page: SearchPage,
}

impl SearchController {
    pub fn new(api: Arc<dyn PropertyApi>, config: &AppConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                min_query_len: config.min_query_len,
                debouncer: Debouncer::new(config.debounce),
                suggestion_requests: RequestSequence::default(),
                search_requests: RequestSequence::default(),
                suggestions_in_flight: AtomicUsize::new(0),
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub fn session(&self) -> SearchSession {
        self.lock().session.clone()
    }

    /// Snapshot of everything currently rendered on the page
    pub fn page(&self) -> SearchPage {
        self.lock().page.clone()
    }

    /// Input-change handler for the location field
    pub fn on_input(&self, value: &str) {
        let query = value.trim().to_string();
        {
            let mut state = self.lock();
            state.page.input_value = value.to_string();
            state.session.clear_selection();
        }

        if query.chars().count() < self.inner.min_query_len {
            self.inner.debouncer.cancel();
            self.inner.suggestion_requests.invalidate();
            self.show_suggestions(&[]);
            return;
        }

        let this = self.clone();
        self.inner.debouncer.schedule(move || {
            // ticket is taken when the timer fires, so a later invalidate wins
            let ticket = this.inner.suggestion_requests.issue();
            this.inner.suggestions_in_flight.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                this.refresh_suggestions(query, ticket).await;
                this.inner.suggestions_in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        });
    }

    /// No suggestion fetch is waiting on the timer or on the network
    pub fn is_idle(&self) -> bool {
        !self.inner.debouncer.is_pending()
            && self.inner.suggestions_in_flight.load(Ordering::SeqCst) == 0
    }

    async fn refresh_suggestions(&self, query: String, ticket: Ticket) {
        debug!("Fetching suggestions for {:?}", query);

        let items = match self.inner.api.autocomplete(&query).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Autocomplete failed, showing no suggestions: {:?}", e);
                Vec::new()
            }
        };

        if !self.inner.suggestion_requests.is_current(ticket) {
            debug!("Discarding stale suggestions for {:?}", query);
            return;
        }
        self.show_suggestions(&items);
    }

    fn show_suggestions(&self, items: &[LocationSuggestion]) {
        let mut state = self.lock();
        let panel = &mut state.page;
        if items.is_empty() {
            panel.suggestions.hide();
            panel.suggestions.clear();
        } else {
            panel.suggestions.set_html(markup::suggestions(items));
            panel.suggestions.show();
        }
        panel.visible_suggestions = items.to_vec();
    }

    fn close_suggestions(&self) {
        self.inner.debouncer.cancel();
        self.inner.suggestion_requests.invalidate();
        self.show_suggestions(&[]);
    }

    /// Enter in the location field: take the first suggestion if one is
    /// showing, otherwise the typed text, then load page 1.
    pub async fn on_enter(&self) {
        {
            let mut state = self.lock();
            let first = state.page.visible_suggestions.first().map(|s| s.name.clone());
            match first {
                Some(name) => {
                    state.page.input_value = name.clone();
                    state.session.select(name);
                }
                None => {
                    let typed = state.page.input_value.trim().to_string();
                    state.session.select(typed);
                }
            }
        }
        self.close_suggestions();
        self.load_page(1).await;
    }

    /// Delegated click handler on the suggestion panel
    pub async fn on_suggestions_click(&self, target: &EventTarget) {
        let Some(name) = target
            .closest("suggestion")
            .and_then(|el| el.attr("data-name"))
            .map(str::to_string)
        else {
            return;
        };
        self.select_location(&name).await;
    }

    /// Pick a location directly, as a suggestion click does
    pub async fn select_location(&self, name: &str) {
        {
            let mut state = self.lock();
            state.page.input_value = name.to_string();
            state.session.select(name);
        }
        self.close_suggestions();
        self.load_page(1).await;
    }

    /// Document-level click: anything outside the input and the panel
    /// closes the panel. Selection is left alone.
    pub fn on_document_click(&self, target: &EventTarget) {
        if target.is_within(SUGGESTIONS_ID) || target.element.id.as_deref() == Some(INPUT_ID) {
            return;
        }
        self.show_suggestions(&[]);
    }

    /// Search button: the trimmed input becomes the location as-is
    pub async fn on_search_click(&self) {
        {
            let mut state = self.lock();
            let query = state.page.input_value.trim().to_string();
            if query.is_empty() {
                state.page.meta.set_text(markup::SEARCH_INSTRUCTION);
                return;
            }
            state.session.select(query);
        }
        self.load_page(1).await;
    }

    /// Previous/Next button; disabled buttons do nothing
    pub async fn on_paginate(&self, direction: PageDirection) {
        let target = {
            let state = self.lock();
            let Some(controls) = state.page.controls else {
                return;
            };
            let current = state.session.current_page();
            match direction {
                PageDirection::Previous if controls.has_previous => current.saturating_sub(1),
                PageDirection::Next if controls.has_next => current.saturating_add(1),
                _ => return,
            }
        };
        self.load_page(target).await;
    }

    /// Fetch and render one page of results for the selected location.
    /// Does nothing until a location has been selected.
    pub async fn load_page(&self, page: u32) {
        let (location, page, ticket) = {
            let mut state = self.lock();
            if !state.session.has_selection() {
                return;
            }
            state.session.set_page(page);
            state.page.meta.set_text(markup::LOADING);
            state.page.clear_results();
            // issued under the lock so ticket order matches session order
            let ticket = self.inner.search_requests.issue();
            (
                state.session.selected_location().to_string(),
                state.session.current_page(),
                ticket,
            )
        };

        info!("Loading page {} for {:?}", page, location);
        let result = self.inner.api.list_properties(&location, page).await;

        if !self.inner.search_requests.is_current(ticket) {
            debug!("Discarding stale results for {:?} page {}", location, page);
            return;
        }

        let mut state = self.lock();
        let view = &mut state.page;
        match result {
            Ok(data) => {
                let controls = PaginationControls {
                    has_previous: data.has_previous(),
                    has_next: data.has_next(),
                };
                view.meta
                    .set_text(&markup::result_summary(data.results.len(), page, &location));
                view.results.set_html(markup::property_cards(&data.results));
                view.pagination.set_html(controls.markup());
                view.controls = Some(controls);
            }
            Err(e) => {
                warn!("Search for {:?} page {} failed: {:?}", location, page, e);
                view.meta.set_text(&e.to_string());
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Endpoint};
    use crate::dom::{Element, EventTarget};
    use crate::testing::{page_of, settle, summary, Call, FakeApi};
    use scraper::{Html, Selector};
    use std::time::Duration;

    fn controller(api: FakeApi) -> (SearchController, Arc<FakeApi>) {
        let api = Arc::new(api);
        let controller = SearchController::new(api.clone(), &AppConfig::default());
        (controller, api)
    }

    fn count(markup: &str, selector: &str) -> usize {
        let fragment = Html::parse_fragment(markup);
        let selector = Selector::parse(selector).unwrap();
        fragment.select(&selector).count()
    }

    #[tokio::test(start_paused = true)]
    async fn short_queries_never_reach_the_backend() {
        let (search, api) = controller(FakeApi::default());

        for q in ["", "d", "  dh  ", "ab"] {
            search.on_input(q);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;

        assert!(api.calls().is_empty());
        let page = search.page();
        assert!(page.suggestions.is_hidden());
        assert!(page.suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_sends_one_request_for_the_last_query() {
        let (search, api) = controller(FakeApi::default().with_suggestions("dhaka", &["Dhaka"]));

        search.on_input("dha");
        assert!(!search.is_idle());
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.on_input("dhak");
        tokio::time::sleep(Duration::from_millis(200)).await;
        search.on_input(" dhaka ");
        tokio::time::sleep(Duration::from_millis(200)).await;
        settle().await;
        assert!(api.calls().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        settle().await;

        assert_eq!(api.calls(), vec![Call::Autocomplete("dhaka".into())]);
        assert!(search.is_idle());
        let page = search.page();
        assert!(page.suggestions_open());
        assert_eq!(count(page.suggestions.html(), ".suggestion"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_hides_suggestions_from_an_earlier_burst() {
        let (search, api) = controller(FakeApi::default().with_suggestions("khul", &["Khulna"]));

        search.on_input("khul");
        tokio::time::sleep(Duration::from_millis(300)).await;
        settle().await;
        assert!(search.page().suggestions_open());

        search.on_input("kh");
        assert!(!search.page().suggestions_open());
        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn autocomplete_failure_shows_empty_panel() {
        let err = ApiError::transport(Endpoint::Autocomplete, "connection reset");
        let (search, api) = controller(FakeApi::default().with_suggestion_error("syl", err));

        search.on_input("syl");
        tokio::time::sleep(Duration::from_millis(300)).await;
        settle().await;

        assert_eq!(api.calls(), vec![Call::Autocomplete("syl".into())]);
        let page = search.page();
        assert!(page.suggestions.is_hidden());
        assert!(page.meta.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn enter_takes_first_visible_suggestion() {
        let api = FakeApi::default()
            .with_suggestions("dha", &["Dhaka", "Dhanmondi"])
            .with_page("Dhaka", 1, Ok(page_of(vec![summary("Lake View", "Dhaka")], false, false)));
        let (search, api) = controller(api);

        search.on_input("dha");
        tokio::time::sleep(Duration::from_millis(300)).await;
        settle().await;
        search.on_enter().await;

        let page = search.page();
        assert_eq!(page.input_value, "Dhaka");
        assert!(page.suggestions.is_hidden());
        assert_eq!(search.session().selected_location(), "Dhaka");
        assert_eq!(api.calls().last(), Some(&Call::List("Dhaka".into(), 1)));
        assert_eq!(page.meta.html(), "Showing 1 results (page 1) for &quot;Dhaka&quot;");
    }

    #[tokio::test]
    async fn enter_without_suggestions_uses_typed_text() {
        let api = FakeApi::default().with_page("Chattogram", 1, Ok(page_of(vec![], false, false)));
        let (search, api) = controller(api);

        search.on_input("  Chattogram ");
        search.on_enter().await;

        assert_eq!(search.session().selected_location(), "Chattogram");
        assert!(api.calls().contains(&Call::List("Chattogram".into(), 1)));
    }

    #[tokio::test(start_paused = true)]
    async fn clicking_a_suggestion_selects_its_name() {
        let name = "Cox's <Bazar>";
        let api = FakeApi::default()
            .with_suggestions("cox", &[name])
            .with_page(name, 1, Ok(page_of(vec![], false, false)));
        let (search, api) = controller(api);

        search.on_input("cox");
        tokio::time::sleep(Duration::from_millis(300)).await;
        settle().await;

        let page = search.page();
        let target = EventTarget::locate(page.suggestions.html(), ".suggestion")
            .unwrap()
            .expect("suggestion rendered")
            .inside(page.suggestions.element());
        search.on_suggestions_click(&target).await;

        assert_eq!(search.session().selected_location(), name);
        assert_eq!(search.page().input_value, name);
        assert_eq!(api.calls().last(), Some(&Call::List(name.into(), 1)));
    }

    #[tokio::test(start_paused = true)]
    async fn outside_click_closes_panel_but_keeps_selection() {
        let (search, _api) = controller(FakeApi::default().with_suggestions("ray", &["Rayer Bazar"]));

        search.on_input("ray");
        tokio::time::sleep(Duration::from_millis(300)).await;
        settle().await;

        search.on_document_click(&EventTarget::new(Element::new("input").with_id(INPUT_ID)));
        assert!(search.page().suggestions_open());

        let inside = EventTarget::new(Element::new("div").with_class("suggestion"))
            .inside(search.page().suggestions.element());
        search.on_document_click(&inside);
        assert!(search.page().suggestions_open());

        search.on_document_click(&EventTarget::new(Element::new("body")));
        assert!(!search.page().suggestions_open());
        assert_eq!(search.page().input_value, "ray");
    }

    #[tokio::test]
    async fn first_page_enables_only_next() {
        let items = vec![summary("Lake View", "Dhaka"), summary("Green Villa", "Dhaka")];
        let api = FakeApi::default()
            .with_page("Dhaka", 1, Ok(page_of(items, true, false)))
            .with_page("Dhaka", 2, Ok(page_of(vec![summary("Old Mill", "Dhaka")], false, true)));
        let (search, api) = controller(api);

        search.select_location("Dhaka").await;
        let page = search.page();
        assert_eq!(
            page.controls,
            Some(PaginationControls {
                has_previous: false,
                has_next: true
            })
        );
        assert_eq!(count(page.pagination.html(), "button[data-page=previous][disabled]"), 1);
        assert_eq!(count(page.pagination.html(), "button[data-page=next][disabled]"), 0);
        assert_eq!(count(page.results.html(), "a.card"), 2);
        assert_eq!(count(page.results.html(), r#"a[href="/properties/dhaka/lake-view/"]"#), 1);

        search.on_paginate(PageDirection::Previous).await;
        assert_eq!(api.calls().len(), 1);

        search.on_paginate(PageDirection::Next).await;
        assert_eq!(api.calls().last(), Some(&Call::List("Dhaka".into(), 2)));
        assert_eq!(search.session().current_page(), 2);
        assert_eq!(
            search.page().meta.html(),
            "Showing 1 results (page 2) for &quot;Dhaka&quot;"
        );

        search.on_paginate(PageDirection::Previous).await;
        assert_eq!(api.calls().last(), Some(&Call::List("Dhaka".into(), 1)));
        assert_eq!(api.calls().len(), 3);
        assert_eq!(search.session().current_page(), 1);
        assert_eq!(
            search.page().meta.html(),
            "Showing 2 results (page 1) for &quot;Dhaka&quot;"
        );
    }

    #[tokio::test]
    async fn next_on_last_representable_page_does_not_overflow() {
        let api = FakeApi::default()
            .with_page("Dhaka", u32::MAX, Ok(page_of(vec![summary("Lake View", "Dhaka")], true, true)));
        let (search, api) = controller(api);

        search.select_location("Dhaka").await;
        search.load_page(u32::MAX).await;
        search.on_paginate(PageDirection::Next).await;

        assert_eq!(search.session().current_page(), u32::MAX);
        assert_eq!(api.calls().last(), Some(&Call::List("Dhaka".into(), u32::MAX)));
    }

    #[tokio::test(start_paused = true)]
    async fn loading_clears_previous_results_and_shows_indicator() {
        let api = FakeApi::default()
            .with_page("Dhaka", 1, Ok(page_of(vec![summary("Lake View", "Dhaka")], true, false)))
            .with_slow_page(
                "Khulna",
                1,
                Duration::from_millis(500),
                Ok(page_of(vec![summary("River Side", "Khulna")], false, false)),
            );
        let (search, _api) = controller(api);

        search.select_location("Dhaka").await;
        assert!(!search.page().results.is_empty());

        let pending = {
            let search = search.clone();
            tokio::spawn(async move { search.select_location("Khulna").await })
        };
        settle().await;

        let page = search.page();
        assert_eq!(page.meta.html(), "Loading...");
        assert!(page.results.is_empty());
        assert!(page.pagination.is_empty());
        assert_eq!(page.controls, None);

        pending.await.unwrap();
        assert!(search.page().results.html().contains("River Side"));
    }

    #[tokio::test]
    async fn suggestions_invalidated_before_fetch_starts_stay_closed() {
        let (search, api) = controller(FakeApi::default().with_suggestions("khul", &["Khulna"]));

        let ticket = search.inner.suggestion_requests.issue();
        search.on_input("kh");
        search.refresh_suggestions("khul".into(), ticket).await;

        assert_eq!(api.calls(), vec![Call::Autocomplete("khul".into())]);
        assert!(!search.page().suggestions_open());
        assert!(search.page().suggestions.is_empty());
    }

    #[tokio::test]
    async fn backend_error_detail_replaces_status_line() {
        let (search, _api) = controller(FakeApi::default());

        search.select_location("Atlantis").await;

        let page = search.page();
        assert_eq!(page.meta.html(), "Not found");
        assert!(page.results.is_empty());
        assert!(page.pagination.is_empty());
    }

    #[tokio::test]
    async fn script_text_is_never_rendered_as_markup() {
        let mut evil = summary("<script>alert(1)</script>", "<script>x</script>");
        evil.address = "<script>steal()</script>".into();
        evil.primary_image_url = Some(r#"x.jpg" onerror="alert(1)"#.into());
        let api = FakeApi::default()
            .with_page("Dhaka", 1, Ok(page_of(vec![evil], false, false)))
            .with_page(
                "<script>",
                1,
                Err(ApiError::Status {
                    endpoint: Endpoint::PropertyList,
                    status: 400,
                    detail: Some("<script>alert('x')</script>".into()),
                }),
            );
        let (search, _api) = controller(api);

        search.select_location("Dhaka").await;
        let page = search.page();
        assert!(!page.results.html().contains("<script"));
        assert_eq!(count(page.results.html(), "script"), 0);
        assert_eq!(count(page.results.html(), "img[onerror]"), 0);

        search.select_location("<script>").await;
        let page = search.page();
        assert!(!page.meta.html().contains("<script"));
        assert_eq!(page.meta.html(), "&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;");
    }

    #[tokio::test]
    async fn loading_without_a_location_is_a_no_op() {
        let api = FakeApi::default().with_page("Dhaka", 1, Ok(page_of(vec![summary("Lake View", "Dhaka")], true, false)));
        let (search, api) = controller(api);

        search.load_page(1).await;
        assert!(api.calls().is_empty());

        search.select_location("Dhaka").await;
        let before = search.page();

        // typing clears the selection until something is chosen again
        search.on_input("Dh");
        search.load_page(3).await;

        assert_eq!(api.calls().len(), 1);
        let after = search.page();
        assert_eq!(after.results, before.results);
        assert_eq!(after.meta, before.meta);
    }

    #[tokio::test]
    async fn search_button_requires_text() {
        let (search, api) = controller(FakeApi::default());

        search.on_input("   ");
        search.on_search_click().await;

        assert!(api.calls().is_empty());
        assert_eq!(search.page().meta.html(), "Type a location name first.");
    }

    #[tokio::test]
    async fn search_button_uses_trimmed_input() {
        let api = FakeApi::default().with_page("Sylhet", 1, Ok(page_of(vec![], false, false)));
        let (search, api) = controller(api);

        search.on_input("  Sylhet  ");
        search.on_search_click().await;

        assert_eq!(api.calls(), vec![Call::List("Sylhet".into(), 1)]);
        assert_eq!(search.page().meta.html(), "Showing 0 results (page 1) for &quot;Sylhet&quot;");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_earlier_response_does_not_overwrite_newer_results() {
        let api = FakeApi::default()
            .with_slow_page(
                "Dhaka",
                1,
                Duration::from_millis(500),
                Ok(page_of(vec![summary("Lake View", "Dhaka")], false, false)),
            )
            .with_page("Khulna", 1, Ok(page_of(vec![summary("River Side", "Khulna")], false, false)));
        let (search, _api) = controller(api);

        let slow = {
            let search = search.clone();
            tokio::spawn(async move { search.select_location("Dhaka").await })
        };
        settle().await;
        search.select_location("Khulna").await;
        slow.await.unwrap();

        let page = search.page();
        assert_eq!(page.meta.html(), "Showing 1 results (page 1) for &quot;Khulna&quot;");
        assert!(page.results.html().contains("River Side"));
        assert!(!page.results.html().contains("Lake View"));
    }
}
