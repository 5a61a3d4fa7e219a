//! List view: debounced search with supersession.
//!
//! Every fired search bumps a generation number and cancels the request
//! it replaces. A completion is applied only while its generation is still
//! the current one, so a late answer for an old query can never overwrite
//! the results of a newer one, even if the backend ignores cancellation.

use std::sync::{Arc, Mutex};

use cinesearch_client::MovieApi;
use cinesearch_core::error::search_message;
use cinesearch_core::{Movie, Outcome, normalize_movies};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::debounce::Debouncer;
use crate::{ControllerConfig, MIN_QUERY_CHARS, lock};

/// Everything the list view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    /// Shortest query the controller sends; shorter ones never get a notice.
    #[serde(skip)]
    pub min_query_chars: usize,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            loading: false,
            error: None,
            min_query_chars: MIN_QUERY_CHARS,
        }
    }
}

impl SearchView {
    /// Message for a settled search that matched nothing.
    pub fn empty_notice(&self) -> Option<String> {
        let settled = !self.loading && self.error.is_none() && self.results.is_empty();
        if settled && self.query.trim().chars().count() >= self.min_query_chars {
            Some(format!(
                "No results for “{}”. Try another keyword.",
                self.query
            ))
        } else {
            None
        }
    }
}

/// Owns the debounce timer and the in-flight search for one list view.
///
/// Cheap to clone; clones drive the same view.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn MovieApi>,
    config: ControllerConfig,
    debouncer: Debouncer,
    view: watch::Sender<SearchView>,
    lifecycle: Mutex<Lifecycle>,
}

#[derive(Default)]
struct Lifecycle {
    generation: u64,
    in_flight: Option<CancellationToken>,
    closed: bool,
}

impl SearchController {
    pub fn new(api: Arc<dyn MovieApi>, config: ControllerConfig) -> Self {
        let (view, _) = watch::channel(SearchView {
            min_query_chars: config.min_query_chars,
            ..Default::default()
        });
        Self {
            inner: Arc::new(Inner {
                api,
                debouncer: Debouncer::new(config.debounce),
                config,
                view,
                lifecycle: Mutex::new(Lifecycle::default()),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.inner.view.subscribe()
    }

    /// Snapshot of the current view state.
    pub fn view(&self) -> SearchView {
        self.inner.view.borrow().clone()
    }

    /// Record a keystroke: the query field updates now, the search fires
    /// once input has been quiet for the debounce window.
    pub fn on_input(&self, text: impl Into<String>) {
        let text = text.into();
        if lock(&self.inner.lifecycle).closed {
            return;
        }
        self.inner.view.send_modify(|view| view.query.clone_from(&text));

        let controller = self.clone();
        self.inner.debouncer.schedule(async move {
            controller.search(&text).await;
        });
    }

    /// Fire a search for `text` right away, superseding any search in flight.
    pub async fn search(&self, text: &str) {
        let Some((generation, token)) = self.begin(text) else {
            return;
        };
        let outcome = self.inner.api.search(text, &token).await;
        self.finish(generation, text, outcome);
    }

    /// Stop the pending timer and cancel the in-flight search. Completions
    /// and input arriving afterwards are ignored.
    pub fn shutdown(&self) {
        self.inner.debouncer.cancel();
        let mut lifecycle = lock(&self.inner.lifecycle);
        lifecycle.closed = true;
        lifecycle.generation += 1;
        if let Some(token) = lifecycle.in_flight.take() {
            debug!(reason = "teardown", "canceling in-flight search");
            token.cancel();
        }
    }

    fn begin(&self, text: &str) -> Option<(u64, CancellationToken)> {
        let mut lifecycle = lock(&self.inner.lifecycle);
        if lifecycle.closed {
            return None;
        }
        if let Some(previous) = lifecycle.in_flight.take() {
            debug!(reason = "superseded", "canceling in-flight search");
            previous.cancel();
        }
        lifecycle.generation += 1;

        if text.trim().chars().count() < self.inner.config.min_query_chars {
            self.inner.view.send_modify(|view| {
                view.results.clear();
                view.error = None;
                view.loading = false;
            });
            return None;
        }

        let token = CancellationToken::new();
        lifecycle.in_flight = Some(token.clone());
        self.inner.view.send_modify(|view| {
            view.loading = true;
            view.error = None;
        });
        debug!(
            query = %text,
            generation = lifecycle.generation,
            backend = self.inner.api.name(),
            "search fired"
        );
        Some((lifecycle.generation, token))
    }

    fn finish(&self, generation: u64, query: &str, outcome: Outcome<Value>) {
        let mut lifecycle = lock(&self.inner.lifecycle);
        if outcome.is_canceled() {
            debug!(query, "search canceled");
            return;
        }
        if lifecycle.generation != generation {
            debug!(query, generation, "stale search result dropped");
            return;
        }
        lifecycle.in_flight = None;

        match outcome {
            Outcome::Ok(body) => {
                let results = normalize_movies(body.get("results").unwrap_or(&Value::Null));
                debug!(query, count = results.len(), "search results applied");
                self.inner.view.send_modify(|view| {
                    view.results = results;
                    view.loading = false;
                });
            }
            Outcome::Failed(err) => {
                warn!(query, error = %err, kind = %err.kind(), "search failed");
                let message = search_message(&err);
                self.inner.view.send_modify(|view| {
                    view.error = Some(message.to_string());
                    view.loading = false;
                });
            }
            Outcome::Canceled => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::{Instant, sleep};

    fn controller(api: &Arc<FakeApi>) -> SearchController {
        SearchController::new(api.clone(), ControllerConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_input_fires_one_search_for_last_text() {
        let api = FakeApi::new();
        let search = controller(&api);

        search.on_input("b");
        sleep(Duration::from_millis(40)).await;
        search.on_input("ba");
        sleep(Duration::from_millis(40)).await;
        search.on_input("bat");
        let last_input = Instant::now();
        assert_eq!(search.view().query, "bat");

        sleep(Duration::from_millis(340)).await;
        assert!(api.keys().is_empty());

        sleep(Duration::from_millis(20)).await;
        assert_eq!(api.keys(), vec!["bat"]);
        let fired_after = api.with_calls(|calls| calls[0].at - last_input);
        assert!(fired_after >= Duration::from_millis(350));
        assert!(fired_after < Duration::from_millis(360));

        sleep(Duration::from_millis(50)).await;
        let view = search.view();
        assert!(!view.loading);
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].title, "bat");
    }

    #[tokio::test(start_paused = true)]
    async fn newer_search_cancels_older_before_issuing() {
        let api = FakeApi::stubborn();
        api.respond(
            "cat",
            Duration::from_millis(1000),
            json!({ "results": [{ "id": 1, "title": "Cat People" }] }),
        );
        api.respond(
            "dog",
            Duration::from_millis(50),
            json!({ "results": [{ "id": 2, "title": "Dog Day Afternoon" }] }),
        );
        let search = controller(&api);

        let first = tokio::spawn({
            let search = search.clone();
            async move { search.search("cat").await }
        });
        sleep(Duration::from_millis(10)).await;
        search.search("dog").await;

        api.with_calls(|calls| {
            assert_eq!(calls.len(), 2);
            assert!(calls[0].token.is_cancelled());
            assert!(calls[1].earlier_cancelled);
            assert!(!calls[1].token.is_cancelled());
        });

        // The stubborn backend still answers "cat" later; it must be ignored.
        first.await.unwrap();
        let view = search.view();
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].title, "Dog Day Afternoon");
        assert!(!view.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn late_failure_of_superseded_search_is_ignored() {
        let api = FakeApi::stubborn();
        api.fail("cat", Duration::from_millis(500), 503);
        let search = controller(&api);

        let first = tokio::spawn({
            let search = search.clone();
            async move { search.search("cat").await }
        });
        sleep(Duration::from_millis(10)).await;
        search.search("dog").await;
        first.await.unwrap();

        let view = search.view();
        assert_eq!(view.error, None);
        assert_eq!(view.results[0].title, "dog");
    }

    #[tokio::test(start_paused = true)]
    async fn single_character_clears_without_request() {
        let api = FakeApi::new();
        api.fail("broken", Duration::from_millis(10), 500);
        let search = controller(&api);

        search.search("batman").await;
        assert_eq!(search.view().results.len(), 1);
        search.search("broken").await;
        assert!(search.view().error.is_some());

        search.on_input("a");
        sleep(Duration::from_millis(400)).await;

        assert_eq!(api.keys(), vec!["batman", "broken"]);
        let view = search.view();
        assert_eq!(view.query, "a");
        assert!(view.results.is_empty());
        assert_eq!(view.error, None);
        assert!(!view.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_padded_short_query_is_ignored() {
        let api = FakeApi::new();
        let search = controller(&api);

        search.search("  x   ").await;
        search.search("").await;
        assert!(api.keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_cancels_in_flight_search() {
        let api = FakeApi::new();
        api.respond("batman", Duration::from_millis(500), json!({ "results": [] }));
        let search = controller(&api);

        let pending = tokio::spawn({
            let search = search.clone();
            async move { search.search("batman").await }
        });
        sleep(Duration::from_millis(10)).await;
        assert!(search.view().loading);

        search.search("b").await;
        pending.await.unwrap();

        api.with_calls(|calls| assert!(calls[0].token.is_cancelled()));
        assert!(!search.view().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_backend_sets_error() {
        let api = FakeApi::new();
        api.fail("jaws", Duration::from_millis(10), 503);
        let search = controller(&api);

        search.search("jaws").await;

        let view = search.view();
        assert!(view.error.as_deref().unwrap().contains("unavailable"));
        assert!(!view.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_and_other_failures_map_to_messages() {
        let api = FakeApi::new();
        api.fail("alien", Duration::from_millis(10), 502);
        api.fail("heat", Duration::from_millis(10), 500);
        api.script(
            "ronin",
            Duration::from_millis(10),
            Outcome::Failed(cinesearch_core::FetchError::Timeout),
        );
        let search = controller(&api);

        search.search("alien").await;
        assert!(search.view().error.unwrap().contains("upstream"));
        search.search("heat").await;
        assert_eq!(search.view().error.unwrap(), "Could not connect to the server.");
        search.search("ronin").await;
        assert_eq!(search.view().error.unwrap(), "Could not connect to the server.");
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_previous_error() {
        let api = FakeApi::new();
        api.fail("jaws", Duration::from_millis(10), 503);
        let search = controller(&api);

        search.search("jaws").await;
        assert!(search.view().error.is_some());
        search.search("jurassic").await;
        let view = search.view();
        assert_eq!(view.error, None);
        assert_eq!(view.results.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_results_field_means_no_results() {
        let api = FakeApi::new();
        api.respond("nothing", Duration::from_millis(10), json!({}));
        api.respond(
            "partial",
            Duration::from_millis(10),
            json!({ "results": [{ "title": "no id" }, { "id": 7 }] }),
        );
        let search = controller(&api);

        search.search("nothing").await;
        let view = search.view();
        assert!(view.results.is_empty());
        assert_eq!(
            view.empty_notice().as_deref(),
            None,
            "query field was never typed"
        );

        search.search("partial").await;
        let results = search.view().results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Untitled");
    }

    #[tokio::test(start_paused = true)]
    async fn canceled_outcome_leaves_state_alone() {
        let api = FakeApi::new();
        api.script("spooky", Duration::from_millis(10), Outcome::Canceled);
        let search = controller(&api);

        search.search("spooky").await;
        let view = search.view();
        // Nothing but the search start touched the view.
        assert!(view.loading);
        assert_eq!(view.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_and_ignores_later_input() {
        let api = FakeApi::new();
        api.respond("heat", Duration::from_millis(500), json!({ "results": [] }));
        let search = controller(&api);

        let pending = tokio::spawn({
            let search = search.clone();
            async move { search.search("heat").await }
        });
        sleep(Duration::from_millis(10)).await;
        search.on_input("ronin");
        search.shutdown();
        pending.await.unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(api.keys(), vec!["heat"]);
        api.with_calls(|calls| assert!(calls[0].token.is_cancelled()));
        assert_eq!(search.view().query, "ronin");

        search.on_input("collateral");
        sleep(Duration::from_secs(1)).await;
        assert_eq!(search.view().query, "ronin");
        assert_eq!(api.keys(), vec!["heat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_loading_then_results() {
        let api = FakeApi::new();
        let search = controller(&api);
        let mut rx = search.subscribe();

        let pending = tokio::spawn({
            let search = search.clone();
            async move { search.search("heat").await }
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading);

        pending.await.unwrap();
        rx.changed().await.unwrap();
        let view = rx.borrow_and_update().clone();
        assert!(!view.loading);
        assert_eq!(view.results[0].title, "heat");
    }

    #[test]
    fn empty_notice_only_for_settled_real_queries() {
        let mut view = SearchView {
            query: "zzzz".into(),
            ..Default::default()
        };
        assert_eq!(
            view.empty_notice().as_deref(),
            Some("No results for “zzzz”. Try another keyword.")
        );

        view.loading = true;
        assert_eq!(view.empty_notice(), None);
        view.loading = false;

        view.error = Some("boom".into());
        assert_eq!(view.empty_notice(), None);
        view.error = None;

        view.query = " z ".into();
        assert_eq!(view.empty_notice(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn notice_follows_configured_minimum() {
        let api = FakeApi::new();
        api.respond("abc", Duration::from_millis(10), json!({ "results": [] }));
        let search = SearchController::new(
            api.clone(),
            ControllerConfig {
                min_query_chars: 4,
                ..Default::default()
            },
        );

        search.on_input("abc");
        sleep(Duration::from_millis(400)).await;
        assert!(api.keys().is_empty());
        assert_eq!(search.view().query, "abc");
        assert_eq!(search.view().empty_notice(), None);

        api.respond("abcd", Duration::from_millis(10), json!({ "results": [] }));
        search.on_input("abcd");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(api.keys(), vec!["abcd"]);
        assert_eq!(
            search.view().empty_notice().as_deref(),
            Some("No results for “abcd”. Try another keyword.")
        );
    }
}
