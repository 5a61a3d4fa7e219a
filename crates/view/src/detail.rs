//! Detail view: one fetch per selected movie id.
//!
//! The generation taken when a fetch starts is the relevance guard: once the
//! id changes or the view closes, that fetch's answer is dropped whatever it
//! turned out to be. The previous request is also cancelled, but the guard
//! does not rely on the backend honouring that.

use std::sync::{Arc, Mutex};

use cinesearch_client::MovieApi;
use cinesearch_core::error::detail_message;
use cinesearch_core::{Movie, MovieId, Outcome, normalize_movie, normalize_movies};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::lock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

impl DetailPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Errored => "errored",
        }
    }
}

impl std::fmt::Display for DetailPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailView {
    pub movie_id: Option<MovieId>,
    pub phase: DetailPhase,
    pub details: Option<Movie>,
    pub recommendations: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct DetailController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn MovieApi>,
    view: watch::Sender<DetailView>,
    lifecycle: Mutex<Lifecycle>,
}

#[derive(Default)]
struct Lifecycle {
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl DetailController {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        let (view, _) = watch::channel(DetailView::default());
        Self {
            inner: Arc::new(Inner {
                api,
                view,
                lifecycle: Mutex::new(Lifecycle::default()),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailView> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> DetailView {
        self.inner.view.borrow().clone()
    }

    /// Switch to `id` now and fetch it in the background.
    ///
    /// The view is `Loading` for `id` as soon as this returns, so a `close`
    /// or another `select` made right after it always wins.
    pub fn select(&self, id: MovieId) -> JoinHandle<()> {
        let (generation, token) = self.begin(&id);
        let controller = self.clone();
        tokio::spawn(async move { controller.fetch(generation, id, token).await })
    }

    /// Load `id` and apply the answer if `id` is still the one on screen.
    pub async fn load(&self, id: MovieId) {
        let (generation, token) = self.begin(&id);
        self.fetch(generation, id, token).await;
    }

    async fn fetch(&self, generation: u64, id: MovieId, token: CancellationToken) {
        let outcome = self.inner.api.movie(&id, &token).await;
        self.finish(generation, &id, outcome);
    }

    /// Leave the detail view. Any fetch still running is invalidated.
    pub fn close(&self) {
        let mut lifecycle = lock(&self.inner.lifecycle);
        lifecycle.generation += 1;
        if let Some(token) = lifecycle.in_flight.take() {
            debug!(reason = "teardown", "canceling detail fetch");
            token.cancel();
        }
        self.inner.view.send_replace(DetailView::default());
    }

    fn begin(&self, id: &MovieId) -> (u64, CancellationToken) {
        let mut lifecycle = lock(&self.inner.lifecycle);
        if let Some(previous) = lifecycle.in_flight.take() {
            debug!(reason = "superseded", "canceling detail fetch");
            previous.cancel();
        }
        lifecycle.generation += 1;
        let token = CancellationToken::new();
        lifecycle.in_flight = Some(token.clone());

        self.inner.view.send_replace(DetailView {
            movie_id: Some(id.clone()),
            phase: DetailPhase::Loading,
            loading: true,
            ..Default::default()
        });
        debug!(movie_id = %id, generation = lifecycle.generation, "detail fetch started");
        (lifecycle.generation, token)
    }

    fn finish(&self, generation: u64, id: &MovieId, outcome: Outcome<Value>) {
        let mut lifecycle = lock(&self.inner.lifecycle);
        if lifecycle.generation != generation {
            debug!(movie_id = %id, generation, "stale detail response dropped");
            return;
        }

        match outcome {
            Outcome::Canceled => {
                debug!(movie_id = %id, "detail fetch canceled");
            }
            Outcome::Ok(body) => {
                lifecycle.in_flight = None;
                let details = normalize_movie(body.get("details").unwrap_or(&Value::Null));
                let recommendations =
                    normalize_movies(body.get("recommendations").unwrap_or(&Value::Null));
                debug!(
                    movie_id = %id,
                    recommendations = recommendations.len(),
                    "detail loaded"
                );
                self.inner.view.send_modify(|view| {
                    view.details = Some(details);
                    view.recommendations = recommendations;
                    view.phase = DetailPhase::Loaded;
                    view.loading = false;
                });
            }
            Outcome::Failed(err) => {
                lifecycle.in_flight = None;
                warn!(movie_id = %id, error = %err, kind = %err.kind(), "detail fetch failed");
                let message = detail_message(&err);
                self.inner.view.send_modify(|view| {
                    view.error = Some(message.to_string());
                    view.phase = DetailPhase::Errored;
                    view.loading = false;
                });
            }
        }
    }
}
