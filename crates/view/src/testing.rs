//! Scriptable in-process [`MovieApi`] for controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cinesearch_client::MovieApi;
use cinesearch_core::{FetchError, MovieId, Outcome};
use serde_json::{Value, json};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub(crate) struct Call {
    pub key: String,
    pub token: CancellationToken,
    pub at: Instant,
    /// Whether every earlier request had been cancelled when this one arrived.
    pub earlier_cancelled: bool,
}

#[derive(Clone)]
struct Script {
    delay: Duration,
    outcome: Outcome<Value>,
}

pub(crate) struct FakeApi {
    honor_cancel: bool,
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    /// A backend that stops work as soon as the token fires.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            honor_cancel: true,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// A backend that ignores cancellation and always answers eventually.
    pub fn stubborn() -> Arc<Self> {
        Arc::new(Self {
            honor_cancel: false,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn respond(&self, key: &str, delay: Duration, body: Value) {
        self.script(key, delay, Outcome::Ok(body));
    }

    pub fn fail(&self, key: &str, delay: Duration, status: u16) {
        self.script(
            key,
            delay,
            Outcome::Failed(FetchError::Status {
                status,
                detail: None,
            }),
        );
    }

    pub fn script(&self, key: &str, delay: Duration, outcome: Outcome<Value>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(key.to_string(), Script { delay, outcome });
    }

    pub fn keys(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.key.clone()).collect()
    }

    pub fn with_calls<R>(&self, f: impl FnOnce(&[Call]) -> R) -> R {
        f(&self.calls.lock().unwrap())
    }

    async fn answer(&self, key: String, default: Value, cancel: &CancellationToken) -> Outcome<Value> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or(Script {
                delay: Duration::from_millis(10),
                outcome: Outcome::Ok(default),
            });

        {
            let mut calls = self.calls.lock().unwrap();
            let earlier_cancelled = calls.iter().all(|c| c.token.is_cancelled());
            calls.push(Call {
                key,
                token: cancel.clone(),
                at: Instant::now(),
                earlier_cancelled,
            });
        }

        if self.honor_cancel {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Outcome::Canceled,
                _ = tokio::time::sleep(script.delay) => script.outcome,
            }
        } else {
            tokio::time::sleep(script.delay).await;
            script.outcome
        }
    }
}

#[async_trait::async_trait]
impl MovieApi for FakeApi {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str, cancel: &CancellationToken) -> Outcome<Value> {
        let default = json!({ "results": [{ "id": 1, "title": query }] });
        self.answer(query.to_string(), default, cancel).await
    }

    async fn movie(&self, id: &MovieId, cancel: &CancellationToken) -> Outcome<Value> {
        let default = json!({
            "details": { "id": id.as_str(), "title": format!("Movie {id}") },
            "recommendations": []
        });
        self.answer(format!("movie/{id}"), default, cancel).await
    }
}
