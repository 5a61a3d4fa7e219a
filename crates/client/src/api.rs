use cinesearch_core::{MovieId, Outcome};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// The two backend endpoints the views depend on.
///
/// Bodies come back as raw JSON; normalizing them is up to the caller.
/// Implementations must resolve to [`Outcome::Canceled`] once `cancel` fires.
#[async_trait::async_trait]
pub trait MovieApi: Send + Sync {
    fn name(&self) -> &str;

    /// `GET /search?q=<query>`, expected to answer `{ "results": [...] }`.
    async fn search(&self, query: &str, cancel: &CancellationToken) -> Outcome<Value>;

    /// `GET /movie/{id}`, expected to answer
    /// `{ "details": {...}, "recommendations": [...] }`.
    async fn movie(&self, id: &MovieId, cancel: &CancellationToken) -> Outcome<Value>;
}
