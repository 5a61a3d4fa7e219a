use thiserror::Error;

/// Why a request to the movie backend failed.
///
/// Cancellation is not represented here; see [`crate::Outcome::Canceled`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("backend returned HTTP {status}")]
    Status {
        status: u16,
        /// `detail` field of the backend's error body, if it sent one.
        detail: Option<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout => FailureKind::Timeout,
            Self::Status { status: 404, .. } => FailureKind::NotFound,
            Self::Status { status: 502, .. } => FailureKind::Upstream,
            Self::Status { status: 503, .. } => FailureKind::ServiceUnavailable,
            Self::Status { .. } | Self::Network(_) | Self::Decode(_) => FailureKind::Other,
        }
    }
}

/// Failure classes the views distinguish when picking a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    ServiceUnavailable,
    Upstream,
    Timeout,
    Other,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Upstream => "upstream_error",
            Self::Timeout => "timeout",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SEARCH_UNAVAILABLE: &str =
    "Search backend is unavailable (503). Make sure Elasticsearch is running.";
pub const SEARCH_UPSTREAM: &str =
    "Search service had an upstream error (502). Check Elasticsearch logs.";
pub const SEARCH_CONNECT: &str = "Could not connect to the server.";

pub const DETAIL_NOT_FOUND: &str = "Movie not found (404).";
pub const DETAIL_UNAVAILABLE: &str =
    "Service unavailable (503). Make sure Elasticsearch is running.";
pub const DETAIL_FAILED: &str = "Failed to fetch movie details.";

/// User-facing message for a failed search.
pub fn search_message(err: &FetchError) -> &'static str {
    match err.kind() {
        FailureKind::ServiceUnavailable => SEARCH_UNAVAILABLE,
        FailureKind::Upstream => SEARCH_UPSTREAM,
        FailureKind::NotFound | FailureKind::Timeout | FailureKind::Other => SEARCH_CONNECT,
    }
}

/// User-facing message for a failed detail fetch.
pub fn detail_message(err: &FetchError) -> &'static str {
    match err.kind() {
        FailureKind::NotFound => DETAIL_NOT_FOUND,
        FailureKind::ServiceUnavailable => DETAIL_UNAVAILABLE,
        FailureKind::Upstream | FailureKind::Timeout | FailureKind::Other => DETAIL_FAILED,
    }
}
