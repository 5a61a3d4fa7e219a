use crate::FetchError;

/// Result of a cancellable request.
///
/// `Canceled` is an expected outcome of supersession or teardown and is kept
/// apart from real failures so callers can drop it without inspecting errors.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    Ok(T),
    Canceled,
    Failed(FetchError),
}

impl<T> Outcome<T> {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Canceled => Outcome::Canceled,
            Self::Failed(err) => Outcome::Failed(err),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Canceled | Self::Failed(_) => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for Outcome<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Failed(err),
        }
    }
}
