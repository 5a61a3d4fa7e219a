pub mod error;
pub mod normalize;
pub mod outcome;
pub mod types;

pub use error::{FailureKind, FetchError};
pub use normalize::{normalize_movie, normalize_movies, to_array};
pub use outcome::Outcome;
pub use types::{Movie, MovieId};
