//! Content generator and image resolver implementations.

pub mod cohere;
pub mod images;

pub use cohere::{CohereGenerator, ReplayGenerator};
pub use images::{CachedImageResolver, NoImages};
