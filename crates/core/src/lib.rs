//! Core domain types, outline grammar, response parsing and configuration
//! for generating PowerPoint decks from a topic.

pub mod config;
pub mod error;
pub mod markup;
pub mod naming;
pub mod prompt;
pub mod request;
pub mod traits;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use markup::{extract, parse_response};
pub use prompt::OutlinePrompt;
pub use request::GenerationRequest;
pub use traits::{ContentGenerator, ImageResolver};
pub use types::{DeckSpec, SlideKind, SlideRecord, Theme};
