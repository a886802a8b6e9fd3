//! PPTX (Office Open XML) backend for building decks from theme templates.
//!
//! A .pptx file is a ZIP archive of XML parts linked by relationship parts.
//! [`Package`] holds the parts in memory, [`Deck`] edits slides on top of it,
//! [`DeckBuilder`] turns parsed slide records into a finished file and
//! [`DeckReader`] reads a written deck back.

pub mod builder;
pub mod content_types;
pub mod deck;
pub mod layout;
pub mod media;
pub mod package;
pub mod presentation;
pub mod reader;
pub mod rels;
pub mod slide;
mod xml;

#[cfg(test)]
mod fixture;

pub use builder::DeckBuilder;
pub use deck::Deck;
pub use layout::{Geometry, Layout};
pub use package::Package;
pub use reader::{DeckReader, ReadSlide};
