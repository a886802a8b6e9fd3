//! Interfaces to the external services a deck is built from.

use crate::error::Result;
use std::path::Path;

/// Produces raw outline text for a prompt.
///
/// No guarantee is made about the shape of the returned text.
pub trait ContentGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Finds an image for a text query and places it in a directory.
pub trait ImageResolver {
    /// Resolve `query` into a file inside `target_dir`.
    ///
    /// Returns the file name relative to `target_dir`, or `None` when no
    /// image was found. Not finding an image is not an error.
    fn resolve(&self, query: &str, target_dir: &Path) -> Result<Option<String>>;
}

impl<T: ContentGenerator + ?Sized> ContentGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

impl<T: ImageResolver + ?Sized> ImageResolver for Box<T> {
    fn resolve(&self, query: &str, target_dir: &Path) -> Result<Option<String>> {
        (**self).resolve(query, target_dir)
    }
}
