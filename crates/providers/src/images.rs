//! Image resolvers backed by a local image cache.

use deckgen_core::naming::legal_filename_fragment;
use deckgen_core::{ImageResolver, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions treated as images, lowercase.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff"];

fn image_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Resolves queries against a directory of previously downloaded images.
///
/// For a query `q` the cache is searched for `<legal(q)>.<ext>` first, then
/// for the first image (by name) inside the directory `<legal(q)>/`. A hit is
/// copied into the target directory as `<legal(q)>.<ext>`.
#[derive(Debug, Clone)]
pub struct CachedImageResolver {
    cache_dir: PathBuf,
}

impl CachedImageResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Cached image for a sanitized query, if any.
    fn lookup(&self, key: &str) -> Result<Option<(PathBuf, String)>> {
        for ext in IMAGE_EXTENSIONS {
            let candidate = self.cache_dir.join(format!("{}.{}", key, ext));
            if candidate.is_file() {
                return Ok(Some((candidate, ext.to_string())));
            }
        }

        let dir = self.cache_dir.join(key);
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut images: Vec<(PathBuf, String)> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| image_extension(&path).map(|ext| (path, ext)))
            .collect();
        images.sort();

        Ok(images.into_iter().next())
    }
}

impl ImageResolver for CachedImageResolver {
    fn resolve(&self, query: &str, target_dir: &Path) -> Result<Option<String>> {
        let key = legal_filename_fragment(query);
        if key.is_empty() {
            return Ok(None);
        }

        let Some((source, ext)) = self.lookup(&key)? else {
            log::debug!("No cached image for '{}' in {}", query, self.cache_dir.display());
            return Ok(None);
        };

        let name = format!("{}.{}", key, ext);
        fs::copy(&source, target_dir.join(&name))?;
        log::debug!("Using cached image {} for '{}'", source.display(), query);
        Ok(Some(name))
    }
}

/// Resolver that never finds an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, query: &str, _target_dir: &Path) -> Result<Option<String>> {
        log::debug!("No image cache configured, skipping '{}'", query);
        Ok(None)
    }
}
