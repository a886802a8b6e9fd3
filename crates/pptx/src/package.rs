//! In-memory OPC package: every ZIP entry of a .pptx held by part name.

use crate::rels::{rels_path_for, Relationships};
use deckgen_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Part name of the content types stream.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Part name of the package-level relationships.
pub const ROOT_RELS_PART: &str = "_rels/.rels";

/// A ZIP-backed package whose parts are held in memory.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
}

impl Package {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a package from a file on disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::TemplateError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read every entry of a ZIP archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().trim_start_matches('/').to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;
            parts.insert(name, data);
        }

        if !parts.contains_key(CONTENT_TYPES_PART) {
            return Err(Error::TemplateError(format!(
                "Package has no {}",
                CONTENT_TYPES_PART
            )));
        }

        log::debug!("Loaded package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(|p| p.as_slice())
    }

    /// Raw bytes of a part that must exist.
    pub fn require(&self, name: &str) -> Result<&[u8]> {
        self.part(name)
            .ok_or_else(|| Error::TemplateError(format!("Package has no part '{}'", name)))
    }

    /// Whether a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Insert or replace a part.
    pub fn set_part(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.parts.insert(name.into(), data.into());
    }

    /// Remove a part, returning its bytes.
    pub fn remove_part(&mut self, name: &str) -> Option<Vec<u8>> {
        self.parts.remove(name)
    }

    /// Iterate over part names in sorted order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|k| k.as_str())
    }

    /// Parse the relationships of a part. A part without a .rels has none.
    pub fn relationships_of(&self, part: &str) -> Result<Relationships> {
        let rels_path = rels_path_for(part);
        match self.part(&rels_path) {
            Some(bytes) => Relationships::parse(&rels_path, bytes),
            None => Ok(Relationships::new()),
        }
    }

    /// First free part name of the form `{prefix}{n}{suffix}` with `n >= 1`,
    /// skipping names in `reserved`.
    pub fn next_part_name(&self, prefix: &str, suffix: &str, reserved: &[&str]) -> String {
        (1..)
            .map(|n| format!("{}{}{}", prefix, n, suffix))
            .find(|name| !self.contains(name) && !reserved.contains(&name.as_str()))
            .unwrap_or_else(|| format!("{}0{}", prefix, suffix))
    }

    /// Drop every part that cannot be reached from the package relationships.
    ///
    /// Returns the removed part names. Relationship parts follow their source
    /// part, and the content types stream is always kept.
    pub fn prune_unreachable(&mut self) -> Result<Vec<String>> {
        let mut reachable: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<(String, Relationships)> = VecDeque::new();

        if let Some(bytes) = self.part(ROOT_RELS_PART) {
            queue.push_back((String::new(), Relationships::parse(ROOT_RELS_PART, bytes)?));
        }

        while let Some((source, rels)) = queue.pop_front() {
            for rel in rels.iter().filter(|r| !r.is_external()) {
                let target = rel.resolve(&source);
                if !self.contains(&target) || !reachable.insert(target.clone()) {
                    continue;
                }
                let target_rels = self.relationships_of(&target)?;
                queue.push_back((target, target_rels));
            }
        }

        let removed: Vec<String> = self
            .parts
            .keys()
            .filter(|name| {
                let name = name.as_str();
                name != CONTENT_TYPES_PART
                    && name != ROOT_RELS_PART
                    && !reachable.contains(name)
                    && !source_of_rels(name).is_some_and(|src| reachable.contains(&src))
            })
            .cloned()
            .collect();

        for name in &removed {
            log::debug!("Pruning unreachable part {}", name);
            self.parts.remove(name);
        }

        Ok(removed)
    }

    /// Write the package as a ZIP archive, content types first.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let ordered = self
            .parts
            .get_key_value(CONTENT_TYPES_PART)
            .into_iter()
            .chain(self.parts.iter().filter(|(k, _)| k.as_str() != CONTENT_TYPES_PART));

        for (name, data) in ordered {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
            zip.write_all(data)?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        Ok(())
    }

    /// Write the package to a file on disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Source part of a relationships part name, e.g. `ppt/_rels/presentation.xml.rels`
/// → `ppt/presentation.xml`.
fn source_of_rels(name: &str) -> Option<String> {
    let stem = name.strip_suffix(".rels")?;
    let (dir, file) = match stem.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => return None,
    };
    let parent = if dir == "_rels" {
        ""
    } else {
        dir.strip_suffix("/_rels")?
    };
    if parent.is_empty() {
        Some(file.to_string())
    } else {
        Some(format!("{}/{}", parent, file))
    }
}
