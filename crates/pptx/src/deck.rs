//! A presentation opened from a template and edited slide by slide.

use crate::content_types::{ContentTypes, CT_SLIDE};
use crate::layout::{load_layouts, Geometry, Layout};
use crate::media::ImageFormat;
use crate::package::{Package, CONTENT_TYPES_PART};
use crate::presentation::{SlideList, PRESENTATION_PART};
use crate::reader::parse_slide_xml;
use crate::rels::{rel_types, rels_path_for, relative_target, Relationships};
use crate::slide::SlideDraft;
use crate::xml::part_text;
use deckgen_core::{Error, Result};
use std::fs;
use std::path::Path;

/// A slide added to the deck since it was opened.
#[derive(Debug, Clone)]
struct NewSlide {
    part_name: String,
    rel_id: String,
    draft: SlideDraft,
    rels: Relationships,
}

/// An editable presentation.
///
/// Slides that came with the template stay untouched unless removed; slides
/// added through [`Deck::add_slide`] are held as drafts and rendered on save.
#[derive(Debug)]
pub struct Deck {
    package: Package,
    content_types: ContentTypes,
    presentation_rels: Relationships,
    slide_list: SlideList,
    layouts: Vec<Layout>,
    new_slides: Vec<NewSlide>,
}

impl Deck {
    /// Open a template or presentation file.
    pub fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening template {}", path.display());
        Self::from_package(Package::open(path)?)
    }

    /// Wrap a loaded package.
    pub fn from_package(package: Package) -> Result<Self> {
        let content_types = ContentTypes::parse(package.require(CONTENT_TYPES_PART)?)?;
        let presentation = part_text(PRESENTATION_PART, package.require(PRESENTATION_PART)?)?;
        let slide_list = SlideList::parse(&presentation)?;
        let presentation_rels = package.relationships_of(PRESENTATION_PART)?;
        let layouts = load_layouts(&package, &presentation_rels)?;

        Ok(Self {
            package,
            content_types,
            presentation_rels,
            slide_list,
            layouts,
            new_slides: Vec::new(),
        })
    }

    /// Number of slides currently in the deck.
    pub fn slide_count(&self) -> usize {
        self.slide_list.len()
    }

    /// Layouts of the template, in master order.
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Remove every slide, last first, and drop parts no longer referenced.
    ///
    /// Returns the number of slides removed.
    pub fn clear_slides(&mut self) -> Result<usize> {
        let count = self.slide_list.len();

        for index in (0..count).rev() {
            if let Some(entry) = self.slide_list.remove(index) {
                self.presentation_rels.remove(&entry.rel_id);
                self.new_slides.retain(|s| s.rel_id != entry.rel_id);
            }
        }

        self.sync_parts()?;
        let pruned = self.package.prune_unreachable()?;
        self.retain_live_overrides();
        log::debug!("Removed {} slides, pruned {} parts", count, pruned.len());

        Ok(count)
    }

    /// Append a slide based on the layout at `layout_index`. Returns its position.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<usize> {
        let layout = self
            .layouts
            .get(layout_index)
            .ok_or(Error::LayoutMissing(layout_index))?;

        let reserved: Vec<&str> = self.new_slides.iter().map(|s| s.part_name.as_str()).collect();
        let part_name = self
            .package
            .next_part_name("ppt/slides/slide", ".xml", &reserved);

        let mut rels = Relationships::new();
        rels.add(
            rel_types::SLIDE_LAYOUT,
            relative_target(&part_name, &layout.part_name),
        );
        let draft = SlideDraft::from_layout(layout);

        let rel_id = self
            .presentation_rels
            .add(rel_types::SLIDE, relative_target(PRESENTATION_PART, &part_name));
        self.slide_list.push(rel_id.clone());
        self.new_slides.push(NewSlide {
            part_name,
            rel_id,
            draft,
            rels,
        });

        Ok(self.slide_list.len() - 1)
    }

    fn new_slide_index(&self, index: usize) -> Option<usize> {
        let entry = self.slide_list.get(index)?;
        self.new_slides.iter().position(|s| s.rel_id == entry.rel_id)
    }

    /// Draft of a slide added since opening.
    pub fn slide(&self, index: usize) -> Option<&SlideDraft> {
        self.new_slide_index(index).map(|i| &self.new_slides[i].draft)
    }

    /// Mutable draft of a slide added since opening.
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut SlideDraft> {
        let i = self.new_slide_index(index)?;
        Some(&mut self.new_slides[i].draft)
    }

    fn require_new_slide(&mut self, index: usize) -> Result<&mut NewSlide> {
        let i = self.new_slide_index(index).ok_or_else(|| {
            Error::TemplateError(format!("Slide {} was not added to this deck", index))
        })?;
        Ok(&mut self.new_slides[i])
    }

    /// Title text of the slide at `index`, for added and pre-existing slides alike.
    pub fn slide_title(&self, index: usize) -> Result<Option<String>> {
        if let Some(draft) = self.slide(index) {
            return Ok(draft.title().map(str::to_string));
        }

        let Some(entry) = self.slide_list.get(index) else {
            return Ok(None);
        };
        let Some(rel) = self.presentation_rels.get(&entry.rel_id) else {
            return Ok(None);
        };
        let part = rel.resolve(PRESENTATION_PART);
        let xml = part_text(&part, self.package.require(&part)?)?;
        Ok(parse_slide_xml(&part, &xml)?.title)
    }

    /// Embed an image file and place it on the slide at `index`.
    pub fn add_picture(&mut self, index: usize, image: &Path, geometry: Geometry) -> Result<()> {
        let bytes = fs::read(image).map_err(|e| {
            Error::ImageError(format!("Failed to read {}: {}", image.display(), e))
        })?;
        let format = ImageFormat::from_magic(&bytes).ok_or_else(|| {
            Error::ImageError(format!("{} is not a supported image", image.display()))
        })?;
        let description = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let media_part = self.next_media_part(format);
        let slide = self.require_new_slide(index)?;
        let rel_id = slide.rels.add(
            rel_types::IMAGE,
            relative_target(&slide.part_name, &media_part),
        );
        slide.draft.add_picture(&rel_id, &description, geometry);

        self.content_types
            .ensure_default(format.extension(), format.content_type());
        self.package.set_part(media_part, bytes);
        Ok(())
    }

    fn next_media_part(&self, format: ImageFormat) -> String {
        let taken = |n: usize| {
            let prefix = format!("ppt/media/image{}.", n);
            self.package.part_names().any(|p| p.starts_with(&prefix))
        };
        let n = (1..).find(|&n| !taken(n)).unwrap_or(0);
        format!("ppt/media/image{}.{}", n, format.extension())
    }

    /// Write drafts, the slide list and relationships back into the package.
    fn sync_parts(&mut self) -> Result<()> {
        for slide in &self.new_slides {
            self.package
                .set_part(slide.part_name.clone(), slide.draft.to_xml());
            self.package
                .set_part(rels_path_for(&slide.part_name), slide.rels.to_xml());
            self.content_types.set_override(&slide.part_name, CT_SLIDE);
        }

        let presentation = part_text(PRESENTATION_PART, self.package.require(PRESENTATION_PART)?)?;
        let rewritten = self.slide_list.apply_to(&presentation)?;
        self.package.set_part(PRESENTATION_PART, rewritten);
        self.package.set_part(
            rels_path_for(PRESENTATION_PART),
            self.presentation_rels.to_xml(),
        );
        self.package
            .set_part(CONTENT_TYPES_PART, self.content_types.to_xml());
        Ok(())
    }

    fn retain_live_overrides(&mut self) {
        let package = &self.package;
        self.content_types.retain_overrides(|p| package.contains(p));
        self.package
            .set_part(CONTENT_TYPES_PART, self.content_types.to_xml());
    }

    /// Render the deck into a package without writing it anywhere.
    pub fn to_package(&mut self) -> Result<&Package> {
        self.sync_parts()?;
        self.package.prune_unreachable()?;
        self.retain_live_overrides();
        Ok(&self.package)
    }

    /// Save the deck to a .pptx file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.to_package()?.save(path)?;
        log::info!("Saved {} slides to {}", self.slide_count(), path.display());
        Ok(())
    }
}
