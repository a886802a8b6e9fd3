//! Build a deck from parsed slide records and a theme template.

use crate::deck::Deck;
use deckgen_core::naming::{deck_file_name, output_title};
use deckgen_core::{DeckSpec, Error, ImageResolver, Result, SlideRecord};
use std::path::{Path, PathBuf};

/// Layout indices within a theme template's slide master.
pub mod layouts {
    pub const TITLE: usize = 0;
    pub const CONTENT: usize = 1;
    pub const CLOSING: usize = 5;
    pub const IMAGE: usize = 8;
}

/// Placeholder indices on the layouts above.
mod placeholders {
    pub const SUBTITLE: u32 = 1;
    pub const BODY: u32 = 1;
    pub const IMAGE_PICTURE: u32 = 1;
    pub const IMAGE_BODY: u32 = 2;
}

pub const SUMMARY_TITLE: &str = "Summary";
pub const NEXT_STEPS_TITLE: &str = "Next Steps";
pub const NEXT_STEPS_BODY: &str = "1. Review and customize the slides.\n\
                                   2. Add supporting data or visuals.\n\
                                   3. Rehearse your delivery.";
pub const CLOSING_TITLE: &str = "Thank You!";

/// Body of the trailing summary slide.
pub fn summary_body(topic: &str) -> String {
    format!(
        "This presentation provided an overview of '{}', highlighting the most important points and insights.",
        topic
    )
}

/// Populates a theme template with slides and writes the result.
pub struct DeckBuilder<'a> {
    template_dir: PathBuf,
    images: &'a dyn ImageResolver,
}

impl<'a> DeckBuilder<'a> {
    /// Create a builder reading theme templates from `template_dir`.
    pub fn new(template_dir: impl Into<PathBuf>, images: &'a dyn ImageResolver) -> Self {
        Self {
            template_dir: template_dir.into(),
            images,
        }
    }

    /// Build the deck described by `spec` into `storage_dir`, which must exist.
    ///
    /// Returns the path of the written file.
    pub fn build(&self, spec: &DeckSpec, storage_dir: &Path) -> Result<PathBuf> {
        let template = self.template_dir.join(spec.theme.template_file_name());
        log::info!("Building '{}' with the {} theme", spec.topic, spec.theme);

        let mut deck = Deck::open(&template)?;
        let removed = deck.clear_slides()?;
        log::debug!("Cleared {} template slides", removed);

        for record in &spec.slides {
            self.add_record(&mut deck, record, storage_dir)?;
        }

        add_text_slide(&mut deck, SUMMARY_TITLE, &summary_body(&spec.topic))?;
        add_text_slide(&mut deck, NEXT_STEPS_TITLE, NEXT_STEPS_BODY)?;
        let index = deck.add_slide(layouts::CLOSING)?;
        draft(&mut deck, index)?.set_title(CLOSING_TITLE)?;

        let first_title = if spec.slides.is_empty() {
            None
        } else {
            deck.slide_title(0)?
        };
        let title = output_title(first_title.as_deref());
        let path = storage_dir.join(deck_file_name(&title));

        deck.save(&path)?;
        Ok(path)
    }

    fn add_record(&self, deck: &mut Deck, record: &SlideRecord, storage_dir: &Path) -> Result<()> {
        match record {
            SlideRecord::Title { title, subtitle } => {
                let index = deck.add_slide(layouts::TITLE)?;
                let slide = draft(deck, index)?;
                slide.set_title(title)?;
                slide.set_placeholder_text(placeholders::SUBTITLE, subtitle)?;
            }
            SlideRecord::Content { title, body } => add_text_slide(deck, title, body)?,
            SlideRecord::Image {
                title,
                body,
                image_query,
            } => {
                let index = deck.add_slide(layouts::IMAGE)?;
                let slide = draft(deck, index)?;
                slide.set_title(title)?;
                slide.set_placeholder_text(placeholders::IMAGE_BODY, body)?;
                self.place_image(deck, index, image_query.as_deref(), storage_dir);
            }
            SlideRecord::Thanks { title } => add_text_slide(deck, title, "")?,
        }
        Ok(())
    }

    /// Resolve and insert the image of an image slide. Never fails the build.
    fn place_image(&self, deck: &mut Deck, index: usize, query: Option<&str>, storage_dir: &Path) {
        let Some(query) = query else {
            log::warn!("Image slide {} has no image query, skipping image", index + 1);
            return;
        };

        let name = match self.images.resolve(query, storage_dir) {
            Ok(Some(name)) => name,
            Ok(None) => {
                log::warn!("No image found for '{}', skipping image", query);
                return;
            }
            Err(e) => {
                log::warn!("Image lookup for '{}' failed: {}", query, e);
                return;
            }
        };

        let image = storage_dir.join(&name);
        if !image.is_file() {
            log::warn!("Image not found at {}, skipping image", image.display());
            return;
        }

        let geometry = deck
            .slide(index)
            .and_then(|s| s.placeholder(placeholders::IMAGE_PICTURE))
            .and_then(|p| p.geometry);
        let Some(geometry) = geometry else {
            log::warn!("Image layout has no picture placeholder, skipping image");
            return;
        };

        match deck.add_picture(index, &image, geometry) {
            Ok(()) => log::debug!("Placed {} on slide {}", name, index + 1),
            Err(e) => log::warn!("Failed to add picture {}: {}", image.display(), e),
        }
    }
}

fn draft(deck: &mut Deck, index: usize) -> Result<&mut crate::slide::SlideDraft> {
    deck.slide_mut(index)
        .ok_or_else(|| Error::TemplateError(format!("Slide {} is not editable", index)))
}

fn add_text_slide(deck: &mut Deck, title: &str, body: &str) -> Result<()> {
    let index = deck.add_slide(layouts::CONTENT)?;
    let slide = draft(deck, index)?;
    slide.set_title(title)?;
    slide.set_placeholder_text(placeholders::BODY, body)
}
