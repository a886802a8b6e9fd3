//! Domain types for representing a generated deck before it is rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a slide, as announced by its type marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlideKind {
    /// Opening slide with a title and a subtitle.
    TitleSlide,
    /// Title plus a bulleted body.
    ContentSlide,
    /// Title, body and a picture looked up by query.
    ImageSlide,
    /// Closing slide carrying only a title.
    ThanksSlide,
}

/// One slide recovered from a generator response.
///
/// Each variant carries exactly the fields its marker asks the model for.
/// Fields the model left out are empty strings, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideRecord {
    Title {
        title: String,
        subtitle: String,
    },
    Content {
        title: String,
        body: String,
    },
    Image {
        title: String,
        body: String,
        /// `None` when the fragment carried no (or an empty) image field.
        image_query: Option<String>,
    },
    Thanks {
        title: String,
    },
}

impl SlideRecord {
    /// The kind of this record.
    pub fn kind(&self) -> SlideKind {
        match self {
            SlideRecord::Title { .. } => SlideKind::TitleSlide,
            SlideRecord::Content { .. } => SlideKind::ContentSlide,
            SlideRecord::Image { .. } => SlideKind::ImageSlide,
            SlideRecord::Thanks { .. } => SlideKind::ThanksSlide,
        }
    }

    /// The slide title.
    pub fn title(&self) -> &str {
        match self {
            SlideRecord::Title { title, .. }
            | SlideRecord::Content { title, .. }
            | SlideRecord::Image { title, .. }
            | SlideRecord::Thanks { title } => title,
        }
    }

    /// The subtitle or body text. Thanks slides have none.
    pub fn subtitle_or_body(&self) -> &str {
        match self {
            SlideRecord::Title { subtitle, .. } => subtitle,
            SlideRecord::Content { body, .. } | SlideRecord::Image { body, .. } => body,
            SlideRecord::Thanks { .. } => "",
        }
    }

    /// The image query, only ever present on image slides.
    pub fn image_query(&self) -> Option<&str> {
        match self {
            SlideRecord::Image { image_query, .. } => image_query.as_deref(),
            _ => None,
        }
    }
}

/// A visual theme, each backed by exactly one template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Aesthetic,
}

impl Theme {
    /// All themes in template order.
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Aesthetic];

    /// Resolve a theme identifier. Unknown identifiers fall back to light.
    pub fn from_identifier(id: &str) -> Self {
        match id.trim().to_lowercase().as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            "aesthetic" => Theme::Aesthetic,
            other => {
                log::debug!("Unknown theme '{}', using light", other);
                Theme::Light
            }
        }
    }

    /// The identifier used on the request boundary.
    pub fn identifier(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Aesthetic => "aesthetic",
        }
    }

    /// File name of the template artifact for this theme.
    pub fn template_file_name(&self) -> &'static str {
        match self {
            Theme::Light => "theme0.pptx",
            Theme::Dark => "theme1.pptx",
            Theme::Aesthetic => "theme2.pptx",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Everything the deck builder needs for one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSpec {
    /// The topic the deck is about, as entered by the user.
    pub topic: String,

    /// Theme whose template the deck is built on.
    pub theme: Theme,

    /// Slides in presentation order.
    pub slides: Vec<SlideRecord>,
}

impl DeckSpec {
    /// Create a deck with no slides yet.
    pub fn new(topic: impl Into<String>, theme: Theme) -> Self {
        Self {
            topic: topic.into(),
            theme,
            slides: Vec::new(),
        }
    }

    /// Create a deck from already parsed records.
    pub fn with_slides(topic: impl Into<String>, theme: Theme, slides: Vec<SlideRecord>) -> Self {
        Self {
            topic: topic.into(),
            theme,
            slides,
        }
    }

    /// Number of slides of the given kind.
    pub fn count_of(&self, kind: SlideKind) -> usize {
        self.slides.iter().filter(|s| s.kind() == kind).count()
    }
}
