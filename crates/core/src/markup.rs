//! Bracket-tag outline format emitted by the content generator.
//!
//! A response is a flat string of slide fragments separated by
//! [`SLIDE_BREAK`]. Each fragment announces its kind with one of the
//! [`SlideMarker`] tokens and carries its fields between [`Field`] tag pairs:
//!
//! ```text
//! [SLIDEBREAK][L_TS][TITLE]Intro[/TITLE][SUBTITLE]Sub[/SUBTITLE]
//! [SLIDEBREAK][L_CS][TITLE]Body[/TITLE][CONTENT]pt1
//! pt2[/CONTENT]
//! ```
//!
//! Model output is unreliable, so the parser never fails: missing fields
//! become empty strings and unrecognized fragments are dropped.

use crate::types::{SlideKind, SlideRecord};

/// Token separating slide fragments.
pub const SLIDE_BREAK: &str = "[SLIDEBREAK]";

/// Slide type marker. The declaration order is the classification precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideMarker {
    Title,
    Content,
    Image,
    Thanks,
}

impl SlideMarker {
    /// Markers in the order they are tested against a fragment.
    pub const PRECEDENCE: [SlideMarker; 4] = [
        SlideMarker::Title,
        SlideMarker::Content,
        SlideMarker::Image,
        SlideMarker::Thanks,
    ];

    /// The literal token.
    pub fn token(&self) -> &'static str {
        match self {
            SlideMarker::Title => "[L_TS]",
            SlideMarker::Content => "[L_CS]",
            SlideMarker::Image => "[L_IS]",
            SlideMarker::Thanks => "[L_THS]",
        }
    }

    /// The slide kind this marker announces.
    pub fn kind(&self) -> SlideKind {
        match self {
            SlideMarker::Title => SlideKind::TitleSlide,
            SlideMarker::Content => SlideKind::ContentSlide,
            SlideMarker::Image => SlideKind::ImageSlide,
            SlideMarker::Thanks => SlideKind::ThanksSlide,
        }
    }

    /// Fields the model is asked to fill for this marker.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            SlideMarker::Title => &[Field::Title, Field::Subtitle],
            SlideMarker::Content => &[Field::Title, Field::Content],
            SlideMarker::Image => &[Field::Title, Field::Content, Field::Image],
            SlideMarker::Thanks => &[Field::Title],
        }
    }

    /// Classify a fragment by the first marker, in precedence order, it contains.
    pub fn classify(fragment: &str) -> Option<SlideMarker> {
        Self::PRECEDENCE
            .into_iter()
            .find(|marker| fragment.contains(marker.token()))
    }
}

/// A delimited field inside a slide fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Subtitle,
    Content,
    Image,
}

impl Field {
    /// Opening tag.
    pub fn open(&self) -> &'static str {
        match self {
            Field::Title => "[TITLE]",
            Field::Subtitle => "[SUBTITLE]",
            Field::Content => "[CONTENT]",
            Field::Image => "[IMAGE]",
        }
    }

    /// Closing tag.
    pub fn close(&self) -> &'static str {
        match self {
            Field::Title => "[/TITLE]",
            Field::Subtitle => "[/SUBTITLE]",
            Field::Content => "[/CONTENT]",
            Field::Image => "[/IMAGE]",
        }
    }

    /// Both tags wrapped around an empty value, as shown to the model.
    pub fn pair(&self) -> String {
        format!("{}{}", self.open(), self.close())
    }

    /// Extract this field's value from a fragment.
    pub fn extract<'a>(&self, fragment: &'a str) -> &'a str {
        extract(fragment, self.open(), self.close())
    }
}

/// Return the text between the first `start_tag` and the first `end_tag`
/// that follows it.
///
/// Returns an empty string when either tag is missing, including when the
/// only `end_tag` occurrences precede `start_tag`. Later occurrences of the
/// pair are ignored.
pub fn extract<'a>(text: &'a str, start_tag: &str, end_tag: &str) -> &'a str {
    if start_tag.is_empty() || end_tag.is_empty() {
        return "";
    }
    let Some(start) = text.find(start_tag) else {
        return "";
    };
    let content_start = start + start_tag.len();
    match text[content_start..].find(end_tag) {
        Some(len) => &text[content_start..content_start + len],
        None => "",
    }
}

/// Parse one fragment into a record, or `None` when it carries no marker.
pub fn parse_fragment(fragment: &str) -> Option<SlideRecord> {
    let marker = SlideMarker::classify(fragment)?;
    let field = |f: Field| f.extract(fragment).to_string();

    let record = match marker {
        SlideMarker::Title => SlideRecord::Title {
            title: field(Field::Title),
            subtitle: field(Field::Subtitle),
        },
        SlideMarker::Content => SlideRecord::Content {
            title: field(Field::Title),
            body: field(Field::Content),
        },
        SlideMarker::Image => {
            let query = field(Field::Image);
            SlideRecord::Image {
                title: field(Field::Title),
                body: field(Field::Content),
                image_query: if query.trim().is_empty() {
                    None
                } else {
                    Some(query)
                },
            }
        }
        SlideMarker::Thanks => SlideRecord::Thanks {
            title: field(Field::Title),
        },
    };

    Some(record)
}

/// Split a full generator response into slide records, preserving order.
pub fn parse_response(response: &str) -> Vec<SlideRecord> {
    let mut records = Vec::new();

    for (idx, fragment) in response.split(SLIDE_BREAK).enumerate() {
        match parse_fragment(fragment) {
            Some(record) => records.push(record),
            None if fragment.trim().is_empty() => {}
            None => {
                log::debug!(
                    "Dropping fragment {} without a slide marker: {:?}",
                    idx,
                    fragment.trim()
                );
            }
        }
    }

    records
}
