//! Outline prompt sent to the content generator.

use crate::markup::{Field, SlideMarker, SLIDE_BREAK};

/// Prompt asking the model for a slide outline in the bracket-tag format.
#[derive(Debug, Clone)]
pub struct OutlinePrompt<'a> {
    topic: &'a str,
    num_slides: usize,
}

impl<'a> OutlinePrompt<'a> {
    /// Create a prompt for `num_slides` slides on `topic`.
    pub fn new(topic: &'a str, num_slides: usize) -> Self {
        Self { topic, num_slides }
    }

    /// Render the full instruction text.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Create an outline for a {}-slide presentation on '{}'.\nSlide types:\n",
            self.num_slides, self.topic
        );

        for marker in SlideMarker::PRECEDENCE {
            out.push_str(&marker_line(marker));
            out.push('\n');
        }

        out.push_str(&format!("Separate slides using {}.\n\n", SLIDE_BREAK));
        out.push_str("After the content slides:\n");
        out.push_str("1. Add a 'Summary' slide with a brief overview.\n");
        out.push_str("2. Add a 'Next Steps' slide listing 3 clear actions.\n\n");
        out.push_str("Use bullet points wherever possible.\n");
        out
    }
}

fn marker_line(marker: SlideMarker) -> String {
    let label = match marker {
        SlideMarker::Title => "Title Slide",
        SlideMarker::Content => "Content Slide",
        SlideMarker::Image => "Image Slide",
        SlideMarker::Thanks => "Thanks Slide",
    };

    let fields: Vec<String> = marker.fields().iter().map(Field::pair).collect();
    let fields = match fields.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] if init.len() == 1 => format!("{} and {}", init[0], last),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    };

    let mut line = format!("- {}: {} with {}", label, marker.token(), fields);
    if marker == SlideMarker::Content {
        line.push_str(" (minimum 3 bullet points)");
    }
    line
}
