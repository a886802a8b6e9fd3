//! Validation of a generation request before any external call is made.

use crate::error::{Error, Result};
use crate::naming::legal_filename_fragment;
use crate::prompt::OutlinePrompt;
use crate::types::Theme;

/// A validated request to generate one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Topic as entered by the user, trimmed.
    pub topic: String,

    /// Model identifier passed to the content generator.
    pub model: String,

    /// Number of slides asked of the model.
    pub num_slides: usize,

    /// Resolved theme.
    pub theme: Theme,

    /// Topic sanitized for use as a directory name.
    pub legal_topic: String,
}

impl GenerationRequest {
    /// Validate raw request fields.
    ///
    /// `num_slides` is taken as text so a non-numeric value is reported as an
    /// input error here rather than wherever it was first parsed.
    pub fn new(topic: &str, model: &str, num_slides: &str, theme: &str) -> Result<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidInput("topic is required".to_string()));
        }

        let legal_topic = legal_filename_fragment(topic);
        if legal_topic.is_empty() {
            return Err(Error::InvalidInput(format!(
                "topic '{}' has no characters usable in a file name",
                topic
            )));
        }

        let model = model.trim();
        if model.is_empty() {
            return Err(Error::InvalidInput("model is required".to_string()));
        }

        let num_slides: usize = num_slides.trim().parse().map_err(|_| {
            Error::InvalidInput(format!("num_slides must be a number, got '{}'", num_slides))
        })?;
        if num_slides == 0 {
            return Err(Error::InvalidInput(
                "num_slides must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            topic: topic.to_string(),
            model: model.to_string(),
            num_slides,
            theme: Theme::from_identifier(theme),
            legal_topic,
        })
    }

    /// The outline prompt for this request.
    pub fn prompt(&self) -> String {
        OutlinePrompt::new(&self.topic, self.num_slides).render()
    }
}
