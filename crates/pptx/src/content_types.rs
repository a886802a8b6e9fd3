//! The `[Content_Types].xml` stream.

use crate::xml::{attr, escape, local_name, xml_error, XML_DECLARATION};
use deckgen_core::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Content type of a slide part.
pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Content type declarations of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// `(extension, content type)` pairs, extension lowercase without dot.
    defaults: Vec<(String, String)>,
    /// `(part name, content type)` pairs, part name without leading slash.
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Parse `[Content_Types].xml`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);
        let mut buf = Vec::new();
        let mut types = ContentTypes::default();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let content_type = attr(e, b"ContentType").unwrap_or_default();
                    match local_name(e.name().as_ref()) {
                        b"Default" => {
                            if let Some(ext) = attr(e, b"Extension") {
                                types.defaults.push((ext.to_lowercase(), content_type));
                            }
                        }
                        b"Override" => {
                            if let Some(part) = attr(e, b"PartName") {
                                let part = part.trim_start_matches('/').to_string();
                                types.overrides.push((part, content_type));
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error("[Content_Types].xml", e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Serialize back to XML.
    pub fn to_xml(&self) -> String {
        let mut xml = format!("{}\n<Types xmlns=\"{}\">", XML_DECLARATION, NS_CONTENT_TYPES);
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(ext),
                escape(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                escape(part),
                escape(ct)
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Content type of a part, from its override or its extension default.
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        let part = part.trim_start_matches('/');
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p == part) {
            return Some(ct);
        }
        let ext = part.rsplit_once('.')?.1.to_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    /// Ensure an extension default exists.
    pub fn ensure_default(&mut self, ext: &str, content_type: &str) {
        let ext = ext.to_lowercase();
        if !self.defaults.iter().any(|(e, _)| *e == ext) {
            self.defaults.push((ext, content_type.to_string()));
        }
    }

    /// Set the override for a part, replacing any existing one.
    pub fn set_override(&mut self, part: &str, content_type: &str) {
        let part = part.trim_start_matches('/');
        match self.overrides.iter_mut().find(|(p, _)| p == part) {
            Some(entry) => entry.1 = content_type.to_string(),
            None => self
                .overrides
                .push((part.to_string(), content_type.to_string())),
        }
    }

    /// Drop overrides whose part does not satisfy `exists`.
    pub fn retain_overrides(&mut self, mut exists: impl FnMut(&str) -> bool) {
        self.overrides.retain(|(p, _)| exists(p));
    }

    /// Part names with an override of the given content type.
    pub fn parts_of_type<'a>(&'a self, content_type: &'a str) -> impl Iterator<Item = &'a str> {
        self.overrides
            .iter()
            .filter(move |(_, ct)| ct == content_type)
            .map(|(p, _)| p.as_str())
    }
}
