//! The slide list (`p:sldIdLst`) of `presentation.xml`.

use crate::xml::{attr, local_name, rel_attr, xml_error};
use deckgen_core::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Part name of the main presentation part in decks we build on.
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Lowest slide id allowed by the schema.
const MIN_SLIDE_ID: u32 = 256;

/// One `p:sldId` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    pub id: u32,
    pub rel_id: String,
}

/// The ordered slide list of a presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideList {
    entries: Vec<SlideId>,
}

impl SlideList {
    /// Read the slide list from `presentation.xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut entries = Vec::new();
        let mut in_list = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                    in_list = true;
                }
                Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                    in_list = false;
                }
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if in_list && local_name(e.name().as_ref()) == b"sldId" =>
                {
                    let id = attr(e, b"id")
                        .and_then(|v| v.parse().ok())
                        .ok_or_else(|| Error::XmlError("sldId without numeric id".to_string()))?;
                    let rel_id = rel_attr(e, b"id")
                        .ok_or_else(|| Error::XmlError("sldId without r:id".to_string()))?;
                    entries.push(SlideId { id, rel_id });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(PRESENTATION_PART, e)),
                _ => {}
            }
        }

        Ok(Self { entries })
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a position.
    pub fn get(&self, index: usize) -> Option<&SlideId> {
        self.entries.get(index)
    }

    /// Iterate in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = &SlideId> {
        self.entries.iter()
    }

    /// Remove the entry at `index`. Later entries shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<SlideId> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Append a slide referencing `rel_id`, returning its new slide id.
    pub fn push(&mut self, rel_id: impl Into<String>) -> u32 {
        let id = self.next_id();
        self.entries.push(SlideId {
            id,
            rel_id: rel_id.into(),
        });
        id
    }

    fn next_id(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID)
    }

    /// Rewrite `presentation.xml` with this slide list, leaving every other
    /// element untouched.
    pub fn apply_to(&self, xml: &str) -> Result<String> {
        let mut reader = Reader::from_str(xml);
        let mut writer = Writer::new(Vec::new());
        let mut prefix = String::from("p");
        let mut skipping = false;
        let mut written = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| xml_error(PRESENTATION_PART, e))?;

            match &event {
                Event::Eof => break,
                Event::Start(e) if local_name(e.name().as_ref()) == b"presentation" => {
                    prefix = element_prefix(e.name().as_ref());
                }
                Event::Start(e) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                    self.write_list(&mut writer, &prefix)?;
                    written = true;
                    skipping = true;
                    continue;
                }
                Event::Empty(e) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                    self.write_list(&mut writer, &prefix)?;
                    written = true;
                    continue;
                }
                Event::End(e) if skipping && local_name(e.name().as_ref()) == b"sldIdLst" => {
                    skipping = false;
                    continue;
                }
                Event::Start(e) | Event::Empty(e)
                    if !written && !skipping && follows_slide_list(local_name(e.name().as_ref())) =>
                {
                    self.write_list(&mut writer, &prefix)?;
                    written = true;
                }
                _ => {}
            }

            if skipping {
                continue;
            }
            writer
                .write_event(&event)
                .map_err(|e| xml_error(PRESENTATION_PART, e))?;
        }

        if !written {
            return Err(Error::TemplateError(
                "presentation.xml has no place for a slide list".to_string(),
            ));
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::XmlError(format!("Rewritten presentation is not UTF-8: {}", e)))
    }

    fn write_list(&self, writer: &mut Writer<Vec<u8>>, prefix: &str) -> Result<()> {
        let list_name = qualified(prefix, "sldIdLst");
        let item_name = qualified(prefix, "sldId");
        if self.entries.is_empty() {
            return emit(writer, Event::Empty(BytesStart::new(list_name.as_str())));
        }

        emit(writer, Event::Start(BytesStart::new(list_name.as_str())))?;
        for entry in &self.entries {
            let id = entry.id.to_string();
            let item = BytesStart::new(item_name.as_str())
                .with_attributes([("id", id.as_str()), ("r:id", entry.rel_id.as_str())]);
            emit(writer, Event::Empty(item))?;
        }
        emit(writer, Event::End(BytesEnd::new(list_name.as_str())))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| xml_error(PRESENTATION_PART, e))
}

/// Elements that come after `p:sldIdLst` in `p:presentation`.
fn follows_slide_list(local: &[u8]) -> bool {
    matches!(
        local,
        b"sldSz"
            | b"notesSz"
            | b"smartTags"
            | b"embeddedFontLst"
            | b"custShowLst"
            | b"photoAlbum"
            | b"custDataLst"
            | b"kinsoku"
            | b"defaultTextStyle"
            | b"modifyVerifier"
            | b"extLst"
    )
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

fn element_prefix(name: &[u8]) -> String {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => String::from_utf8_lossy(&name[..pos]).into_owned(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESENTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="259" r:id="rId5"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst><p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#;

    #[test]
    fn test_parse_preserves_order() {
        let list = SlideList::parse(PRESENTATION).unwrap();
        let rel_ids: Vec<_> = list.iter().map(|s| s.rel_id.as_str()).collect();
        assert_eq!(rel_ids, vec!["rId2", "rId5", "rId3"]);
        assert_eq!(list.get(1).unwrap().id, 259);
    }

    #[test]
    fn test_remove_back_to_front() {
        let mut list = SlideList::parse(PRESENTATION).unwrap();
        let mut removed = Vec::new();
        for i in (0..list.len()).rev() {
            removed.push(list.remove(i).unwrap().rel_id);
        }
        assert_eq!(removed, vec!["rId3", "rId5", "rId2"]);
        assert!(list.is_empty());
        assert!(list.remove(0).is_none());
    }

    #[test]
    fn test_next_id() {
        let mut list = SlideList::parse(PRESENTATION).unwrap();
        assert_eq!(list.push("rId9"), 260);

        let mut empty = SlideList::default();
        assert_eq!(empty.push("rId2"), 256);
        assert_eq!(empty.push("rId3"), 257);
    }

    #[test]
    fn test_apply_replaces_list() {
        let mut list = SlideList::default();
        list.push("rId7");
        list.push("rId8");

        let xml = list.apply_to(PRESENTATION).unwrap();
        assert!(xml.contains(
            r#"<p:sldIdLst><p:sldId id="256" r:id="rId7"/><p:sldId id="257" r:id="rId8"/></p:sldIdLst><p:sldSz"#
        ));
        assert!(!xml.contains("rId5"));
        assert!(xml.contains(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#));
        assert_eq!(SlideList::parse(&xml).unwrap(), list);
    }

    #[test]
    fn test_apply_inserts_missing_list() {
        let without = PRESENTATION.replace(
            r#"<p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="259" r:id="rId5"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst>"#,
            "",
        );
        let mut list = SlideList::default();
        list.push("rId4");

        let xml = list.apply_to(&without).unwrap();
        assert!(xml.contains(
            r#"</p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId4"/></p:sldIdLst><p:sldSz"#
        ));
    }

    #[test]
    fn test_apply_empty_list() {
        let xml = SlideList::default().apply_to(PRESENTATION).unwrap();
        assert!(xml.contains("<p:sldIdLst/>"));
        assert!(SlideList::parse(&xml).unwrap().is_empty());
    }
}
