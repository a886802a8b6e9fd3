//! Read back the text and pictures of a written deck.

use crate::package::Package;
use crate::presentation::{SlideList, PRESENTATION_PART};
use crate::rels::rel_types;
use crate::xml::{attr, local_name, part_text, xml_error};
use deckgen_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// What a slide shows, as read from its XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideContent {
    /// Text of the title placeholder, if the slide has one.
    pub title: Option<String>,

    /// Text of every other text-bearing shape, in document order.
    pub texts: Vec<String>,

    /// Number of pictures.
    pub pictures: usize,
}

/// One slide of a deck read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Part name of the slide's layout.
    pub layout_part: Option<String>,

    pub content: SlideContent,
}

impl ReadSlide {
    /// Title text, empty when there is none.
    pub fn title(&self) -> &str {
        self.content.title.as_deref().unwrap_or_default()
    }

    /// First non-title text, empty when there is none.
    pub fn body(&self) -> &str {
        self.content.texts.first().map(String::as_str).unwrap_or_default()
    }
}

/// Reader for decks in slide list order.
#[derive(Debug, Default)]
pub struct DeckReader;

impl DeckReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a deck file.
    pub fn read_path(&self, path: &Path) -> Result<Vec<ReadSlide>> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read a deck from any seekable reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<ReadSlide>> {
        self.read_package(&Package::from_reader(reader)?)
    }

    /// Read the slides of a loaded package.
    pub fn read_package(&self, package: &Package) -> Result<Vec<ReadSlide>> {
        let presentation = part_text(PRESENTATION_PART, package.require(PRESENTATION_PART)?)?;
        let slide_list = SlideList::parse(&presentation)?;
        let rels = package.relationships_of(PRESENTATION_PART)?;

        let mut slides = Vec::with_capacity(slide_list.len());
        for (idx, entry) in slide_list.iter().enumerate() {
            let part = rels
                .get(&entry.rel_id)
                .ok_or_else(|| {
                    Error::XmlError(format!("Slide relationship {} is missing", entry.rel_id))
                })?
                .resolve(PRESENTATION_PART);

            let xml = part_text(&part, package.require(&part)?)?;
            let content = parse_slide_xml(&part, &xml)?;
            let layout_part = package
                .relationships_of(&part)?
                .iter()
                .find(|r| rel_types::is(&r.rel_type, "slideLayout"))
                .map(|r| r.resolve(&part));

            slides.push(ReadSlide {
                number: idx + 1,
                layout_part,
                content,
            });
        }

        Ok(slides)
    }
}

/// A shape being read.
#[derive(Debug, Default)]
struct ShapeText {
    is_title: bool,
    has_text_body: bool,
    paragraphs: Vec<String>,
}

/// Extract titles, texts and picture count from slide XML.
pub fn parse_slide_xml(part: &str, xml: &str) -> Result<SlideContent> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut content = SlideContent::default();
    let mut current: Option<ShapeText> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(ShapeText::default()),
                b"pic" => content.pictures += 1,
                b"txBody" => {
                    if let Some(shape) = current.as_mut() {
                        shape.has_text_body = true;
                    }
                }
                b"p" => {
                    if let Some(shape) = current.as_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"t" => in_text = true,
                b"ph" => mark_title(current.as_mut(), attr(e, b"type")),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    if let Some(shape) = current.as_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"br" => {
                    if let Some(para) = current.as_mut().and_then(|s| s.paragraphs.last_mut()) {
                        para.push('\n');
                    }
                }
                b"ph" => mark_title(current.as_mut(), attr(e, b"type")),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e.unescape().map_err(|err| xml_error(part, err))?;
                if let Some(para) = current.as_mut().and_then(|s| s.paragraphs.last_mut()) {
                    para.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"sp" => {
                    if let Some(shape) = current.take() {
                        let text = shape.paragraphs.join("\n");
                        if shape.is_title {
                            content.title.get_or_insert(text);
                        } else if shape.has_text_body {
                            content.texts.push(text);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
    }

    Ok(content)
}

fn mark_title(shape: Option<&mut ShapeText>, ph_type: Option<String>) {
    if let Some(shape) = shape {
        shape.is_title = matches!(ph_type.as_deref(), Some("title") | Some("ctrTitle"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_parse_slide_xml() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p" xmlns:r="r"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>
              <p:txBody><a:bodyPr/><a:p><a:r><a:t>Fish &amp; Chips</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>
              <p:txBody><a:bodyPr/><a:p><a:r><a:t>one</a:t></a:r></a:p><a:p/><a:p><a:r><a:t>three</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:cNvPr id="4" name="Picture 3"/><p:cNvSpPr/><p:nvPr><p:ph type="pic" idx="2"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
            <p:pic><p:nvPicPr><p:cNvPr id="5" name="Picture 4"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr></p:pic>
            </p:spTree></p:cSld></p:sld>"#;

        let content = parse_slide_xml("slide.xml", xml).unwrap();
        assert_eq!(content.title.as_deref(), Some("Fish & Chips"));
        assert_eq!(content.texts, vec!["one\n\nthree"]);
        assert_eq!(content.pictures, 1);
    }

    #[test]
    fn test_read_template_slides() {
        let slides = DeckReader::new()
            .read_package(&fixture::template_package("Light"))
            .unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].number, 1);
        assert_eq!(slides[0].title(), fixture::OLD_SLIDE_TITLE);
        assert_eq!(slides[0].content.pictures, 1);
        assert_eq!(
            slides[0].layout_part.as_deref(),
            Some("ppt/slideLayouts/slideLayout2.xml")
        );
        assert_eq!(slides[1].body(), "");
    }
}
