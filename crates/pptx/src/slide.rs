//! Slides created from a layout and their XML rendering.

use crate::layout::{Geometry, Layout, Placeholder};
use crate::xml::{escape, NS_A, NS_P, NS_R, XML_DECLARATION};
use deckgen_core::{Error, Result};
use std::fmt::Write;

/// A placeholder copied from the layout onto a slide.
#[derive(Debug, Clone)]
pub struct PlaceholderShape {
    pub id: u32,
    pub placeholder: Placeholder,
    pub text: Option<String>,
}

/// A picture placed on a slide.
#[derive(Debug, Clone)]
pub struct Picture {
    pub id: u32,
    pub rel_id: String,
    pub description: String,
    pub geometry: Geometry,
}

/// A slide being built, rendered to XML when the deck is saved.
#[derive(Debug, Clone)]
pub struct SlideDraft {
    /// Part name of the layout this slide is based on.
    pub layout_part: String,
    shapes: Vec<PlaceholderShape>,
    pictures: Vec<Picture>,
    next_shape_id: u32,
}

impl SlideDraft {
    /// Create a slide with a copy of each cloneable layout placeholder.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut draft = Self {
            layout_part: layout.part_name.clone(),
            shapes: Vec::new(),
            pictures: Vec::new(),
            // id 1 is the shape tree itself
            next_shape_id: 2,
        };

        for placeholder in layout.cloneable_placeholders() {
            let id = draft.allocate_id();
            let text = placeholder.ph_type.has_text_frame().then(String::new);
            draft.shapes.push(PlaceholderShape {
                id,
                placeholder: placeholder.clone(),
                text,
            });
        }

        draft
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    /// Placeholder shapes in document order.
    pub fn shapes(&self) -> &[PlaceholderShape] {
        &self.shapes
    }

    /// Pictures in document order.
    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    /// Current title text, if the slide has a title placeholder.
    pub fn title(&self) -> Option<&str> {
        self.shapes
            .iter()
            .find(|s| s.placeholder.ph_type.is_title())
            .and_then(|s| s.text.as_deref())
    }

    /// Set the title text.
    pub fn set_title(&mut self, text: &str) -> Result<()> {
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.placeholder.ph_type.is_title())
            .ok_or_else(|| Error::PlaceholderMissing("title".to_string()))?;
        shape.text = Some(text.to_string());
        Ok(())
    }

    /// Placeholder with the given `idx`.
    pub fn placeholder(&self, idx: u32) -> Option<&Placeholder> {
        self.shapes
            .iter()
            .find(|s| s.placeholder.idx == idx)
            .map(|s| &s.placeholder)
    }

    /// Set the text of the placeholder with the given `idx`.
    pub fn set_placeholder_text(&mut self, idx: u32, text: &str) -> Result<()> {
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.placeholder.idx == idx)
            .ok_or_else(|| Error::PlaceholderMissing(format!("idx={}", idx)))?;
        shape.text = Some(text.to_string());
        Ok(())
    }

    /// Add a picture referencing the image relationship `rel_id`.
    pub fn add_picture(&mut self, rel_id: &str, description: &str, geometry: Geometry) {
        let id = self.allocate_id();
        self.pictures.push(Picture {
            id,
            rel_id: rel_id.to_string(),
            description: description.to_string(),
            geometry,
        });
    }

    /// Render the slide part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(2048);
        let _ = write!(
            xml,
            r#"{}
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>"#,
            XML_DECLARATION, NS_A, NS_R, NS_P
        );
        xml.push_str(
            r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
        );

        for shape in &self.shapes {
            render_placeholder(&mut xml, shape);
        }
        for picture in &self.pictures {
            render_picture(&mut xml, picture);
        }

        xml.push_str(
            r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        );
        xml
    }
}

fn render_placeholder(xml: &mut String, shape: &PlaceholderShape) {
    let ph = &shape.placeholder;
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#,
        shape.id,
        escape(&ph.name)
    );
    if let Some(ph_type) = ph.ph_type.as_attr() {
        let _ = write!(xml, r#" type="{}""#, escape(ph_type));
    }
    if let Some(orient) = &ph.orient {
        let _ = write!(xml, r#" orient="{}""#, escape(orient));
    }
    if let Some(sz) = &ph.sz {
        let _ = write!(xml, r#" sz="{}""#, escape(sz));
    }
    if ph.idx != 0 {
        let _ = write!(xml, r#" idx="{}""#, ph.idx);
    }
    xml.push_str("/></p:nvPr></p:nvSpPr><p:spPr/>");

    if let Some(text) = &shape.text {
        xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
        render_paragraphs(xml, text);
        xml.push_str("</p:txBody>");
    }
    xml.push_str("</p:sp>");
}

/// One `a:p` per line; an empty line is an empty paragraph. A vertical tab
/// inside a line is a soft line break.
fn render_paragraphs(xml: &mut String, text: &str) {
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            xml.push_str("<a:p/>");
            continue;
        }

        xml.push_str("<a:p>");
        for (i, run) in line.split('\u{b}').enumerate() {
            if i > 0 {
                xml.push_str("<a:br/>");
            }
            if !run.is_empty() {
                let _ = write!(
                    xml,
                    r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#,
                    escape(run)
                );
            }
        }
        xml.push_str("</a:p>");
    }
}

fn render_picture(xml: &mut String, picture: &Picture) {
    let g = picture.geometry;
    let _ = write!(
        xml,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {n}" descr="{descr}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        id = picture.id,
        n = picture.id - 1,
        descr = escape(&picture.description),
        rel = escape(&picture.rel_id),
        x = g.x,
        y = g.y,
        cx = g.cx,
        cy = g.cy,
    );
}
