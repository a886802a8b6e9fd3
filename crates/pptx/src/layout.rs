//! Slide layouts of a template and the placeholders they define.

use crate::package::Package;
use crate::presentation::PRESENTATION_PART;
use crate::rels::Relationships;
use crate::xml::{attr, attr_i64, local_name, part_text, rel_attr, xml_error};
use deckgen_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Position and size of a shape in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Placeholder type as written in `p:ph/@type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    Object,
    Picture,
    Chart,
    Table,
    Diagram,
    Media,
    ClipArt,
    Date,
    Footer,
    SlideNumber,
    Header,
    Other(String),
}

impl PlaceholderType {
    /// Parse the `type` attribute. An absent attribute means `obj`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.unwrap_or("obj") {
            "title" => Self::Title,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::Subtitle,
            "body" => Self::Body,
            "obj" => Self::Object,
            "pic" => Self::Picture,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "dgm" => Self::Diagram,
            "media" => Self::Media,
            "clipArt" => Self::ClipArt,
            "dt" => Self::Date,
            "ftr" => Self::Footer,
            "sldNum" => Self::SlideNumber,
            "hdr" => Self::Header,
            other => Self::Other(other.to_string()),
        }
    }

    /// The attribute value, or `None` for the implicit `obj`.
    pub fn as_attr(&self) -> Option<&str> {
        Some(match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::Subtitle => "subTitle",
            Self::Body => "body",
            Self::Object => return None,
            Self::Picture => "pic",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::ClipArt => "clipArt",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Header => "hdr",
            Self::Other(s) => s.as_str(),
        })
    }

    /// Whether this is a slide title.
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    /// Whether a slide created from the layout gets a copy of this placeholder.
    pub fn is_cloneable(&self) -> bool {
        !matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }

    /// Whether the cloned placeholder carries an empty text body.
    pub fn has_text_frame(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::Subtitle | Self::Body | Self::Object
        )
    }

    /// The master placeholder type this one inherits geometry from.
    fn family(&self) -> Family {
        match self {
            Self::Title | Self::CenterTitle => Family::Title,
            Self::Date => Family::Date,
            Self::Footer => Family::Footer,
            Self::SlideNumber => Family::SlideNumber,
            Self::Header => Family::Header,
            _ => Family::Body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Title,
    Body,
    Date,
    Footer,
    SlideNumber,
    Header,
}

/// A placeholder shape on a layout or master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub ph_type: PlaceholderType,
    pub idx: u32,
    pub orient: Option<String>,
    pub sz: Option<String>,
    pub name: String,
    pub geometry: Option<Geometry>,
}

/// A slide layout with its placeholders.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Part name, e.g. `ppt/slideLayouts/slideLayout2.xml`.
    pub part_name: String,

    /// Name from `p:cSld/@name`.
    pub name: String,

    /// Placeholders in document order.
    pub placeholders: Vec<Placeholder>,
}

impl Layout {
    /// Placeholder with the given `idx`.
    pub fn placeholder(&self, idx: u32) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.idx == idx)
    }

    /// Placeholders copied onto new slides.
    pub fn cloneable_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders.iter().filter(|p| p.ph_type.is_cloneable())
    }
}

/// Load the layouts of the first slide master, in `sldLayoutIdLst` order.
pub fn load_layouts(package: &Package, presentation_rels: &Relationships) -> Result<Vec<Layout>> {
    let presentation = part_text(PRESENTATION_PART, package.require(PRESENTATION_PART)?)?;
    let master_rel = first_master_rel_id(&presentation)?
        .ok_or_else(|| Error::TemplateError("Template has no slide master".to_string()))?;
    let master_part = presentation_rels
        .get(&master_rel)
        .ok_or_else(|| {
            Error::TemplateError(format!("Slide master relationship {} is missing", master_rel))
        })?
        .resolve(PRESENTATION_PART);

    let master_xml = part_text(&master_part, package.require(&master_part)?)?;
    let master = parse_shape_tree(&master_part, &master_xml)?;
    let master_rels = package.relationships_of(&master_part)?;

    let mut layouts = Vec::with_capacity(master.layout_rel_ids.len());
    for rel_id in &master.layout_rel_ids {
        let part_name = master_rels
            .get(rel_id)
            .ok_or_else(|| {
                Error::TemplateError(format!("Layout relationship {} is missing", rel_id))
            })?
            .resolve(&master_part);

        let xml = part_text(&part_name, package.require(&part_name)?)?;
        let tree = parse_shape_tree(&part_name, &xml)?;

        let placeholders = tree
            .placeholders
            .into_iter()
            .map(|mut ph| {
                if ph.geometry.is_none() {
                    ph.geometry = master
                        .placeholders
                        .iter()
                        .find(|m| m.ph_type.family() == ph.ph_type.family())
                        .and_then(|m| m.geometry);
                }
                ph
            })
            .collect();

        layouts.push(Layout {
            part_name,
            name: tree.name.unwrap_or_default(),
            placeholders,
        });
    }

    log::debug!(
        "Template layouts: {:?}",
        layouts.iter().map(|l| l.name.as_str()).collect::<Vec<_>>()
    );
    Ok(layouts)
}

/// `r:id` of the first `p:sldMasterId` in `presentation.xml`.
fn first_master_rel_id(presentation: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(presentation);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldMasterId" =>
            {
                return Ok(rel_attr(e, b"id"));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(xml_error(PRESENTATION_PART, e)),
            _ => {}
        }
    }
}

/// What we need from a master or layout part.
#[derive(Debug, Default)]
struct ShapeTree {
    name: Option<String>,
    placeholders: Vec<Placeholder>,
    layout_rel_ids: Vec<String>,
}

/// A placeholder shape being read.
#[derive(Debug, Default)]
struct PendingShape {
    name: Option<String>,
    ph: Option<(Option<String>, u32, Option<String>, Option<String>)>,
    off: Option<(i64, i64)>,
    ext: Option<(i64, i64)>,
}

impl PendingShape {
    fn into_placeholder(self) -> Option<Placeholder> {
        let (ph_type, idx, orient, sz) = self.ph?;
        let geometry = match (self.off, self.ext) {
            (Some((x, y)), Some((cx, cy))) => Some(Geometry { x, y, cx, cy }),
            _ => None,
        };
        Some(Placeholder {
            ph_type: PlaceholderType::from_attr(ph_type.as_deref()),
            idx,
            orient,
            sz,
            name: self.name.unwrap_or_default(),
            geometry,
        })
    }
}

fn parse_shape_tree(part: &str, xml: &str) -> Result<ShapeTree> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut tree = ShapeTree::default();
    let mut shape: Option<PendingShape> = None;
    let mut in_sp_pr = false;
    let mut in_xfrm = false;

    loop {
        let event = reader.read_event().map_err(|e| xml_error(part, e))?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match local_name(e.name().as_ref()) {
                    b"cSld" => tree.name = attr(e, b"name"),
                    b"sldLayoutId" => {
                        if let Some(id) = rel_attr(e, b"id") {
                            tree.layout_rel_ids.push(id);
                        }
                    }
                    b"sp" if !is_empty => shape = Some(PendingShape::default()),
                    b"spPr" if !is_empty => in_sp_pr = true,
                    b"xfrm" if in_sp_pr && !is_empty => in_xfrm = true,
                    _ => {
                        if let Some(pending) = shape.as_mut() {
                            read_shape_element(pending, e, in_xfrm);
                        }
                    }
                }
            }
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    if let Some(ph) = shape.take().and_then(PendingShape::into_placeholder) {
                        tree.placeholders.push(ph);
                    }
                    in_sp_pr = false;
                    in_xfrm = false;
                }
                b"spPr" => in_sp_pr = false,
                b"xfrm" => in_xfrm = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(tree)
}

fn read_shape_element(shape: &mut PendingShape, e: &BytesStart<'_>, in_xfrm: bool) {
    match local_name(e.name().as_ref()) {
        b"cNvPr" if shape.name.is_none() => shape.name = attr(e, b"name"),
        b"ph" => {
            let idx = attr(e, b"idx").and_then(|v| v.parse().ok()).unwrap_or(0);
            shape.ph = Some((attr(e, b"type"), idx, attr(e, b"orient"), attr(e, b"sz")));
        }
        b"off" if in_xfrm => {
            if let (Some(x), Some(y)) = (attr_i64(e, b"x"), attr_i64(e, b"y")) {
                shape.off = Some((x, y));
            }
        }
        b"ext" if in_xfrm => {
            if let (Some(cx), Some(cy)) = (attr_i64(e, b"cx"), attr_i64(e, b"cy")) {
                shape.ext = Some((cx, cy));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_placeholder_type_round_trip() {
        for value in ["title", "ctrTitle", "subTitle", "body", "pic", "dt", "sldNum"] {
            assert_eq!(PlaceholderType::from_attr(Some(value)).as_attr(), Some(value));
        }
        assert_eq!(PlaceholderType::from_attr(None), PlaceholderType::Object);
        assert_eq!(PlaceholderType::Object.as_attr(), None);
    }

    #[test]
    fn test_cloneable_and_text_frames() {
        assert!(!PlaceholderType::Date.is_cloneable());
        assert!(!PlaceholderType::SlideNumber.is_cloneable());
        assert!(PlaceholderType::Picture.is_cloneable());
        assert!(!PlaceholderType::Picture.has_text_frame());
        assert!(PlaceholderType::Subtitle.has_text_frame());
    }

    #[test]
    fn test_parse_shape_tree() {
        let xml = r#"<p:sldLayout xmlns:a="a" xmlns:p="p"><p:cSld name="Picture with Caption"><p:spTree>
            <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm></p:grpSpPr>
            <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:spPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="30" cy="40"/></a:xfrm></p:spPr></p:sp>
            <p:sp><p:nvSpPr><p:cNvPr id="3" name="Picture Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="pic" idx="1"/></p:nvPr></p:nvSpPr>
              <p:spPr/></p:sp>
            <p:sp><p:nvSpPr><p:cNvPr id="4" name="Decoration"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>
            </p:spTree></p:cSld></p:sldLayout>"#;

        let tree = parse_shape_tree("layout.xml", xml).unwrap();
        assert_eq!(tree.name.as_deref(), Some("Picture with Caption"));
        assert_eq!(tree.placeholders.len(), 2);

        let title = &tree.placeholders[0];
        assert_eq!(title.ph_type, PlaceholderType::Title);
        assert_eq!(title.name, "Title 1");
        assert_eq!(
            title.geometry,
            Some(Geometry {
                x: 10,
                y: 20,
                cx: 30,
                cy: 40
            })
        );

        let pic = &tree.placeholders[1];
        assert_eq!(pic.ph_type, PlaceholderType::Picture);
        assert_eq!(pic.idx, 1);
        assert_eq!(pic.geometry, None);
    }

    #[test]
    fn test_load_layouts_from_template() {
        let package = fixture::template_package("Light");
        let rels = package.relationships_of(PRESENTATION_PART).unwrap();
        let layouts = load_layouts(&package, &rels).unwrap();

        assert_eq!(layouts.len(), 9);
        assert_eq!(layouts[0].name, "Title Slide");
        assert_eq!(layouts[8].name, "Picture with Caption");
        assert!(layouts[0].placeholders.iter().any(|p| p.ph_type.is_title()));

        let picture = layouts[8].placeholder(1).unwrap();
        assert_eq!(picture.ph_type, PlaceholderType::Picture);
        assert_eq!(picture.geometry, Some(fixture::PICTURE_BOX));

        // The content layout's body has no xfrm of its own and inherits the master's.
        let body = layouts[1].placeholder(1).unwrap();
        assert_eq!(body.geometry, Some(fixture::MASTER_BODY_BOX));
    }
}
