//! Small but complete theme templates for tests.

use crate::layout::Geometry;
use crate::package::Package;
use crate::rels::{rel_types, Relationships};
use crate::xml::{NS_A, NS_P, NS_R, XML_DECLARATION};
use deckgen_core::Theme;
use std::io::Cursor;
use std::path::Path;

pub const MASTER_TITLE_BOX: Geometry = Geometry {
    x: 457200,
    y: 274638,
    cx: 8229600,
    cy: 1143000,
};

pub const MASTER_BODY_BOX: Geometry = Geometry {
    x: 457200,
    y: 1600200,
    cx: 8229600,
    cy: 4525963,
};

pub const PICTURE_BOX: Geometry = Geometry {
    x: 1792288,
    y: 612775,
    cx: 5486400,
    cy: 4114800,
};

pub const OLD_SLIDE_TITLE: &str = "Company Template";
pub const OLD_MEDIA_PART: &str = "ppt/media/image1.png";

/// A 1x1 transparent PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const THEME_PART: &str = "ppt/theme/theme1.xml";
const MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";

/// `(type, idx, geometry)` of a layout placeholder.
type Ph = (Option<&'static str>, u32, Option<Geometry>);

const FOOTERS: [Ph; 3] = [(Some("dt"), 10, None), (Some("ftr"), 11, None), (Some("sldNum"), 12, None)];

/// Layout names and placeholders, in master order.
fn layout_specs() -> Vec<(&'static str, Vec<Ph>)> {
    let title = (Some("title"), 0, None);
    let with_footers = |mut phs: Vec<Ph>| {
        phs.extend(FOOTERS);
        phs
    };

    vec![
        (
            "Title Slide",
            with_footers(vec![
                (Some("ctrTitle"), 0, Some(MASTER_TITLE_BOX)),
                (Some("subTitle"), 1, None),
            ]),
        ),
        ("Title and Content", with_footers(vec![title, (None, 1, None)])),
        ("Section Header", with_footers(vec![title, (Some("body"), 1, None)])),
        ("Two Content", with_footers(vec![title, (None, 1, None), (None, 2, None)])),
        (
            "Comparison",
            with_footers(vec![
                title,
                (Some("body"), 1, None),
                (None, 2, None),
                (Some("body"), 3, None),
                (None, 4, None),
            ]),
        ),
        ("Title Only", with_footers(vec![title])),
        ("Blank", with_footers(Vec::new())),
        (
            "Content with Caption",
            with_footers(vec![title, (None, 1, None), (Some("body"), 2, None)]),
        ),
        (
            "Picture with Caption",
            with_footers(vec![
                title,
                (Some("pic"), 1, Some(PICTURE_BOX)),
                (Some("body"), 2, None),
            ]),
        ),
    ]
}

fn xfrm(g: Geometry) -> String {
    format!(
        r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
        g.x, g.y, g.cx, g.cy
    )
}

fn placeholder_sp(id: u32, (ph_type, idx, geometry): Ph) -> String {
    let mut ph = String::from("<p:ph");
    if let Some(t) = ph_type {
        ph.push_str(&format!(r#" type="{}""#, t));
    }
    if idx != 0 {
        ph.push_str(&format!(r#" idx="{}""#, idx));
    }
    ph.push_str("/>");

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Placeholder {n}"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr>{sp_pr}</p:sp>"#,
        id = id,
        n = id - 1,
        ph = ph,
        sp_pr = geometry.map(xfrm).unwrap_or_else(|| "<p:spPr/>".to_string()),
    )
}

fn shape_tree(shapes: &str) -> String {
    format!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree>"#,
        shapes
    )
}

fn placeholders(phs: &[Ph]) -> String {
    phs.iter()
        .enumerate()
        .map(|(i, ph)| placeholder_sp(i as u32 + 2, *ph))
        .collect()
}

fn master_xml(layout_count: usize) -> String {
    let shapes = placeholders(&[
        (Some("title"), 0, Some(MASTER_TITLE_BOX)),
        (Some("body"), 1, Some(MASTER_BODY_BOX)),
    ]);
    let ids: String = (0..layout_count)
        .map(|i| format!(r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#, 2147483649 + i, i + 1))
        .collect();
    format!(
        r#"{}
<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{}</p:sldLayoutIdLst></p:sldMaster>"#,
        XML_DECLARATION,
        NS_A,
        NS_R,
        NS_P,
        shape_tree(&shapes),
        ids
    )
}

fn layout_xml(name: &str, phs: &[Ph]) -> String {
    format!(
        r#"{}
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" preserve="1"><p:cSld name="{}">{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        XML_DECLARATION,
        NS_A,
        NS_R,
        NS_P,
        name,
        shape_tree(&placeholders(phs))
    )
}

fn old_slide_xml(title: &str, picture: bool) -> String {
    let pic = if picture {
        r#"<p:pic><p:nvPicPr><p:cNvPr id="3" name="Logo"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic>"#
    } else {
        ""
    };
    let shapes = format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>{}"#,
        title, pic
    );
    format!(
        r#"{}
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld>{}</p:cSld></p:sld>"#,
        XML_DECLARATION,
        NS_A,
        NS_R,
        NS_P,
        shape_tree(&shapes)
    )
}

fn theme_xml(theme_name: &str) -> String {
    format!(
        r#"{}
<a:theme xmlns:a="{}" name="{}"><a:themeElements/></a:theme>"#,
        XML_DECLARATION, NS_A, theme_name
    )
}

fn content_types_xml(layout_count: usize) -> String {
    let mut overrides = vec![
        (
            "/ppt/presentation.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        ),
        (
            format!("/{}", MASTER_PART),
            "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
        ),
        (
            format!("/{}", THEME_PART),
            "application/vnd.openxmlformats-officedocument.theme+xml",
        ),
        ("/ppt/slides/slide1.xml".to_string(), crate::content_types::CT_SLIDE),
        ("/ppt/slides/slide2.xml".to_string(), crate::content_types::CT_SLIDE),
    ];
    for i in 1..=layout_count {
        overrides.push((
            format!("/ppt/slideLayouts/slideLayout{}.xml", i),
            "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
        ));
    }

    let mut xml = format!(
        r#"{}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/>"#,
        XML_DECLARATION
    );
    for (part, ct) in overrides {
        xml.push_str(&format!(r#"<Override PartName="{}" ContentType="{}"/>"#, part, ct));
    }
    xml.push_str("</Types>");
    xml
}

fn presentation_xml() -> String {
    format!(
        r#"{}
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst><p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        XML_DECLARATION, NS_A, NS_R, NS_P
    )
}

fn template_parts(theme_name: &str) -> Package {
    let specs = layout_specs();
    let mut package = Package::new();

    package.set_part(crate::package::CONTENT_TYPES_PART, content_types_xml(specs.len()));

    let mut root = Relationships::new();
    root.add(rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml");
    package.set_part(crate::package::ROOT_RELS_PART, root.to_xml());

    package.set_part("ppt/presentation.xml", presentation_xml());
    let mut pres = Relationships::new();
    pres.add(rel_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    pres.add(rel_types::SLIDE, "slides/slide1.xml");
    pres.add(rel_types::SLIDE, "slides/slide2.xml");
    pres.add(
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme",
        "theme/theme1.xml",
    );
    package.set_part("ppt/_rels/presentation.xml.rels", pres.to_xml());

    package.set_part(MASTER_PART, master_xml(specs.len()));
    let mut master = Relationships::new();
    for (i, (name, phs)) in specs.iter().enumerate() {
        let part = format!("ppt/slideLayouts/slideLayout{}.xml", i + 1);
        master.add(rel_types::SLIDE_LAYOUT, format!("../slideLayouts/slideLayout{}.xml", i + 1));

        let mut layout_rels = Relationships::new();
        layout_rels.add(rel_types::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        package.set_part(
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
            layout_rels.to_xml(),
        );
        package.set_part(part, layout_xml(name, phs));
    }
    master.add(
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme",
        "../theme/theme1.xml",
    );
    package.set_part("ppt/slideMasters/_rels/slideMaster1.xml.rels", master.to_xml());
    package.set_part(THEME_PART, theme_xml(theme_name));

    package.set_part("ppt/slides/slide1.xml", old_slide_xml(OLD_SLIDE_TITLE, true));
    let mut slide1 = Relationships::new();
    slide1.add(rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml");
    slide1.add(rel_types::IMAGE, "../media/image1.png");
    package.set_part("ppt/slides/_rels/slide1.xml.rels", slide1.to_xml());
    package.set_part(OLD_MEDIA_PART, PNG_BYTES);

    package.set_part("ppt/slides/slide2.xml", old_slide_xml("Agenda", false));
    let mut slide2 = Relationships::new();
    slide2.add(rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout6.xml");
    package.set_part("ppt/slides/_rels/slide2.xml.rels", slide2.to_xml());

    package
}

/// Bytes of a template .pptx whose theme part is named `theme_name`.
pub fn template_bytes(theme_name: &str) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    template_parts(theme_name)
        .write_to(&mut cursor)
        .expect("fixture package writes");
    cursor.into_inner()
}

/// A template package read back from its ZIP bytes.
pub fn template_package(theme_name: &str) -> Package {
    Package::from_reader(Cursor::new(template_bytes(theme_name))).expect("fixture package reads")
}

/// Write one template per theme into `dir`, named like the theme files.
pub fn write_templates(dir: &Path) {
    for theme in Theme::ALL {
        let name = theme.to_string();
        std::fs::write(dir.join(theme.template_file_name()), template_bytes(&name))
            .expect("fixture template writes");
    }
}

/// Name of the theme part of a saved deck.
pub fn theme_name_of(path: &Path) -> Option<String> {
    let package = Package::open(path).ok()?;
    let xml = String::from_utf8(package.part(THEME_PART)?.to_vec()).ok()?;
    let start = xml.find(r#"name=""#)? + r#"name=""#.len();
    let end = xml[start..].find('"')? + start;
    Some(xml[start..end].to_string())
}
