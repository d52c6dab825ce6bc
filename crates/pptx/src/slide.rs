//! Slides appended to a template, and their XML.

use crate::template::{LayoutTemplate, Placeholder, PlaceholderKind};
use deck_core::{Paragraph, Region};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

/// Language tag written on every run.
const RUN_LANG: &str = "es-ES";

/// A picture bound to a slide's picture placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedPicture {
    /// Media part name, e.g. `ppt/media/image3.png`.
    pub media_part: String,
    pub frame: Region,
    /// Original file name, used as the shape description.
    pub description: String,
}

/// A slide created from a template layout, filled in by the renderer.
#[derive(Debug, Clone)]
pub struct NewSlide {
    pub layout: usize,
    pub title: Option<String>,
    pub body: Option<Vec<Paragraph>>,
    pub picture: Option<PlacedPicture>,
}

impl NewSlide {
    pub fn new(layout: usize) -> Self {
        Self {
            layout,
            title: None,
            body: None,
            picture: None,
        }
    }

    /// Generate the slide part.
    ///
    /// `image_rel_id` must be given when the slide carries a picture.
    pub fn to_xml(&self, layout: &LayoutTemplate, image_rel_id: Option<&str>) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str(r#"<a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm>"#);
        xml.push_str("</p:grpSpPr>");

        // IDs: 1=group, 2+=placeholders in layout order
        for (offset, placeholder) in layout.cloned_placeholders().enumerate() {
            let shape_id = offset as u32 + 2;
            match placeholder.kind {
                PlaceholderKind::Title => {
                    let lines: Vec<Paragraph> = self
                        .title
                        .as_deref()
                        .unwrap_or_default()
                        .split('\n')
                        .map(Paragraph::new)
                        .collect();
                    write_text_placeholder(&mut xml, shape_id, placeholder, &lines);
                }
                PlaceholderKind::Body if is_first_body(layout, placeholder) => {
                    let paragraphs = self.body.as_deref().unwrap_or_default();
                    write_text_placeholder(&mut xml, shape_id, placeholder, paragraphs);
                }
                PlaceholderKind::Picture if is_first_picture(layout, placeholder) => {
                    match (&self.picture, image_rel_id) {
                        (Some(picture), Some(rel_id)) => {
                            write_picture(&mut xml, shape_id, placeholder, picture, rel_id)
                        }
                        _ => write_text_placeholder(&mut xml, shape_id, placeholder, &[]),
                    }
                }
                _ => write_text_placeholder(&mut xml, shape_id, placeholder, &[]),
            }
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        xml
    }
}

fn is_first_body(layout: &LayoutTemplate, placeholder: &Placeholder) -> bool {
    layout.body().is_some_and(|body| std::ptr::eq(body, placeholder))
}

fn is_first_picture(layout: &LayoutTemplate, placeholder: &Placeholder) -> bool {
    layout
        .picture()
        .is_some_and(|picture| std::ptr::eq(picture, placeholder))
}

/// `<p:ph>` element binding a shape to its layout placeholder.
fn write_ph(xml: &mut String, placeholder: &Placeholder) {
    xml.push_str("<p:ph");
    if let Some(ref ph_type) = placeholder.ph_type {
        let _ = write!(xml, r#" type="{}""#, escape(ph_type));
    }
    if let Some(ref idx) = placeholder.idx {
        let _ = write!(xml, r#" idx="{}""#, escape(idx));
    }
    xml.push_str("/>");
}

/// A placeholder `<p:sp>` with one `<a:p>` per paragraph. Geometry is
/// inherited from the layout.
fn write_text_placeholder(
    xml: &mut String,
    shape_id: u32,
    placeholder: &Placeholder,
    paragraphs: &[Paragraph],
) {
    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}"/>"#,
        shape_id,
        escape(&placeholder.name)
    );
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str("<p:nvPr>");
    write_ph(xml, placeholder);
    xml.push_str("</p:nvPr>");
    xml.push_str("</p:nvSpPr>");
    xml.push_str("<p:spPr/>");

    xml.push_str("<p:txBody>");
    xml.push_str("<a:bodyPr/>");
    xml.push_str("<a:lstStyle/>");
    if paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for paragraph in paragraphs {
        write_paragraph(xml, paragraph);
    }
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    if paragraph.text.is_empty() {
        xml.push_str("<a:p/>");
        return;
    }

    xml.push_str("<a:p><a:r>");
    let _ = write!(xml, r#"<a:rPr lang="{}""#, RUN_LANG);
    if let Some(style) = paragraph.style {
        let _ = write!(
            xml,
            r#" sz="{}" b="{}""#,
            (style.size * 100.0).round() as i64,
            if style.bold { 1 } else { 0 }
        );
    }
    xml.push_str(r#" dirty="0"/>"#);
    let _ = write!(xml, "<a:t>{}</a:t>", escape(&paragraph.text));
    xml.push_str("</a:r></a:p>");
}

/// A `<p:pic>` filling the picture placeholder at an explicit frame.
fn write_picture(
    xml: &mut String,
    shape_id: u32,
    placeholder: &Placeholder,
    picture: &PlacedPicture,
    rel_id: &str,
) {
    let frame = picture.frame;

    xml.push_str("<p:pic>");
    xml.push_str("<p:nvPicPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}" descr="{}"/>"#,
        shape_id,
        escape(&placeholder.name),
        escape(&picture.description)
    );
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noGrp="1" noChangeAspect="1"/></p:cNvPicPr>"#);
    xml.push_str("<p:nvPr>");
    write_ph(xml, placeholder);
    xml.push_str("</p:nvPr>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    let _ = write!(xml, r#"<a:blip r:embed="{}"/>"#, escape(rel_id));
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    let _ = write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.x, frame.y);
    let _ = write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.width, frame.height);
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    xml.push_str("</p:pic>");
}
