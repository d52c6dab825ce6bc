//! Slide layout catalog of a PPTX template.
//!
//! The catalog is the ordered `sldLayoutIdLst` of the first slide master.
//! Each layout lists its placeholders; a placeholder that does not carry its
//! own `a:xfrm` inherits the geometry of the master placeholder of the same
//! kind.

use crate::package::{local_name, resolve_target, Package, REL_SLIDE_LAYOUT};
use deck_core::{Error, Region, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub(crate) const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// What a placeholder is used for when filling a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Title,
    Body,
    Picture,
    /// Date, footer, slide number, header: never copied onto new slides.
    Furniture,
    Other,
}

impl PlaceholderKind {
    /// Classify a placeholder from its `type` attribute and shape name.
    fn classify(ph_type: Option<&str>, name: &str) -> Self {
        match ph_type.unwrap_or("obj") {
            "title" | "ctrTitle" => Self::Title,
            "pic" => Self::Picture,
            "dt" | "ftr" | "sldNum" | "hdr" => Self::Furniture,
            "body" | "obj" | "subTitle" if is_picture_name(name) => Self::Picture,
            "body" | "obj" | "subTitle" => Self::Body,
            _ => Self::Other,
        }
    }

    /// Kind used to look up inherited geometry on the master.
    fn master_kind(self) -> Self {
        match self {
            Self::Picture | Self::Other => Self::Body,
            kind => kind,
        }
    }
}

/// Picture placeholders are sometimes typed as plain content and only named as
/// pictures (English and Spanish PowerPoint).
fn is_picture_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("picture") || lowered.contains("imagen")
}

/// A placeholder shape declared by a layout or master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// Raw `type` attribute, kept so cloned placeholders bind to the layout.
    pub ph_type: Option<String>,
    /// Raw `idx` attribute.
    pub idx: Option<String>,
    pub name: String,
    pub region: Option<Region>,
}

/// One entry of the layout catalog.
#[derive(Debug, Clone)]
pub struct LayoutTemplate {
    /// Package part name, e.g. `ppt/slideLayouts/slideLayout2.xml`.
    pub part: String,
    /// Display name from `<p:cSld name=...>`.
    pub name: String,
    pub placeholders: Vec<Placeholder>,
}

impl LayoutTemplate {
    fn find(&self, kind: PlaceholderKind) -> Option<&Placeholder> {
        self.placeholders.iter().find(|ph| ph.kind == kind)
    }

    pub fn title(&self) -> Option<&Placeholder> {
        self.find(PlaceholderKind::Title)
    }

    pub fn body(&self) -> Option<&Placeholder> {
        self.find(PlaceholderKind::Body)
    }

    pub fn picture(&self) -> Option<&Placeholder> {
        self.find(PlaceholderKind::Picture)
    }

    /// Placeholders that are copied onto a slide created from this layout.
    pub fn cloned_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders
            .iter()
            .filter(|ph| ph.kind != PlaceholderKind::Furniture)
    }
}

/// Ordered layout catalog of a template.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    layouts: Vec<LayoutTemplate>,
}

impl TemplateCatalog {
    /// Read the catalog from the first slide master of `package`.
    pub fn load(package: &Package) -> Result<Self> {
        let master_part = first_master_part(package)?;
        let master_xml = package.read_str(&master_part)?;

        let master_placeholders = extract_placeholders(&master_xml)?;
        let layout_ids = extract_layout_ids(&master_xml)?;
        let master_rels = package.relationships(&master_part)?;

        let mut layouts = Vec::with_capacity(layout_ids.len());
        for rel_id in layout_ids {
            let rel = master_rels
                .iter()
                .find(|rel| rel.id == rel_id && rel.rel_type == REL_SLIDE_LAYOUT)
                .ok_or_else(|| {
                    Error::Template(format!(
                        "Slide master references unknown layout relationship '{}'",
                        rel_id
                    ))
                })?;

            let part = resolve_target(&master_part, &rel.target);
            let xml = package.read_str(&part)?;

            let mut placeholders = extract_placeholders(&xml)?;
            for ph in placeholders.iter_mut().filter(|ph| ph.region.is_none()) {
                ph.region = master_placeholders
                    .iter()
                    .find(|m| m.kind == ph.kind.master_kind())
                    .and_then(|m| m.region);
            }

            layouts.push(LayoutTemplate {
                name: extract_layout_name(&xml)?,
                part,
                placeholders,
            });
        }

        log::debug!(
            "Template catalog: {}",
            layouts
                .iter()
                .enumerate()
                .map(|(idx, layout)| format!("{}={}", idx, layout.name))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { layouts })
    }

    pub fn get(&self, index: usize) -> Option<&LayoutTemplate> {
        self.layouts.get(index)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// Part name of the first slide master listed in the presentation.
fn first_master_part(package: &Package) -> Result<String> {
    let xml = package.read_str(PRESENTATION_PART)?;
    let master_rel_id = first_rel_id_of(&xml, b"sldMasterId")?.ok_or_else(|| {
        Error::Template("Presentation declares no slide master".to_string())
    })?;

    let rels = package.relationships(PRESENTATION_PART)?;
    let rel = rels
        .iter()
        .find(|rel| rel.id == master_rel_id)
        .ok_or_else(|| {
            Error::Template(format!(
                "Slide master relationship '{}' not found",
                master_rel_id
            ))
        })?;

    Ok(resolve_target(PRESENTATION_PART, &rel.target))
}

/// Relationship ids of every `<p:sldLayoutId>`, in order.
fn extract_layout_ids(xml: &str) -> Result<Vec<String>> {
    collect_rel_ids(xml, b"sldLayoutId")
}

fn first_rel_id_of(xml: &str, element: &[u8]) -> Result<Option<String>> {
    Ok(collect_rel_ids(xml, element)?.into_iter().next())
}

/// `r:id` attributes of all elements with local name `element`.
pub(crate) fn collect_rel_ids(xml: &str, element: &[u8]) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == element =>
            {
                if let Some(id) = relationship_attr(e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing part: {}", e))),
            _ => {}
        }
    }

    Ok(ids)
}

/// Value of the namespaced `r:id` attribute (not a plain `id`).
pub(crate) fn relationship_attr(e: &BytesStart) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        let key = attr.key.as_ref();
        (key != b"id" && local_name(key) == b"id")
            .then(|| String::from_utf8_lossy(&attr.value).to_string())
    })
}

/// Plain (non-namespaced) attribute value.
pub(crate) fn plain_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn extract_layout_name(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"cSld" =>
            {
                return Ok(plain_attr(e, b"name").unwrap_or_default());
            }
            Ok(Event::Eof) => return Ok(String::new()),
            Err(e) => return Err(Error::XmlError(format!("Error parsing layout: {}", e))),
            _ => {}
        }
    }
}

/// Placeholder shape under construction while walking the XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    name: String,
    is_placeholder: bool,
    ph_type: Option<String>,
    idx: Option<String>,
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
}

impl ShapeInfo {
    fn into_placeholder(self) -> Option<Placeholder> {
        if !self.is_placeholder {
            return None;
        }

        let region = match (self.offset, self.extent) {
            (Some((x, y)), Some((width, height))) => Some(Region::new(x, y, width, height)),
            _ => None,
        };

        Some(Placeholder {
            kind: PlaceholderKind::classify(self.ph_type.as_deref(), &self.name),
            ph_type: self.ph_type,
            idx: self.idx,
            name: self.name,
            region,
        })
    }
}

/// Extract placeholder shapes with their geometry from a layout or master.
fn extract_placeholders(xml: &str) -> Result<Vec<Placeholder>> {
    let mut placeholders = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut in_xfrm = false;

    loop {
        let event = reader.read_event();
        match event {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let is_empty = matches!(event, Ok(Event::Empty(_)));
                let name = e.name();

                match local_name(name.as_ref()) {
                    b"sp" | b"pic" if !is_empty => {
                        current_shape = Some(ShapeInfo::default());
                    }
                    b"xfrm" if !is_empty => in_xfrm = true,
                    b"cNvPr" => {
                        if let Some(ref mut shape) = current_shape {
                            shape.name = plain_attr(e, b"name").unwrap_or_default();
                        }
                    }
                    b"ph" => {
                        if let Some(ref mut shape) = current_shape {
                            shape.is_placeholder = true;
                            shape.ph_type = plain_attr(e, b"type");
                            shape.idx = plain_attr(e, b"idx");
                        }
                    }
                    b"off" if in_xfrm => {
                        if let Some(ref mut shape) = current_shape {
                            shape.offset = coordinate_pair(e, b"x", b"y");
                        }
                    }
                    b"ext" if in_xfrm => {
                        if let Some(ref mut shape) = current_shape {
                            shape.extent = coordinate_pair(e, b"cx", b"cy");
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    if let Some(placeholder) =
                        current_shape.take().and_then(ShapeInfo::into_placeholder)
                    {
                        placeholders.push(placeholder);
                    }
                    in_xfrm = false;
                }
                b"xfrm" => in_xfrm = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing placeholders: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(placeholders)
}

/// Two integer attributes, e.g. `x`/`y` of `<a:off>`.
fn coordinate_pair(e: &BytesStart, first: &[u8], second: &[u8]) -> Option<(i64, i64)> {
    let a = plain_attr(e, first)?.parse().ok()?;
    let b = plain_attr(e, second)?.parse().ok()?;
    Some((a, b))
}
