//! Template-backed PPTX document that slides are appended to.

use crate::media::media_type;
use crate::package::{
    next_rel_id, parse_relationships, rels_path_for, relative_target, Package, REL_IMAGE,
    REL_SLIDE, REL_SLIDE_LAYOUT,
};
use crate::slide::{NewSlide, PlacedPicture};
use crate::template::{plain_attr, LayoutTemplate, TemplateCatalog, PRESENTATION_PART};
use deck_core::{Error, Paragraph, Region, Result, SlideDocument, SlideId};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Slide ids below 256 are reserved.
const MIN_SLIDE_ID: u32 = 256;

/// An image waiting to be written as a media part.
#[derive(Debug, Clone)]
struct MediaPart {
    part: String,
    data: Vec<u8>,
    extension: &'static str,
    content_type: &'static str,
}

/// A PPTX template opened for appending slides.
///
/// All changes are kept in memory; nothing is written until [`save`] or
/// [`write_to`], which emit the complete package in one go.
///
/// [`save`]: PptxDocument::save
/// [`write_to`]: PptxDocument::write_to
#[derive(Debug)]
pub struct PptxDocument {
    package: Package,
    catalog: TemplateCatalog,
    slides: Vec<NewSlide>,
    media: Vec<MediaPart>,
    next_media_number: usize,
}

impl PptxDocument {
    /// Open a `.pptx` template from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open a `.pptx` template from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::read(reader)?;
        let catalog = TemplateCatalog::load(&package)?;
        if catalog.is_empty() {
            return Err(Error::Template(
                "Template has no slide layouts".to_string(),
            ));
        }

        let next_media_number = package
            .part_names()
            .filter_map(|name| numbered_part(name, "ppt/media/image"))
            .max()
            .map_or(1, |max| max + 1);

        Ok(Self {
            package,
            catalog,
            slides: Vec::new(),
            media: Vec::new(),
            next_media_number,
        })
    }

    /// Layout catalog of the template.
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Number of slides added since opening.
    pub fn added_slides(&self) -> usize {
        self.slides.len()
    }

    /// Serialize the document and write it to `path`.
    ///
    /// The package is built completely in memory first, so a failure leaves
    /// no partial file behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        log::debug!("Saved {} new slides to {}", self.slides.len(), path.display());
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the complete package to `writer`.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        self.build_package()?.write(writer)
    }

    fn slide_mut(&mut self, slide: SlideId) -> Result<&mut NewSlide> {
        self.slides
            .get_mut(slide.0)
            .ok_or_else(|| Error::Template(format!("Unknown slide handle {}", slide.0)))
    }

    fn layout_of(&self, slide: SlideId) -> Option<&LayoutTemplate> {
        self.slides
            .get(slide.0)
            .and_then(|s| self.catalog.get(s.layout))
    }

    /// Template package plus the new slides and media, with the presentation,
    /// its relationships, and the content types updated to match.
    fn build_package(&self) -> Result<Package> {
        let mut package = self.package.clone();
        if self.slides.is_empty() {
            return Ok(package);
        }

        let pres_rels_part = rels_path_for(PRESENTATION_PART);
        let mut presentation = package.read_str(PRESENTATION_PART)?;
        let mut pres_rels = package.read_str(&pres_rels_part)?;
        let mut content_types = package.read_str(CONTENT_TYPES_PART)?;

        let existing_rels = parse_relationships(&pres_rels)?;
        let mut next_rid = next_rel_id(existing_rels.iter().map(|rel| rel.id.as_str()));
        let mut next_slide_id = existing_slide_ids(&presentation)?
            .into_iter()
            .max()
            .map_or(MIN_SLIDE_ID, |max| max + 1)
            .max(MIN_SLIDE_ID);
        let mut next_slide_number = package
            .part_names()
            .filter_map(|name| numbered_part(name, "ppt/slides/slide"))
            .max()
            .map_or(1, |max| max + 1);

        let mut sld_ids = String::new();
        let mut new_rels = String::new();
        let mut overrides = String::new();

        for slide in &self.slides {
            let layout = self.catalog.get(slide.layout).ok_or_else(|| {
                Error::Template(format!("Layout {} not in template", slide.layout))
            })?;

            let part = format!("ppt/slides/slide{}.xml", next_slide_number);
            next_slide_number += 1;

            let mut slide_rels = vec![(
                "rId1",
                REL_SLIDE_LAYOUT,
                relative_target(&part, &layout.part),
            )];
            let image_rel_id = slide.picture.as_ref().map(|picture| {
                slide_rels.push(("rId2", REL_IMAGE, relative_target(&part, &picture.media_part)));
                "rId2"
            });

            package.set(rels_path_for(&part), relationships_xml(&slide_rels).into_bytes());
            package.set(part.clone(), slide.to_xml(layout, image_rel_id).into_bytes());

            let rel_id = format!("rId{}", next_rid);
            next_rid += 1;

            let _ = write!(sld_ids, r#"<p:sldId id="{}" r:id="{}"/>"#, next_slide_id, rel_id);
            next_slide_id += 1;
            let _ = write!(
                new_rels,
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                rel_id,
                REL_SLIDE,
                escape(&relative_target(PRESENTATION_PART, &part))
            );
            let _ = write!(
                overrides,
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                part, SLIDE_CONTENT_TYPE
            );
        }

        for media in &self.media {
            package.set(media.part.clone(), media.data.clone());
            let declared = format!(r#"extension="{}""#, media.extension);
            if !content_types.to_lowercase().contains(&declared)
                && !overrides.contains(&format!(r#"Extension="{}""#, media.extension))
            {
                let _ = write!(
                    overrides,
                    r#"<Default Extension="{}" ContentType="{}"/>"#,
                    media.extension, media.content_type
                );
            }
        }

        insert_slide_ids(&mut presentation, &sld_ids)?;
        insert_before(&mut pres_rels, "</Relationships>", &new_rels)?;
        // Defaults must precede Overrides in [Content_Types].xml.
        let (defaults, overrides) = split_defaults(&overrides);
        insert_after_defaults(&mut content_types, &defaults)?;
        insert_before(&mut content_types, "</Types>", &overrides)?;

        package.set(PRESENTATION_PART, presentation.into_bytes());
        package.set(pres_rels_part, pres_rels.into_bytes());
        package.set(CONTENT_TYPES_PART, content_types.into_bytes());

        Ok(package)
    }
}

impl SlideDocument for PptxDocument {
    fn add_slide(&mut self, template: usize) -> Result<SlideId> {
        if self.catalog.get(template).is_none() {
            return Err(Error::Template(format!(
                "Layout {} not in template (catalog has {} layouts)",
                template,
                self.catalog.len()
            )));
        }
        self.slides.push(NewSlide::new(template));
        Ok(SlideId(self.slides.len() - 1))
    }

    fn set_title(&mut self, slide: SlideId, text: &str) -> Result<()> {
        if self.layout_of(slide).is_some_and(|layout| layout.title().is_none()) {
            log::warn!("Layout has no title placeholder, title '{}' not shown", text);
        }
        self.slide_mut(slide)?.title = Some(text.to_string());
        Ok(())
    }

    fn has_body(&self, slide: SlideId) -> bool {
        self.layout_of(slide)
            .is_some_and(|layout| layout.body().is_some())
    }

    fn set_body(&mut self, slide: SlideId, paragraphs: &[Paragraph]) -> Result<()> {
        if !self.has_body(slide) {
            return Err(Error::Template(
                "Layout has no body placeholder".to_string(),
            ));
        }
        self.slide_mut(slide)?.body = Some(paragraphs.to_vec());
        Ok(())
    }

    fn picture_region(&self, slide: SlideId) -> Option<Region> {
        self.layout_of(slide)
            .and_then(LayoutTemplate::picture)
            .and_then(|picture| picture.region)
    }

    fn insert_picture(&mut self, slide: SlideId, path: &Path, frame: Region) -> Result<()> {
        if self.picture_region(slide).is_none() {
            return Err(Error::Template(
                "Layout has no picture placeholder".to_string(),
            ));
        }

        let data = fs::read(path)
            .map_err(|e| Error::Image(format!("{}: {}", path.display(), e)))?;
        let (extension, content_type) = media_type(&data)?;

        let part = format!("ppt/media/image{}.{}", self.next_media_number, extension);
        self.next_media_number += 1;

        let description = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("picture")
            .to_string();

        let previous = self.slide_mut(slide)?.picture.replace(PlacedPicture {
            media_part: part.clone(),
            frame,
            description,
        });
        if let Some(previous) = previous {
            self.media.retain(|media| media.part != previous.media_part);
        }

        self.media.push(MediaPart {
            part,
            data,
            extension,
            content_type,
        });

        Ok(())
    }
}

/// Number `N` of a part named `{prefix}N.{ext}`.
fn numbered_part(name: &str, prefix: &str) -> Option<usize> {
    let rest = name.strip_prefix(prefix)?;
    let (number, _ext) = rest.split_once('.')?;
    number.parse().ok()
}

/// Plain `id` attributes of every `<p:sldId>` already in the presentation.
fn existing_slide_ids(xml: &str) -> Result<Vec<u32>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if crate::package::local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = plain_attr(e, b"id").and_then(|id| id.parse().ok()) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(ids)
}

fn relationships_xml(rels: &[(&str, &str, String)]) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target) in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id,
            rel_type,
            escape(target)
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn insert_before(xml: &mut String, marker: &str, fragment: &str) -> Result<()> {
    let pos = xml
        .rfind(marker)
        .ok_or_else(|| Error::Template(format!("Malformed package part: missing '{}'", marker)))?;
    xml.insert_str(pos, fragment);
    Ok(())
}

/// Append slide ids to `<p:sldIdLst>`, creating the list before `<p:sldSz>`
/// when the template has no slides.
fn insert_slide_ids(presentation: &mut String, sld_ids: &str) -> Result<()> {
    if presentation.contains("</p:sldIdLst>") {
        return insert_before(presentation, "</p:sldIdLst>", sld_ids);
    }

    let list = format!("<p:sldIdLst>{}</p:sldIdLst>", sld_ids);
    if presentation.contains("<p:sldIdLst/>") {
        *presentation = presentation.replacen("<p:sldIdLst/>", &list, 1);
        return Ok(());
    }

    let pos = presentation
        .find("<p:sldSz")
        .or_else(|| presentation.find("<p:notesSz"))
        .ok_or_else(|| {
            Error::Template("presentation.xml has no slide size element".to_string())
        })?;
    presentation.insert_str(pos, &list);
    Ok(())
}

/// Separate `<Default>` entries from `<Override>` entries.
fn split_defaults(entries: &str) -> (String, String) {
    let mut defaults = String::new();
    let mut overrides = String::new();
    for entry in entries.split_inclusive("/>") {
        if entry.starts_with("<Default") {
            defaults.push_str(entry);
        } else {
            overrides.push_str(entry);
        }
    }
    (defaults, overrides)
}

/// Insert `<Default>` entries right after the last existing one.
fn insert_after_defaults(content_types: &mut String, defaults: &str) -> Result<()> {
    if defaults.is_empty() {
        return Ok(());
    }
    match content_types.rfind("<Default ") {
        Some(start) => {
            let end = content_types[start..]
                .find("/>")
                .map(|offset| start + offset + 2)
                .ok_or_else(|| {
                    Error::Template("Malformed [Content_Types].xml".to_string())
                })?;
            content_types.insert_str(end, defaults);
            Ok(())
        }
        None => {
            let start = content_types.find("<Types").ok_or_else(|| {
                Error::Template("Malformed [Content_Types].xml".to_string())
            })?;
            let end = content_types[start..]
                .find('>')
                .map(|offset| start + offset + 1)
                .ok_or_else(|| {
                    Error::Template("Malformed [Content_Types].xml".to_string())
                })?;
            content_types.insert_str(end, defaults);
            Ok(())
        }
    }
}
