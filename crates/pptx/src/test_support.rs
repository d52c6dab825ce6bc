//! Minimal in-memory PPTX template used by the tests.
//!
//! One master and three layouts, in catalog order:
//! 0. "Title Slide": ctrTitle, subTitle, date
//! 1. "Title and Content": title (inherits master geometry), body idx 1, footer
//! 2. "Title and Picture": title, pic idx 1

use crate::package::Package;
use std::io::Cursor;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slideLayouts/slideLayout2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slideLayouts/slideLayout3.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

const PRESENTATION_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/></Relationships>"#;

const MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout3.xml"/></Relationships>"#;

const LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

fn placeholder(id: u32, name: &str, ph: &str, xfrm: Option<(i64, i64, i64, i64)>) -> String {
    let sp_pr = match xfrm {
        Some((x, y, cx, cy)) => format!(
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
            x, y, cx, cy
        ),
        None => "<p:spPr/>".to_string(),
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr/><p:nvPr>{}</p:nvPr></p:nvSpPr>{}<p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody></p:sp>"#,
        id, name, ph, sp_pr
    )
}

fn sp_tree(shapes: &[String]) -> String {
    format!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{}</p:spTree>"#,
        shapes.concat()
    )
}

fn layout(name: &str, shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {}><p:cSld name="{}">{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        NS,
        name,
        sp_tree(shapes)
    )
}

fn master() -> String {
    let shapes = [
        placeholder(2, "Title Placeholder 1", r#"<p:ph type="title"/>"#, Some((457200, 274638, 8229600, 1143000))),
        placeholder(3, "Text Placeholder 2", r#"<p:ph type="body" idx="1"/>"#, Some((457200, 1600200, 8229600, 4525963))),
        placeholder(4, "Date Placeholder 3", r#"<p:ph type="dt" sz="half" idx="2"/>"#, Some((457200, 6356350, 2133600, 365125))),
    ];
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {}><p:cSld>{}</p:cSld><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/><p:sldLayoutId id="2147483651" r:id="rId3"/></p:sldLayoutIdLst></p:sldMaster>"#,
        NS,
        sp_tree(&shapes)
    )
}

fn presentation() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        NS
    )
}

/// The template as an in-memory package.
pub(crate) fn template_package() -> Package {
    let mut package = Package::default();
    package.set("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec());
    package.set("_rels/.rels", ROOT_RELS.as_bytes().to_vec());
    package.set("ppt/presentation.xml", presentation().into_bytes());
    package.set("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS.as_bytes().to_vec());
    package.set("ppt/slideMasters/slideMaster1.xml", master().into_bytes());
    package.set("ppt/slideMasters/_rels/slideMaster1.xml.rels", MASTER_RELS.as_bytes().to_vec());

    let layouts = [
        layout(
            "Title Slide",
            &[
                placeholder(2, "Title 1", r#"<p:ph type="ctrTitle"/>"#, Some((685800, 2130425, 7772400, 1470025))),
                placeholder(3, "Subtitle 2", r#"<p:ph type="subTitle" idx="1"/>"#, Some((1371600, 3886200, 6400800, 1752600))),
                placeholder(4, "Date Placeholder 3", r#"<p:ph type="dt" sz="half" idx="10"/>"#, None),
            ],
        ),
        layout(
            "Title and Content",
            &[
                placeholder(2, "Title 1", r#"<p:ph type="title"/>"#, None),
                placeholder(3, "Content Placeholder 2", r#"<p:ph idx="1"/>"#, None),
                placeholder(4, "Footer Placeholder 3", r#"<p:ph type="ftr" sz="quarter" idx="11"/>"#, None),
            ],
        ),
        layout(
            "Title and Picture",
            &[
                placeholder(2, "Title 1", r#"<p:ph type="title"/>"#, None),
                placeholder(3, "Picture Placeholder 2", r#"<p:ph type="pic" idx="1"/>"#, Some((914400, 1600200, 7315200, 4572000))),
            ],
        ),
    ];

    for (idx, xml) in layouts.into_iter().enumerate() {
        package.set(format!("ppt/slideLayouts/slideLayout{}.xml", idx + 1), xml.into_bytes());
        package.set(
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", idx + 1),
            LAYOUT_RELS.as_bytes().to_vec(),
        );
    }

    package
}

/// The template as `.pptx` bytes.
pub(crate) fn template_bytes() -> Vec<u8> {
    template_package()
        .write(Cursor::new(Vec::new()))
        .unwrap()
        .into_inner()
}
