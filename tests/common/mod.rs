#![allow(dead_code)]

use std::io::{Cursor, Write};

use docmerge::docx::DocxPackage;
use docmerge::graph::body::Body;
use docmerge::parser::BodyParser;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

static CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Default Extension="jpeg" ContentType="image/jpeg"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

static PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// A relationship of `word/document.xml`: (id, target, external)
pub type Rel<'a> = (&'a str, &'a str, bool);

/// The `word/document.xml` text around the given `w:body` content
pub fn document(body_xml: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><w:body>{body_xml}<w:sectPr/></w:body></w:document>"#
    )
}

/// Builds a docx package in memory around the given `w:body` content
pub fn docx(body_xml: &str, rels: &[Rel], media: &[(&str, &[u8])]) -> Vec<u8> {
    docx_with_document(&document(body_xml), rels, media)
}

/// Builds a docx package in memory with `document` as its `word/document.xml`
pub fn docx_with_document(document: &str, rels: &[Rel], media: &[(&str, &[u8])]) -> Vec<u8> {

    let mut document_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, target, external) in rels {
        let (rel_type, mode) = match *external {
            true => ("hyperlink", r#" TargetMode="External""#),
            false => ("image", ""),
        };
        document_rels.push_str(&format!(
            r#"<Relationship Id="{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/{rel_type}" Target="{target}"{mode}/>"#
        ));
    }
    document_rels.push_str("</Relationships>");

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut add = |name: &str, data: &[u8]| {
        zip.start_file(name, options.clone()).unwrap();
        zip.write_all(data).unwrap();
    };
    add("[Content_Types].xml", CONTENT_TYPES.as_bytes());
    add("_rels/.rels", PACKAGE_RELS.as_bytes());
    add("word/document.xml", document.as_bytes());
    add("word/_rels/document.xml.rels", document_rels.as_bytes());
    for (name, data) in media {
        add(name, data);
    }
    zip.finish().unwrap().into_inner()
}

/// A run with optional `w:rPr` content
pub fn run(rpr: &str, text: &str) -> String {
    match rpr.is_empty() {
        true => format!(r#"<w:r><w:t xml:space="preserve">{text}</w:t></w:r>"#),
        false => format!(r#"<w:r><w:rPr>{rpr}</w:rPr><w:t xml:space="preserve">{text}</w:t></w:r>"#),
    }
}

pub fn paragraph(content: &str) -> String {
    format!("<w:p>{content}</w:p>")
}

/// An inline picture as Word writes it (to be placed inside a run); `extent` adds `wp:extent`.
/// The blip always carries an `a:extLst` whose `a:ext` has no size.
pub fn drawing(rid: &str, extent: Option<(i64, i64)>) -> String {
    let extent = extent
        .map(|(cx, cy)| format!(r#"<wp:extent cx="{cx}" cy="{cy}"/>"#))
        .unwrap_or_default();
    format!(
        r#"<w:drawing><wp:inline>{extent}<wp:docPr id="1" name="Picture 1" descr="Club logo"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:blipFill><a:blip r:embed="{rid}"><a:extLst><a:ext uri="{{28A0092B-C50C-407E-A947-70E740481C1C}}"/></a:extLst></a:blip></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#
    )
}

/// A real 2x2 PNG
pub fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 30, 30]));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

pub fn parse(bytes: &[u8]) -> Body {
    let package = DocxPackage::from_bytes(bytes).expect("Unable to read package");
    BodyParser::new(&package).parse().expect("Unable to parse body")
}
