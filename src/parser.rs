//! Walks `word/document.xml` and produces the [`Body`] graph.
//!
//! Only the top-level paragraphs of the document body are converted. Within a paragraph,
//! runs become styled spans (preceded by any images they contain) and hyperlinks become links.

use roxmltree::Node;

use crate::docx::units::{emu_to_px, half_points_to_pt};
use crate::docx::xml::{self, A, MC, O, R, V, W, WP};
use crate::docx::{DOCUMENT_PART, DocxPackage};
use crate::errors::DocxError;
use crate::graph::body::{Body, Paragraph};
use crate::graph::inlines::{
    Image, ImageSource, Inline, Link, PixelSize, RunStyle, Span, VerticalAlign, highlight_color,
};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub struct BodyParser<'p> {
    package: &'p DocxPackage,
}

impl<'p> BodyParser<'p> {
    pub fn new(package: &'p DocxPackage) -> Self {
        BodyParser { package }
    }

    pub fn parse(&self) -> Result<Body, DocxError> {
        let text = self.package.document_xml()?;
        let doc = xml::parse(DOCUMENT_PART, text)?;
        let mut body = Body::new();

        let Some(body_node) = xml::child(&doc.root_element(), W, "body") else {
            log::warn!("Document has no body; nothing to convert");
            return Ok(body);
        };

        for paragraph in body_node.children().filter(|n| xml::is_element(n, W, "p")) {
            let mut inlines = vec![];
            self.add_paragraph_content(&paragraph, &mut inlines);
            body.push(Paragraph::new(inlines));
        }

        log::debug!(
            "Extracted {} paragraphs ({} words, {} images)",
            body.paragraphs.len(),
            body.word_count(),
            body.images().count()
        );
        Ok(body)
    }

    fn add_paragraph_content(&self, parent: &Node, inlines: &mut Vec<Inline>) {
        for child in parent.children().filter(Node::is_element) {
            if xml::is_element(&child, MC, "AlternateContent") {
                if let Some(branch) = xml::alternate_content_branch(&child) {
                    self.add_paragraph_content(&branch, inlines)
                }
                continue;
            }
            if child.tag_name().namespace() != Some(W) {
                continue;
            }
            match child.tag_name().name() {
                "r" => self.add_run(&child, inlines),
                "hyperlink" => {
                    if let Some(link) = self.hyperlink(&child) {
                        inlines.push(Inline::Link(link))
                    }
                }
                "ins" | "smartTag" | "fldSimple" => self.add_paragraph_content(&child, inlines),
                "sdt" => {
                    if let Some(content) = xml::child(&child, W, "sdtContent") {
                        self.add_paragraph_content(&content, inlines)
                    }
                }
                _ => {}
            }
        }
    }

    fn hyperlink(&self, node: &Node) -> Option<Link> {
        let text: String = node
            .descendants()
            .filter(|n| xml::is_element(n, W, "t"))
            .filter_map(|n| n.text())
            .collect();

        let href = match node.attribute((R, "id")) {
            Some(id) => match self.package.relationships().get(id) {
                Some(rel) => rel.target.clone(),
                None => {
                    log::warn!("Hyperlink target {id} not found for {text:?}; skipping hyperlink");
                    return None;
                }
            },
            None => format!("#{}", node.attribute((W, "anchor"))?),
        };
        Some(Link { href, text })
    }

    fn add_run(&self, run: &Node, inlines: &mut Vec<Inline>) {
        let style = xml::child(run, W, "rPr")
            .map(|rpr| run_style(&rpr))
            .unwrap_or_default();
        let mut text = String::new();
        self.add_run_content(run, &mut text, inlines);

        if !text.is_empty() {
            inlines.push(Inline::Span(Span { text, style }))
        }
    }

    fn add_run_content(&self, parent: &Node, text: &mut String, inlines: &mut Vec<Inline>) {
        for child in parent.children().filter(Node::is_element) {
            if xml::is_element(&child, MC, "AlternateContent") {
                if let Some(branch) = xml::alternate_content_branch(&child) {
                    self.add_run_content(&branch, text, inlines)
                }
                continue;
            }
            if child.tag_name().namespace() != Some(W) {
                continue;
            }
            match child.tag_name().name() {
                "t" => text.push_str(child.text().unwrap_or_default()),
                "br" | "cr" => text.push('\n'),
                "tab" => text.push('\t'),
                "drawing" => self.add_drawing_images(&child, inlines),
                "pict" | "object" => self.add_vml_images(&child, inlines),
                _ => {}
            }
        }
    }

    fn add_drawing_images(&self, drawing: &Node, inlines: &mut Vec<Inline>) {
        let size = drawing_size(drawing);
        let alt = xml::descendant(drawing, WP, "docPr").and_then(|doc_pr| {
            doc_pr
                .attribute("descr")
                .or_else(|| doc_pr.attribute("title"))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        });

        for blip in drawing.descendants().filter(|n| xml::is_element(n, A, "blip")) {
            let source = match (blip.attribute((R, "embed")), blip.attribute((R, "link"))) {
                (Some(id), _) | (None, Some(id)) => self.image_source(id),
                (None, None) => None,
            };
            if let Some(source) = source {
                inlines.push(image(source, size, alt.clone()))
            }
        }
    }

    fn add_vml_images(&self, pict: &Node, inlines: &mut Vec<Inline>) {
        for imagedata in pict.descendants().filter(|n| xml::is_element(n, V, "imagedata")) {
            let Some(source) = imagedata.attribute((R, "id")).and_then(|id| self.image_source(id))
            else {
                continue;
            };
            let size = imagedata
                .ancestors()
                .find(|n| xml::is_element(n, V, "shape"))
                .and_then(|shape| shape.attribute("style").and_then(vml_size));
            let alt = imagedata.attribute((O, "title")).or_else(|| imagedata.attribute("title"));
            inlines.push(image(source, size, alt.map(str::to_string)))
        }
    }

    fn image_source(&self, id: &str) -> Option<ImageSource> {
        let Some(rel) = self.package.relationships().get(id) else {
            log::warn!("Image relationship {id} not found; skipping image");
            return None;
        };
        if rel.external {
            return Some(ImageSource::Linked {
                url: rel.target.clone(),
            });
        }
        let Some(bytes) = self.package.part(&rel.target) else {
            log::warn!("Image part {} missing from document; skipping image", rel.target);
            return None;
        };
        let content_type = self
            .package
            .content_types()
            .content_type_of(&rel.target)
            .unwrap_or(FALLBACK_CONTENT_TYPE);
        Some(ImageSource::Embedded {
            part: rel.target.clone(),
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}

fn image(source: ImageSource, size: Option<PixelSize>, alt: Option<String>) -> Inline {
    match size {
        Some(size) => log::info!(
            "Image inserted with size: {}px x {}px",
            size.width,
            size.height
        ),
        None => log::warn!("Size attributes not found, using default size."),
    }
    Inline::Image(Image { source, size, alt })
}

/// Collects the character formatting of a run from its `w:rPr`
pub fn run_style(rpr: &Node) -> RunStyle {
    let mut style = RunStyle::default();
    for prop in rpr.children().filter(Node::is_element) {
        if prop.tag_name().namespace() != Some(W) {
            continue;
        }
        let val = prop.attribute((W, "val"));
        match prop.tag_name().name() {
            "b" => style.bold = xml::on_off(&prop),
            "i" => style.italic = xml::on_off(&prop),
            "u" => style.underline = xml::on_off(&prop),
            "strike" | "dstrike" => style.strike = xml::on_off(&prop),
            "sz" => {
                style.font_size = val
                    .and_then(|v| v.parse::<u32>().ok())
                    .filter(|half_points| *half_points > 0)
                    .map(half_points_to_pt)
            }
            "rFonts" => {
                style.font_family = prop
                    .attribute((W, "ascii"))
                    .or_else(|| prop.attribute((W, "hAnsi")))
                    .map(str::to_string)
            }
            "highlight" => style.highlight = val.and_then(highlight_color).map(str::to_string),
            "color" => style.color = val.and_then(hex_color),
            "vertAlign" => {
                style.vertical_align = match val {
                    Some("superscript") => Some(VerticalAlign::Superscript),
                    Some("subscript") => Some(VerticalAlign::Subscript),
                    _ => None,
                }
            }
            _ => {}
        }
    }
    style
}

fn hex_color(value: &str) -> Option<String> {
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", value.to_ascii_uppercase()))
    } else {
        // "auto" and theme-only colours
        None
    }
}

/// Size of a DrawingML drawing from `wp:extent`, falling back to the shape transform
fn drawing_size(drawing: &Node) -> Option<PixelSize> {
    let extent = xml::descendant(drawing, WP, "extent").or_else(|| {
        xml::descendant(drawing, A, "xfrm").and_then(|xfrm| xml::child(&xfrm, A, "ext"))
    })?;
    let cx = extent.attribute("cx")?.parse::<i64>().ok()?;
    let cy = extent.attribute("cy")?.parse::<i64>().ok()?;
    if cx <= 0 || cy <= 0 {
        return None;
    }
    Some(PixelSize {
        width: emu_to_px(cx),
        height: emu_to_px(cy),
    })
}

/// Size of a VML shape from its CSS-like `style` attribute, e.g. `width:72pt;height:36pt`
fn vml_size(style: &str) -> Option<PixelSize> {
    let mut width = None;
    let mut height = None;
    for declaration in style.split(';') {
        let Some((key, value)) = declaration.split_once(':') else {
            continue;
        };
        match key.trim() {
            "width" => width = css_length_to_px(value.trim()),
            "height" => height = css_length_to_px(value.trim()),
            _ => {}
        }
    }
    Some(PixelSize {
        width: width?,
        height: height?,
    })
}

fn css_length_to_px(value: &str) -> Option<f64> {
    let (number, factor) = if let Some(n) = value.strip_suffix("pt") {
        (n, 96.0 / 72.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("in") {
        (n, 96.0)
    } else {
        (value, 1.0)
    };
    let px = number.trim().parse::<f64>().ok()? * factor;
    Some((px * 100.0).round() / 100.0)
}
