use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::graph::body::Body;
use crate::graph::inlines::{Image, ImageSource, Inline, Link, Span};

/// How embedded images are referenced from the HTML
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ImageEmbedding {
    /// `data:` URIs carrying the base64 image bytes
    #[default]
    DataUri,
    /// `cid:` references to inline MIME parts returned alongside the HTML
    ContentId,
}

/// Image bytes to be attached as an inline part when using [`ImageEmbedding::ContentId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_id: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedBody {
    pub html: String,
    pub inline_images: Vec<InlineImage>,
}

/// Renders the body as an HTML fragment: each paragraph's inlines followed by `<br>`
pub fn render_body(body: &Body, embedding: ImageEmbedding) -> RenderedBody {
    let mut rendered = RenderedBody::default();
    for paragraph in body.paragraphs.iter() {
        for inline in paragraph.inlines.iter() {
            match inline {
                Inline::Span(span) => render_span(&mut rendered.html, span),
                Inline::Link(link) => render_link(&mut rendered.html, link),
                Inline::Image(image) => render_image(&mut rendered, image, embedding),
            }
        }
        rendered.html.push_str("<br>");
    }
    rendered
}

/// Renders the body with images as `data:` URIs
pub fn render_body_html(body: &Body) -> String {
    render_body(body, ImageEmbedding::DataUri).html
}

fn render_span(html: &mut String, span: &Span) {
    html.push_str(&format!(
        r#"<span style="{}">{}</span>"#,
        escape_attribute(&span.style.css()),
        escape_text(&span.text)
    ));
}

fn render_link(html: &mut String, link: &Link) {
    html.push_str(&format!(
        r#"<a href="{}">{}</a>"#,
        escape_attribute(&link.href),
        escape_text(&link.text)
    ));
}

fn render_image(rendered: &mut RenderedBody, image: &Image, embedding: ImageEmbedding) {
    let src = match (&image.source, embedding) {
        (ImageSource::Linked { url }, _) => url.clone(),
        (
            ImageSource::Embedded {
                content_type,
                bytes,
                ..
            },
            ImageEmbedding::DataUri,
        ) => format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)),
        (
            ImageSource::Embedded {
                content_type,
                bytes,
                ..
            },
            ImageEmbedding::ContentId,
        ) => {
            let content_id = format!("image{}@docmerge", rendered.inline_images.len() + 1);
            rendered.inline_images.push(InlineImage {
                content_id: content_id.clone(),
                content_type: content_type.clone(),
                bytes: bytes.clone(),
            });
            format!("cid:{content_id}")
        }
    };

    let html = &mut rendered.html;
    html.push_str(&format!(r#"<img src="{}""#, escape_attribute(&src)));
    if let Some(alt) = &image.alt {
        html.push_str(&format!(r#" alt="{}""#, escape_attribute(alt)));
    }
    if let Some(size) = image.size {
        html.push_str(&format!(
            r#" style="width:{}px; height:{}px;""#,
            size.width, size.height
        ));
    }
    html.push_str(" />");
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' => escaped.push_str("<br>"),
            '\t' => escaped.push_str("&emsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
