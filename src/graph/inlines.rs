use serde::Serialize;

/// Inline content of a paragraph, in document order
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inline {
    Span(Span),
    Link(Link),
    Image(Image),
}

impl Inline {
    /// Plain text carried by the inline; images carry none
    pub fn text(&self) -> &str {
        match self {
            Inline::Span(span) => &span.text,
            Inline::Link(link) => &link.text,
            Inline::Image(_) => "",
        }
    }
}

/// The text of one run together with its character formatting. Line breaks are kept as `\n`
/// and tabs as `\t`.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub text: String,
    pub style: RunStyle,
}

/// A hyperlink; its text is the concatenation of every text node below it
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Image {
    pub source: ImageSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<PixelSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSource {
    /// Image bytes stored in the package
    Embedded {
        part: String,
        content_type: String,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    /// Image referenced by an external URL
    Linked { url: String },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Superscript,
    Subscript,
}

/// Character formatting collected from a run's `w:rPr`
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// In points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// A CSS colour name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    /// `#RRGGBB`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
}

impl RunStyle {
    /// Inline CSS for the style, each declaration terminated by `;` and joined without
    /// separators, e.g. `font-weight: bold;font-size: 12pt;`
    pub fn css(&self) -> String {
        let mut declarations: Vec<String> = vec![];
        if self.bold {
            declarations.push("font-weight: bold;".into());
        }
        if self.italic {
            declarations.push("font-style: italic;".into());
        }
        match (self.underline, self.strike) {
            (true, true) => declarations.push("text-decoration: underline line-through;".into()),
            (true, false) => declarations.push("text-decoration: underline;".into()),
            (false, true) => declarations.push("text-decoration: line-through;".into()),
            (false, false) => {}
        }
        if let Some(size) = self.font_size {
            declarations.push(format!("font-size: {size}pt;"));
        }
        if let Some(family) = &self.font_family {
            declarations.push(format!("font-family: {family};"));
        }
        if let Some(highlight) = &self.highlight {
            declarations.push(format!("background-color: {highlight};"));
        }
        if let Some(color) = &self.color {
            declarations.push(format!("color: {color};"));
        }
        match self.vertical_align {
            Some(VerticalAlign::Superscript) => declarations.push("vertical-align: super;".into()),
            Some(VerticalAlign::Subscript) => declarations.push("vertical-align: sub;".into()),
            None => {}
        }
        declarations.concat()
    }

    pub fn is_plain(&self) -> bool {
        *self == RunStyle::default()
    }
}

/// Maps a `w:highlight` value onto a CSS colour. Word only offers a fixed palette; anything
/// outside of it is shown as yellow.
pub fn highlight_color(value: &str) -> Option<&'static str> {
    let color = match value {
        "none" => return None,
        "black" => "black",
        "blue" => "blue",
        "cyan" => "cyan",
        "green" => "lime",
        "magenta" => "magenta",
        "red" => "red",
        "white" => "white",
        "darkBlue" => "navy",
        "darkCyan" => "teal",
        "darkGreen" => "green",
        "darkMagenta" => "purple",
        "darkRed" => "maroon",
        "darkYellow" => "olive",
        "darkGray" => "gray",
        "lightGray" => "silver",
        _ => "yellow",
    };
    Some(color)
}
