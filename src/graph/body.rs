use serde::Serialize;

use super::inlines::{Image, Inline};

/// Everything extracted from a document's body, in document order
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

impl Body {
    pub fn new() -> Self {
        Body { paragraphs: vec![] }
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph)
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.inlines.is_empty())
    }

    /// All images in document order
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.inlines.iter())
            .filter_map(|inline| match inline {
                Inline::Image(image) => Some(image),
                _ => None,
            })
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::word_count).sum()
    }
}

impl Paragraph {
    pub fn new(inlines: Vec<Inline>) -> Self {
        Paragraph { inlines }
    }

    /// Paragraph text without formatting
    pub fn text(&self) -> String {
        self.inlines.iter().map(Inline::text).collect()
    }

    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }
}
