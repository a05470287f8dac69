//! The body extracted from a document: paragraphs made up of styled spans, hyperlinks and
//! images. Every element is serializeable with `serde`, which gives us the JSON backend and
//! makes the graph usable as template context.

pub mod body;
pub mod inlines;
