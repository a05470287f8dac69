//! Backends turn the extracted [`Body`](crate::graph::body::Body) into output:
//!
//! - `html`: the HTML fragment that goes into every email
//! - `email`: per-recipient rendering of the full message through Tera templates
//!
//! [`Backends`] lists what the CLI can do with a merged message.

pub mod email;
pub mod html;

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backends {
    /// Send through an SMTP relay
    Smtp,
    /// Write one `.eml` file per recipient
    File,
    /// Print each recipient's rendered HTML without sending anything
    Preview,
    /// Print the body extracted from the document as JSON
    Json,
}
