use std::collections::HashMap;

use serde::Serialize;

use super::xml::{self, PACKAGE_RELS};
use crate::errors::DocxError;

/// A single `Relationship` entry from a `.rels` part
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// For internal targets this is the resolved part name (no leading slash)
    pub target: String,
    pub external: bool,
}

/// Relationships of one source part, keyed by id
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Parses a `.rels` part; internal targets are resolved against `base_dir`
    pub fn parse(part: &str, text: &str, base_dir: &str) -> Result<Self, DocxError> {
        let doc = xml::parse(part, text)?;
        let mut by_id = HashMap::new();
        for rel in doc
            .root_element()
            .children()
            .filter(|n| xml::is_element(n, PACKAGE_RELS, "Relationship"))
        {
            let (Some(id), Some(target)) = (rel.attribute("Id"), rel.attribute("Target")) else {
                log::warn!("Skipping relationship without Id or Target in {part}");
                continue;
            };
            let external = rel
                .attribute("TargetMode")
                .is_some_and(|mode| mode.eq_ignore_ascii_case("External"));
            let target = match external {
                true => target.to_string(),
                false => resolve_part_name(base_dir, target),
            };
            by_id.insert(
                id.to_string(),
                Relationship {
                    id: id.to_string(),
                    rel_type: rel.attribute("Type").unwrap_or_default().to_string(),
                    target,
                    external,
                },
            );
        }
        Ok(Relationships { by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Resolves a relationship target relative to the source part's directory, returning a part
/// name without the leading slash
pub fn resolve_part_name(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None if base_dir.is_empty() => target.to_string(),
        None => format!("{}/{}", base_dir.trim_end_matches('/'), target),
    };
    let mut segments: Vec<&str> = vec![];
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}
