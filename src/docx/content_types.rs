use std::collections::HashMap;

use super::xml::{self, CONTENT_TYPES};
use crate::errors::DocxError;

/// The package's `[Content_Types].xml`: extension defaults plus per-part overrides
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    pub fn parse(part: &str, text: &str) -> Result<Self, DocxError> {
        let doc = xml::parse(part, text)?;
        let mut content_types = ContentTypes::default();
        for node in doc.root_element().children().filter(|n| n.is_element()) {
            let Some(content_type) = node.attribute("ContentType") else {
                continue;
            };
            if xml::is_element(&node, CONTENT_TYPES, "Default") {
                if let Some(extension) = node.attribute("Extension") {
                    content_types
                        .defaults
                        .insert(extension.to_ascii_lowercase(), content_type.to_string());
                }
            } else if xml::is_element(&node, CONTENT_TYPES, "Override") {
                if let Some(part_name) = node.attribute("PartName") {
                    content_types.overrides.insert(
                        part_name.trim_start_matches('/').to_string(),
                        content_type.to_string(),
                    );
                }
            }
        }
        Ok(content_types)
    }

    /// Content type of a part (named without the leading slash)
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        if let Some(content_type) = self.overrides.get(part_name) {
            return Some(content_type.as_str());
        }
        let extension = part_name.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults
            .get(&extension)
            .map(String::as_str)
            .or_else(|| guess_image_type(&extension))
    }
}

fn guess_image_type(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "svg" => Some("image/svg+xml"),
        "emf" => Some("image/x-emf"),
        "wmf" => Some("image/x-wmf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="PNG" ContentType="image/png"/>
  <Override PartName="/word/media/logo.bin" ContentType="image/gif"/>
</Types>"#;

    #[test]
    fn overrides_win_over_defaults() {
        let types = ContentTypes::parse("[Content_Types].xml", CONTENT).unwrap();
        assert_eq!(types.content_type_of("word/media/logo.bin"), Some("image/gif"));
        assert_eq!(types.content_type_of("word/media/image1.png"), Some("image/png"));
    }

    #[test]
    fn falls_back_to_known_image_extensions() {
        let types = ContentTypes::default();
        assert_eq!(types.content_type_of("word/media/photo.JPG"), Some("image/jpeg"));
        assert_eq!(types.content_type_of("word/media/unknown.xyz"), None);
        assert_eq!(types.content_type_of("word/media/noextension"), None);
    }
}
