//! Small helpers over `roxmltree` for the namespaces found in WordprocessingML packages

use roxmltree::{Document, Node};

use crate::errors::DocxError;

pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub const V: &str = "urn:schemas-microsoft-com:vml";
pub const O: &str = "urn:schemas-microsoft-com:office:office";
pub const MC: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
pub const PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub fn parse<'input>(part: &str, text: &'input str) -> Result<Document<'input>, DocxError> {
    Document::parse(strip_bom(text)).map_err(|source| DocxError::Xml {
        part: part.to_string(),
        source,
    })
}

pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

pub fn is_element(node: &Node, namespace: &str, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(namespace)
}

pub fn child<'a, 'input>(node: &Node<'a, 'input>, namespace: &str, local: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_element(n, namespace, local))
}

/// The branch of an `mc:AlternateContent` to read: the first `mc:Choice`, else `mc:Fallback`
pub fn alternate_content_branch<'a, 'input>(node: &Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    child(node, MC, "Choice").or_else(|| child(node, MC, "Fallback"))
}

pub fn descendant<'a, 'input>(
    node: &Node<'a, 'input>,
    namespace: &str,
    local: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants().find(|n| is_element(n, namespace, local))
}

/// Reads a `w:val`-style on/off property; a bare element means "on"
pub fn on_off(node: &Node) -> bool {
    match node.attribute((W, "val")).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("0") | Some("false") | Some("off") | Some("none") => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_is_ignored() {
        let doc = parse("test.xml", "\u{FEFF}<root/>").unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "root")
    }

    #[test]
    fn malformed_xml_names_the_part() {
        match parse("word/document.xml", "<open>") {
            Err(DocxError::Xml { part, .. }) => assert_eq!(part, "word/document.xml"),
            _ => panic!("expected an xml error"),
        }
    }

    #[test]
    fn on_off_values() {
        let text = format!(
            r#"<w:rPr xmlns:w="{W}"><w:b/><w:i w:val="0"/><w:u w:val="none"/><w:strike w:val="true"/></w:rPr>"#
        );
        let doc = parse("test.xml", &text).unwrap();
        let rpr = doc.root_element();
        assert!(on_off(&child(&rpr, W, "b").unwrap()));
        assert!(!on_off(&child(&rpr, W, "i").unwrap()));
        assert!(!on_off(&child(&rpr, W, "u").unwrap()));
        assert!(on_off(&child(&rpr, W, "strike").unwrap()));
    }
}
