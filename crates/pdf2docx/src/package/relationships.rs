//! Relationship graph for `word/_rels/document.xml.rels`.
//!
//! IDs are assigned `rId1` (styles), `rId2` (settings), then incrementing.
//! Hyperlinks are deduplicated by URI and marked external; image
//! relationships are internal. Instance-scoped: a fresh `RelationshipTable`
//! is created per `Generate` call, matching the spec's "no process-wide
//! state" design note.

use std::collections::HashMap;

use crate::package::xml_escape::escape_xml;

#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
    pub external: bool,
}

#[derive(Debug, Default)]
pub struct RelationshipTable {
    relationships: Vec<Relationship>,
    next_id: u32,
    hyperlink_ids: HashMap<String, String>,
}

const STYLES_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const SETTINGS_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
const IMAGE_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const HYPERLINK_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

impl RelationshipTable {
    pub fn new() -> Self {
        let mut table = Self { relationships: Vec::new(), next_id: 1, hyperlink_ids: HashMap::new() };
        table.push(STYLES_REL_TYPE, "styles.xml", false);
        table.push(SETTINGS_REL_TYPE, "settings.xml", false);
        table
    }

    fn push(&mut self, rel_type: &'static str, target: &str, external: bool) -> String {
        let id = format!("rId{}", self.next_id);
        self.next_id += 1;
        self.relationships.push(Relationship { id: id.clone(), rel_type, target: target.to_string(), external });
        id
    }

    pub fn add_image(&mut self, media_target: &str) -> String {
        self.push(IMAGE_REL_TYPE, media_target, false)
    }

    /// Returns the existing relationship id if this URI was already
    /// registered, otherwise allocates a new external relationship.
    pub fn add_hyperlink(&mut self, uri: &str) -> String {
        if let Some(existing) = self.hyperlink_ids.get(uri) {
            return existing.clone();
        }
        let id = self.push(HYPERLINK_REL_TYPE, uri, true);
        self.hyperlink_ids.insert(uri.to_string(), id.clone());
        id
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        for rel in &self.relationships {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(&rel.id),
                escape_xml(rel.rel_type),
                escape_xml(&rel.target),
                if rel.external { r#" TargetMode="External""# } else { "" },
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// The fixed root-level `_rels/.rels`, pointing at `word/document.xml`.
pub fn root_relationships_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}
