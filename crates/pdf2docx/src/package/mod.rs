//! OOXML packaging: turns a [`DocumentStructure`] into `.docx` bytes.

mod content_types;
mod document_xml;
mod media;
mod relationships;
mod settings;
mod styles;
mod xml_escape;
mod zip;

use crate::error::Result;
use crate::model::DocumentStructure;

use media::MediaRegistry;
use relationships::RelationshipTable;

/// Owns the relationship table and media registry for one conversion.
/// Instance-scoped: build a fresh `Packager` per document, never reused
/// across conversions.
pub struct Packager {
    document_language: Option<String>,
    paragraph_spacing_after_pt: f64,
}

impl Packager {
    pub fn new(document_language: Option<String>, paragraph_spacing_after_pt: f64) -> Self {
        Self { document_language, paragraph_spacing_after_pt }
    }

    pub fn package(&self, document: &DocumentStructure) -> Result<Vec<u8>> {
        let mut relationships = RelationshipTable::new();
        let mut media = MediaRegistry::new();

        let document_xml = document_xml::document_xml(
            &document.pages,
            self.paragraph_spacing_after_pt,
            &mut relationships,
            &mut media,
        );

        let content_types_xml = content_types::content_types_xml(&media.extensions());
        let root_rels_xml = relationships::root_relationships_xml();
        let document_rels_xml = relationships.to_xml();
        let styles_xml = styles::styles_xml(self.document_language.as_deref());
        let settings_xml = settings::settings_xml();

        zip::build_package(
            &content_types_xml,
            &root_rels_xml,
            &document_xml,
            &document_rels_xml,
            &styles_xml,
            &settings_xml,
            &media,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageStructure;

    #[test]
    fn packages_an_empty_document() {
        let document = DocumentStructure {
            pages: vec![PageStructure { page_number: 1, width: 612.0, height: 792.0, blocks: vec![] }],
        };
        let packager = Packager::new(Some("en-US".to_string()), 6.0);
        let bytes = packager.package(&document).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..2], b"PK");
    }
}
