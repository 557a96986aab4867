//! Final container assembly: writes every part into a single in-memory zip.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::package::media::MediaRegistry;

pub struct Part {
    pub name: &'static str,
    pub contents: Vec<u8>,
}

/// Writes `[Content_Types].xml`, `_rels/.rels`, `word/document.xml`,
/// `word/_rels/document.xml.rels`, `word/styles.xml`, `word/settings.xml` and
/// every registered media entry into one zip buffer.
pub fn build_package(
    content_types_xml: &str,
    root_rels_xml: &str,
    document_xml: &str,
    document_rels_xml: &str,
    styles_xml: &str,
    settings_xml: &str,
    media: &MediaRegistry,
) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts = [
        Part { name: "[Content_Types].xml", contents: content_types_xml.as_bytes().to_vec() },
        Part { name: "_rels/.rels", contents: root_rels_xml.as_bytes().to_vec() },
        Part { name: "word/document.xml", contents: document_xml.as_bytes().to_vec() },
        Part { name: "word/_rels/document.xml.rels", contents: document_rels_xml.as_bytes().to_vec() },
        Part { name: "word/styles.xml", contents: styles_xml.as_bytes().to_vec() },
        Part { name: "word/settings.xml", contents: settings_xml.as_bytes().to_vec() },
    ];

    for part in &parts {
        writer.start_file(part.name, options)?;
        writer.write_all(&part.contents)?;
    }

    for entry in media.entries() {
        writer.start_file(format!("word/media/{}", entry.filename), options)?;
        writer.write_all(&entry.data)?;
    }

    writer.finish()?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_readable_zip_with_all_parts() {
        let media = MediaRegistry::new();
        let bytes = build_package(
            "<Types/>",
            "<Relationships/>",
            "<w:document/>",
            "<Relationships/>",
            "<w:styles/>",
            "<w:settings/>",
            &media,
        )
        .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/settings.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn includes_registered_media() {
        let mut media = MediaRegistry::new();
        media.register(vec![0, 1, 2], crate::model::ImageFormat::Png);
        let bytes = build_package("<Types/>", "<Relationships/>", "<w:document/>", "<Relationships/>", "<w:styles/>", "<w:settings/>", &media).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("word/media/image1.png").is_ok());
    }
}
