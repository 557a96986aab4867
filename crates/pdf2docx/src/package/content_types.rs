//! `[Content_Types].xml`: extension and override content-type map.

use std::collections::BTreeSet;

/// Normalizes an image extension the way the packager's media namer does:
/// `jpeg` collapses to `jpg`; everything else passes through.
fn normalize_extension(ext: &str) -> &str {
    if ext.eq_ignore_ascii_case("jpeg") {
        "jpg"
    } else {
        ext
    }
}

fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

pub fn content_types_xml(media_extensions: &[&str]) -> String {
    let mut extensions: BTreeSet<&str> = media_extensions.iter().map(|e| normalize_extension(e)).collect();
    extensions.insert("xml");
    extensions.insert("rels");

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);

    for ext in &extensions {
        let content_type = match *ext {
            "xml" => "application/xml",
            "rels" => "application/vnd.openxmlformats-package.relationships+xml",
            other => content_type_for_extension(other),
        };
        xml.push_str(&format!(r#"<Default Extension="{ext}" ContentType="{content_type}"/>"#));
    }

    xml.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>"#);

    xml.push_str("</Types>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_jpeg_to_jpg() {
        let xml = content_types_xml(&["jpeg"]);
        assert!(xml.contains(r#"Extension="jpg""#));
        assert!(!xml.contains(r#"Extension="jpeg""#));
    }

    #[test]
    fn deduplicates_extensions() {
        let xml = content_types_xml(&["png", "png", "jpg"]);
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
    }

    #[test]
    fn always_includes_document_overrides() {
        let xml = content_types_xml(&[]);
        assert!(xml.contains("/word/document.xml"));
        assert!(xml.contains("/word/styles.xml"));
        assert!(xml.contains("/word/settings.xml"));
    }
}
