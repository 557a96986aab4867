//! Media registry: assigns monotonic `imageN.<ext>` filenames and tracks
//! binary payloads for the final zip, plus the distinct extensions seen for
//! `[Content_Types].xml`.

use crate::model::ImageFormat;

pub struct MediaEntry {
    pub filename: String,
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Default)]
pub struct MediaRegistry {
    entries: Vec<MediaEntry>,
    next_index: u32,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_index: 1 }
    }

    /// Registers an image payload and returns its part-relative target
    /// (e.g. `media/image1.png`) for the relationship table.
    pub fn register(&mut self, data: Vec<u8>, format: ImageFormat) -> String {
        let filename = format!("image{}.{}", self.next_index, format.extension());
        self.next_index += 1;
        let target = format!("media/{filename}");
        self.entries.push(MediaEntry { filename, data, content_type: format.content_type() });
        target
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn extensions(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.filename.rsplit('.').next().unwrap_or(""))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_monotonic() {
        let mut registry = MediaRegistry::new();
        let a = registry.register(vec![1], ImageFormat::Png);
        let b = registry.register(vec![2], ImageFormat::Jpeg);
        assert_eq!(a, "media/image1.png");
        assert_eq!(b, "media/image2.jpg");
    }
}
