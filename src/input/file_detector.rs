//! Media type detection

use std::path::Path;

/// The document kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    PlainText,
    Pdf,
}

impl MediaType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "txt" | "text" => Some(MediaType::PlainText),
            _ => None,
        }
    }

    /// Parse a declared MIME type, ignoring parameters such as `charset`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(MediaType::Pdf),
            "text/plain" => Some(MediaType::PlainText),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::PlainText => "text/plain",
            MediaType::Pdf => "application/pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        assert_eq!(MediaType::from_extension("PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_extension("txt"), Some(MediaType::PlainText));
        assert_eq!(MediaType::from_extension("docx"), None);
        assert_eq!(MediaType::from_extension("md"), None);
    }

    #[test]
    fn test_mime_with_parameters() {
        assert_eq!(MediaType::from_mime("text/plain; charset=utf-8"), Some(MediaType::PlainText));
        assert_eq!(MediaType::from_mime("application/pdf"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_mime("image/png"), None);
    }

    #[test]
    fn test_path_without_extension() {
        assert_eq!(MediaType::from_path(Path::new("resume")), None);
        assert_eq!(MediaType::from_path(Path::new("cv.final.pdf")), Some(MediaType::Pdf));
    }
}
