use std::path::Path;

use super::CaptureError;

pub const DEFAULT_FILE_STEM: &str = "capture";
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// A single still frame ready to be sent to the detector.
///
/// Consumed by value by the analyze gateway and never written anywhere but
/// the per-request scratch file.
#[derive(Clone)]
pub struct CapturedImage {
    bytes: Vec<u8>,
    media_type: String,
    filename_hint: Option<String>,
}

impl CapturedImage {
    /// Builds an image from raw bytes.
    ///
    /// A missing or generic media type is sniffed from the bytes, and the
    /// filename hint is reduced to its last path component.
    pub fn new(
        bytes: Vec<u8>,
        media_type: Option<&str>,
        filename: Option<&str>,
    ) -> Result<Self, CaptureError> {
        if bytes.is_empty() {
            return Err(CaptureError::EmptyFrame);
        }

        let media_type = match media_type.map(str::trim) {
            Some(declared) if is_image_media_type(declared) => declared.to_lowercase(),
            _ => sniff_media_type(&bytes),
        };

        let filename_hint = filename
            .and_then(|name| Path::new(name.trim()).file_name())
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(Self {
            bytes,
            media_type,
            filename_hint,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The filename hint, or `capture.<ext>` derived from the media type.
    pub fn filename(&self) -> String {
        match &self.filename_hint {
            Some(name) => name.clone(),
            None => format!("{}.{}", DEFAULT_FILE_STEM, self.extension()),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension used for scratch files, taken from the filename hint
    /// and falling back to the media type.
    pub fn extension(&self) -> String {
        let from_name = self
            .filename_hint
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_lowercase());

        from_name.unwrap_or_else(|| extension_for(&self.media_type).to_string())
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("len", &self.bytes.len())
            .field("media_type", &self.media_type)
            .field("filename_hint", &self.filename_hint)
            .finish()
    }
}

fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "jpg",
    }
}

fn is_image_media_type(value: &str) -> bool {
    let Some((kind, subtype)) = value.split_once('/') else {
        return false;
    };
    kind.eq_ignore_ascii_case("image")
        && !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn sniff_media_type(bytes: &[u8]) -> String {
    match infer::get(bytes) {
        Some(kind) if kind.mime_type().starts_with("image/") => kind.mime_type().to_string(),
        _ => DEFAULT_MEDIA_TYPE.to_string(),
    }
}
