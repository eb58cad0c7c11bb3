// imgcache/src/core/extension.rs
use super::{ImageLoaderError, MediaKind, Result};
use crate::utils::{data_uri_subtype, file_name, is_data_uri};
use image::ImageFormat;
use std::fmt;
use std::str::FromStr;

/// Image formats the loaders understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Bmp,
    Gif,
    Hdr,
    Jpeg,
    Jpg,
    Png,
    Tiff,
    Webp,
}

impl Extension {
    pub const ALL: &'static [Extension] = &[
        Extension::Bmp,
        Extension::Gif,
        Extension::Hdr,
        Extension::Jpeg,
        Extension::Jpg,
        Extension::Png,
        Extension::Tiff,
        Extension::Webp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Bmp => "bmp",
            Extension::Gif => "gif",
            Extension::Hdr => "hdr",
            Extension::Jpeg => "jpeg",
            Extension::Jpg => "jpg",
            Extension::Png => "png",
            Extension::Tiff => "tiff",
            Extension::Webp => "webp",
        }
    }

    pub fn supports_transparency(&self) -> bool {
        matches!(
            self,
            Extension::Gif | Extension::Png | Extension::Tiff | Extension::Webp
        )
    }

    pub fn is_lossless(&self) -> bool {
        !matches!(self, Extension::Jpeg | Extension::Jpg)
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            Extension::Bmp => ImageFormat::Bmp,
            Extension::Gif => ImageFormat::Gif,
            Extension::Hdr => ImageFormat::Hdr,
            Extension::Jpeg | Extension::Jpg => ImageFormat::Jpeg,
            Extension::Png => ImageFormat::Png,
            Extension::Tiff => ImageFormat::Tiff,
            Extension::Webp => ImageFormat::WebP,
        }
    }

    /// Classifies a path, URL or `data:image/...` URI for the given media kind.
    ///
    /// Paths are matched on the suffix of their last segment with any query
    /// string removed. Data URIs are matched on their media subtype.
    pub fn classify(path: &str, kind: MediaKind) -> Result<Self> {
        let candidate = if is_data_uri(path) {
            match data_uri_subtype(path)? {
                subtype if subtype.trim().is_empty() => {
                    return Err(ImageLoaderError::MissingExtension(path.to_string()))
                }
                subtype => subtype,
            }
        } else {
            let name = file_name(path);
            match name.rsplit_once('.') {
                Some((_, ext)) if !ext.is_empty() => ext,
                _ => return Err(ImageLoaderError::MissingExtension(path.to_string())),
            }
        };

        let extension: Extension = candidate.parse()?;

        if !kind.supports(extension) {
            return Err(ImageLoaderError::UnsupportedExtension(
                extension.as_str().to_string(),
            ));
        }

        Ok(extension)
    }
}

impl FromStr for Extension {
    type Err = ImageLoaderError;

    fn from_str(s: &str) -> Result<Self> {
        Extension::ALL
            .iter()
            .copied()
            .find(|ext| ext.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ImageLoaderError::UnsupportedExtension(s.to_lowercase()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_insensitive_and_ignores_query() {
        let ext = Extension::classify("a/b/sample.PNG?x=1", MediaKind::Still).unwrap();
        assert_eq!(ext, Extension::Png);
    }

    #[test]
    fn test_trailing_dot_is_missing_extension() {
        assert!(matches!(
            Extension::classify("sample.", MediaKind::Still),
            Err(ImageLoaderError::MissingExtension(_))
        ));
    }

    #[test]
    fn test_no_dot_is_missing_extension() {
        assert!(matches!(
            Extension::classify("folder.d/sample", MediaKind::Still),
            Err(ImageLoaderError::MissingExtension(_))
        ));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        match Extension::classify("sample.xyz", MediaKind::Still) {
            Err(ImageLoaderError::UnsupportedExtension(ext)) => assert_eq!(ext, "xyz"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_data_uri_uses_media_subtype() {
        let ext = Extension::classify("data:image/JPEG;base64,AAAA", MediaKind::Still).unwrap();
        assert_eq!(ext, Extension::Jpeg);
    }

    #[test]
    fn test_data_uri_without_subtype_is_missing_extension() {
        for path in ["data:image/;base64,AAAA", "data:image/ ;base64,AAAA"] {
            assert!(matches!(
                Extension::classify(path, MediaKind::Still),
                Err(ImageLoaderError::MissingExtension(_))
            ));
        }
    }

    #[test]
    fn test_animation_rejects_still_formats() {
        match Extension::classify("clip.png", MediaKind::Animation) {
            Err(ImageLoaderError::UnsupportedExtension(ext)) => assert_eq!(ext, "png"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            Extension::classify("/clips/clip.GIF", MediaKind::Animation).unwrap(),
            Extension::Gif
        );
    }

    #[test]
    fn test_format_flags() {
        assert!(!Extension::Jpeg.supports_transparency());
        assert!(!Extension::Jpg.is_lossless());
        assert!(Extension::Png.supports_transparency());
        assert!(Extension::Bmp.is_lossless());
        assert!(!Extension::Bmp.supports_transparency());
        assert_eq!(Extension::Webp.image_format(), ImageFormat::WebP);
    }
}
