// imgcache/src/utils/mod.rs
use crate::core::{ImageLoaderError, Result};

pub const DATA_URI_PREFIX: &str = "data:image/";
pub const BASE64_MARKER: &str = ";base64";

pub fn ensure_not_blank(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ImageLoaderError::InvalidPath(
            "Path cannot be blank".to_string(),
        ));
    }

    Ok(())
}

pub fn is_remote_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

pub fn is_data_uri(path: &str) -> bool {
    path.starts_with(DATA_URI_PREFIX)
}

/// Drops everything from the first `?` on.
pub fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(before, _)| before)
}

pub fn strip_leading_slashes(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Last `/`-separated segment of a path or URL, query removed.
pub fn file_name(path: &str) -> &str {
    let path = strip_query(path);
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// The media subtype of a `data:image/<subtype>;base64,...` URI.
pub fn data_uri_subtype(uri: &str) -> Result<&str> {
    let rest = uri.strip_prefix(DATA_URI_PREFIX).ok_or_else(|| {
        ImageLoaderError::InvalidPath(format!("Not an image data URI: {}", truncate(uri)))
    })?;

    let end = rest.find(BASE64_MARKER).ok_or_else(|| {
        ImageLoaderError::InvalidPath(format!(
            "Data URI is not base64 encoded: {}",
            truncate(uri)
        ))
    })?;

    Ok(&rest[..end])
}

/// Shortens long inputs (data URIs mostly) for log and error messages.
pub fn truncate(path: &str) -> String {
    const LIMIT: usize = 64;

    match path.char_indices().nth(LIMIT) {
        Some((index, _)) => format!("{}...", &path[..index]),
        None => path.to_string(),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_paths_are_rejected() {
        assert!(ensure_not_blank("").is_err());
        assert!(ensure_not_blank(" \t\n").is_err());
        assert!(ensure_not_blank("a.png").is_ok());
    }

    #[test]
    fn test_file_name_strips_query_and_directories() {
        assert_eq!(file_name("a/b/sample.PNG?x=1"), "sample.PNG");
        assert_eq!(file_name("https://host/img.gif?v=2/3"), "img.gif");
        assert_eq!(file_name("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn test_strip_leading_slashes() {
        assert_eq!(strip_leading_slashes("///samples/a.png"), "samples/a.png");
        assert_eq!(strip_leading_slashes("samples/a.png"), "samples/a.png");
    }

    #[test]
    fn test_data_uri_subtype() {
        assert_eq!(
            data_uri_subtype("data:image/png;base64,AAAA").unwrap(),
            "png"
        );
        assert!(matches!(
            data_uri_subtype("data:image/png,AAAA"),
            Err(ImageLoaderError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_truncate_keeps_short_inputs() {
        assert_eq!(truncate("short"), "short");
        assert!(truncate(&"x".repeat(200)).ends_with("..."));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
    }
}
