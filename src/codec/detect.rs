//! Input format detection (magic bytes) and output format selection
//! (output file extension), per spec.md §6.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::BatchError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Jpeg,
    Png,
    WebP,
    Bmp,
}

/// Reads the file's header and classifies it by magic bytes. Never
/// consults the file extension, so a misnamed file is still detected
/// correctly, and an unrecognized signature is an error rather than a
/// guess.
pub fn detect_input_format(path: &Path) -> Result<Format, BatchError> {
    let mut file = File::open(path).map_err(|_| BatchError::FileNotFound(path.to_path_buf()))?;
    let mut header = [0u8; 12];
    let bytes_read = file
        .read(&mut header)
        .map_err(|_| BatchError::FileNotFound(path.to_path_buf()))?;
    let header = &header[..bytes_read];

    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Ok(Format::Jpeg);
    }
    if header.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Ok(Format::Png);
    }
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return Ok(Format::WebP);
    }
    if header.starts_with(b"BM") {
        return Ok(Format::Bmp);
    }
    Err(BatchError::UnsupportedFormat(format!(
        "{}: unrecognized file signature",
        path.display()
    )))
}

/// Derives the output format from `path`'s extension, case-insensitively.
/// An unrecognized or missing extension defaults to JPEG.
pub fn output_format_from_extension(path: &Path) -> Format {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Format::Png,
        Some("webp") => Format::WebP,
        Some("bmp") => Format::Bmp,
        _ => Format::Jpeg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn detects_jpeg_by_magic_bytes() {
        let file = write_temp(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]);
        assert_eq!(detect_input_format(file.path()).unwrap(), Format::Jpeg);
    }

    #[test]
    fn detects_png_by_magic_bytes() {
        let file = write_temp(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(detect_input_format(file.path()).unwrap(), Format::Png);
    }

    #[test]
    fn detects_webp_by_riff_webp_signature() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(b"WEBP");
        let file = write_temp(&bytes);
        assert_eq!(detect_input_format(file.path()).unwrap(), Format::WebP);
    }

    #[test]
    fn detects_bmp_by_magic_bytes() {
        let file = write_temp(b"BM\0\0\0\0\0\0\0\0");
        assert_eq!(detect_input_format(file.path()).unwrap(), Format::Bmp);
    }

    #[test]
    fn unrecognized_signature_is_unsupported_format() {
        let file = write_temp(b"not an image");
        assert!(matches!(
            detect_input_format(file.path()),
            Err(BatchError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let path = std::path::Path::new("/nonexistent/path/to/image.jpg");
        assert!(matches!(
            detect_input_format(path),
            Err(BatchError::FileNotFound(_))
        ));
    }

    #[test]
    fn output_format_defaults_to_jpeg_for_unknown_extension() {
        assert_eq!(
            output_format_from_extension(Path::new("out.tiff")),
            Format::Jpeg
        );
        assert_eq!(
            output_format_from_extension(Path::new("out")),
            Format::Jpeg
        );
    }

    #[test]
    fn output_format_is_case_insensitive() {
        assert_eq!(
            output_format_from_extension(Path::new("out.PNG")),
            Format::Png
        );
        assert_eq!(
            output_format_from_extension(Path::new("out.WebP")),
            Format::WebP
        );
    }
}
