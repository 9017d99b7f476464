use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::FileError;

/// Decode an image file, sniffing the format from its contents
///
/// The file handle is closed before returning, on both paths.
pub fn decode(path: &Path) -> Result<DynamicImage, FileError> {
    let file = File::open(path).map_err(|e| FileError::Read(e.to_string()))?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| FileError::Read(e.to_string()))?;

    reader.decode().map_err(|e| FileError::Decode(e.to_string()))
}

/// Encode `img` as JPEG at `quality` and write it to `path`
///
/// Parent directories are created as needed. If encoding fails after the
/// file was opened, the partially written file is removed; a file that could
/// not be opened is left untouched.
pub fn write_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<(), FileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FileError::Write(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let file = File::create(path).map_err(|e| FileError::Write(e.to_string()))?;
    let result = encode_to_file(img, file, quality);
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

fn encode_to_file(img: &RgbImage, file: File, quality: u8) -> Result<(), FileError> {
    let mut writer = BufWriter::new(file);

    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(img)
        .map_err(|e| FileError::Write(e.to_string()))?;

    writer.flush().map_err(|e| FileError::Write(e.to_string()))
}
