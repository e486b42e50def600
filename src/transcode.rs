use crate::error::{FetchError, Result};
use image::{codecs::jpeg::JpegEncoder, ExtendedColorType, ImageReader};
use std::path::Path;

pub const JPEG_QUALITY: u8 = 85;
pub const JPEG_MIME: &str = "image/jpeg";

/// Decode the band file fully into memory and re-encode it as JPEG.
///
/// The source format is sniffed from content, not the extension, and the
/// pixel buffer is normalized to 8-bit RGB before encoding regardless of
/// the source depth and channel count. The whole raster is resident while
/// this runs.
pub fn transcode_to_jpeg(band_path: &Path) -> Result<Vec<u8>> {
    log::info!("Transcoding band file: {:?}", band_path);

    let reader = ImageReader::open(band_path)
        .map_err(|err| FetchError::DecodeError(format!("cannot open {:?}: {}", band_path, err)))?
        .with_guessed_format()
        .map_err(|err| FetchError::DecodeError(format!("cannot sniff {:?}: {}", band_path, err)))?;

    let decoded = reader.decode().map_err(|err| {
        FetchError::DecodeError(format!(
            "cannot decode {:?} (corrupt file or unsupported encoding profile): {}",
            band_path, err
        ))
    })?;

    let rgb = decoded.to_rgb8();
    log::debug!("Decoded raster: {}x{}", rgb.width(), rgb.height());

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|err| FetchError::EncodeError(format!("jpeg encoding: {}", err)))?;

    Ok(out)
}
