/// Upload ingestion: decode, bound the resolution, re-encode as JPEG
///
/// The result is a self-contained `data:` URL that can be stored and
/// rendered directly without touching the original file again.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Result, StoryError};

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// An upload ready to be stored as a story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Read a picked file and ingest it off the UI thread
pub async fn ingest_file(path: PathBuf, settings: Settings) -> Result<EncodedImage> {
    let bytes = tokio::fs::read(&path).await?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    ingest(bytes, settings).await
}

/// Ingest raw image bytes on the blocking pool
///
/// Decoding and resizing large photos is CPU-heavy, so it never runs on
/// the UI executor.
pub async fn ingest(bytes: Vec<u8>, settings: Settings) -> Result<EncodedImage> {
    tokio::task::spawn_blocking(move || {
        encode_for_storage(&bytes, settings.max_width, settings.max_height, settings.quality)
    })
    .await
    .map_err(|e| StoryError::Task(e.to_string()))?
}

/// Decode `raw`, scale it down to fit `max_width` x `max_height`
/// (never up) and re-encode as JPEG at `quality` (0.0..=1.0).
pub fn encode_for_storage(
    raw: &[u8],
    max_width: u32,
    max_height: u32,
    quality: f32,
) -> Result<EncodedImage> {
    let img = image::load_from_memory(raw).map_err(|e| StoryError::ImageDecode(e.to_string()))?;

    let (width, height) = fit_within(img.width(), img.height(), max_width, max_height);
    let img = if (width, height) != (img.width(), img.height()) {
        img.resize_exact(width, height, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality(quality));
    encoder
        .encode_image(&rgb)
        .map_err(|e| StoryError::ImageEncode(e.to_string()))?;

    info!(
        "📸 Encoded story image {}x{} ({:.1}KB)",
        width,
        height,
        jpeg.len() as f64 / 1024.0
    );

    Ok(EncodedImage {
        data_url: format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(&jpeg)),
        width,
        height,
    })
}

/// Target dimensions preserving aspect ratio: clamp width first, then height
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let mut w = f64::from(width);
    let mut h = f64::from(height);

    if w > f64::from(max_width) {
        h *= f64::from(max_width) / w;
        w = f64::from(max_width);
    }

    if h > f64::from(max_height) {
        w *= f64::from(max_height) / h;
        h = f64::from(max_height);
    }

    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Map 0.0..=1.0 to the encoder's 1..=100 scale
fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Decode the payload of a base64 `data:` URL back into image bytes
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| StoryError::DataUrl("missing ',' separator".to_string()))?;

    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(StoryError::DataUrl(format!("unsupported header '{}'", header)));
    }

    STANDARD
        .decode(payload)
        .map_err(|e| StoryError::DataUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90])));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn decoded_dimensions(encoded: &EncodedImage) -> (u32, u32) {
        let bytes = decode_data_url(&encoded.data_url).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
            .unwrap()
            .dimensions()
    }

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(fit_within(4000, 3000, 1080, 1920), (1080, 810));
    }

    #[test]
    fn test_fit_within_tall() {
        assert_eq!(fit_within(1000, 4000, 1080, 1920), (480, 1920));
        assert_eq!(fit_within(3000, 8000, 1080, 1920), (720, 1920));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(fit_within(640, 480, 1080, 1920), (640, 480));
        assert_eq!(fit_within(1080, 1920, 1080, 1920), (1080, 1920));
    }

    #[test]
    fn test_fit_within_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(100_000, 1, 1080, 1920), (1080, 1));
    }

    #[test]
    fn test_large_upload_is_scaled_down() {
        let encoded = encode_for_storage(&png(4000, 3000), 1080, 1920, 0.7).unwrap();

        assert!(encoded.data_url.starts_with("data:image/jpeg;base64,"));
        assert_eq!((encoded.width, encoded.height), (1080, 810));
        assert_eq!(decoded_dimensions(&encoded), (1080, 810));
    }

    #[test]
    fn test_small_upload_keeps_size() {
        let encoded = encode_for_storage(&png(64, 48), 1080, 1920, 0.7).unwrap();
        assert_eq!(decoded_dimensions(&encoded), (64, 48));
    }

    #[test]
    fn test_non_image_is_rejected() {
        let result = encode_for_storage(b"definitely not an image", 1080, 1920, 0.7);
        assert!(matches!(result, Err(StoryError::ImageDecode(_))));
    }

    #[test]
    fn test_quality_mapping() {
        assert_eq!(jpeg_quality(0.7), 70);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(3.0), 100);
    }

    #[test]
    fn test_bad_data_url() {
        assert!(decode_data_url("no separator").is_err());
        assert!(decode_data_url("data:image/png,raw").is_err());
        assert!(decode_data_url("data:image/jpeg;base64,@@@").is_err());
    }

    #[test]
    fn test_ingest_runs_on_blocking_pool() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let encoded = runtime
            .block_on(ingest(png(2000, 100), Settings::default()))
            .unwrap();
        assert_eq!((encoded.width, encoded.height), (1080, 54));
    }

    #[test]
    fn test_ingest_file_missing_is_io_error() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = runtime.block_on(ingest_file(dir.path().join("nope.png"), Settings::default()));
        assert!(matches!(result, Err(StoryError::Io(_))));
    }
}
