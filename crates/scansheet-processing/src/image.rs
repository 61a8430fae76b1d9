//! Image re-encoding for upload
//!
//! Every input image is decoded and re-encoded as JPEG before submission,
//! regardless of its original format. A single undecodable image fails the
//! whole batch; there is no partial submission.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use scansheet_core::AppError;
use std::io::Cursor;

/// JPEG quality used for re-encoding (maximum, matching the capture path).
const JPEG_QUALITY: u8 = 100;

/// Decode an image of any supported format and re-encode it as JPEG.
pub fn reencode_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::ImageProcessing(format!("Failed to probe image format: {}", e)))?;

    let img = reader
        .decode()
        .map_err(|e| AppError::ImageProcessing(format!("Failed to decode image: {}", e)))?;

    // JPEG has no alpha channel; normalize to RGB before encoding.
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| AppError::ImageProcessing(format!("Failed to encode JPEG: {}", e)))?;

    Ok(out.into_inner())
}

/// Re-encode a batch of images as JPEG, preserving order.
///
/// Decode is CPU-bound; the whole batch runs off the async pool. Fails
/// fast on the first undecodable image.
pub async fn reencode_all_jpeg(images: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>, AppError> {
    tokio::task::spawn_blocking(move || {
        images
            .iter()
            .map(|data| reencode_jpeg(data))
            .collect::<Result<Vec<_>, _>>()
    })
    .await
    .map_err(|e| AppError::ImageProcessing(format!("Image task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_fixture() -> Vec<u8> {
        let mut img = RgbaImage::new(4, 4);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([200, 40, 40, 255]);
        }
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn reencodes_png_as_jpeg() {
        let jpeg = reencode_jpeg(&png_fixture()).unwrap();

        let reader = ImageReader::new(Cursor::new(&jpeg))
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let result = reencode_jpeg(b"definitely not an image");
        assert!(matches!(result, Err(AppError::ImageProcessing(_))));
    }

    #[tokio::test]
    async fn batch_preserves_order_and_fails_fast() {
        let good = png_fixture();

        let batch = reencode_all_jpeg(vec![good.clone(), good.clone()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);

        let result = reencode_all_jpeg(vec![good, b"garbage".to_vec()]).await;
        assert!(matches!(result, Err(AppError::ImageProcessing(_))));
    }
}
