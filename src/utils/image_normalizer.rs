//! 上传照片归一化
//!
//! 任意格式的图片字节 → RGB JPEG（质量 80），文件名为 `<uuid>.jpg`。
//! 上传字节数超过 `866 * 866` 时按 EXIF 方向摆正，尺寸超出时再按比例缩小到长边不超过 866 像素。
//! 主流程任一步失败时退回到“解码 → RGB → JPEG”的简化流程，只有简化流程解码失败才报错。

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{PortalError, Result};

/// 触发缩放的上传字节数阈值（按字节比较，而非像素数）
pub const RESIZE_THRESHOLD_BYTES: usize = 866 * 866;
/// 缩放后长边上限
pub const MAX_DIMENSION: u32 = 866;
pub const JPEG_QUALITY: u8 = 80;
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// 归一化后的图片
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub file_name: String,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub fn normalize_image(bytes: &[u8]) -> Result<NormalizedImage> {
    let ((width, height), data) = match normalize_full(bytes) {
        Ok(out) => out,
        Err(e) => {
            warn!("Image normalization failed, retrying without resize: {}", e);
            normalize_plain(bytes)?
        }
    };

    debug!(
        "Normalized image {}x{} ({} -> {} bytes)",
        width,
        height,
        bytes.len(),
        data.len()
    );

    Ok(NormalizedImage {
        file_name: format!("{}.jpg", Uuid::new_v4()),
        content_type: JPEG_CONTENT_TYPE,
        width,
        height,
        data,
    })
}

type Encoded = ((u32, u32), Vec<u8>);

// 完整流程：读取方向 → 解码 → RGB → 按需缩放并摆正 → JPEG
fn normalize_full(bytes: &[u8]) -> image::ImageResult<Encoded> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let decoded = DynamicImage::from_decoder(decoder)?;

    let mut image = DynamicImage::ImageRgb8(decoded.to_rgb8());

    if bytes.len() > RESIZE_THRESHOLD_BYTES {
        // 只缩小不放大
        if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
            image = image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3);
        }
        image.apply_orientation(orientation);
    }

    let rgb = image.into_rgb8();
    Ok((rgb.dimensions(), encode_jpeg(&rgb)?))
}

// 简化流程：解码 → RGB → JPEG，不缩放
fn normalize_plain(bytes: &[u8]) -> Result<Encoded> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PortalError::image_decode(format!("Unable to decode image: {e}")))?;
    let rgb = decoded.to_rgb8();
    let data = encode_jpeg(&rgb)
        .map_err(|e| PortalError::file_operation(format!("JPEG encoding failed: {e}")))?;
    Ok((rgb.dimensions(), data))
}

fn encode_jpeg(image: &image::RgbImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    image.write_with_encoder(encoder)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb, Rgba};

    fn noisy_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17) ^ (x * y)) as u8;
            Rgb([v, v.wrapping_add(85), v.wrapping_add(170)])
        }))
    }

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    fn random_rgb(width: u32, height: u32) -> DynamicImage {
        let mut state: u32 = 0x2545_F491;
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |_, _| {
            let mut next = || {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            };
            Rgb([next(), next(), next()])
        }))
    }

    // 在 SOI 之后插入只含 Orientation 标签的 APP1 段
    fn jpeg_with_orientation(image: &DynamicImage, orientation: u16) -> Vec<u8> {
        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut jpeg, 100);
        image.to_rgb8().write_with_encoder(encoder).unwrap();

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2A\x00\x00\x00\x08");
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x0112u16.to_be_bytes());
        tiff.extend_from_slice(&3u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&0u32.to_be_bytes());

        let mut app1 = vec![0xFF, 0xE1];
        app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
        app1.extend_from_slice(b"Exif\x00\x00");
        app1.extend_from_slice(&tiff);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    fn decode_jpeg(data: &[u8]) -> DynamicImage {
        assert!(data.starts_with(&[0xFF, 0xD8, 0xFF]));
        image::load_from_memory_with_format(data, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn test_large_upload_is_downscaled() {
        let bytes = encode(&noisy_rgb(1200, 1000), ImageFormat::Bmp);
        assert!(bytes.len() > RESIZE_THRESHOLD_BYTES);

        let result = normalize_image(&bytes).unwrap();
        assert!(result.width <= MAX_DIMENSION && result.height <= MAX_DIMENSION);
        assert_eq!(result.width, 866);
        assert_eq!(result.content_type, "image/jpeg");
        assert!(result.file_name.ends_with(".jpg"));

        let decoded = decode_jpeg(&result.data);
        assert_eq!((decoded.width(), decoded.height()), (result.width, result.height));
    }

    #[test]
    fn test_small_upload_keeps_dimensions() {
        let bytes = encode(&noisy_rgb(300, 200), ImageFormat::Png);
        assert!(bytes.len() <= RESIZE_THRESHOLD_BYTES);

        let result = normalize_image(&bytes).unwrap();
        assert_eq!((result.width, result.height), (300, 200));
        let decoded = decode_jpeg(&result.data);
        assert_eq!((decoded.width(), decoded.height()), (300, 200));
    }

    #[test]
    fn test_threshold_compares_bytes_not_pixels() {
        // 像素很大但压缩后很小的图片不缩放
        let flat = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2000, 1000, Rgb([10, 20, 30])));
        let bytes = encode(&flat, ImageFormat::Png);
        assert!(bytes.len() <= RESIZE_THRESHOLD_BYTES);

        let result = normalize_image(&bytes).unwrap();
        assert_eq!((result.width, result.height), (2000, 1000));
    }

    #[test]
    fn test_large_bytes_small_dimensions_not_upscaled() {
        let bytes = encode(&noisy_rgb(500, 500), ImageFormat::Bmp);
        assert!(bytes.len() > RESIZE_THRESHOLD_BYTES);

        let result = normalize_image(&bytes).unwrap();
        assert_eq!((result.width, result.height), (500, 500));
    }

    #[test]
    fn test_large_upload_is_rotated_without_resize() {
        let bytes = jpeg_with_orientation(&random_rgb(800, 600), 6);
        assert!(bytes.len() > RESIZE_THRESHOLD_BYTES);

        let result = normalize_image(&bytes).unwrap();
        assert_eq!((result.width, result.height), (600, 800));
        let decoded = decode_jpeg(&result.data);
        assert_eq!((decoded.width(), decoded.height()), (600, 800));
    }

    #[test]
    fn test_large_upload_is_rotated_and_downscaled() {
        let bytes = jpeg_with_orientation(&random_rgb(1200, 900), 6);
        assert!(bytes.len() > RESIZE_THRESHOLD_BYTES);

        let result = normalize_image(&bytes).unwrap();
        assert_eq!(result.height, MAX_DIMENSION);
        assert!(result.width < result.height);
    }

    #[test]
    fn test_small_upload_keeps_orientation() {
        let bytes = jpeg_with_orientation(&noisy_rgb(80, 60), 6);
        assert!(bytes.len() <= RESIZE_THRESHOLD_BYTES);

        let result = normalize_image(&bytes).unwrap();
        assert_eq!((result.width, result.height), (80, 60));
    }

    #[test]
    fn test_file_names_are_unique() {
        let bytes = encode(&noisy_rgb(40, 30), ImageFormat::Png);
        let first = normalize_image(&bytes).unwrap();
        let second = normalize_image(&bytes).unwrap();
        assert_ne!(first.file_name, second.file_name);
    }

    #[test]
    fn test_undecodable_input() {
        let err = normalize_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PortalError::ImageDecode(_)));

        let err = normalize_image(&[]).unwrap_err();
        assert!(matches!(err, PortalError::ImageDecode(_)));
    }

    #[test]
    fn test_rgba_input_becomes_rgb_jpeg() {
        let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_fn(64, 48, |x, y| {
            Rgba([x as u8, y as u8, 128, (x + y) as u8])
        }));
        let bytes = encode(&rgba, ImageFormat::Png);

        let result = normalize_image(&bytes).unwrap();
        let decoded = decode_jpeg(&result.data);
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }
}
