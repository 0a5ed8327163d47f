//! Image preprocessing: format sniffing, decoding, resizing and tensor
//! construction.

use std::io::Cursor;

use clap::ValueEnum;
use image::{
    imageops::FilterType, metadata::Orientation, DynamicImage, ImageDecoder, ImageFormat,
    ImageReader,
};
use serde::{Deserialize, Serialize};

use crate::model::ImageTensor;
use crate::utils::error::{CropDiseaseError, Result, ResultExt};
use crate::IMAGE_SIZE;

/// ImageNet normalization mean values (RGB)
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Order of the color channels in the model input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Blue, green, red; what an OpenCV-trained model expects
    #[default]
    Bgr,
    Rgb,
}

/// How 8-bit pixel values are mapped to floats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PixelScaling {
    /// Keep 0..=255
    #[default]
    Raw,
    /// Divide by 255
    Unit,
    /// Divide by 255, then apply ImageNet mean/std
    #[value(name = "imagenet")]
    ImageNet,
}

/// Preprocessing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Square side the image is resized to
    pub image_size: u32,
    pub channel_order: ChannelOrder,
    pub scaling: PixelScaling,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            image_size: IMAGE_SIZE,
            channel_order: ChannelOrder::default(),
            scaling: PixelScaling::default(),
        }
    }
}

/// A decoded upload together with what was learned while decoding it
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

impl DecodedImage {
    /// Pixel dimensions of the upload, before any resizing
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Identify the image format from its magic bytes; only JPEG and PNG pass
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat> {
    match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => Ok(format),
        Ok(other) => Err(CropDiseaseError::UnsupportedFormat(format!("{:?}", other))),
        Err(_) => Err(CropDiseaseError::UnsupportedFormat(
            "unrecognised file contents".to_string(),
        )),
    }
}

/// Decode an uploaded buffer into a color image
///
/// The EXIF orientation tag is applied, so a portrait phone photo stored
/// sideways comes back upright with its displayed dimensions.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let format = detect_format(bytes)?;
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format)
        .into_decoder()
        .or_error(CropDiseaseError::ImageDecode)?;

    // A malformed EXIF block leaves the pixels as stored
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut image = DynamicImage::from_decoder(decoder).or_error(CropDiseaseError::ImageDecode)?;
    image.apply_orientation(orientation);

    Ok(DecodedImage { image, format })
}

/// Resize to an exact `size`×`size` square, ignoring aspect ratio
///
/// Images already at the target size are returned unchanged.
pub fn resize_to_square(image: &DynamicImage, size: u32) -> DynamicImage {
    if image.width() == size && image.height() == size {
        return image.clone();
    }
    image.resize_exact(size, size, FilterType::Triangle)
}

/// Flatten an image into a `[1, height, width, 3]` tensor
pub fn to_input_tensor(
    image: &DynamicImage,
    channel_order: ChannelOrder,
    scaling: PixelScaling,
) -> Result<ImageTensor> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let order = match channel_order {
        ChannelOrder::Rgb => [0, 1, 2],
        ChannelOrder::Bgr => [2, 1, 0],
    };

    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgb.pixels() {
        for channel in order {
            data.push(scale_value(pixel[channel], channel, scaling));
        }
    }

    ImageTensor::new(data, [1, height as usize, width as usize, 3])
}

/// `rgb_channel` is the channel's index in RGB order
fn scale_value(value: u8, rgb_channel: usize, scaling: PixelScaling) -> f32 {
    match scaling {
        PixelScaling::Raw => value as f32,
        PixelScaling::Unit => value as f32 / 255.0,
        PixelScaling::ImageNet => {
            (value as f32 / 255.0 - IMAGENET_MEAN[rgb_channel]) / IMAGENET_STD[rgb_channel]
        }
    }
}

/// Resize and tensorize a decoded image according to `config`
pub fn preprocess(image: &DynamicImage, config: &PreprocessConfig) -> Result<ImageTensor> {
    let resized = resize_to_square(image, config.image_size);
    to_input_tensor(&resized, config.channel_order, config.scaling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_detect_accepts_jpeg_and_png() {
        let img = solid(8, 8, [10, 200, 30]);
        assert_eq!(
            detect_format(&encode(&img, ImageFormat::Jpeg)).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            detect_format(&encode(&img, ImageFormat::Png)).unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn test_detect_rejects_other_content() {
        // GIF magic bytes
        let gif = b"GIF89a\x01\x00\x01\x00";
        assert!(matches!(
            detect_format(gif),
            Err(CropDiseaseError::UnsupportedFormat(_))
        ));
        assert!(detect_format(b"definitely not an image").is_err());
    }

    #[test]
    fn test_decode_reports_original_dimensions() {
        let bytes = encode(&solid(640, 480, [0, 128, 0]), ImageFormat::Jpeg);
        let decoded = decode_image(&bytes).unwrap();

        assert_eq!(decoded.dimensions(), (640, 480));
        assert_eq!(decoded.mime_type(), "image/jpeg");
    }

    /// Splice an APP1 EXIF segment carrying `orientation` right after the SOI marker
    fn with_exif_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
        let mut exif = Vec::new();
        exif.extend_from_slice(b"Exif\0\0");
        // Big-endian TIFF header, first IFD at offset 8
        exif.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
        // One entry: tag 0x0112 (Orientation), SHORT, count 1
        exif.extend_from_slice(&[0x00, 0x01]);
        exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        exif.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
        // No next IFD
        exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let segment_len = (exif.len() + 2) as u16;
        let mut out = Vec::with_capacity(jpeg.len() + exif.len() + 4);
        out.extend_from_slice(&jpeg[..2]);
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&segment_len.to_be_bytes());
        out.extend_from_slice(&exif);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let stored = encode(&solid(40, 20, [0, 128, 0]), ImageFormat::Jpeg);

        // Orientation 6: stored landscape, displayed rotated 90 degrees clockwise
        let rotated = decode_image(&with_exif_orientation(&stored, 6)).unwrap();
        assert_eq!(rotated.dimensions(), (20, 40));
        assert_eq!(rotated.mime_type(), "image/jpeg");

        let upright = decode_image(&with_exif_orientation(&stored, 1)).unwrap();
        assert_eq!(upright.dimensions(), (40, 20));
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        let bytes = encode(&solid(32, 32, [1, 2, 3]), ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            decode_image(truncated),
            Err(CropDiseaseError::ImageDecode(_))
        ));
    }

    #[test]
    fn test_resize_always_square() {
        for (w, h) in [(100, 100), (640, 480), (31, 500), (256, 256)] {
            let resized = resize_to_square(&solid(w, h, [5, 5, 5]), 256);
            assert_eq!((resized.width(), resized.height()), (256, 256));
        }
    }

    #[test]
    fn test_resize_is_identity_at_target_size() {
        let mut img = RgbImage::new(256, 256);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([x as u8, y as u8, (x ^ y) as u8]);
        }
        let img = DynamicImage::ImageRgb8(img);

        let resized = resize_to_square(&img, 256);
        assert_eq!(resized.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn test_tensor_shape_and_bgr_order() {
        let tensor = to_input_tensor(
            &solid(4, 2, [10, 20, 30]),
            ChannelOrder::Bgr,
            PixelScaling::Raw,
        )
        .unwrap();

        assert_eq!(tensor.shape(), [1, 2, 4, 3]);
        assert_eq!(tensor.get(0, 1, 3, 0), Some(30.0));
        assert_eq!(tensor.get(0, 1, 3, 1), Some(20.0));
        assert_eq!(tensor.get(0, 1, 3, 2), Some(10.0));
    }

    #[test]
    fn test_tensor_rgb_scaling() {
        let img = solid(1, 1, [255, 0, 51]);

        let unit = to_input_tensor(&img, ChannelOrder::Rgb, PixelScaling::Unit).unwrap();
        assert_eq!(unit.data().to_vec(), vec![1.0f32, 0.0, 0.2]);

        let imagenet = to_input_tensor(&img, ChannelOrder::Rgb, PixelScaling::ImageNet).unwrap();
        let expected_red = (1.0 - 0.485) / 0.229;
        assert!((imagenet.data()[0] - expected_red).abs() < 1e-5);
    }

    #[test]
    fn test_preprocess_produces_model_input_shape() {
        let tensor = preprocess(&solid(300, 120, [9, 9, 9]), &PreprocessConfig::default()).unwrap();
        assert_eq!(tensor.shape(), [1, 256, 256, 3]);
    }
}
