use crate::config::Config;
use crate::error::Error;
use crate::image_normalizer::normalized_image::{ContentRect, NormalizedImage};
use image::error::{LimitError, LimitErrorKind};
use image::{imageops, DynamicImage, ImageError, ImageFormat, Rgb, RgbImage};
use tract_onnx::prelude::tract_ndarray::Array4;

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Letterboxes images into the fixed model input size.
///
/// Pixel values are kept on the raw 0..=255 scale. The bundled models were
/// trained on unscaled input, so no division or mean/std shift happens here.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    target_size: (u32, u32),
    accepted_formats: Vec<ImageFormat>,
}

impl ImageNormalizer {
    /// `target_size` is (height, width).
    pub fn new(target_size: (u32, u32), accepted_formats: Vec<ImageFormat>) -> Self {
        Self {
            target_size,
            accepted_formats,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.target_size, config.accepted_formats.clone())
    }

    pub fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage, Error> {
        let format = image::guess_format(bytes).map_err(Error::ImageDecode)?;

        if !self.accepted_formats.contains(&format) {
            return Err(Error::UnsupportedImageFormat(format));
        }

        let image = image::load_from_memory_with_format(bytes, format).map_err(Error::ImageDecode)?;

        self.normalize_image(&image)
    }

    pub fn normalize_image(&self, image: &DynamicImage) -> Result<NormalizedImage, Error> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::ImageDecode(ImageError::Limits(LimitError::from_kind(
                LimitErrorKind::DimensionError,
            ))));
        }

        let (target_height, target_width) = self.target_size;
        let rgb = image.to_rgb8();

        let (width, height) = contain_size(rgb.width(), rgb.height(), target_width, target_height);
        let scaled = imageops::resize(&rgb, width, height, imageops::FilterType::CatmullRom);

        let content = ContentRect {
            x: (target_width - width) / 2,
            y: (target_height - height) / 2,
            width,
            height,
        };

        let mut canvas = RgbImage::from_pixel(target_width, target_height, BACKGROUND);
        imageops::replace(&mut canvas, &scaled, content.x as i64, content.y as i64);

        let tensor = image_to_tensor(&canvas);

        Ok(NormalizedImage {
            tensor,
            display: canvas,
            content,
        })
    }
}

/// Largest size with the source aspect ratio that fits inside the target.
///
/// The bound side lands exactly on the target; the free side is rounded to
/// the nearest pixel, ties to even, and never drops below one.
pub fn contain_size(width: u32, height: u32, target_width: u32, target_height: u32) -> (u32, u32) {
    let image_ratio = width as f64 / height as f64;
    let target_ratio = target_width as f64 / target_height as f64;

    if image_ratio > target_ratio {
        let scaled = (height as f64 / width as f64 * target_width as f64).round_ties_even() as u32;
        (target_width, scaled.clamp(1, target_height))
    } else if image_ratio < target_ratio {
        let scaled = (width as f64 / height as f64 * target_height as f64).round_ties_even() as u32;
        (scaled.clamp(1, target_width), target_height)
    } else {
        (target_width, target_height)
    }
}

fn image_to_tensor(image: &RgbImage) -> Array4<f32> {
    let (width, height) = image.dimensions();

    Array4::from_shape_fn((1, height as usize, width as usize, 3), |(_, y, x, c)| {
        image.get_pixel(x as u32, y as u32)[c] as f32
    })
}
