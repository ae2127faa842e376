use image::RgbImage;
use tract_onnx::prelude::tract_ndarray::Array4;

/// Where the scaled source image sits inside the letterboxed canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Shape (1, height, width, 3), raw 0..=255 pixel values.
    pub tensor: Array4<f32>,
    /// The padded RGB image the tensor was built from.
    pub display: RgbImage,
    pub content: ContentRect,
}
