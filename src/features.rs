use image::DynamicImage;

use crate::types::BoundingBox;

/// Trait for accessing pixel intensities from an image.
pub trait ImageAccess {
    /// Get the grayscale intensity at (x, y). Returns 0 for out-of-bounds pixels.
    fn get_pixel(&self, x: u32, y: u32) -> u8;

    /// Image dimensions.
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// A simple grayscale image buffer implementing ImageAccess.
pub struct GrayImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl GrayImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> u8,
    {
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { data, width, height }
    }

    /// Luminance of any decoded image, using the `image` crate's luma conversion.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        Self::new(luma.into_raw(), width, height)
    }
}

impl ImageAccess for GrayImage {
    fn get_pixel(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Integer pixel window `[x0, x1) x [y0, y1)` inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRegion {
    pub fn pixel_count(&self) -> u64 {
        (self.x1 - self.x0) as u64 * (self.y1 - self.y0) as u64
    }
}

/// Pixel window covered by `bbox`, or `None` if it holds no pixels.
///
/// Edges are truncated to whole pixels and clamped to the image, so a box that
/// lies entirely outside the image or is thinner than a pixel yields `None`.
pub fn crop_region(bbox: &BoundingBox, width: u32, height: u32) -> Option<PixelRegion> {
    let to_px = |v: f32, limit: u32| (v.max(0.0) as u32).min(limit);

    let region = PixelRegion {
        x0: to_px(bbox.x_min, width),
        y0: to_px(bbox.y_min, height),
        x1: to_px(bbox.x_max, width),
        y1: to_px(bbox.y_max, height),
    };
    (region.x0 < region.x1 && region.y0 < region.y1).then_some(region)
}

/// Mean intensity over a non-empty region, in `[0, 255]`.
pub fn mean_intensity<I: ImageAccess>(image: &I, region: &PixelRegion) -> f32 {
    let mut sum: u64 = 0;
    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            sum += image.get_pixel(x, y) as u64;
        }
    }
    (sum as f64 / region.pixel_count() as f64) as f32
}
