// Raw RGB image buffer
// Row-major byte triples; decoding and encoding image formats happens elsewhere

use crate::error::{Error, Result};

/// One pixel: red, green, blue
pub type Rgb = [u8; 3];

/// An 8-bit RGB image stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl RgbImage {
    /// Create an image with every pixel set to `color`
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Build an image from packed `RGBRGB...` bytes.
    pub fn from_raw(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(Error::InvalidImage {
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(3)
            .map(|px| [px[0], px[1], px[2]])
            .collect();

        Ok(Self { width, height, pixels })
    }

    /// Build an image from row-major pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::InvalidImage {
                expected: width * height * 3,
                actual: pixels.len() * 3,
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Flatten back to packed `RGBRGB...` bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels.into_iter().flatten().collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at `(row, col)`, or `None` outside the image
    pub fn get(&self, row: usize, col: usize) -> Option<Rgb> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.pixels[row * self.width + col])
    }

    /// Overwrite the pixel at `(row, col)`. Returns false outside the image.
    pub fn set(&mut self, row: usize, col: usize, color: Rgb) -> bool {
        if row >= self.height || col >= self.width {
            return false;
        }
        self.pixels[row * self.width + col] = color;
        true
    }
}
