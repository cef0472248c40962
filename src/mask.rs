//! Land/water mask images.
//!
//! A [`MaskImage`] is an equirectangular brightness grid: column 0 is
//! longitude -180°, row 0 is latitude +90°. Only the red channel of the
//! source image is kept.

use std::f32::consts::PI;
use std::path::Path;

use crate::error::MaskError;

/// Single-channel brightness grid decoded from a mask image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskImage {
    width: u32,
    height: u32,
    /// One byte per pixel, row-major.
    data: Vec<u8>,
}

impl MaskImage {
    /// Build a mask from one brightness byte per pixel.
    pub fn from_luma(data: Vec<u8>, width: u32, height: u32) -> Result<Self, MaskError> {
        if width == 0 || height == 0 {
            return Err(MaskError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(MaskError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a mask from raw RGBA bytes, keeping the red channel.
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(MaskError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let red = data.chunks_exact(4).map(|px| px[0]).collect();
        Self::from_luma(red, width, height)
    }

    /// Uniform mask where every pixel has the same brightness.
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self, MaskError> {
        Self::from_luma(vec![value; width as usize * height as usize], width, height)
    }

    /// Decode a mask from an image file (PNG or JPEG).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MaskError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| MaskError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.as_raw(), width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Brightness at a pixel. Indices past the edge read the edge pixel.
    #[inline]
    pub fn brightness(&self, px: u32, py: u32) -> u8 {
        let px = px.min(self.width - 1) as usize;
        let py = py.min(self.height - 1) as usize;
        self.data[py * self.width as usize + px]
    }

    /// Pixel under the given geographic coordinate, in degrees.
    ///
    /// `lon` spans -180..180 left to right and `lat` spans 90..-90 top to
    /// bottom. The right and bottom edges fold onto the last column and row.
    pub fn pixel_at(&self, lat: f32, lon: f32) -> (u32, u32) {
        let px = (((lon + 180.0) / 360.0) * self.width as f32).floor();
        let py = (((90.0 - lat) / 180.0) * self.height as f32).floor();
        (
            clamp_index(px, self.width),
            clamp_index(py, self.height),
        )
    }

    /// Pixel under a point given by polar angle `phi` and azimuth `theta`.
    pub fn pixel_for_angles(&self, phi: f32, theta: f32) -> (u32, u32) {
        let geo = GeoCoord::from_angles(phi, theta);
        self.pixel_at(geo.lat, geo.lon)
    }

    /// Fraction of pixels brighter than `threshold`.
    pub fn coverage(&self, threshold: u8) -> f32 {
        let bright = self.data.iter().filter(|&&v| v > threshold).count();
        bright as f32 / self.data.len() as f32
    }
}

/// Latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoord {
    pub lat: f32,
    pub lon: f32,
}

impl GeoCoord {
    /// Geographic coordinate of polar angle `phi` (0 at +Z) and azimuth
    /// `theta` (0..2π), both in radians.
    pub fn from_angles(phi: f32, theta: f32) -> Self {
        Self {
            lat: 90.0 - phi * 180.0 / PI,
            lon: theta * 180.0 / PI - 180.0,
        }
    }
}

fn clamp_index(v: f32, len: u32) -> u32 {
    if v <= 0.0 {
        0
    } else {
        (v as u32).min(len - 1)
    }
}
