//! Bitmap Module
//!
//! A plain pixel buffer usable as a cache resource.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::trace;

use crate::cache::Resource;
use crate::error::{CacheError, Result};

// == Pixel Format ==
/// Pixel layout, which fixes the bytes each pixel occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Alpha channel only
    Alpha8,
    /// 16-bit RGB without alpha
    Rgb565,
    /// 16-bit ARGB
    Argb4444,
    /// 32-bit ARGB
    #[default]
    Argb8888,
}

impl PixelFormat {
    /// Bytes used by a single pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Alpha8 => 1,
            PixelFormat::Rgb565 | PixelFormat::Argb4444 => 2,
            PixelFormat::Argb8888 => 4,
        }
    }
}

impl FromStr for PixelFormat {
    type Err = CacheError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alpha8" => Ok(PixelFormat::Alpha8),
            "rgb565" => Ok(PixelFormat::Rgb565),
            "argb4444" => Ok(PixelFormat::Argb4444),
            "argb8888" => Ok(PixelFormat::Argb8888),
            other => Err(CacheError::InvalidCommand(format!(
                "Unknown pixel format '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Alpha8 => "alpha8",
            PixelFormat::Rgb565 => "rgb565",
            PixelFormat::Argb4444 => "argb4444",
            PixelFormat::Argb8888 => "argb8888",
        };
        f.write_str(name)
    }
}

// == Bitmap ==
/// An uncompressed image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Allocates a zeroed bitmap.
    ///
    /// # Errors
    /// `BitmapOverflow` if the pixel buffer length does not fit in `usize`.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let len = Self::byte_len(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            pixels: vec![0; len],
        })
    }

    /// Bytes a bitmap of these dimensions would occupy, without allocating.
    pub fn byte_len(width: u32, height: u32, format: PixelFormat) -> Result<usize> {
        usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or(CacheError::BitmapOverflow { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

impl Resource for Bitmap {
    fn byte_count(&self) -> usize {
        self.pixels.len()
    }

    fn dispose(self) {
        trace!(
            width = self.width,
            height = self.height,
            bytes = self.pixels.len(),
            "Releasing bitmap"
        );
    }
}
