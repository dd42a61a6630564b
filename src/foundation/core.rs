use std::io::Cursor;
use std::time::Duration;

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Largest edge (in pixels) any raster target may have.
pub const MAX_DIM: u32 = 16_384;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> CardResult<Self> {
        if den == 0 {
            return Err(CardError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CardError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub const fn whole(num: u32) -> Self {
        Self { num, den: 1 }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration(self) -> Duration {
        Duration::from_secs_f64(f64::from(self.den) / f64::from(self.num))
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Index of the frame being displayed at `elapsed` on a clock that started at frame 0.
    pub fn frame_at(self, elapsed: Duration) -> u64 {
        // Tolerate float error right at a frame boundary.
        (elapsed.as_secs_f64() * self.as_f64() + 1e-6).floor().max(0.0) as u64
    }
}

/// Pixel dimensions of a surface or raster target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Multiply both edges by an integer supersampling factor.
    pub fn scaled(self, ratio: u32) -> CardResult<Self> {
        let width = self
            .width
            .checked_mul(ratio)
            .ok_or_else(|| CardError::raster("scaled width overflows"))?;
        let height = self
            .height
            .checked_mul(ratio)
            .ok_or_else(|| CardError::raster("scaled height overflows"))?;
        Ok(Self { width, height })
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> CardResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CardError::raster("rgba buffer size overflow"))
    }

    pub(crate) fn check_raster_target(self) -> CardResult<()> {
        if self.is_empty() {
            return Err(CardError::raster(format!(
                "raster target must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_DIM || self.height > MAX_DIM {
            return Err(CardError::raster(format!(
                "raster target too large: {}x{} (max {MAX_DIM}x{MAX_DIM})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A raster frame as RGBA8 pixels, **premultiplied alpha**, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// A fully transparent frame.
    pub fn transparent(size: Size) -> CardResult<Self> {
        size.check_raster_target()?;
        Ok(Self {
            width: size.width,
            height: size.height,
            data: vec![0u8; size.rgba_len()?],
        })
    }

    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> CardResult<Self> {
        let expected = Size::new(width, height).rgba_len()?;
        if data.len() != expected {
            return Err(CardError::validation(format!(
                "frame data has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a frame from straight-alpha RGBA8 (as decoders and `ffmpeg` produce it).
    pub fn from_straight(width: u32, height: u32, mut data: Vec<u8>) -> CardResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Resample to `size`. Premultiplied data interpolates correctly with linear filters.
    pub fn resized(&self, size: Size) -> CardResult<Frame> {
        size.check_raster_target()?;
        if size == self.size() {
            return Ok(self.clone());
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CardError::raster("frame buffer does not match its dimensions"))?;
        let out = image::imageops::resize(
            &src,
            size.width,
            size.height,
            image::imageops::FilterType::Triangle,
        );
        Ok(Frame {
            width: size.width,
            height: size.height,
            data: out.into_raw(),
        })
    }

    pub fn to_straight_image(&self) -> CardResult<image::RgbaImage> {
        let mut data = self.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| CardError::raster("frame buffer does not match its dimensions"))
    }

    /// Encode as PNG (straight alpha) entirely in memory.
    pub fn encode_png(&self) -> CardResult<Vec<u8>> {
        let img = self.to_straight_image()?;
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| CardError::raster(format!("png encode failed: {e}")))?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
