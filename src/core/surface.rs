use std::path::Path;

use glam::Vec3;
use image::{ImageBuffer, Rgb, RgbImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("stride of {stride} bytes is shorter than a {row_bytes}-byte row")]
    StrideTooSmall { stride: usize, row_bytes: usize },

    #[error("failed to save surface: {0}")]
    Image(#[from] image::ImageError),
}

/// Byte layout of one pixel in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    #[default]
    Rgba8888,
    Bgra8888,
    Rgb888,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8888 | PixelFormat::Bgra8888 => 4,
            PixelFormat::Rgb888 => 3,
        }
    }

    /// Packs a colour in `[0, 1]^3` into a native pixel whose in-memory
    /// bytes follow this format's channel order.
    #[inline]
    pub fn pack(self, color: Vec3) -> u32 {
        let r = (color.x * 255.0) as u8;
        let g = (color.y * 255.0) as u8;
        let b = (color.z * 255.0) as u8;
        let bytes = match self {
            PixelFormat::Rgba8888 => [r, g, b, u8::MAX],
            PixelFormat::Bgra8888 => [b, g, r, u8::MAX],
            PixelFormat::Rgb888 => [r, g, b, 0],
        };
        u32::from_ne_bytes(bytes)
    }

    /// Writes a packed pixel into `dst`, which holds exactly one pixel.
    #[inline]
    pub fn write(self, dst: &mut [u8], pixel: u32) {
        dst.copy_from_slice(&bytemuck::bytes_of(&pixel)[..self.bytes_per_pixel()]);
    }

    /// Inverse of [`PixelFormat::pack`] for the colour channels.
    pub fn rgb(self, src: &[u8]) -> [u8; 3] {
        match self {
            PixelFormat::Rgba8888 | PixelFormat::Rgb888 => [src[0], src[1], src[2]],
            PixelFormat::Bgra8888 => [src[2], src[1], src[0]],
        }
    }
}

/// Geometry of a pixel target: pixel `(x, y)` starts at
/// `x * bytes_per_pixel + y * stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub format: PixelFormat,
}

impl SurfaceDescriptor {
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes covered by the pixels of one row, excluding stride padding.
    pub fn row_bytes(&self) -> usize {
        self.width * self.bytes_per_pixel()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn buffer_size(&self) -> usize {
        self.stride * self.height
    }
}

/// CPU pixel buffer that frames are rendered into.
#[derive(Debug, Clone)]
pub struct Surface {
    descriptor: SurfaceDescriptor,
    pixels: Vec<u8>,
}

impl Surface {
    /// Tightly packed surface.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let stride = width * format.bytes_per_pixel();
        Self {
            descriptor: SurfaceDescriptor {
                width,
                height,
                stride,
                format,
            },
            pixels: vec![0; stride * height],
        }
    }

    /// Surface whose rows are `stride` bytes apart, as display buffers often are.
    pub fn with_stride(
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self, SurfaceError> {
        let row_bytes = width * format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(SurfaceError::StrideTooSmall { stride, row_bytes });
        }
        Ok(Self {
            descriptor: SurfaceDescriptor {
                width,
                height,
                stride,
                format,
            },
            pixels: vec![0; stride * height],
        })
    }

    pub fn descriptor(&self) -> SurfaceDescriptor {
        self.descriptor
    }

    pub fn width(&self) -> usize {
        self.descriptor.width
    }

    pub fn height(&self) -> usize {
        self.descriptor.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Pixel bytes of row `y`, without stride padding.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.descriptor.stride;
        &self.pixels[start..start + self.descriptor.row_bytes()]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.descriptor.stride;
        let len = self.descriptor.row_bytes();
        &mut self.pixels[start..start + len]
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.descriptor.bytes_per_pixel();
        &self.row(y)[x * bpp..(x + 1) * bpp]
    }

    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        self.descriptor.format.rgb(self.pixel(x, y))
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            Rgb(self.rgb(x as usize, y as usize))
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        self.to_rgb_image().save(path)?;
        Ok(())
    }
}
