use image::DynamicImage;
use tracing::warn;

use crate::errors::ImageError;

/// Interleaved samples, kept at the decoded depth.
#[derive(Debug, Clone)]
pub enum Samples {
    Eight(Vec<u8>),
    Sixteen(Vec<u16>),
}

impl Samples {
    fn len(&self) -> usize {
        match self {
            Samples::Eight(samples) => samples.len(),
            Samples::Sixteen(samples) => samples.len(),
        }
    }

    fn get(&self, index: usize) -> u16 {
        match self {
            Samples::Eight(samples) => u16::from(samples[index]),
            Samples::Sixteen(samples) => samples[index],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: usize,
    samples: Samples,
}

impl Raster {
    pub fn new(width: u32, height: u32, channels: usize, samples: Samples) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::ZeroDimensions);
        }
        if !(1..=4).contains(&channels) {
            return Err(ImageError::InvalidRawInput(format!(
                "expected 1 to 4 channels, got {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels;
        if samples.len() != expected {
            return Err(ImageError::InvalidRawInput(format!(
                "expected {expected} samples for {width}x{height}x{channels}, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn from_raw(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self, ImageError> {
        Self::new(width, height, channels as usize, Samples::Eight(data))
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self, ImageError> {
        let (width, height) = (image.width(), image.height());
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(buf) => (1, Samples::Eight(buf.into_raw())),
            DynamicImage::ImageLumaA8(buf) => (2, Samples::Eight(buf.into_raw())),
            DynamicImage::ImageRgb8(buf) => (3, Samples::Eight(buf.into_raw())),
            DynamicImage::ImageRgba8(buf) => (4, Samples::Eight(buf.into_raw())),
            DynamicImage::ImageLuma16(buf) => (1, Samples::Sixteen(buf.into_raw())),
            DynamicImage::ImageLumaA16(buf) => (2, Samples::Sixteen(buf.into_raw())),
            DynamicImage::ImageRgb16(buf) => (3, Samples::Sixteen(buf.into_raw())),
            DynamicImage::ImageRgba16(buf) => (4, Samples::Sixteen(buf.into_raw())),
            image @ DynamicImage::ImageRgb32F(_) => {
                warn!("converting float rgb image to 16-bit samples");
                (3, Samples::Sixteen(image.into_rgb16().into_raw()))
            }
            image => {
                warn!(color = ?image.color(), "converting image to 16-bit rgba samples");
                (4, Samples::Sixteen(image.into_rgba16().into_raw()))
            }
        };
        Self::new(width, height, channels, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// 255 for 8-bit sources, 65535 otherwise.
    pub fn max(&self) -> u16 {
        match self.samples {
            Samples::Eight(_) => u16::from(u8::MAX),
            Samples::Sixteen(_) => u16::MAX,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Vec<u16> {
        let start = self.offset(x as usize, y as usize);
        (start..start + self.channels)
            .map(|index| self.samples.get(index))
            .collect()
    }

    pub(crate) fn sample(&self, x: usize, y: usize, channel: usize) -> u16 {
        self.samples.get(self.offset(x, y) + channel)
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * self.channels
    }
}
