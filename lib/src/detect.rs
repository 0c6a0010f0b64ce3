use serde::{Deserialize, Serialize};

use crate::{bounding_box::BoundingBox, errors::ImageError, raster::Raster};

pub const DEFAULT_TOLERANCE: u32 = 10;

const MAX_TOLERANCE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BbxOptions {
    pub tolerance: u32,
}

impl Default for BbxOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl BbxOptions {
    pub fn with_tolerance(tolerance: u32) -> Self {
        Self { tolerance }
    }

    pub fn validate(&self) -> Result<(), ImageError> {
        if self.tolerance > MAX_TOLERANCE {
            return Err(ImageError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Equivalent of ImageMagick's `-trim`: the box spanning every pixel whose 3x3 median differs
/// from the pixel at `(0, 0)` by more than `tolerance` percent of the sample range.
pub fn bounding_box(raster: &Raster, tolerance: u32) -> BoundingBox {
    let (width, height) = (raster.width() as usize, raster.height() as usize);
    let background = raster.pixel(0, 0);
    let threshold = f64::from(raster.max()) * f64::from(tolerance) / 100.0;

    let mut columns = vec![false; width];
    let mut rows = vec![false; height];
    for y in 0..height {
        for x in 0..width {
            // already counted in both projections
            if rows[y] && columns[x] {
                continue;
            }
            if is_content(raster, x, y, &background, threshold) {
                columns[x] = true;
                rows[y] = true;
            }
        }
    }

    match (span(&columns), span(&rows)) {
        (Some((left, right)), Some((top, bottom))) => BoundingBox {
            left,
            top,
            width: right - left,
            height: bottom - top,
        },
        // nothing found: reported at the origin, not at (width, height) like the vips trim
        _ => BoundingBox::default(),
    }
}

fn is_content(raster: &Raster, x: usize, y: usize, background: &[u16], threshold: f64) -> bool {
    background.iter().enumerate().any(|(channel, &bg)| {
        let smoothed = median3(raster, x, y, channel);
        (f64::from(smoothed) - f64::from(bg)).abs() > threshold
    })
}

/// Median of the 3x3 window around `(x, y)`; edge pixels are repeated past the border.
fn median3(raster: &Raster, x: usize, y: usize, channel: usize) -> u16 {
    let max_x = raster.width() as usize - 1;
    let max_y = raster.height() as usize - 1;
    let mut window = [0u16; 9];
    let mut i = 0;
    for sy in [y.saturating_sub(1), y, (y + 1).min(max_y)] {
        for sx in [x.saturating_sub(1), x, (x + 1).min(max_x)] {
            window[i] = raster.sample(sx, sy, channel);
            i += 1;
        }
    }
    window.sort_unstable();
    window[4]
}

fn span(occupied: &[bool]) -> Option<(u32, u32)> {
    let first = occupied.iter().position(|&o| o)?;
    let last = occupied.iter().rposition(|&o| o)?;
    Some((first as u32, last as u32 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb};

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    /// White canvas with `ink` filling the `[x0, x1) x [y0, y1)` rectangle.
    fn canvas(width: u32, height: u32, rect: (u32, u32, u32, u32), ink: Rgb<u8>) -> Raster {
        let (x0, y0, x1, y1) = rect;
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                ink
            } else {
                WHITE
            }
        });
        Raster::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap()
    }

    #[test]
    fn finds_solid_rectangle() {
        let raster = canvas(100, 80, (10, 20, 40, 35), BLACK);
        let bbx = bounding_box(&raster, DEFAULT_TOLERANCE);
        assert_eq!(
            bbx,
            BoundingBox {
                left: 10,
                top: 20,
                width: 30,
                height: 15
            }
        );
    }

    #[test]
    fn content_touching_bottom_right_edges() {
        let raster = canvas(50, 50, (30, 40, 50, 50), BLACK);
        let bbx = bounding_box(&raster, DEFAULT_TOLERANCE);
        assert_eq!(
            bbx,
            BoundingBox {
                left: 30,
                top: 40,
                width: 20,
                height: 10
            }
        );
        assert_eq!(bbx.right(), raster.width());
        assert_eq!(bbx.bottom(), raster.height());
    }

    #[test]
    fn isolated_specks_are_smoothed_away() {
        let mut img = ImageBuffer::from_fn(60, 60, |x, y| {
            if (20..30).contains(&x) && (20..30).contains(&y) {
                BLACK
            } else {
                WHITE
            }
        });
        img.put_pixel(55, 5, BLACK);
        img.put_pixel(2, 50, BLACK);
        let raster = Raster::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap();

        let bbx = bounding_box(&raster, 0);
        assert_eq!(
            bbx,
            BoundingBox {
                left: 20,
                top: 20,
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn one_pixel_lines_are_smoothed_away() {
        let raster = canvas(40, 40, (0, 12, 40, 13), BLACK);
        assert!(bounding_box(&raster, 0).is_empty());

        let raster = canvas(40, 40, (0, 12, 40, 14), BLACK);
        let bbx = bounding_box(&raster, 0);
        assert_eq!((bbx.top, bbx.height), (12, 2));
        assert_eq!((bbx.left, bbx.width), (0, 40));
    }

    #[test]
    fn flat_image_is_empty() {
        let img = ImageBuffer::from_pixel(32, 16, Rgb([12u8, 200, 90]));
        let raster = Raster::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(bounding_box(&raster, 0), BoundingBox::default());
    }

    #[test]
    fn single_pixel_image_is_empty() {
        let raster = Raster::from_raw(vec![9], 1, 1, 1).unwrap();
        assert_eq!(bounding_box(&raster, 0), BoundingBox::default());
    }

    #[test]
    fn low_contrast_needs_zero_tolerance() {
        let raster = canvas(120, 90, (5, 7, 100, 80), Rgb([240, 240, 240]));

        let explicit = bounding_box(&raster, 0);
        assert_eq!((explicit.width, explicit.height), (95, 73));

        let default = bounding_box(&raster, DEFAULT_TOLERANCE);
        assert_eq!((default.width, default.height), (0, 0));
    }

    #[test]
    fn full_tolerance_never_finds_content() {
        let raster = canvas(20, 20, (5, 5, 15, 15), BLACK);
        assert!(bounding_box(&raster, 100).is_empty());
    }

    #[test]
    fn sixteen_bit_threshold_scales_with_range() {
        let img = ImageBuffer::from_fn(30, 30, |x, y| {
            if (10..20).contains(&x) && (10..20).contains(&y) {
                Luma([60_000u16])
            } else {
                Luma([u16::MAX])
            }
        });
        let raster = Raster::from_dynamic(DynamicImage::ImageLuma16(img)).unwrap();

        // difference of 5535 is below 10% of 65535 but above 5%
        assert!(bounding_box(&raster, 10).is_empty());
        assert_eq!(
            bounding_box(&raster, 5),
            BoundingBox {
                left: 10,
                top: 10,
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn alpha_counts_as_content() {
        let img = ImageBuffer::from_fn(16, 16, |x, y| {
            if (4..12).contains(&x) && (6..9).contains(&y) {
                LumaA([0u8, 255])
            } else {
                LumaA([0u8, 0])
            }
        });
        let raster = Raster::from_dynamic(DynamicImage::ImageLumaA8(img)).unwrap();
        assert_eq!(
            bounding_box(&raster, DEFAULT_TOLERANCE),
            BoundingBox {
                left: 4,
                top: 6,
                width: 8,
                height: 3
            }
        );
    }

    #[test]
    fn options_reject_tolerance_above_hundred() {
        assert!(BbxOptions::with_tolerance(100).validate().is_ok());
        assert!(matches!(
            BbxOptions::with_tolerance(101).validate(),
            Err(ImageError::InvalidTolerance(101))
        ));
        assert_eq!(BbxOptions::default().tolerance, DEFAULT_TOLERANCE);
    }
}
