// THEORY (Colour Segmentation):
// The `hsv` module is the first stage of the per-frame pipeline. It converts each
// RGB pixel into 8-bit hue/saturation/value and keeps only the pixels that fall
// inside one of a set of target bands, producing a binary mask.
//
// The 8-bit convention used here is the one camera toolkits use:
//   • hue        0..180  (degrees / 2, so a full turn fits in a byte)
//   • saturation 0..255  (chroma relative to value)
//   • value      0..255  (max channel)
//
// Red is the awkward colour: it sits where the hue wheel wraps, so it needs one band
// at the low end (0..10) and one at the high end (170..180). Bands are OR-ed together.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Full span of the 8-bit hue axis.
pub const HUE_RANGE: u16 = 180;
/// Mask value for a selected pixel.
pub const MASK_ON: u8 = 255;

/// A single pixel in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvPixel {
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

impl From<&Rgb<u8>> for HsvPixel {
    fn from(pixel: &Rgb<u8>) -> Self {
        let [red, green, blue] = pixel.0;
        let (red, green, blue) = (f32::from(red), f32::from(green), f32::from(blue));

        let maximum_channel = red.max(green.max(blue));
        let minimum_channel = red.min(green.min(blue));
        let chroma = maximum_channel - minimum_channel;

        let saturation = if maximum_channel > 0.0 {
            (chroma * 255.0 / maximum_channel).round()
        } else {
            0.0
        };

        let hue_degrees = if chroma <= 0.0 {
            0.0
        } else if maximum_channel == red {
            60.0 * (green - blue) / chroma
        } else if maximum_channel == green {
            120.0 + 60.0 * (blue - red) / chroma
        } else {
            240.0 + 60.0 * (red - green) / chroma
        };
        let hue_degrees = if hue_degrees < 0.0 { hue_degrees + 360.0 } else { hue_degrees };
        let hue = ((hue_degrees / 2.0).round() as u16) % HUE_RANGE;

        Self {
            hue: hue as u8,
            saturation: saturation as u8,
            value: maximum_channel as u8,
        }
    }
}

/// An inclusive box in HSV space: `lower[i] <= channel[i] <= upper[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// The two bands that together cover red on both sides of the hue wrap.
    pub const fn red() -> [HsvRange; 2] {
        [
            HsvRange::new([0, 120, 70], [10, 255, 255]),
            HsvRange::new([170, 120, 70], [180, 255, 255]),
        ]
    }

    pub fn contains(&self, pixel: HsvPixel) -> bool {
        let channels = [pixel.hue, pixel.saturation, pixel.value];
        channels
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(channel, (lower, upper))| lower <= channel && channel <= upper)
    }
}

/// Builds a binary mask of every pixel that falls inside any of `ranges`.
pub fn threshold(frame: &RgbImage, ranges: &[HsvRange]) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let hsv = HsvPixel::from(frame.get_pixel(x, y));
        if ranges.iter().any(|range| range.contains(hsv)) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsv(r: u8, g: u8, b: u8) -> HsvPixel {
        HsvPixel::from(&Rgb([r, g, b]))
    }

    #[test]
    fn primary_colours_land_on_expected_hues() {
        assert_eq!(hsv(255, 0, 0), HsvPixel { hue: 0, saturation: 255, value: 255 });
        assert_eq!(hsv(0, 255, 0), HsvPixel { hue: 60, saturation: 255, value: 255 });
        assert_eq!(hsv(0, 0, 255), HsvPixel { hue: 120, saturation: 255, value: 255 });
    }

    #[test]
    fn greys_have_no_hue_or_saturation() {
        assert_eq!(hsv(0, 0, 0), HsvPixel { hue: 0, saturation: 0, value: 0 });
        assert_eq!(hsv(128, 128, 128), HsvPixel { hue: 0, saturation: 0, value: 128 });
    }

    #[test]
    fn magenta_red_sits_at_the_top_of_the_hue_axis() {
        // About 345 degrees, stored as 172 in the half-degree convention.
        let pixel = hsv(255, 0, 64);
        assert_eq!(pixel.hue, 172);
        assert_eq!(pixel.value, 255);
    }

    #[test]
    fn red_bands_cover_both_sides_of_the_wrap() {
        let [low, high] = HsvRange::red();
        assert!(low.contains(hsv(220, 20, 10)));
        assert!(high.contains(hsv(255, 0, 64)));
        assert!(!low.contains(hsv(0, 200, 0)));
        assert!(!high.contains(hsv(0, 200, 0)));
    }

    #[test]
    fn dull_or_dark_red_is_rejected() {
        let [low, _] = HsvRange::red();
        // Saturation below 120.
        assert!(!low.contains(hsv(200, 150, 150)));
        // Value below 70.
        assert!(!low.contains(hsv(60, 0, 0)));
    }

    #[test]
    fn threshold_marks_only_target_pixels() {
        let mut frame = RgbImage::from_pixel(4, 3, Rgb([30, 160, 40]));
        frame.put_pixel(1, 1, Rgb([230, 10, 10]));
        frame.put_pixel(3, 2, Rgb([240, 0, 50]));

        let mask = threshold(&frame, &HsvRange::red());

        let selected: Vec<(u32, u32)> = mask
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel.0[0] == MASK_ON)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(selected, vec![(1, 1), (3, 2)]);
    }
}
