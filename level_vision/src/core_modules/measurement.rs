// THEORY:
// The `measurement` module converts the tracked region's position into the
// synthetic level. It is pure arithmetic over the calibration scale:
//
//     height = (base_y - center_y) / pixels_per_unit
//     level  = clamp(height / real_height * level_scale, 0, level_scale)
//
// A region above the base gives a positive height. A region below the base (or far
// above the calibrated top) is still accepted; the final clamp folds it into range.

use image::GrayImage;

use crate::config::PipelineConfig;
use crate::core_modules::calibration::CalibrationScale;
use crate::core_modules::region::{Region, find_regions, largest_region};

/// Everything known about the tracked object in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub region: Region,
    /// Vertical centre of the region's bounding box, in pixels.
    pub center_y: u32,
    /// Real-world height above the calibrated base. May be negative.
    pub height: f64,
    /// Always within `[0, level_scale]`.
    pub level: f64,
}

/// Real-world height of `center_y` above the calibrated base.
pub fn height_above_base(scale: &CalibrationScale, center_y: u32) -> f64 {
    (f64::from(scale.base_y) - f64::from(center_y)) / scale.pixels_per_unit
}

/// Maps a height to the bounded level scale.
pub fn level_from_height(height: f64, real_height: f64, level_scale: f64) -> f64 {
    ((height / real_height) * level_scale).clamp(0.0, level_scale)
}

/// Measures a single region against the calibration.
pub fn measure_region(region: &Region, scale: &CalibrationScale, config: &PipelineConfig) -> Measurement {
    let center_y = region.bounding_box.center_y();
    let height = height_above_base(scale, center_y);
    Measurement {
        region: region.clone(),
        center_y,
        height,
        level: level_from_height(height, config.real_height, config.level_scale),
    }
}

/// Finds the largest region in the mask and measures it. `None` when the mask is empty.
pub fn measure(mask: &GrayImage, scale: &CalibrationScale, config: &PipelineConfig) -> Option<Measurement> {
    let regions = find_regions(mask);
    largest_region(&regions).map(|region| measure_region(region, scale, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::region::BoundingBox;
    use image::Luma;

    fn scale(base_y: i32, top_y: i32) -> CalibrationScale {
        CalibrationScale {
            base_y,
            top_y,
            pixels_per_unit: f64::from((base_y - top_y).abs()) / 14.0,
        }
    }

    #[test]
    fn height_is_positive_above_base() {
        let scale = scale(400, 100);
        let height = height_above_base(&scale, 150);
        assert!((height - 250.0 * 14.0 / 300.0).abs() < 1e-9);
        assert!(height_above_base(&scale, 450) < 0.0);
    }

    #[test]
    fn level_is_clamped_at_both_ends() {
        assert_eq!(level_from_height(-5.0, 14.0, 3.0), 0.0);
        assert_eq!(level_from_height(-1e12, 14.0, 3.0), 0.0);
        assert_eq!(level_from_height(14.0, 14.0, 3.0), 3.0);
        assert_eq!(level_from_height(1e12, 14.0, 3.0), 3.0);
        assert!((level_from_height(7.0, 14.0, 3.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn synthetic_mask_recovers_region_center() {
        let mut mask = GrayImage::new(320, 480);
        for y in 140..160 {
            for x in 50..90 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let config = PipelineConfig::default();

        let measurement = measure(&mask, &scale(400, 100), &config).unwrap();

        assert_eq!(
            measurement.region.bounding_box,
            BoundingBox { x: 50, y: 140, width: 40, height: 20 }
        );
        assert_eq!(measurement.center_y, 150);
        assert!((measurement.level - 2.5).abs() < 1e-9);
    }

    #[test]
    fn empty_mask_yields_no_measurement() {
        let mask = GrayImage::new(16, 16);
        assert!(measure(&mask, &scale(10, 2), &PipelineConfig::default()).is_none());
    }
}
