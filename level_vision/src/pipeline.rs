// THEORY:
// The `pipeline` module is the top-level API for the level engine. It owns the only
// mutable session state (calibration and tier cursor) and composes the stateless
// stages in `core_modules` into a single per-frame call. The caller feeds pointer
// clicks and frames in; a `Report` comes out. The pipeline decides *which* cue is
// due, but never plays it.

use image::RgbImage;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::core_modules::calibration::{Calibration, ClickOutcome};
use crate::core_modules::hsv;
use crate::core_modules::measurement;
use crate::core_modules::risk_curve::interpolate_tier_position;
use crate::core_modules::tier::TierCursor;
use crate::error::VisionError;

// Re-export key data structures for the public API.
pub use crate::core_modules::calibration::CalibrationScale;
pub use crate::core_modules::measurement::Measurement;
pub use crate::core_modules::region::{BoundingBox, Region};
pub use crate::core_modules::tier::{Cue, Reading, RiskTier};

/// The detailed data package for a frame with a tracked object.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    pub measurement: Measurement,
    pub reading: Reading,
    /// Set only on the frame where the tier changed into a tier with a cue.
    pub cue: Option<Cue>,
    /// `(level, tier_position)` for the chart marker.
    pub marker: (f64, f64),
}

/// The primary output of the pipeline for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Fewer than two clicks so far; nothing is measured.
    AwaitingCalibration,
    /// Both clicks were on the same row. Measurement is off until restart.
    CalibrationFailed { row: i32 },
    /// Calibrated, but no target-coloured region in this frame.
    NoTarget,
    Measured(FrameAnalysis),
}

/// The main, top-level struct for the level engine.
#[derive(Debug, Clone, Default)]
pub struct LevelPipeline {
    config: PipelineConfig,
    calibration: Calibration,
    cursor: TierCursor,
}

impl LevelPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            calibration: Calibration::new(),
            cursor: TierCursor::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn current_tier(&self) -> Option<RiskTier> {
        self.cursor.current()
    }

    /// Feeds one pointer-down row into the calibration.
    pub fn register_click(&mut self, y: i32) -> Result<ClickOutcome, VisionError> {
        let outcome = self.calibration.register_click(y, self.config.real_height)?;
        match outcome {
            ClickOutcome::BaseMarked(base_y) => info!(base_y, "base marked"),
            ClickOutcome::Calibrated(scale) => info!(
                top_y = scale.top_y,
                pixels_per_unit = format_args!("{:.2}", scale.pixels_per_unit),
                "calibration ready"
            ),
            ClickOutcome::Ignored => debug!(y, "click ignored, calibration already settled"),
        }
        Ok(outcome)
    }

    /// Runs segmentation, measurement and classification on one mirrored RGB frame.
    pub fn generate_report(&mut self, frame: &RgbImage) -> Report {
        let scale = match self.calibration {
            Calibration::Calibrated(scale) => scale,
            Calibration::Failed { row } => return Report::CalibrationFailed { row },
            Calibration::Uncalibrated | Calibration::BaseMarked { .. } => {
                return Report::AwaitingCalibration;
            }
        };

        // Stage 1: Colour Segmentation
        let mask = hsv::threshold(frame, &self.config.target_ranges);

        // Stage 2: Region Extraction & Measurement
        let Some(measurement) = measurement::measure(&mask, &scale, &self.config) else {
            return Report::NoTarget;
        };

        // Stage 3: Classification
        let reading = Reading::from_level(measurement.level);
        let previous = self.cursor.current();
        let cue = self.cursor.advance(&reading);
        if previous != Some(reading.tier) {
            info!(tier = %reading.tier, level = format_args!("{:.2}", reading.level), "risk tier changed");
        }
        debug!(
            center_y = measurement.center_y,
            height = measurement.height,
            level = measurement.level,
            "frame measured"
        );

        let marker = (measurement.level, interpolate_tier_position(measurement.level));
        Report::Measured(FrameAnalysis {
            measurement,
            reading,
            cue,
            marker,
        })
    }
}
