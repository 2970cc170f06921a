// THEORY:
// The `Calibration` module turns two pointer clicks into a pixel-to-length scale.
// The first click marks the vessel base, the second its top. The distance between
// the two rows, divided by the known real height of the vessel, gives the number
// of pixels per real-world unit used by every later measurement.
//
// Key architectural principles:
// 1.  **Explicit State Machine**: Instead of a handful of optional globals, the
//     calibration lives in a single enum. Measurement is only possible in the
//     `Calibrated` state, so "scale is undefined until two clicks" is enforced by
//     the type rather than by convention.
// 2.  **One Shot**: There is no reset path. Once calibrated (or failed), every
//     further click is ignored for the rest of the session.
// 3.  **Guarded Division**: Two clicks on the same row would produce a zero scale.
//     That case is reported as an error and parks the calibration in `Failed`.

use crate::error::VisionError;

/// The pixel-to-length scale produced by a successful calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationScale {
    /// Pixel row of the vessel base (first click).
    pub base_y: i32,
    /// Pixel row of the vessel top (second click).
    pub top_y: i32,
    /// Always strictly positive.
    pub pixels_per_unit: f64,
}

impl CalibrationScale {
    fn from_rows(base_y: i32, top_y: i32, real_height: f64) -> Result<Self, VisionError> {
        let pixel_height = (base_y - top_y).abs();
        if pixel_height == 0 {
            return Err(VisionError::DegenerateCalibration { row: base_y });
        }
        Ok(Self {
            base_y,
            top_y,
            pixels_per_unit: f64::from(pixel_height) / real_height,
        })
    }
}

/// What a single click did to the calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    BaseMarked(i32),
    Calibrated(CalibrationScale),
    /// The calibration was already finished (or failed); the click changes nothing.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Calibration {
    #[default]
    Uncalibrated,
    BaseMarked {
        base_y: i32,
    },
    Calibrated(CalibrationScale),
    /// Both clicks landed on `row`. Recovering requires a restart.
    Failed {
        row: i32,
    },
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one pointer-down row into the calibration.
    pub fn register_click(&mut self, y: i32, real_height: f64) -> Result<ClickOutcome, VisionError> {
        match *self {
            Calibration::Uncalibrated => {
                *self = Calibration::BaseMarked { base_y: y };
                Ok(ClickOutcome::BaseMarked(y))
            }
            Calibration::BaseMarked { base_y } => {
                match CalibrationScale::from_rows(base_y, y, real_height) {
                    Ok(scale) => {
                        *self = Calibration::Calibrated(scale);
                        Ok(ClickOutcome::Calibrated(scale))
                    }
                    Err(err) => {
                        *self = Calibration::Failed { row: y };
                        Err(err)
                    }
                }
            }
            Calibration::Calibrated(_) | Calibration::Failed { .. } => Ok(ClickOutcome::Ignored),
        }
    }

    pub fn scale(&self) -> Option<&CalibrationScale> {
        match self {
            Calibration::Calibrated(scale) => Some(scale),
            _ => None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.scale().is_some()
    }
}
