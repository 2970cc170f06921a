use crate::core_modules::hsv::HsvRange;

/// Real-world height of the calibrated vessel, in centimetres.
pub const DEFAULT_REAL_HEIGHT: f64 = 14.0;
/// Upper bound of the synthetic level scale.
pub const DEFAULT_LEVEL_SCALE: f64 = 3.0;

/// Configuration for the LevelPipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Real-world distance between the two calibration clicks.
    pub real_height: f64,
    /// A marker at the calibrated top maps to this level; levels are clamped to `[0, level_scale]`.
    pub level_scale: f64,
    /// Hue bands that make up the tracked colour. Red needs two, one at each end of the hue axis.
    pub target_ranges: Vec<HsvRange>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            real_height: DEFAULT_REAL_HEIGHT,
            level_scale: DEFAULT_LEVEL_SCALE,
            target_ranges: HsvRange::red().to_vec(),
        }
    }
}
