use std::path::PathBuf;

use level_vision::PipelineConfig;
use tracing::warn;

pub const CAMERA_INDEX_VAR: &str = "LV_CAMERA_INDEX";
pub const CUE_DIR_VAR: &str = "LV_CUE_DIR";

/// Everything the live loop needs that is not part of the engine itself.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub camera_index: i32,
    /// Directory the cue WAV files are resolved against.
    pub cue_dir: PathBuf,
    pub video_window: String,
    pub chart_window: String,
    pub chart_size: (u32, u32),
    pub pipeline: PipelineConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            cue_dir: PathBuf::from("."),
            video_window: "Detection".to_string(),
            chart_window: "Risk".to_string(),
            chart_size: (640, 480),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Defaults, overridden by `LV_CAMERA_INDEX` and `LV_CUE_DIR` when set.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(CAMERA_INDEX_VAR) {
            match raw.trim().parse::<i32>() {
                Ok(index) if index >= 0 => self.camera_index = index,
                _ => warn!(value = %raw, "ignoring invalid {CAMERA_INDEX_VAR}"),
            }
        }
        if let Some(dir) = lookup(CUE_DIR_VAR) {
            if dir.is_empty() {
                warn!("ignoring empty {CUE_DIR_VAR}");
            } else {
                self.cue_dir = PathBuf::from(dir);
            }
        }
        self
    }
}
