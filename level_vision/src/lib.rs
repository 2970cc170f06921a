// THEORY:
// This file is the main entry point for the `level_vision` library crate.
// It exposes the `LevelPipeline` and its associated data structures
// (`PipelineConfig`, `Report`, `FrameAnalysis`) as the high-level interface of
// the engine. Everything in `core_modules` is a small, stateless (or explicitly
// stateful) stage that the pipeline composes once per frame:
//
//     threshold -> find_regions -> largest_region -> measure -> classify -> cursor
//
// The engine never touches a camera, a window, or an audio device. Frames arrive
// as `image::RgbImage` buffers and results leave as plain data, which keeps every
// stage testable on synthetic images.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::VisionError;
pub use pipeline::{FrameAnalysis, LevelPipeline, Report};
