mod audio;
mod config;
mod frames;
mod input;
mod overlay;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use level_vision::core_modules::cue::CueDispatcher;
use level_vision::{LevelPipeline, Report};
use level_vision_visualizer::RiskChart;
use opencv::{
    core::Mat,
    highgui,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::audio::WavCuePlayer;
use crate::config::MonitorConfig;
use crate::input::ClickQueue;

const QUIT_KEY: char = 'q';

fn main() -> Result<()> {
    // --- 1. Logging & Configuration ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
    let config = MonitorConfig::from_env();
    info!(camera = config.camera_index, cue_dir = %config.cue_dir.display(), "starting live monitor");

    // --- 2. Camera & Windows ---
    let mut cap = VideoCapture::new(config.camera_index, videoio::CAP_ANY)
        .with_context(|| format!("opening camera {}", config.camera_index))?;
    if !cap.is_opened()? {
        bail!("camera {} is not available", config.camera_index);
    }
    highgui::named_window(&config.video_window, highgui::WINDOW_AUTOSIZE)?;
    highgui::named_window(&config.chart_window, highgui::WINDOW_AUTOSIZE)?;
    let mut clicks = input::install(&config.video_window)?;

    // --- 3. Session State ---
    let mut pipeline = LevelPipeline::new(config.pipeline.clone());
    let mut chart = RiskChart::new(config.chart_size.0, config.chart_size.1);
    let dispatcher = CueDispatcher::new(&config.cue_dir, Arc::new(WavCuePlayer))
        .context("starting cue playback runtime")?;

    let outcome = show_chart(&config.chart_window, &mut chart)
        .and_then(|()| run_loop(&config, &mut cap, &mut clicks, &mut pipeline, &mut chart, &dispatcher));

    // --- 6. Teardown ---
    cap.release()?;
    highgui::destroy_all_windows()?;
    info!("live monitor stopped");
    outcome
}

fn show_chart(window: &str, chart: &mut RiskChart) -> Result<()> {
    let raster = chart.render().context("rendering risk chart")?;
    let bgr = frames::rgb_to_bgr_mat(raster)?;
    highgui::imshow(window, &bgr)?;
    Ok(())
}

fn run_loop(
    config: &MonitorConfig,
    cap: &mut VideoCapture,
    clicks: &mut ClickQueue,
    pipeline: &mut LevelPipeline,
    chart: &mut RiskChart,
    dispatcher: &CueDispatcher,
) -> Result<()> {
    let mut frame = Mat::default();
    let mut mirrored = Mat::default();

    loop {
        // --- 4. Acquisition ---
        match cap.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(_) => {
                error!("camera returned no frame");
                break;
            }
            Err(err) => {
                error!(error = %err, "error reading from camera");
                break;
            }
        }
        frames::mirror(&frame, &mut mirrored)?;

        for y in clicks.drain() {
            if let Err(err) = pipeline.register_click(y) {
                warn!(error = %err, "calibration rejected; restart to recalibrate");
            }
        }

        // --- 5. Analysis & Visualization ---
        let rgb = frames::bgr_mat_to_rgb(&mirrored)?;
        match pipeline.generate_report(&rgb) {
            Report::AwaitingCalibration => overlay::draw_calibration_prompt(&mut mirrored)?,
            Report::CalibrationFailed { .. } => overlay::draw_calibration_failed(&mut mirrored)?,
            Report::NoTarget => {}
            Report::Measured(analysis) => {
                if let Some(scale) = pipeline.calibration().scale() {
                    overlay::draw_measurement(&mut mirrored, &analysis, scale)?;
                }
                if let Some(cue) = analysis.cue {
                    dispatcher.dispatch(cue);
                }
                chart.update(analysis.marker, &analysis.reading.message);
                show_chart(&config.chart_window, chart)?;
            }
        }

        highgui::imshow(&config.video_window, &mirrored)?;
        let key = highgui::wait_key(1)?;
        if key & 0xFF == QUIT_KEY as i32 {
            info!("quit requested");
            break;
        }
    }

    Ok(())
}
