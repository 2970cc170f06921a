use level_vision::FrameAnalysis;
use level_vision::pipeline::CalibrationScale;
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc,
    prelude::*,
};

pub const CALIBRATION_PROMPT: &str = "Click the vessel base, then its top";
pub const CALIBRATION_FAILED_PROMPT: &str = "Calibration failed (same row twice). Restart to recalibrate.";

fn bgr(blue: f64, green: f64, red: f64) -> Scalar {
    Scalar::new(blue, green, red, 0.0)
}

fn red() -> Scalar {
    bgr(0.0, 0.0, 255.0)
}

fn white() -> Scalar {
    bgr(255.0, 255.0, 255.0)
}

const TEXT_ORIGIN: (i32, i32) = (10, 30);

fn horizontal_line(frame: &mut Mat, y: i32, color: Scalar, thickness: i32) -> opencv::Result<()> {
    let width = frame.cols();
    imgproc::line(
        frame,
        Point::new(0, y),
        Point::new(width, y),
        color,
        thickness,
        imgproc::LINE_8,
        0,
    )
}

fn text(frame: &mut Mat, message: &str, scale: f64, color: Scalar) -> opencv::Result<()> {
    imgproc::put_text(
        frame,
        message,
        Point::new(TEXT_ORIGIN.0, TEXT_ORIGIN.1),
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        color,
        2,
        imgproc::LINE_8,
        false,
    )
}

/// Draws the bounding box, the base/top/centre reference lines and the reading.
pub fn draw_measurement(
    frame: &mut Mat,
    analysis: &FrameAnalysis,
    scale: &CalibrationScale,
) -> opencv::Result<()> {
    let bounding_box = analysis.measurement.region.bounding_box;
    let rect = Rect::new(
        bounding_box.x as i32,
        bounding_box.y as i32,
        bounding_box.width as i32,
        bounding_box.height as i32,
    );
    imgproc::rectangle(frame, rect, red(), 2, imgproc::LINE_8, 0)?;

    horizontal_line(frame, scale.base_y, white(), 2)?;
    horizontal_line(frame, scale.top_y, bgr(200.0, 200.0, 200.0), 1)?;
    horizontal_line(frame, analysis.measurement.center_y as i32, red(), 1)?;

    text(frame, &analysis.reading.message, 0.7, white())
}

pub fn draw_calibration_prompt(frame: &mut Mat) -> opencv::Result<()> {
    text(frame, CALIBRATION_PROMPT, 0.6, bgr(0.0, 255.0, 255.0))
}

pub fn draw_calibration_failed(frame: &mut Mat) -> opencv::Result<()> {
    text(frame, CALIBRATION_FAILED_PROMPT, 0.6, red())
}
