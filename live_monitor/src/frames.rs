use anyhow::{Context, Result};
use image::RgbImage;
use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
    prelude::*,
};

/// Horizontal mirror, so the window behaves like a mirror for the person in front of it.
pub fn mirror(frame: &Mat, mirrored: &mut Mat) -> opencv::Result<()> {
    core::flip(frame, mirrored, 1)
}

/// Copies a BGR camera frame into an RGB image buffer for the engine.
pub fn bgr_mat_to_rgb(frame: &Mat) -> Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
    let width = u32::try_from(rgb.cols()).context("negative frame width")?;
    let height = u32::try_from(rgb.rows()).context("negative frame height")?;
    let data = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, data)
        .with_context(|| format!("frame buffer does not match {width}x{height} RGB"))
}

/// Copies an RGB image into a new BGR matrix for display.
pub fn rgb_to_bgr_mat(image: &RgbImage) -> Result<Mat> {
    let rows = i32::try_from(image.height()).context("image too tall")?;
    let cols = i32::try_from(image.width()).context("image too wide")?;
    let mut rgb = Mat::new_rows_cols_with_default(rows, cols, core::CV_8UC3, Scalar::all(0.0))?;
    rgb.data_bytes_mut()?.copy_from_slice(image.as_raw());

    let mut bgr = Mat::default();
    imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
    Ok(bgr)
}
