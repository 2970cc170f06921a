use anyhow::Result;
use image::RgbImage;
use level_vision::core_modules::risk_curve::RISK_CURVE;
use level_vision::pipeline::RiskTier;
use plotters::prelude::*;

pub const TITLE: &str = "Blood alcohol level and risk";
pub const X_DESC: &str = "Blood alcohol (g/L)";
pub const Y_DESC: &str = "Risk level";
/// Horizontal extent of the chart; slightly past the top of the level scale.
pub const X_MAX: f64 = 3.1;
pub const Y_RANGE: (f64, f64) = (-0.5, 5.5);
/// Data coordinates of the message annotation.
const MESSAGE_ANCHOR: (f64, f64) = (0.05, 5.2);

/// Maps a y-axis key point to the tier label drawn beside it.
pub fn tier_label(position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    RiskTier::ALL
        .get(index as usize)
        .map(|tier| tier.label().to_string())
        .unwrap_or_default()
}

/// A persistent risk-vs-level chart with one movable marker, rendered off-screen.
///
/// The chart lives for the whole session. `update` moves the marker, `render` redraws
/// the full chart into an RGB raster that the caller can show in any window.
pub struct RiskChart {
    width: u32,
    height: u32,
    canvas: RgbImage,
    marker: (f64, f64),
    message: String,
    /// Where the marker landed in the last rendered raster.
    marker_pixel: Option<(i32, i32)>,
}

impl RiskChart {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            canvas: RgbImage::new(width, height),
            marker: (0.0, 0.0),
            message: String::new(),
            marker_pixel: None,
        }
    }

    pub fn marker(&self) -> (f64, f64) {
        self.marker
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn marker_pixel(&self) -> Option<(i32, i32)> {
        self.marker_pixel
    }

    /// Moves the marker to `(level, tier_position)` and replaces the annotation.
    pub fn update(&mut self, marker: (f64, f64), message: &str) {
        self.marker = marker;
        self.message.clear();
        self.message.push_str(message);
    }

    /// Redraws the chart and returns the raster.
    pub fn render(&mut self) -> Result<&RgbImage> {
        let Self {
            width,
            height,
            canvas,
            marker,
            message,
            marker_pixel,
        } = self;

        {
            let root = BitMapBackend::with_buffer(&mut **canvas, (*width, *height)).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(TITLE, ("sans-serif", 20))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(110)
                .build_cartesian_2d(
                    0f64..X_MAX,
                    (Y_RANGE.0..Y_RANGE.1).with_key_points(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]),
                )?;

            chart
                .configure_mesh()
                .x_desc(X_DESC)
                .y_desc(Y_DESC)
                .y_label_formatter(&|position| tier_label(*position))
                .draw()?;

            chart
                .draw_series(LineSeries::new(RISK_CURVE.iter().copied(), &BLUE))?
                .label("Risk")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

            *marker_pixel = Some(chart.backend_coord(marker));
            chart
                .draw_series(std::iter::once(Circle::new(*marker, 5, RED.filled())))?
                .label("Current level")
                .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));

            chart.draw_series(std::iter::once(Text::new(
                message.clone(),
                MESSAGE_ANCHOR,
                ("sans-serif", 14).into_font().color(&RED),
            )))?;

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(SeriesLabelPosition::LowerRight)
                .draw()?;

            root.present()?;
        }

        Ok(&*canvas)
    }
}
