// THEORY:
// The `risk_curve` is the continuous counterpart of the tier table, used only to
// place the live marker on the chart. It joins six calibration points with straight
// lines, so a level between two thresholds lands between the two tier positions
// instead of snapping to one of them. Outside the curve the end points are held.

/// `(level, tier_position)` calibration points, ordered by level.
pub const RISK_CURVE: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.3, 1.0),
    (0.5, 2.0),
    (1.5, 3.0),
    (2.5, 4.0),
    (3.0, 5.0),
];

/// Piecewise-linear tier position for `level`.
pub fn interpolate_tier_position(level: f64) -> f64 {
    let (first_level, first_position) = RISK_CURVE[0];
    let (last_level, last_position) = RISK_CURVE[RISK_CURVE.len() - 1];

    if level <= first_level {
        return first_position;
    }
    if level >= last_level {
        return last_position;
    }

    for pair in RISK_CURVE.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if level <= x1 {
            return y0 + (level - x0) * (y1 - y0) / (x1 - x0);
        }
    }
    last_position
}
