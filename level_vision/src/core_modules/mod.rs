pub mod calibration;
pub mod cue;
pub mod hsv;
pub mod measurement;
pub mod region;
pub mod risk_curve;
pub mod tier;
