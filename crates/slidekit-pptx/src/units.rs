//! Unit conversions between presentation units and OOXML integers.
//!
//! OOXML stores lengths as EMU (English Metric Units):
//! - 914400 EMU = 1 inch
//! - 12700 EMU = 1 point
//! - 360000 EMU = 1 centimeter
//!
//! Font sizes are hundredths of a point, rotations sixtieths of a degree
//! (60000 per degree) and alpha values thousandths of a percent.

use crate::constants::{EMU_PER_CM, EMU_PER_INCH, EMU_PER_POINT, ROTATION_UNITS_PER_DEGREE};

/// Convert inches to EMU, rounding to the nearest integer
pub fn inch_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

/// Convert points to EMU, rounding to the nearest integer
pub fn pt_to_emu(points: f64) -> i64 {
    (points * EMU_PER_POINT as f64).round() as i64
}

/// Convert centimeters to EMU, rounding to the nearest integer
pub fn cm_to_emu(cm: f64) -> i64 {
    (cm * EMU_PER_CM as f64).round() as i64
}

/// Convert EMU back to inches
pub fn emu_to_inch(emu: i64) -> f64 {
    emu as f64 / EMU_PER_INCH as f64
}

/// Font size in points to the `sz` attribute (hundredths of a point)
pub fn font_size_hpt(points: f64) -> i64 {
    (points * 100.0).round() as i64
}

/// Rotation in degrees to the `rot` attribute
pub fn rotation_units(degrees: f64) -> i64 {
    (degrees * ROTATION_UNITS_PER_DEGREE as f64).round() as i64
}

/// Transparency percentage (0-100) to an `a:alpha` value (0-100000)
pub fn alpha_from_transparency(transparency: f64) -> i64 {
    let opacity = (100.0 - transparency.clamp(0.0, 100.0)) * 1000.0;
    opacity.round() as i64
}

/// Line spacing multiplier to `a:spcPct` (1.5 lines = 150000)
pub fn line_spacing_pct(multiplier: f64) -> i64 {
    (multiplier * 100_000.0).round() as i64
}
