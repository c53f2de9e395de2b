use std::f64::consts::PI;

use crate::errors::{SizingError, SizingResult};

/// Volume of a cylinder of length `length` closed by two hemispherical caps.
pub fn capsule_volume(length: f64, radius: f64) -> f64 {
    PI * radius.powi(2) * length + 4.0 / 3.0 * PI * radius.powi(3)
}

/// Outer, cavity and shell volumes of a capped cylindrical tank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub total_volume: f64,      // m³
    pub propellant_volume: f64, // m³
    pub shell_volume: f64,      // m³
}

impl Geometry {
    pub fn compute(length: f64, radius: f64, thickness: f64) -> SizingResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "radius must be positive, got {}",
                radius
            )));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(SizingError::InvalidDesign(format!(
                "length must be non-negative, got {}",
                length
            )));
        }
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(SizingError::InvalidDesign(format!(
                "wall thickness must be positive, got {}",
                thickness
            )));
        }
        if thickness >= radius {
            return Err(SizingError::InvalidDesign(format!(
                "wall thickness {} must be smaller than radius {}",
                thickness, radius
            )));
        }

        let total_volume = capsule_volume(length, radius);
        let propellant_volume = capsule_volume(length, radius - thickness);

        Ok(Geometry {
            total_volume,
            propellant_volume,
            shell_volume: total_volume - propellant_volume,
        })
    }
}
