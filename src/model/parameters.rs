use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{SizingError, SizingResult};

/// Fixed physical inputs of a stage evaluation. All values in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageParameters {
    #[serde(rename = "R")]
    pub radius: f64, // m
    #[serde(rename = "rho_s")]
    pub structure_density: f64, // kg/m³
    #[serde(rename = "rho_o")]
    pub oxidizer_density: f64, // kg/m³
    #[serde(rename = "rho_f")]
    pub fuel_density: f64, // kg/m³
    #[serde(rename = "OF")]
    pub mixture_ratio: f64,
    #[serde(rename = "m_L")]
    pub payload_mass: f64, // kg
    #[serde(rename = "p")]
    pub pressure: f64, // Pa
    #[serde(rename = "s_t")]
    pub tensile_strength: f64, // Pa
    #[serde(rename = "s_y")]
    pub yield_strength: f64, // Pa
    #[serde(rename = "g")]
    pub gravity: f64, // m/s²
}

impl Default for StageParameters {
    fn default() -> Self {
        StageParameters {
            radius: STAGE_RADIUS,
            structure_density: STRUCTURE_DENSITY,
            oxidizer_density: OXIDIZER_DENSITY,
            fuel_density: FUEL_DENSITY,
            mixture_ratio: MIXTURE_RATIO,
            payload_mass: PAYLOAD_MASS,
            pressure: TANK_PRESSURE,
            tensile_strength: TENSILE_STRENGTH,
            yield_strength: YIELD_STRENGTH,
            gravity: GRAVITY,
        }
    }
}

impl StageParameters {
    /// Defaults with the lower yield strength used by the structural-mass
    /// and shell-volume models.
    pub fn conservative() -> Self {
        StageParameters {
            yield_strength: YIELD_STRENGTH_CONSERVATIVE,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> SizingResult<()> {
        let strictly_positive = [
            ("radius", self.radius),
            ("structure density", self.structure_density),
            ("oxidizer density", self.oxidizer_density),
            ("fuel density", self.fuel_density),
            ("mixture ratio", self.mixture_ratio),
            ("pressure", self.pressure),
            ("tensile strength", self.tensile_strength),
            ("yield strength", self.yield_strength),
            ("gravity", self.gravity),
        ];
        for (name, value) in strictly_positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SizingError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        if !self.payload_mass.is_finite() || self.payload_mass < 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "payload mass must be non-negative, got {}",
                self.payload_mass
            )));
        }

        Ok(())
    }
}
