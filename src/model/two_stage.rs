use serde::{Deserialize, Serialize};

use super::geometry::Geometry;
use crate::constants::*;
use crate::errors::{SizingError, SizingResult};

/// Single-propellant parameters shared by both stages of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoStageParameters {
    pub radius: f64,              // m
    pub structure_density: f64,   // kg/m³
    pub propellant_density: f64,  // kg/m³
    pub payload_mass: f64,        // kg
    pub first_thickness: f64,     // m
    pub second_thickness: f64,    // m
}

impl Default for TwoStageParameters {
    fn default() -> Self {
        TwoStageParameters {
            radius: STAGE_RADIUS,
            structure_density: TWO_STAGE_STRUCTURE_DENSITY,
            propellant_density: TWO_STAGE_PROPELLANT_DENSITY,
            payload_mass: TWO_STAGE_PAYLOAD_MASS,
            first_thickness: FIRST_STAGE_THICKNESS,
            second_thickness: SECOND_STAGE_THICKNESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageMasses {
    pub structural: f64, // kg
    pub propellant: f64, // kg
}

impl StageMasses {
    pub fn structural_coefficient(&self) -> f64 {
        self.structural / (self.structural + self.propellant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoStageSizing {
    pub first: StageMasses,
    pub second: StageMasses,
    /// Second stage plus payload, carried by the first stage.
    pub upper_mass: f64, // kg
    pub gross_mass: f64, // kg
    pub payload_mass: f64, // kg
}

impl TwoStageSizing {
    pub fn mass_ratio(&self) -> f64 {
        self.gross_mass / self.payload_mass
    }
}

pub struct TwoStageVehicle {
    pub params: TwoStageParameters,
}

impl TwoStageVehicle {
    pub fn new(params: TwoStageParameters) -> Self {
        TwoStageVehicle { params }
    }

    fn stage_masses(&self, length: f64, thickness: f64) -> SizingResult<StageMasses> {
        let geometry = Geometry::compute(length, self.params.radius, thickness)?;
        Ok(StageMasses {
            structural: geometry.shell_volume * self.params.structure_density,
            propellant: geometry.propellant_volume * self.params.propellant_density,
        })
    }

    pub fn size(&self, first_length: f64, second_length: f64) -> SizingResult<TwoStageSizing> {
        let params = &self.params;
        for (name, value) in [
            ("structure density", params.structure_density),
            ("propellant density", params.propellant_density),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SizingError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !params.payload_mass.is_finite() || params.payload_mass <= 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "payload mass must be positive, got {}",
                params.payload_mass
            )));
        }

        let second = self.stage_masses(second_length, params.second_thickness)?;
        let upper_mass = second.structural + second.propellant + params.payload_mass;

        let first = self.stage_masses(first_length, params.first_thickness)?;
        let gross_mass = first.structural + first.propellant + upper_mass;

        Ok(TwoStageSizing {
            first,
            second,
            upper_mass,
            gross_mass,
            payload_mass: params.payload_mass,
        })
    }
}

impl Default for TwoStageVehicle {
    fn default() -> Self {
        TwoStageVehicle::new(TwoStageParameters::default())
    }
}
