use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::parameters::StageParameters;

/// Formulation of the hoop-stress constraint. The two forms are not
/// interchangeable and are kept as separate variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoopForm {
    /// `p·R/t − s_t`, in Pa.
    Stress,
    /// `s_t/(p·R) − t`.
    Inverted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintKind {
    Hoop,
    CombinedStress,
    Aspect,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 3] = [
        ConstraintKind::Hoop,
        ConstraintKind::CombinedStress,
        ConstraintKind::Aspect,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConstraintKind::Hoop => "con1",
            ConstraintKind::CombinedStress => "con2",
            ConstraintKind::Aspect => "con3",
        }
    }

    /// Typical magnitude used to bring the constraint to order one.
    pub fn reference(&self, params: &StageParameters, form: HoopForm) -> f64 {
        match (self, form) {
            (ConstraintKind::Hoop, HoopForm::Stress) => params.tensile_strength,
            (ConstraintKind::Hoop, HoopForm::Inverted) => 1.0,
            (ConstraintKind::CombinedStress, _) => params.yield_strength,
            (ConstraintKind::Aspect, _) => 1.0,
        }
    }
}

/// Thin-wall hoop stress margin; feasible when `<= 0`.
pub fn hoop_margin(
    pressure: f64,
    radius: f64,
    thickness: f64,
    tensile_strength: f64,
    form: HoopForm,
) -> f64 {
    match form {
        HoopForm::Stress => pressure * radius / thickness - tensile_strength,
        HoopForm::Inverted => tensile_strength / (pressure * radius) - thickness,
    }
}

/// Axial load on the wall cross-section relieved by pressure stress, against yield.
pub fn combined_stress_margin(
    gravity: f64,
    payload_mass: f64,
    pressure: f64,
    radius: f64,
    thickness: f64,
    yield_strength: f64,
) -> f64 {
    let wall_area = PI * (2.0 * radius * thickness - thickness.powi(2));
    gravity * payload_mass / wall_area - pressure * radius / (2.0 * thickness) - yield_strength
}

/// Keeps the stage at least as long as its radius.
pub fn aspect_margin(length: f64, radius: f64) -> f64 {
    1.0 - length / radius
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintValues {
    pub hoop: f64,
    pub combined_stress: f64,
    pub aspect: f64,
}

impl ConstraintValues {
    pub fn compute(
        params: &StageParameters,
        length: f64,
        thickness: f64,
        form: HoopForm,
    ) -> Self {
        ConstraintValues {
            hoop: hoop_margin(
                params.pressure,
                params.radius,
                thickness,
                params.tensile_strength,
                form,
            ),
            combined_stress: combined_stress_margin(
                params.gravity,
                params.payload_mass,
                params.pressure,
                params.radius,
                thickness,
                params.yield_strength,
            ),
            aspect: aspect_margin(length, params.radius),
        }
    }

    pub fn value(&self, kind: ConstraintKind) -> f64 {
        match kind {
            ConstraintKind::Hoop => self.hoop,
            ConstraintKind::CombinedStress => self.combined_stress,
            ConstraintKind::Aspect => self.aspect,
        }
    }
}
