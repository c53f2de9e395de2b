use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    constraints::{ConstraintKind, ConstraintValues, HoopForm},
    geometry::Geometry,
    mass::MassBreakdown,
    parameters::StageParameters,
    propellant::PropellantSplit,
};
use crate::errors::{SizingError, SizingResult};

/// The two quantities an optimizer is free to vary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageDesign {
    #[serde(rename = "L")]
    pub length: f64, // m
    #[serde(rename = "t")]
    pub thickness: f64, // m
}

impl StageDesign {
    pub fn new(length: f64, thickness: f64) -> Self {
        StageDesign { length, thickness }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Gross stage mass `m01`.
    GrossMass,
    /// Structural mass `m_s`.
    StructuralMass,
    /// Shell volume `v_s`.
    ShellVolume,
}

impl Objective {
    pub fn label(&self) -> &'static str {
        match self {
            Objective::GrossMass => "m01",
            Objective::StructuralMass => "m_s",
            Objective::ShellVolume => "v_s",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Objective::GrossMass | Objective::StructuralMass => "kg",
            Objective::ShellVolume => "m³",
        }
    }
}

/// Named formulations of the sizing problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    Basecase,
    Structural,
    PressureOnly,
    ShellVolume,
    InvertedHoop,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 5] = [
        ModelVariant::Basecase,
        ModelVariant::Structural,
        ModelVariant::PressureOnly,
        ModelVariant::ShellVolume,
        ModelVariant::InvertedHoop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::Basecase => "basecase",
            ModelVariant::Structural => "structural",
            ModelVariant::PressureOnly => "pressure-only",
            ModelVariant::ShellVolume => "shell-volume",
            ModelVariant::InvertedHoop => "inverted-hoop",
        }
    }

    /// Parameters the variant ships with.
    pub fn default_parameters(&self) -> StageParameters {
        match self {
            ModelVariant::Structural | ModelVariant::ShellVolume => {
                StageParameters::conservative()
            }
            _ => StageParameters::default(),
        }
    }

    pub fn build(&self, params: StageParameters) -> StageModel {
        let all = ConstraintKind::ALL.to_vec();
        let pressure_only = vec![ConstraintKind::Hoop, ConstraintKind::Aspect];

        let (objective, hoop_form, constraints) = match self {
            ModelVariant::Basecase => (Objective::GrossMass, HoopForm::Stress, all),
            ModelVariant::Structural => (Objective::StructuralMass, HoopForm::Stress, all),
            ModelVariant::PressureOnly => (Objective::GrossMass, HoopForm::Stress, pressure_only),
            ModelVariant::ShellVolume => (Objective::ShellVolume, HoopForm::Stress, pressure_only),
            ModelVariant::InvertedHoop => (Objective::GrossMass, HoopForm::Inverted, all),
        };

        StageModel {
            params,
            objective,
            hoop_form,
            constraints,
        }
    }
}

impl Default for ModelVariant {
    fn default() -> Self {
        ModelVariant::Basecase
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelVariant {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelVariant::ALL
            .iter()
            .copied()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| {
                SizingError::ConfigError(format!(
                    "unknown model variant '{}', expected one of: {}",
                    s,
                    ModelVariant::ALL
                        .iter()
                        .map(|v| v.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Everything computed for one design point.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub design: StageDesign,
    pub geometry: Geometry,
    pub propellant: PropellantSplit,
    pub mass: MassBreakdown,
    pub constraints: ConstraintValues,
    pub objective: f64,
}

impl Evaluation {
    pub fn objective_value(&self, objective: Objective) -> f64 {
        match objective {
            Objective::GrossMass => self.mass.gross,
            Objective::StructuralMass => self.mass.structural,
            Objective::ShellVolume => self.geometry.shell_volume,
        }
    }
}

/// Sizing model with a chosen objective and active constraint set.
#[derive(Debug, Clone, PartialEq)]
pub struct StageModel {
    pub params: StageParameters,
    pub objective: Objective,
    pub hoop_form: HoopForm,
    pub constraints: Vec<ConstraintKind>,
}

impl Default for StageModel {
    fn default() -> Self {
        ModelVariant::Basecase.build(StageParameters::default())
    }
}

impl StageModel {
    pub fn evaluate(&self, design: &StageDesign) -> SizingResult<Evaluation> {
        self.params.validate()?;
        let params = &self.params;

        let geometry = Geometry::compute(design.length, params.radius, design.thickness)?;
        let propellant = PropellantSplit::compute(
            geometry.propellant_volume,
            params.oxidizer_density,
            params.fuel_density,
            params.mixture_ratio,
        )?;
        let mass = MassBreakdown::compute(
            &geometry,
            &propellant,
            params.structure_density,
            params.payload_mass,
        );
        let constraints =
            ConstraintValues::compute(params, design.length, design.thickness, self.hoop_form);

        let mut evaluation = Evaluation {
            design: *design,
            geometry,
            propellant,
            mass,
            constraints,
            objective: 0.0,
        };
        evaluation.objective = evaluation.objective_value(self.objective);

        Ok(evaluation)
    }

    /// Active constraint values in declaration order.
    pub fn active_constraints(&self, evaluation: &Evaluation) -> Vec<(ConstraintKind, f64)> {
        self.constraints
            .iter()
            .map(|&kind| (kind, evaluation.constraints.value(kind)))
            .collect()
    }

    /// Active constraints divided by their reference magnitudes.
    pub fn scaled_constraints(&self, evaluation: &Evaluation) -> Vec<f64> {
        self.constraints
            .iter()
            .map(|&kind| {
                evaluation.constraints.value(kind) / kind.reference(&self.params, self.hoop_form)
            })
            .collect()
    }

    pub fn is_feasible(&self, evaluation: &Evaluation) -> bool {
        self.active_constraints(evaluation)
            .iter()
            .all(|&(_, value)| value <= 0.0)
    }
}

/// Evaluates the base-case model at `design`.
pub fn evaluate(design: &StageDesign, params: &StageParameters) -> SizingResult<Evaluation> {
    ModelVariant::Basecase.build(*params).evaluate(design)
}
