use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{SizingError, SizingResult};
use crate::model::stage::{StageDesign, StageModel};

/// Keeps the inverse transforms finite when a value sits on a bound.
const BOUND_EDGE: f64 = 1e-12;
/// Span used to sample lengths when the length has no upper bound.
const LENGTH_SAMPLE_SPAN: f64 = 10.0; // m
/// Share of a two-sided span kept between a starting point and either bound.
const START_MARGIN: f64 = 0.01;
/// Smallest starting offset above a one-sided bound, in units of the scale.
const START_OFFSET: f64 = 0.1;
/// Distance from a bound, relative to the span or scale, where the transforms flatten out.
const SATURATION: f64 = 1e-4;

/// Closed interval for one design variable. `upper: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Bounds {
            lower,
            upper: Some(upper),
        }
    }

    pub fn at_least(lower: f64) -> Self {
        Bounds { lower, upper: None }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.upper.map_or(true, |upper| value <= upper)
    }

    fn validate(&self, name: &str) -> SizingResult<()> {
        if !self.lower.is_finite() {
            return Err(SizingError::InvalidParameter(format!(
                "{} lower bound must be finite, got {}",
                name, self.lower
            )));
        }
        if let Some(upper) = self.upper {
            if !upper.is_finite() || upper < self.lower {
                return Err(SizingError::InvalidParameter(format!(
                    "{} bounds are inverted: [{}, {}]",
                    name, self.lower, upper
                )));
            }
        }
        Ok(())
    }

    /// Maps an unconstrained solver coordinate into the interval.
    pub fn to_bounded(&self, z: f64, scale: f64) -> f64 {
        match self.upper {
            Some(upper) => self.lower + (upper - self.lower) * 0.5 * (1.0 + z.tanh()),
            None => self.lower + scale * softplus(z),
        }
    }

    /// Inverse of [`Bounds::to_bounded`], clamping values on or past a bound.
    pub fn to_unbounded(&self, value: f64, scale: f64) -> f64 {
        match self.upper {
            Some(upper) if upper > self.lower => {
                let fraction =
                    ((value - self.lower) / (upper - self.lower)).clamp(BOUND_EDGE, 1.0 - BOUND_EDGE);
                (2.0 * fraction - 1.0).atanh()
            }
            Some(_) => 0.0,
            None => inverse_softplus(((value - self.lower) / scale).max(BOUND_EDGE)),
        }
    }

    /// Moves a value off the flat ends of the transform so a solver started
    /// there sees a usable gradient.
    pub fn pull_inside(&self, value: f64, scale: f64) -> f64 {
        match self.upper {
            Some(upper) if upper > self.lower => {
                let margin = START_MARGIN * (upper - self.lower);
                value.clamp(self.lower + margin, upper - margin)
            }
            Some(_) => self.lower,
            None => value.max(self.lower + START_OFFSET * scale),
        }
    }

    /// Step back into the interior when `value` rests on a bound.
    pub fn inward_step(&self, value: f64, scale: f64) -> Option<f64> {
        match self.upper {
            Some(upper) if upper > self.lower => {
                let span = upper - self.lower;
                if value - self.lower <= SATURATION * span {
                    Some(START_MARGIN * span)
                } else if upper - value <= SATURATION * span {
                    Some(-START_MARGIN * span)
                } else {
                    None
                }
            }
            Some(_) => None,
            None => (value - self.lower <= SATURATION * scale).then(|| START_OFFSET * scale),
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R, span: f64) -> f64 {
        let upper = self.upper.unwrap_or(self.lower + span);
        if upper > self.lower {
            rng.gen_range(self.lower..upper)
        } else {
            self.lower
        }
    }
}

fn softplus(z: f64) -> f64 {
    if z > 30.0 {
        z
    } else {
        z.exp().ln_1p()
    }
}

fn inverse_softplus(y: f64) -> f64 {
    if y > 30.0 {
        y
    } else {
        y.exp_m1().ln()
    }
}

/// Design-variable bounds, starting point and scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    pub length: Bounds,
    pub thickness: Bounds,
    pub initial: StageDesign,
    /// Characteristic length for the one-sided length transform.
    pub length_scale: f64,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        ProblemConfig {
            length: Bounds::at_least(LENGTH_LOWER_BOUND),
            thickness: Bounds::new(THICKNESS_LOWER_BOUND, THICKNESS_UPPER_BOUND),
            initial: StageDesign::new(INITIAL_LENGTH, INITIAL_THICKNESS),
            length_scale: 1.0,
        }
    }
}

/// A sizing model together with the solver-facing problem definition.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationProblem {
    pub model: StageModel,
    pub config: ProblemConfig,
}

impl OptimizationProblem {
    pub fn new(model: StageModel, config: ProblemConfig) -> SizingResult<Self> {
        model.params.validate()?;
        config.length.validate("length")?;
        config.thickness.validate("thickness")?;

        if config.length.lower < 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "length lower bound must be non-negative, got {}",
                config.length.lower
            )));
        }
        if config.thickness.lower <= 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "thickness lower bound must be positive, got {}",
                config.thickness.lower
            )));
        }
        match config.thickness.upper {
            Some(upper) if upper < model.params.radius => {}
            _ => {
                return Err(SizingError::InvalidParameter(format!(
                    "thickness upper bound must be below the radius {}",
                    model.params.radius
                )))
            }
        }
        if !config.length_scale.is_finite() || config.length_scale <= 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "length scale must be positive, got {}",
                config.length_scale
            )));
        }
        if !config.length.contains(config.initial.length)
            || !config.thickness.contains(config.initial.thickness)
        {
            return Err(SizingError::InvalidDesign(format!(
                "initial design L={} t={} lies outside the bounds",
                config.initial.length, config.initial.thickness
            )));
        }

        Ok(OptimizationProblem { model, config })
    }

    pub fn with_initial(&self, initial: StageDesign) -> SizingResult<Self> {
        OptimizationProblem::new(
            self.model.clone(),
            ProblemConfig {
                initial,
                ..self.config
            },
        )
    }

    pub fn encode(&self, design: &StageDesign) -> Vec<f64> {
        vec![
            self.config
                .length
                .to_unbounded(design.length, self.config.length_scale),
            self.config.thickness.to_unbounded(design.thickness, 1.0),
        ]
    }

    pub fn decode(&self, z: &[f64]) -> StageDesign {
        StageDesign {
            length: self.config.length.to_bounded(z[0], self.config.length_scale),
            thickness: self.config.thickness.to_bounded(z[1], 1.0),
        }
    }

    /// `design` with every variable moved off the flat ends of its transform.
    pub fn pull_inside(&self, design: &StageDesign) -> StageDesign {
        StageDesign {
            length: self
                .config
                .length
                .pull_inside(design.length, self.config.length_scale),
            thickness: self.config.thickness.pull_inside(design.thickness, 1.0),
        }
    }

    /// Where the solver actually starts.
    pub fn interior_start(&self) -> StageDesign {
        self.pull_inside(&self.config.initial)
    }

    /// One interior step away from each bound the design rests on.
    pub fn inward_neighbours(&self, design: &StageDesign) -> Vec<StageDesign> {
        let mut neighbours = Vec::new();
        if let Some(step) = self
            .config
            .length
            .inward_step(design.length, self.config.length_scale)
        {
            neighbours.push(StageDesign {
                length: design.length + step,
                ..*design
            });
        }
        if let Some(step) = self.config.thickness.inward_step(design.thickness, 1.0) {
            neighbours.push(StageDesign {
                thickness: design.thickness + step,
                ..*design
            });
        }
        neighbours
    }

    /// Uniformly random design inside the bounds.
    pub fn sample_design<R: Rng>(&self, rng: &mut R) -> StageDesign {
        StageDesign {
            length: self.config.length.sample(rng, LENGTH_SAMPLE_SPAN),
            thickness: self.config.thickness.sample(rng, 0.0),
        }
    }
}
