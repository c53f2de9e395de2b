//! Constrained minimisation of a stage model through `argmin`.
//!
//! Bounds are removed by the reparameterisation in [`OptimizationProblem`];
//! the remaining inequality constraints are folded into an augmented
//! Lagrangian merit
//!
//!   f(x)/f₀  +  Σ_k (μ/2) [max(0, λ_k/μ + g_k(x))]²
//!
//! which L-BFGS minimises with central finite-difference gradients. After
//! each inner solve
//!
//!   λ_k ← max(0, λ_k + μ · g_k),   μ ← min(μ_max, α · μ)
//!
//! until the largest scaled violation drops below the tolerance.
//!
//! The transforms flatten out next to a bound, so the solver starts from a
//! point pulled off the bounds. A design that still comes to rest on a bound
//! while the merit keeps falling towards the interior is restarted from
//! inside instead of being reported as a minimum.

use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::neldermead::NelderMead;
use argmin::solver::quasinewton::LBFGS;
use finitediff::FiniteDiff;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::problem::OptimizationProblem;
use crate::constants::*;
use crate::errors::{SizingError, SizingResult};
use crate::model::stage::{Evaluation, StageDesign};

/// Edge length of the starting simplex in solver coordinates.
const SIMPLEX_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub penalty_initial: f64,
    pub penalty_growth: f64,
    pub penalty_max: f64,
    pub max_outer_iterations: usize,
    pub max_inner_iterations: u64,
    /// Largest scaled constraint value accepted as feasible.
    pub constraint_tolerance: f64,
    pub lbfgs_memory: usize,
    pub gradient_tolerance: f64,
    pub cost_tolerance: f64,
    /// Relative objective change between outer iterations treated as settled.
    pub objective_tolerance: f64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        DriverSettings {
            penalty_initial: PENALTY_INITIAL,
            penalty_growth: PENALTY_GROWTH,
            penalty_max: PENALTY_MAX,
            max_outer_iterations: MAX_OUTER_ITERATIONS,
            max_inner_iterations: MAX_INNER_ITERATIONS,
            constraint_tolerance: CONSTRAINT_TOLERANCE,
            lbfgs_memory: LBFGS_MEMORY,
            gradient_tolerance: 1e-8,
            cost_tolerance: 1e-12,
            objective_tolerance: 1e-8,
        }
    }
}

#[derive(Debug, Clone)]
struct Multipliers {
    lambdas: Vec<f64>,
    penalty: f64,
}

impl Multipliers {
    fn new(count: usize, penalty: f64) -> Self {
        Multipliers {
            lambdas: vec![0.0; count],
            penalty,
        }
    }

    fn update(&mut self, scaled: &[f64], settings: &DriverSettings) {
        for (lambda, &g) in self.lambdas.iter_mut().zip(scaled) {
            *lambda = (*lambda + self.penalty * g).max(0.0);
        }
        self.penalty = (self.penalty * settings.penalty_growth).min(settings.penalty_max);
    }
}

/// Largest positive entry, zero when every constraint is satisfied.
pub fn max_violation(scaled: &[f64]) -> f64 {
    scaled.iter().fold(0.0_f64, |worst, &g| worst.max(g))
}

/// Augmented Lagrangian merit in solver coordinates.
#[derive(Clone)]
struct Merit<'a> {
    problem: &'a OptimizationProblem,
    objective_scale: f64,
    multipliers: Multipliers,
}

impl<'a> Merit<'a> {
    fn value(&self, z: &[f64]) -> SizingResult<f64> {
        self.value_at(&self.problem.decode(z))
    }

    fn value_at(&self, design: &StageDesign) -> SizingResult<f64> {
        let evaluation = self.problem.model.evaluate(design)?;
        let scaled = self.problem.model.scaled_constraints(&evaluation);

        let mu = self.multipliers.penalty;
        let penalty: f64 = scaled
            .iter()
            .zip(&self.multipliers.lambdas)
            .map(|(&g, &lambda)| 0.5 * mu * (lambda / mu + g).max(0.0).powi(2))
            .sum();

        Ok(evaluation.objective / self.objective_scale + penalty)
    }

    /// True when `design` rests on a bound and a step back inside lowers the merit.
    fn stalled_on_bound(&self, design: &StageDesign) -> bool {
        let here = match self.value_at(design) {
            Ok(value) => value,
            Err(_) => return false,
        };
        self.problem
            .inward_neighbours(design)
            .iter()
            .any(|neighbour| self.value_at(neighbour).map_or(false, |value| value < here))
    }

    /// Rejected designs read as an infinitely bad merit.
    fn value_or_infinity(&self, z: &[f64]) -> f64 {
        match self.value(z) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "rejected evaluation");
                f64::INFINITY
            }
        }
    }
}

impl<'a> CostFunction for Merit<'a> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, z: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.value_or_infinity(z))
    }
}

impl<'a> Gradient for Merit<'a> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, z: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        Ok(z.central_diff(&|x: &Vec<f64>| self.value_or_infinity(x)))
    }
}

fn solver_error(e: argmin::core::Error) -> SizingError {
    SizingError::SolverError(e.to_string())
}

/// Converged design returned by [`Driver::optimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub design: StageDesign,
    pub evaluation: Evaluation,
    pub objective: f64,
    pub outer_iterations: usize,
    pub iterations: usize,
    pub max_violation: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Driver {
    pub settings: DriverSettings,
}

impl Driver {
    pub fn new(settings: DriverSettings) -> Self {
        Driver { settings }
    }

    pub fn optimize(&self, problem: &OptimizationProblem) -> SizingResult<OptimizationOutcome> {
        problem.model.evaluate(&problem.config.initial)?;
        let start = problem.interior_start();
        let initial = problem.model.evaluate(&start)?;
        let objective_scale = initial.objective.abs().max(f64::EPSILON);

        let mut multipliers =
            Multipliers::new(problem.model.constraints.len(), self.settings.penalty_initial);
        let mut z = problem.encode(&start);
        let mut evaluation = initial;
        let mut violation = max_violation(&problem.model.scaled_constraints(&evaluation));
        let mut iterations = 0usize;
        let mut outer_iterations = 0usize;
        let mut previous_objective: Option<f64> = None;
        let mut stalled = false;

        for outer in 0..self.settings.max_outer_iterations {
            let merit = Merit {
                problem,
                objective_scale,
                multipliers: multipliers.clone(),
            };
            let (next, inner_iterations) = self.inner_solve(merit.clone(), z)?;
            z = next;
            iterations += inner_iterations as usize;
            outer_iterations = outer + 1;

            evaluation = problem.model.evaluate(&problem.decode(&z))?;
            let scaled = problem.model.scaled_constraints(&evaluation);
            violation = max_violation(&scaled);

            info!(
                outer = outer_iterations,
                penalty = multipliers.penalty,
                objective = evaluation.objective,
                max_violation = violation,
                "augmented Lagrangian iteration"
            );

            // A feasible point only ends the loop once a fresh inner solve
            // no longer moves the objective.
            let settled = previous_objective.map_or(false, |previous| {
                (evaluation.objective - previous).abs()
                    <= self.settings.objective_tolerance * evaluation.objective.abs()
            });
            stalled = merit.stalled_on_bound(&evaluation.design);
            if stalled {
                warn!(
                    length = evaluation.design.length,
                    thickness = evaluation.design.thickness,
                    "design stalled on a bound, restarting from the interior"
                );
                z = problem.encode(&problem.pull_inside(&evaluation.design));
            } else if violation < self.settings.constraint_tolerance && settled {
                break;
            }
            previous_objective = Some(evaluation.objective);

            multipliers.update(&scaled, &self.settings);
        }

        if violation >= self.settings.constraint_tolerance || stalled {
            return Err(SizingError::NotConverged {
                iterations,
                max_violation: violation,
            });
        }

        info!(
            length = evaluation.design.length,
            thickness = evaluation.design.thickness,
            objective = evaluation.objective,
            "optimizer converged"
        );

        Ok(OptimizationOutcome {
            design: evaluation.design,
            objective: evaluation.objective,
            evaluation,
            outer_iterations,
            iterations,
            max_violation: violation,
        })
    }

    fn inner_solve(&self, merit: Merit<'_>, init: Vec<f64>) -> SizingResult<(Vec<f64>, u64)> {
        let fallback = merit.clone();

        match self.inner_lbfgs(merit, init.clone()) {
            Ok(solution) => Ok(solution),
            Err(e) => {
                warn!(error = %e, "L-BFGS inner solve failed, falling back to Nelder-Mead");
                self.inner_nelder_mead(fallback, init)
            }
        }
    }

    fn inner_lbfgs(&self, merit: Merit<'_>, init: Vec<f64>) -> SizingResult<(Vec<f64>, u64)> {
        let linesearch = MoreThuenteLineSearch::new();
        let solver = LBFGS::new(linesearch, self.settings.lbfgs_memory)
            .with_tolerance_grad(self.settings.gradient_tolerance)
            .map_err(solver_error)?
            .with_tolerance_cost(self.settings.cost_tolerance)
            .map_err(solver_error)?;

        let result = Executor::new(merit, solver)
            .configure(|state| {
                state
                    .param(init)
                    .max_iters(self.settings.max_inner_iterations)
            })
            .run()
            .map_err(solver_error)?;

        let best = result
            .state()
            .get_best_param()
            .cloned()
            .ok_or_else(|| SizingError::SolverError("L-BFGS returned no best parameters".into()))?;
        Ok((best, result.state().get_iter()))
    }

    fn inner_nelder_mead(
        &self,
        merit: Merit<'_>,
        init: Vec<f64>,
    ) -> SizingResult<(Vec<f64>, u64)> {
        let mut simplex = vec![init.clone()];
        for i in 0..init.len() {
            let mut vertex = init.clone();
            vertex[i] += SIMPLEX_STEP;
            simplex.push(vertex);
        }

        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(self.settings.cost_tolerance)
            .map_err(solver_error)?;

        let result = Executor::new(merit, solver)
            .configure(|state| state.max_iters(self.settings.max_inner_iterations * 10))
            .run()
            .map_err(solver_error)?;

        let best = result.state().get_best_param().cloned().ok_or_else(|| {
            SizingError::SolverError("Nelder-Mead returned no best parameters".into())
        })?;
        Ok((best, result.state().get_iter()))
    }
}
