use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};

use super::driver::{Driver, OptimizationOutcome};
use super::problem::OptimizationProblem;
use crate::errors::{SizingError, SizingResult};

/// Repeats the driver from seeded random starting designs and keeps the best.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiStart {
    /// Random starts in addition to the configured initial design.
    pub starts: usize,
    pub seed: u64,
}

impl MultiStart {
    pub fn new(starts: usize, seed: u64) -> Self {
        MultiStart { starts, seed }
    }

    pub fn run(
        &self,
        driver: &Driver,
        problem: &OptimizationProblem,
    ) -> SizingResult<OptimizationOutcome> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut initials = vec![problem.config.initial];
        initials.extend((0..self.starts).map(|_| problem.sample_design(&mut rng)));

        let mut best: Option<OptimizationOutcome> = None;
        let mut last_error: Option<SizingError> = None;

        for (index, initial) in initials.into_iter().enumerate() {
            match problem
                .with_initial(initial)
                .and_then(|start| driver.optimize(&start))
            {
                Ok(outcome) => {
                    info!(
                        start = index,
                        objective = outcome.objective,
                        "start converged"
                    );
                    if best
                        .as_ref()
                        .map_or(true, |current| outcome.objective < current.objective)
                    {
                        best = Some(outcome);
                    }
                }
                Err(e) => {
                    warn!(start = index, error = %e, "start failed");
                    last_error = Some(e);
                }
            }
        }

        match (best, last_error) {
            (Some(outcome), _) => Ok(outcome),
            (None, Some(e)) => Err(e),
            (None, None) => Err(SizingError::SolverError(
                "multi-start ran no starts".to_string(),
            )),
        }
    }
}
