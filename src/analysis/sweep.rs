use tracing::debug;

use crate::errors::SizingResult;
use crate::model::stage::{StageDesign, StageModel};
use crate::model::two_stage::TwoStageVehicle;

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub design: StageDesign,
    pub objective: f64,
    pub feasible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    pub points: Vec<SweepPoint>,
    /// Grid designs the model rejected.
    pub rejected: usize,
}

impl SweepResult {
    pub fn feasible_count(&self) -> usize {
        self.points.iter().filter(|point| point.feasible).count()
    }

    pub fn best_feasible(&self) -> Option<&SweepPoint> {
        self.points
            .iter()
            .filter(|point| point.feasible)
            .min_by(|a, b| a.objective.total_cmp(&b.objective))
    }
}

/// Grid evaluation of a stage model over length and wall thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSweep {
    pub lengths: Vec<f64>,
    pub thicknesses: Vec<f64>,
}

impl DesignSweep {
    pub fn new(lengths: Vec<f64>, thicknesses: Vec<f64>) -> Self {
        DesignSweep {
            lengths,
            thicknesses,
        }
    }

    pub fn grid(
        length_range: (f64, f64),
        thickness_range: (f64, f64),
        points: usize,
    ) -> Self {
        DesignSweep::new(
            linspace(length_range.0, length_range.1, points),
            linspace(thickness_range.0, thickness_range.1, points),
        )
    }

    pub fn run(&self, model: &StageModel) -> SweepResult {
        let mut result = SweepResult::default();

        for &length in &self.lengths {
            for &thickness in &self.thicknesses {
                let design = StageDesign::new(length, thickness);
                match model.evaluate(&design) {
                    Ok(evaluation) => result.points.push(SweepPoint {
                        design,
                        objective: evaluation.objective,
                        feasible: model.is_feasible(&evaluation),
                    }),
                    Err(e) => {
                        debug!(length, thickness, error = %e, "skipping grid point");
                        result.rejected += 1;
                    }
                }
            }
        }

        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPoint {
    pub first_length: f64,
    pub second_length: f64,
    pub mass_ratio: f64,
}

/// Mass ratio of the two-stage stack over a grid of stage lengths.
pub fn sweep_two_stage(
    vehicle: &TwoStageVehicle,
    first_lengths: &[f64],
    second_lengths: &[f64],
) -> SizingResult<Vec<StackPoint>> {
    let mut points = Vec::with_capacity(first_lengths.len() * second_lengths.len());
    for &second_length in second_lengths {
        for &first_length in first_lengths {
            let sizing = vehicle.size(first_length, second_length)?;
            points.push(StackPoint {
                first_length,
                second_length,
                mass_ratio: sizing.mass_ratio(),
            });
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stage::ModelVariant;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        let values = linspace(1.0, 8.0, 100);
        assert_eq!(values.len(), 100);
        assert_eq!(values[0], 1.0);
        assert_eq!(values[99], 8.0);
        assert_abs_diff_eq!(values[1] - values[0], 7.0 / 99.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sweep_skips_invalid_walls() {
        let model = ModelVariant::Basecase.build(ModelVariant::Basecase.default_parameters());
        let sweep = DesignSweep::new(vec![1.0, 2.0], vec![0.01, 0.5, 0.7]);
        let result = sweep.run(&model);
        assert_eq!(result.points.len(), 2);
        assert_eq!(result.rejected, 4);
    }

    #[test]
    fn test_best_feasible_is_shortest_thinnest_valid_design() {
        let model = ModelVariant::Basecase.build(ModelVariant::Basecase.default_parameters());
        let sweep = DesignSweep::new(
            vec![0.25, 0.5, 1.0, 2.0],
            vec![1e-4, 5e-4, 1e-3, 1e-2],
        );
        let result = sweep.run(&model);
        let best = result.best_feasible().unwrap();
        // L = 0.25 breaks the aspect floor, t = 1e-4 breaks the hoop limit.
        assert_eq!(best.design, StageDesign::new(0.5, 5e-4));
        assert_eq!(result.feasible_count(), 9);
    }

    #[test]
    fn test_two_stage_sweep_layout() {
        let vehicle = TwoStageVehicle::default();
        let points = sweep_two_stage(&vehicle, &[1.0, 8.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].first_length, 1.0);
        assert_eq!(points[1].first_length, 8.0);
        assert_eq!(points[5].second_length, 3.0);
        assert_abs_diff_eq!(points[3].mass_ratio, 719.6226585956256, epsilon = 1e-9);
    }
}
