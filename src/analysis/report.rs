use std::fmt::Write;

use crate::model::constraints::{ConstraintKind, HoopForm};
use crate::model::stage::{Evaluation, StageModel};
use crate::model::two_stage::TwoStageSizing;

pub struct SizingReport<'a> {
    model: &'a StageModel,
    evaluation: &'a Evaluation,
    iterations: Option<usize>,
}

impl<'a> SizingReport<'a> {
    pub fn new(model: &'a StageModel, evaluation: &'a Evaluation) -> Self {
        SizingReport {
            model,
            evaluation,
            iterations: None,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    fn format_length(length: f64) -> String {
        if length.abs() < 0.1 {
            format!("{:.4} mm", length * 1000.0)
        } else {
            format!("{:.4} m", length)
        }
    }

    fn format_mass(mass: f64) -> String {
        if mass.abs() >= 1000.0 {
            format!("{:.3} t", mass / 1000.0)
        } else {
            format!("{:.2} kg", mass)
        }
    }

    fn format_stress(stress: f64) -> String {
        format!("{:.3} MPa", stress / 1e6)
    }

    fn format_constraint(kind: ConstraintKind, value: f64, model: &StageModel) -> String {
        match kind {
            ConstraintKind::CombinedStress => Self::format_stress(value),
            ConstraintKind::Hoop => match model.hoop_form {
                HoopForm::Stress => Self::format_stress(value),
                HoopForm::Inverted => format!("{:.6}", value),
            },
            ConstraintKind::Aspect => format!("{:.6}", value),
        }
    }

    pub fn render(&self) -> String {
        let evaluation = self.evaluation;
        let mass = &evaluation.mass;
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "minimum found at");
        let _ = writeln!(out, "L = {}", Self::format_length(evaluation.design.length));
        let _ = writeln!(out, "t = {}", Self::format_length(evaluation.design.thickness));
        let _ = writeln!(out, "minimum objective");
        let _ = writeln!(
            out,
            "{} = {:.6} {}",
            self.model.objective.label(),
            evaluation.objective,
            self.model.objective.unit()
        );
        if let Some(iterations) = self.iterations {
            let _ = writeln!(out, "iterations: {}", iterations);
        }

        let _ = writeln!(out, "\n--- Mass Breakdown ---");
        let _ = writeln!(out, "Structural: {}", Self::format_mass(mass.structural));
        let _ = writeln!(
            out,
            "Propellant: {} (fuel {}, oxidizer {})",
            Self::format_mass(mass.propellant),
            Self::format_mass(evaluation.propellant.fuel_mass),
            Self::format_mass(evaluation.propellant.oxidizer_mass)
        );
        let _ = writeln!(out, "Payload: {}", Self::format_mass(mass.payload));
        let _ = writeln!(out, "Gross: {}", Self::format_mass(mass.gross));
        let _ = writeln!(out, "Mass Ratio: {:.4}", mass.mass_ratio());
        let _ = writeln!(
            out,
            "Structural Coefficient: {:.4}",
            mass.structural_coefficient()
        );

        let _ = writeln!(out, "\n--- Constraints ---");
        for (kind, value) in self.model.active_constraints(evaluation) {
            let status = if value <= 0.0 { "ok" } else { "VIOLATED" };
            let _ = writeln!(
                out,
                "{} = {} [{}]",
                kind.label(),
                Self::format_constraint(kind, value, self.model),
                status
            );
        }

        out
    }

    pub fn display(&self) {
        println!("{}", self.render());
    }
}

pub fn render_two_stage(first_length: f64, second_length: f64, sizing: &TwoStageSizing) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "L1 = {:.3} m, L2 = {:.3} m",
        first_length, second_length
    );
    let _ = writeln!(
        out,
        "Structural coefficients: e1 = {:.6}, e2 = {:.6}",
        sizing.first.structural_coefficient(),
        sizing.second.structural_coefficient()
    );
    let _ = writeln!(out, "Upper mass m02: {:.3} kg", sizing.upper_mass);
    let _ = writeln!(out, "Gross mass m01: {:.3} kg", sizing.gross_mass);
    let _ = writeln!(out, "Mass ratio m01/m_L: {:.4}", sizing.mass_ratio());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stage::{ModelVariant, StageDesign};
    use crate::model::two_stage::TwoStageVehicle;

    #[test]
    fn test_format_helpers() {
        assert_eq!(SizingReport::format_length(0.00035), "0.3500 mm");
        assert_eq!(SizingReport::format_length(8.0), "8.0000 m");
        assert_eq!(SizingReport::format_mass(250.0), "250.00 kg");
        assert_eq!(SizingReport::format_mass(8901.9), "8.902 t");
        assert_eq!(SizingReport::format_stress(-497e6), "-497.000 MPa");
    }

    #[test]
    fn test_render_lists_active_constraints() {
        let model = ModelVariant::PressureOnly.build(ModelVariant::PressureOnly.default_parameters());
        let evaluation = model.evaluate(&StageDesign::new(8.0, 0.01)).unwrap();
        let text = SizingReport::new(&model, &evaluation)
            .with_iterations(12)
            .render();

        assert!(text.starts_with("minimum found at\nL = 8.0000 m\nt = 10.0000 mm\n"));
        assert!(text.contains("m01 = 8901.955856 kg"));
        assert!(text.contains("iterations: 12"));
        assert!(text.contains("con1 = -497.000 MPa [ok]"));
        assert!(text.contains("con3 = -15.000000 [ok]"));
        assert!(!text.contains("con2"));
    }

    #[test]
    fn test_render_marks_violations() {
        let model = ModelVariant::Basecase.build(ModelVariant::Basecase.default_parameters());
        let evaluation = model.evaluate(&StageDesign::new(0.25, 0.01)).unwrap();
        let text = SizingReport::new(&model, &evaluation).render();
        assert!(text.contains("con3 = 0.500000 [VIOLATED]"));
    }

    #[test]
    fn test_render_two_stage() {
        let sizing = TwoStageVehicle::default().size(8.0, 2.0).unwrap();
        let text = render_two_stage(8.0, 2.0, &sizing);
        assert!(text.contains("Mass ratio m01/m_L: 719.6227"));
    }
}
