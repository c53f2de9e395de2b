use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{SizingError, SizingResult};
use crate::model::parameters::StageParameters;
use crate::model::stage::{ModelVariant, StageModel};
use crate::model::two_stage::TwoStageParameters;
use crate::optimization::driver::DriverSettings;
use crate::optimization::problem::{OptimizationProblem, ProblemConfig};

/// Everything a sizing run reads from its JSON configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub variant: ModelVariant,
    /// Falls back to the variant's own defaults when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<StageParameters>,
    pub problem: ProblemConfig,
    pub driver: DriverSettings,
    pub two_stage: TwoStageParameters,
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> SizingResult<Self> {
        serde_json::from_str(json).map_err(|e| SizingError::ConfigError(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SizingResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            SizingError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn parameters(&self) -> StageParameters {
        self.parameters
            .unwrap_or_else(|| self.variant.default_parameters())
    }

    pub fn model(&self) -> StageModel {
        self.variant.build(self.parameters())
    }

    pub fn problem(&self) -> SizingResult<OptimizationProblem> {
        OptimizationProblem::new(self.model(), self.problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stage::Objective;

    #[test]
    fn test_empty_config_is_basecase() {
        let config = RunConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.model(), StageModel::default());
        assert!(config.problem().is_ok());
    }

    #[test]
    fn test_variant_defaults_apply_without_parameters() {
        let config = RunConfig::from_json_str(r#"{ "variant": "structural" }"#).unwrap();
        let model = config.model();
        assert_eq!(model.objective, Objective::StructuralMass);
        assert_eq!(model.params.yield_strength, 200e6);
    }

    #[test]
    fn test_partial_overrides() {
        let json = r#"{
            "variant": "shell-volume",
            "parameters": { "R": 0.6, "p": 0.5e6 },
            "problem": { "thickness": { "lower": 1e-5, "upper": 0.3 } },
            "driver": { "max_outer_iterations": 5 }
        }"#;
        let config = RunConfig::from_json_str(json).unwrap();
        let params = config.parameters();
        assert_eq!(params.radius, 0.6);
        assert_eq!(params.pressure, 0.5e6);
        // Explicit parameters replace the variant defaults wholesale.
        assert_eq!(params.yield_strength, 332e6);
        assert_eq!(config.problem.thickness.upper, Some(0.3));
        assert_eq!(config.problem.initial.length, 5.0);
        assert_eq!(config.driver.max_outer_iterations, 5);
        assert_eq!(config.driver.penalty_initial, 10.0);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            RunConfig::from_json_str(r#"{ "variant": "sideways" }"#),
            Err(SizingError::ConfigError(_))
        ));
        assert!(matches!(
            RunConfig::from_json_file("/nonexistent/stage.json"),
            Err(SizingError::ConfigError(_))
        ));
    }
}
