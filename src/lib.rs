pub mod analysis;
pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod optimization;

pub use constants::*;
pub use errors::{SizingError, SizingResult};
pub use model::constraints::{ConstraintKind, ConstraintValues, HoopForm};
pub use model::geometry::Geometry;
pub use model::mass::MassBreakdown;
pub use model::parameters::StageParameters;
pub use model::propellant::PropellantSplit;
pub use model::stage::{evaluate, Evaluation, ModelVariant, Objective, StageDesign, StageModel};
pub use model::two_stage::{TwoStageParameters, TwoStageSizing, TwoStageVehicle};

// Re-export commonly used items from optimization
pub use optimization::driver::{Driver, DriverSettings, OptimizationOutcome};
pub use optimization::multistart::MultiStart;
pub use optimization::problem::{Bounds, OptimizationProblem, ProblemConfig};

// Re-export commonly used items from analysis
pub use analysis::report::SizingReport;
pub use analysis::sweep::{DesignSweep, SweepResult};

pub use config::RunConfig;
