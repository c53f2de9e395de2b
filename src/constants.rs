// Stage Geometry
pub const STAGE_RADIUS: f64 = 0.5; // m

// Material Properties
pub const STRUCTURE_DENSITY: f64 = 8000.0; // kg/m³ (steel shell)
pub const OXIDIZER_DENSITY: f64 = 1000.0; // kg/m³
pub const FUEL_DENSITY: f64 = 1021.0; // kg/m³
pub const TENSILE_STRENGTH: f64 = 515e6; // Pa
pub const YIELD_STRENGTH: f64 = 332e6; // Pa
pub const YIELD_STRENGTH_CONSERVATIVE: f64 = 200e6; // Pa (structural and shell-volume models)

// Propellant
pub const MIXTURE_RATIO: f64 = 2.56; // oxidizer:fuel by mass

// Operating Conditions
pub const TANK_PRESSURE: f64 = 0.36e6; // Pa
pub const GRAVITY: f64 = 9.81; // m/s²
pub const PAYLOAD_MASS: f64 = 100.0; // kg

// Design-Variable Bounds
pub const LENGTH_LOWER_BOUND: f64 = 0.0; // m
pub const THICKNESS_LOWER_BOUND: f64 = 1e-6; // m
pub const THICKNESS_UPPER_BOUND: f64 = 0.49; // m

// Initial Design
pub const INITIAL_LENGTH: f64 = 5.0; // m
pub const INITIAL_THICKNESS: f64 = 0.01; // m

// Driver Parameters
pub const PENALTY_INITIAL: f64 = 10.0;
pub const PENALTY_GROWTH: f64 = 5.0;
pub const PENALTY_MAX: f64 = 1e8;
pub const MAX_OUTER_ITERATIONS: usize = 30;
pub const MAX_INNER_ITERATIONS: u64 = 200;
pub const CONSTRAINT_TOLERANCE: f64 = 1e-6; // scaled
pub const LBFGS_MEMORY: usize = 7;

// Two-Stage Vehicle
pub const TWO_STAGE_STRUCTURE_DENSITY: f64 = 1000.0; // kg/m³
pub const TWO_STAGE_PROPELLANT_DENSITY: f64 = 800.0; // kg/m³
pub const TWO_STAGE_PAYLOAD_MASS: f64 = 10.0; // kg
pub const FIRST_STAGE_THICKNESS: f64 = 0.01; // m
pub const SECOND_STAGE_THICKNESS: f64 = 0.005; // m
