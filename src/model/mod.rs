pub mod constraints;
pub mod geometry;
pub mod mass;
pub mod parameters;
pub mod propellant;
pub mod stage;
pub mod two_stage;
