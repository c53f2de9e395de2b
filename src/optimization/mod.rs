pub mod driver;
pub mod multistart;
pub mod problem;
