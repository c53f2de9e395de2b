pub mod report;
pub mod sweep;
