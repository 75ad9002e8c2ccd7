//! End-to-end generation runs

pub mod report;
pub mod run;

pub use report::RunReport;
pub use run::{Pipeline, Stage};
