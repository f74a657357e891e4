pub mod insights;

pub use insights::InsightReport;
