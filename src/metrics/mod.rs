pub mod summary;

pub use summary::PerformanceSummary;
