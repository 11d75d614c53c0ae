//! Score classification and aggregation.
//!
//! This module classifies each score into one of four performance
//! categories, cross-tabulates categories by subject, and computes the
//! overall statistics shown on the report.

pub mod aggregate;
pub mod grade;
pub mod select;
pub mod tables;
pub mod types;
pub mod utility;

pub use aggregate::aggregate;
pub use grade::classify;
pub use select::weak_students;
