pub mod analyzers;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod report;

pub use error::{ReportError, Result};
