pub mod common;
pub mod report;
