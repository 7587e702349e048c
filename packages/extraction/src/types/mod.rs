//! Data types for the extraction workflow.

pub mod blueprint;
pub mod config;
pub mod document;
pub mod job;
pub mod location;
pub mod project;
pub mod result;
