// Document Data Automation - Server Core
//
// Web front end and provisioning entry point for the extraction library.
// Handlers call domain actions; domain actions call the library through
// the trait objects held in ServerDeps.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
