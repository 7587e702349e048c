//! Core trait abstractions for the extraction library.
//!
//! These traits define the interfaces that backends implement to provide
//! object storage and the data automation service.

pub mod automation;
pub mod store;
