//! Object storage implementations for the extraction library.
//!
//! Available backends:
//! - `MemoryObjectStore` - In-memory storage (always available)
//! - `S3ObjectStore` - Amazon S3 (requires `aws` feature, see [`crate::aws`])

pub mod memory;

pub use memory::{MemoryObjectStore, StoredObject};
