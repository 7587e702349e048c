// HTTP routes
pub mod health;
pub mod page;

pub use health::*;
pub use page::*;
