// HTTP routes
pub mod enrich;
pub mod health;

pub use enrich::*;
pub use health::*;
