mod analytics;
pub mod config;

pub use analytics::*;
pub use pointwidth;
