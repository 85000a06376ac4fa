pub mod client;
pub mod data_types;
pub mod datetime;
pub mod describe;
pub mod frame;
pub mod output;
pub mod plot;
pub mod query;
pub mod stats;
pub mod write;

pub use client::*;
pub use data_types::*;
pub use datetime::*;
pub use describe::*;
pub use frame::*;
pub use output::*;
pub use plot::*;
pub use query::*;
pub use stats::*;
pub use write::*;
