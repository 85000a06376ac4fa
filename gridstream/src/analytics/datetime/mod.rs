pub mod conversion;
pub mod timestamp_nano;

pub use conversion::*;
pub use timestamp_nano::*;
