pub mod aggregate;
pub mod arrow_dataframe;
pub mod dataframe;
pub mod dataseries;
pub mod point;
pub mod stream;
pub mod time_index;
pub mod time_series_dataframe;

pub use aggregate::*;
pub use arrow_dataframe::*;
pub use dataframe::*;
pub use dataseries::*;
pub use point::*;
pub use stream::*;
pub use time_index::*;
pub use time_series_dataframe::*;
