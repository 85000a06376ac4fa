pub mod json_format;
pub mod parquet_format;
pub mod table_format;
pub mod tsv_format;

pub use json_format::*;
pub use parquet_format::*;
pub use table_format::*;
pub use tsv_format::*;

use super::Result;
use arrow::record_batch::RecordBatch;

pub trait ArrowDataFrameOutput {
    fn output(&mut self, record_batch: RecordBatch) -> Result<()>;
}
