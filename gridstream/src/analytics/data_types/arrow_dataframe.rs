use super::dataseries::CellValue;
use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::*;
use std::sync::Arc;

/// Tables that can be handed to the arrow based writers.
pub trait ArrowConvertibleDataFrame {
    /// column name, arrow type and data, left to right
    fn arrow_columns(&self) -> Vec<(String, DataType, ArrayRef)>;

    fn column_names(&self) -> Vec<String>;

    fn row_values(&self, row: usize) -> Vec<CellValue>;

    fn row_count(&self) -> usize;

    fn as_arrow_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = self
            .arrow_columns()
            .into_iter()
            .map(|(name, data_type, array)| (Field::new(name, data_type, true), array))
            .unzip();

        let schema = Schema::new(fields);
        RecordBatch::try_new(Arc::new(schema), arrays)
    }
}
