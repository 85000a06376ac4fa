use super::ArrowDataFrameOutput;
use crate::analytics::output::Result;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;

pub struct ParquetDfOutput(pub File);

impl ArrowDataFrameOutput for ParquetDfOutput {
    fn output(&mut self, record: RecordBatch) -> Result<()> {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(&mut self.0, record.schema(), Some(props))?;

        writer.write(&record)?;
        writer.close()?;
        Ok(())
    }
}
