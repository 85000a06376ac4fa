use super::ArrowDataFrameOutput;
use crate::analytics::output::Result;
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use std::io::Write as IoWrite;

pub struct TsvDfOutput<Dest: IoWrite>(pub Dest);

impl<Dest: IoWrite> ArrowDataFrameOutput for TsvDfOutput<Dest> {
    fn output(&mut self, record: RecordBatch) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .with_delimiter(b'\t')
            .build(&mut self.0);
        writer.write(&record)?;
        drop(writer);
        self.0.flush()?;
        Ok(())
    }
}
