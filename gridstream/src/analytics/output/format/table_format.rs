use super::ArrowDataFrameOutput;
use crate::analytics::output::Result;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use std::io::Write as IoWrite;

pub struct TableDfOutput<Dest: IoWrite>(pub Dest);

impl<Dest: IoWrite> ArrowDataFrameOutput for TableDfOutput<Dest> {
    fn output(&mut self, record: RecordBatch) -> Result<()> {
        writeln!(self.0, "{}", pretty_format_batches(&[record])?)?;
        self.0.flush()?;
        Ok(())
    }
}
