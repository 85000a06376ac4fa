use super::ArrowDataFrameOutput;
use crate::analytics::output::Result;
use arrow::json::writer::{JsonArray, WriterBuilder};
use arrow::record_batch::RecordBatch;
use std::io::Write as IoWrite;

/// Writes `{"column": [values...]}`.
pub struct JsonDfOutput<Dest: IoWrite>(pub Dest);

impl<Dest: IoWrite> ArrowDataFrameOutput for JsonDfOutput<Dest> {
    fn output(&mut self, record_batch: RecordBatch) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .with_explicit_nulls(true)
            .build::<_, JsonArray>(Vec::<u8>::new());
        writer.write(&record_batch)?;
        writer.finish()?;
        let rows_json = writer.into_inner();

        let rows: Vec<serde_json::Map<String, serde_json::Value>> = if rows_json.is_empty() {
            vec![]
        } else {
            serde_json::from_slice(&rows_json)?
        };

        let mut value_map = serde_json::Map::new();
        let schema = record_batch.schema();
        for field in schema.fields().iter() {
            let column_values = rows
                .iter()
                .map(|row| {
                    row.get(field.name())
                        .cloned()
                        .unwrap_or(serde_json::Value::Null)
                })
                .collect();
            value_map.insert(
                field.name().to_string(),
                serde_json::Value::Array(column_values),
            );
        }

        write!(self.0, "{}", serde_json::Value::Object(value_map))?;
        self.0.flush()?;
        Ok(())
    }
}
