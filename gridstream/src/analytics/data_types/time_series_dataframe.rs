use super::arrow_dataframe::ArrowConvertibleDataFrame;
use super::dataframe::{DataFrame, DataframeError, Result};
use super::dataseries::*;
use super::stream::Stream;
use super::time_index::TimeIndex;
use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use std::fmt;

pub const INDEX_COLUMN_NAME: &str = "time";
pub const COLLECTION_LEVEL: &str = "collection";
pub const NAME_LEVEL: &str = "name";

/// Hierarchical column label, one entry per level.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ColumnKey(pub Vec<String>);

impl ColumnKey {
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self(levels.into_iter().map(|each| each.to_string()).collect())
    }

    pub fn level(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(|v| v.as_str())
    }

    pub fn matches(&self, key: &[&str]) -> bool {
        self.0.len() == key.len() && self.0.iter().zip(key.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Time indexed table whose columns carry multi level keys.
#[derive(Debug, PartialEq, Clone)]
pub struct TimeSeriesDataFrame {
    pub index: TimeIndex,
    pub column_levels: Vec<String>,
    pub column_keys: Vec<ColumnKey>,
    pub data_serieses: Vec<DataSeries>,
}

impl TimeSeriesDataFrame {
    pub fn new(
        index: TimeIndex,
        column_levels: Vec<String>,
        columns: Vec<(ColumnKey, DataSeries)>,
    ) -> Result<Self> {
        for (key, series) in columns.iter() {
            if key.0.len() != column_levels.len() {
                return Err(DataframeError::UnmatchedColumnLevelNumber(
                    column_levels.len(),
                    key.0.len(),
                ));
            }
            if series.len() != index.len() {
                return Err(DataframeError::UnmatchedSeriesLength(
                    index.len(),
                    series.len(),
                ));
            }
        }

        let (column_keys, data_serieses) = columns.into_iter().unzip();
        Ok(Self {
            index,
            column_levels,
            column_keys,
            data_serieses,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn fields_len(&self) -> usize {
        self.data_serieses.len()
    }

    pub fn get_series(&self, field_idx: usize) -> Option<&DataSeries> {
        self.data_serieses.get(field_idx)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&ColumnKey, &DataSeries)> {
        self.column_keys.iter().zip(self.data_serieses.iter())
    }

    pub fn column(&self, key: &[&str]) -> Option<&DataSeries> {
        self.columns()
            .find(|(each_key, _)| each_key.matches(key))
            .map(|(_, series)| series)
    }

    pub fn level_position(&self, level_name: &str) -> Option<usize> {
        self.column_levels.iter().position(|each| each == level_name)
    }

    /// columns whose `level_name` level equals `value`
    pub fn select(&self, level_name: &str, value: &str) -> Vec<(&ColumnKey, &DataSeries)> {
        match self.level_position(level_name) {
            None => vec![],
            Some(pos) => self
                .columns()
                .filter(|(key, _)| key.level(pos) == Some(value))
                .collect(),
        }
    }

    /// first column holding the data of `stream`
    pub fn find_stream_column(&self, stream: &Stream) -> Option<(&ColumnKey, &DataSeries)> {
        match (
            self.level_position(COLLECTION_LEVEL),
            self.level_position(NAME_LEVEL),
        ) {
            (Some(collection_pos), Some(name_pos)) => self.columns().find(|(key, _)| {
                key.level(collection_pos) == Some(stream.collection.as_str())
                    && key.level(name_pos) == Some(stream.name())
            }),
            _ => {
                let path = stream.path();
                self.columns().find(|(key, _)| {
                    key.matches(&[path.as_str()]) || key.matches(&[stream.name()])
                })
            }
        }
    }

    pub fn with_index(mut self, index: TimeIndex) -> Result<Self> {
        if index.len() != self.index.len() {
            return Err(DataframeError::UnmatchedSeriesLength(
                self.index.len(),
                index.len(),
            ));
        }
        self.index = index;
        Ok(self)
    }

    pub fn rename_columns<F>(mut self, column_levels: Vec<String>, rename: F) -> Result<Self>
    where
        F: Fn(&ColumnKey) -> ColumnKey,
    {
        let renamed: Vec<ColumnKey> = self.column_keys.iter().map(rename).collect();
        if let Some(invalid) = renamed.iter().find(|key| key.0.len() != column_levels.len()) {
            return Err(DataframeError::UnmatchedColumnLevelNumber(
                column_levels.len(),
                invalid.0.len(),
            ));
        }
        self.column_levels = column_levels;
        self.column_keys = renamed;
        Ok(self)
    }

    /// moves the index into a regular leading `time` column
    pub fn into_dataframe(self) -> Result<DataFrame> {
        let mut column_names = vec![INDEX_COLUMN_NAME.to_string()];
        column_names.extend(self.column_keys.iter().map(|key| key.to_string()));

        let mut data_serieses = vec![self.index.as_data_series()];
        data_serieses.extend(self.data_serieses);

        DataFrame::new(data_serieses, column_names)
    }
}

impl ArrowConvertibleDataFrame for TimeSeriesDataFrame {
    fn arrow_columns(&self) -> Vec<(String, DataType, ArrayRef)> {
        let (index_type, index_array) = self.index.as_data_series().as_arrow_array();
        let mut columns = vec![(INDEX_COLUMN_NAME.to_string(), index_type, index_array)];

        for (key, series) in self.columns() {
            let (data_type, array) = series.as_arrow_array();
            columns.push((key.to_string(), data_type, array));
        }
        columns
    }

    fn column_names(&self) -> Vec<String> {
        let mut names = vec![INDEX_COLUMN_NAME.to_string()];
        names.extend(self.column_keys.iter().map(|key| key.to_string()));
        names
    }

    fn row_values(&self, row: usize) -> Vec<CellValue> {
        let mut values = vec![self.index.get(row).unwrap_or(CellValue::Null)];
        values.extend(
            self.data_serieses
                .iter()
                .map(|series| series.get(row).unwrap_or(CellValue::Null)),
        );
        values
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}
