use super::arrow_dataframe::ArrowConvertibleDataFrame;
use super::dataseries::*;
use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use thiserror::*;

#[derive(Error, Debug)]
pub enum DataframeError {
    #[error("unmatched number of column names. field of df:{0}, columns:{1}")]
    UnmatchedColumnNameNumber(usize, usize),

    #[error("unmatched series length. expected:{0} actual:{1}")]
    UnmatchedSeriesLength(usize, usize),

    #[error("unmatched number of column levels. levels:{0}, key:{1}")]
    UnmatchedColumnLevelNumber(usize, usize),
}

pub(crate) type Result<T> = std::result::Result<T, DataframeError>;

/// Plain table with named columns.
#[derive(Debug, PartialEq, Clone)]
pub struct DataFrame {
    pub data_serieses: Vec<DataSeries>,
    pub column_names: Vec<String>,
}

impl DataFrame {
    pub fn new(data_serieses: Vec<DataSeries>, column_names: Vec<String>) -> Result<Self> {
        if data_serieses.len() != column_names.len() {
            return Err(DataframeError::UnmatchedColumnNameNumber(
                data_serieses.len(),
                column_names.len(),
            ));
        }
        if let Some(head) = data_serieses.first() {
            if let Some(invalid) = data_serieses.iter().find(|s| s.len() != head.len()) {
                return Err(DataframeError::UnmatchedSeriesLength(
                    head.len(),
                    invalid.len(),
                ));
            }
        }
        Ok(Self {
            data_serieses,
            column_names,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        if self.fields_len() == 0 {
            0
        } else {
            self.data_serieses[0].len()
        }
    }

    pub fn fields_len(&self) -> usize {
        self.data_serieses.len()
    }

    pub fn get_series(&self, field_idx: usize) -> Option<&DataSeries> {
        self.data_serieses.get(field_idx)
    }

    pub fn column(&self, name: &str) -> Option<&DataSeries> {
        self.column_names
            .iter()
            .position(|each| each == name)
            .and_then(|idx| self.get_series(idx))
    }
}

impl ArrowConvertibleDataFrame for DataFrame {
    fn arrow_columns(&self) -> Vec<(String, DataType, ArrayRef)> {
        self.column_names
            .iter()
            .zip(self.data_serieses.iter())
            .map(|(name, series)| {
                let (data_type, array) = series.as_arrow_array();
                (name.clone(), data_type, array)
            })
            .collect()
    }

    fn column_names(&self) -> Vec<String> {
        self.column_names.clone()
    }

    fn row_values(&self, row: usize) -> Vec<CellValue> {
        self.data_serieses
            .iter()
            .map(|series| series.get(row).unwrap_or(CellValue::Null))
            .collect()
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_dataframe() {
        let df = DataFrame::new(
            vec![
                SeriesValues::String(vec!["a".to_string(), "b".to_string()]).into(),
                SeriesValues::UInt64(vec![Some(1), Some(2)]).into(),
            ],
            vec!["name".to_string(), "n".to_string()],
        )
        .unwrap();
        assert_eq!(df.len(), 2);
        assert_eq!(df.fields_len(), 2);
        assert_eq!(df.column("n").unwrap().get(1), Some(CellValue::UInt64(2)));
        assert!(df.column("missing").is_none());

        assert!(DataFrame::new(
            vec![SeriesValues::UInt64(vec![Some(1)]).into()],
            vec!["a".to_string(), "b".to_string()],
        )
        .is_err());

        assert!(DataFrame::new(
            vec![
                SeriesValues::UInt64(vec![Some(1)]).into(),
                SeriesValues::UInt64(vec![]).into()
            ],
            vec!["a".to_string(), "b".to_string()],
        )
        .is_err());
    }
}
