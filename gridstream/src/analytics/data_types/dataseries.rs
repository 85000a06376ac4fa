use crate::analytics::datetime::TimestampNano;
use arrow::array::{
    ArrayRef, Float64Array, Int64Array, StringArray, TimestampNanosecondArray, UInt64Array,
};
use arrow::datatypes::{DataType, TimeUnit};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, PartialEq, Clone)]
pub enum SeriesValues {
    TimestampNano(Vec<TimestampNano>),
    Datetime(Vec<DateTime<Utc>>),
    Float64(Vec<Option<f64>>),
    UInt64(Vec<Option<u64>>),
    String(Vec<String>),
}

impl SeriesValues {
    pub fn len(&self) -> usize {
        match self {
            Self::TimestampNano(vs) => vs.len(),
            Self::Datetime(vs) => vs.len(),
            Self::Float64(vs) => vs.len(),
            Self::UInt64(vs) => vs.len(),
            Self::String(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum CellValue {
    Null,
    TimestampNano(TimestampNano),
    Datetime(DateTime<Utc>),
    Float64(f64),
    UInt64(u64),
    String(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::TimestampNano(v) => write!(f, "{v}"),
            CellValue::Datetime(v) => write!(f, "{}", v.to_rfc3339()),
            CellValue::Float64(v) => write!(f, "{v:?}"),
            CellValue::UInt64(v) => write!(f, "{v}"),
            CellValue::String(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct DataSeries {
    pub values: SeriesValues,
}

impl DataSeries {
    pub fn new(values: SeriesValues) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<CellValue> {
        match &self.values {
            SeriesValues::TimestampNano(vs) => vs.get(index).map(|v| CellValue::TimestampNano(*v)),
            SeriesValues::Datetime(vs) => vs.get(index).map(|v| CellValue::Datetime(*v)),
            SeriesValues::Float64(vs) => vs
                .get(index)
                .map(|v| v.map_or(CellValue::Null, CellValue::Float64)),
            SeriesValues::UInt64(vs) => vs
                .get(index)
                .map(|v| v.map_or(CellValue::Null, CellValue::UInt64)),
            SeriesValues::String(vs) => vs.get(index).map(|v| CellValue::String(v.clone())),
        }
    }

    /// numeric view of the series, None where the cell is null or not numeric
    pub fn as_f64_values(&self) -> Vec<Option<f64>> {
        match &self.values {
            SeriesValues::Float64(vs) => vs.clone(),
            SeriesValues::UInt64(vs) => vs.iter().map(|v| v.map(|v| v as f64)).collect(),
            others => vec![None; others.len()],
        }
    }

    pub fn as_arrow_array(&self) -> (DataType, ArrayRef) {
        match &self.values {
            SeriesValues::TimestampNano(vs) => (
                DataType::Int64,
                Arc::new(Int64Array::from(
                    vs.iter().map(|v| v.as_inner()).collect::<Vec<i64>>(),
                )),
            ),
            SeriesValues::Datetime(vs) => {
                let nanos: Vec<i64> = vs
                    .iter()
                    .map(|v| TimestampNano::from(*v).as_inner())
                    .collect();
                (
                    DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into())),
                    Arc::new(TimestampNanosecondArray::from(nanos).with_timezone("UTC")),
                )
            }
            SeriesValues::Float64(vs) => (
                DataType::Float64,
                Arc::new(Float64Array::from(vs.clone())),
            ),
            SeriesValues::UInt64(vs) => {
                (DataType::UInt64, Arc::new(UInt64Array::from(vs.clone())))
            }
            SeriesValues::String(vs) => (
                DataType::Utf8,
                Arc::new(StringArray::from(
                    vs.iter().map(|v| v.as_str()).collect::<Vec<&str>>(),
                )),
            ),
        }
    }
}

impl From<SeriesValues> for DataSeries {
    fn from(values: SeriesValues) -> Self {
        DataSeries::new(values)
    }
}
