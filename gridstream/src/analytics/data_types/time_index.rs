use super::dataseries::*;
use crate::analytics::datetime::{TimestampNano, SEC_IN_NANOSEC};
use chrono::{DateTime, Utc};

/// Row labels of a time series frame.
#[derive(Debug, PartialEq, Clone)]
pub enum TimeIndex {
    Nanos(Vec<TimestampNano>),
    Datetime(Vec<DateTime<Utc>>),
    /// seconds since a reference time
    Relative(Vec<f64>),
    /// fraction of a reference range
    Normalized(Vec<f64>),
}

impl TimeIndex {
    pub fn len(&self) -> usize {
        match self {
            Self::Nanos(vs) => vs.len(),
            Self::Datetime(vs) => vs.len(),
            Self::Relative(vs) => vs.len(),
            Self::Normalized(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<CellValue> {
        match self {
            Self::Nanos(vs) => vs.get(index).map(|v| CellValue::TimestampNano(*v)),
            Self::Datetime(vs) => vs.get(index).map(|v| CellValue::Datetime(*v)),
            Self::Relative(vs) | Self::Normalized(vs) => {
                vs.get(index).map(|v| CellValue::Float64(*v))
            }
        }
    }

    pub fn to_datetime(self) -> Self {
        match self {
            Self::Nanos(vs) => Self::Datetime(vs.iter().map(|v| v.as_datetime()).collect()),
            others => others,
        }
    }

    /// x coordinates for plotting
    pub fn seconds_from_start(&self) -> Vec<f64> {
        let from_nanos = |nanos: Vec<i64>| -> Vec<f64> {
            match nanos.first() {
                None => vec![],
                Some(head) => {
                    let head = *head;
                    nanos
                        .iter()
                        .map(|v| (v - head) as f64 / SEC_IN_NANOSEC as f64)
                        .collect()
                }
            }
        };

        match self {
            Self::Nanos(vs) => from_nanos(vs.iter().map(|v| v.as_inner()).collect()),
            Self::Datetime(vs) => from_nanos(
                vs.iter()
                    .map(|v| TimestampNano::from(*v).as_inner())
                    .collect(),
            ),
            Self::Relative(vs) | Self::Normalized(vs) => vs.clone(),
        }
    }

    pub fn as_data_series(&self) -> DataSeries {
        let values = match self {
            Self::Nanos(vs) => SeriesValues::TimestampNano(vs.clone()),
            Self::Datetime(vs) => SeriesValues::Datetime(vs.clone()),
            Self::Relative(vs) | Self::Normalized(vs) => {
                SeriesValues::Float64(vs.iter().map(|v| Some(*v)).collect())
            }
        };
        DataSeries::new(values)
    }
}
