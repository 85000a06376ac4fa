use super::aggregate::Aggregate;
use crate::analytics::datetime::TimestampNano;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

pub type Version = u64;

#[derive(Debug, PartialEq, Clone, Copy, Deserialize, Serialize)]
pub struct RawPoint {
    pub time: TimestampNano,
    pub value: f64,
}

impl RawPoint {
    pub fn new(time: TimestampNano, value: f64) -> Self {
        Self { time, value }
    }
}

impl From<(i64, f64)> for RawPoint {
    fn from((time, value): (i64, f64)) -> Self {
        Self::new(TimestampNano::new(time), value)
    }
}

/// Summary of the raw points in one window. `time` is the window start.
#[derive(Debug, PartialEq, Clone, Copy, Deserialize, Serialize)]
pub struct StatPoint {
    pub time: TimestampNano,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub count: u64,
    pub stddev: f64,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum AggregateValue {
    Float64(f64),
    UInt64(u64),
}

impl StatPoint {
    /// None for an empty window
    pub fn from_values(time: TimestampNano, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            time,
            min,
            mean,
            max,
            count: count as u64,
            stddev: variance.sqrt(),
        })
    }

    pub fn get(&self, aggregate: Aggregate) -> AggregateValue {
        match aggregate {
            Aggregate::Min => AggregateValue::Float64(self.min),
            Aggregate::Mean => AggregateValue::Float64(self.mean),
            Aggregate::Max => AggregateValue::Float64(self.max),
            Aggregate::Count => AggregateValue::UInt64(self.count),
            Aggregate::Stddev => AggregateValue::Float64(self.stddev),
        }
    }
}

/// How an insert treats points whose timestamp already exists in the stream.
#[derive(AsRefStr, EnumString, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[strum(serialize_all = "snake_case")]
pub enum MergePolicy {
    /// keep every point, duplicates included
    #[default]
    Never,
    /// drop the new point when an identical one exists
    Equal,
    /// keep the existing point
    Retain,
    /// overwrite the existing point
    Replace,
}

pub fn strip_versions<P>(data: Vec<(P, Version)>) -> Vec<P> {
    data.into_iter().map(|(point, _version)| point).collect()
}
