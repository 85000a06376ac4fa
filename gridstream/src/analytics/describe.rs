use crate::analytics::client::{ClientError, StreamClient};
use crate::analytics::data_types::*;
use crate::analytics::datetime::SEC_IN_NANOSEC;
use std::collections::BTreeMap;
use std::fmt;
use strum::{AsRefStr, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescribeError {
    #[error("client error: {0}")]
    ClientError(#[from] ClientError),

    #[error("dataframe error: {0}")]
    DataframeError(#[from] DataframeError),

    #[error("stream {0} has no points")]
    EmptyStream(String),

    #[error("no streams in collection {0}")]
    EmptyCollection(String),
}

type Result<T> = std::result::Result<T, DescribeError>;

/// `Index, Collection, Name, Units, UUID` table, one row per stream
pub fn describe_streams(streams: &[Stream]) -> Result<DataFrame> {
    let column = |f: &dyn Fn(&Stream) -> String| -> DataSeries {
        SeriesValues::String(streams.iter().map(f).collect()).into()
    };

    let df = DataFrame::new(
        vec![
            SeriesValues::UInt64((0..streams.len() as u64).map(Some).collect()).into(),
            column(&|s| s.collection.clone()),
            column(&|s| s.name().to_string()),
            column(&|s| s.unit().to_string()),
            column(&|s| s.uuid.to_string()),
        ],
        ["Index", "Collection", "Name", "Units", "UUID"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    )?;
    Ok(df)
}

#[derive(AsRefStr, EnumString, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[strum(serialize_all = "snake_case")]
pub enum DurationUnit {
    Seconds,
    Minutes,
    #[default]
    Hours,
    Days,
}

impl DurationUnit {
    fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 3600.0 * 24.0,
        }
    }
}

/// time between the earliest and the latest point
pub async fn stream_duration<C: StreamClient + ?Sized>(
    client: &C,
    stream: &Stream,
    unit: DurationUnit,
) -> Result<f64> {
    match (client.earliest(stream).await?, client.latest(stream).await?) {
        (Some((earliest, _)), Some((latest, _))) => {
            let seconds = (latest.time - earliest.time) as f64 / SEC_IN_NANOSEC as f64;
            Ok(seconds / unit.seconds())
        }
        _ => Err(DescribeError::EmptyStream(stream.to_string())),
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct StreamSummary {
    pub collection: String,
    pub measurement: String,
    pub duration_hours: f64,
    pub points: u64,
}

impl StreamSummary {
    pub fn million_points(&self) -> f64 {
        self.points as f64 / 1e6
    }
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collection: {}", self.collection)?;
        writeln!(f, "Measurement: {}", self.measurement)?;
        writeln!(f, "Duration: {:.1} hours", self.duration_hours)?;
        write!(f, "Size: {:.2} million points", self.million_points())
    }
}

pub async fn stream_summary<C: StreamClient + ?Sized>(
    client: &C,
    stream: &Stream,
) -> Result<StreamSummary> {
    let duration_hours = stream_duration(client, stream, DurationUnit::Hours).await?;
    let points = client.count(stream).await?;
    Ok(StreamSummary {
        collection: stream.collection.clone(),
        measurement: stream.name().to_string(),
        duration_hours,
        points,
    })
}

/// Annotations of the first stream of a collection.
#[derive(Debug, PartialEq, Clone)]
pub struct MetadataSummary {
    pub collection: String,
    pub annotations: BTreeMap<String, String>,
}

impl fmt::Display for MetadataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection)?;
        for (key, value) in self.annotations.iter() {
            write!(f, "\n   {}: {}", key, value)?;
        }
        Ok(())
    }
}

pub async fn metadata_summary<C: StreamClient + ?Sized>(
    client: &C,
    collection: &str,
) -> Result<MetadataSummary> {
    let streams = client
        .streams_in_collection(collection, &StreamFilter::default())
        .await?;
    let first = streams
        .first()
        .ok_or_else(|| DescribeError::EmptyCollection(collection.to_string()))?;

    Ok(MetadataSummary {
        collection: collection.to_string(),
        annotations: first.annotations.clone(),
    })
}
