use super::{align_to_index, union_index, FrameError, Result};
use crate::analytics::client::StreamClient;
use crate::analytics::data_types::*;
use crate::analytics::datetime::TimestampNano;
use pointwidth::Pointwidth;

pub const STREAM_COLUMN_LEVELS: [&str; 4] = ["collection", "unit", "name", "agg"];
pub const RAW_VALUE_COLUMN: &str = "value";

/// How `streams_to_df` queries each stream.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum Resolution {
    #[default]
    Raw,
    Aligned(Pointwidth),
    Windows {
        width: u64,
        depth: u8,
    },
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct StreamsFrameOptions {
    pub resolution: Resolution,
    /// required for windowed resolutions, rejected for raw values
    pub aggregates: Option<AggregateSelection>,
    pub to_datetime: bool,
    pub disable_progress: bool,
    pub version: Version,
}

enum FetchedColumn {
    Float64(Vec<f64>),
    UInt64(Vec<u64>),
}

struct FetchedStream<'a> {
    stream: &'a Stream,
    times: Vec<TimestampNano>,
    columns: Vec<(String, FetchedColumn)>,
}

impl<'a> FetchedStream<'a> {
    fn from_raw(stream: &'a Stream, points: Vec<RawPoint>) -> Self {
        let (times, values) = points.into_iter().map(|p| (p.time, p.value)).unzip();
        Self {
            stream,
            times,
            columns: vec![(RAW_VALUE_COLUMN.to_string(), FetchedColumn::Float64(values))],
        }
    }

    fn from_stat(stream: &'a Stream, points: Vec<StatPoint>, aggregates: &[Aggregate]) -> Self {
        let times = points.iter().map(|p| p.time).collect();
        let columns = aggregates
            .iter()
            .map(|aggregate| {
                let column = match aggregate {
                    Aggregate::Count => {
                        FetchedColumn::UInt64(points.iter().map(|p| p.count).collect())
                    }
                    _ => FetchedColumn::Float64(
                        points
                            .iter()
                            .map(|p| match p.get(*aggregate) {
                                AggregateValue::Float64(v) => v,
                                AggregateValue::UInt64(v) => v as f64,
                            })
                            .collect(),
                    ),
                };
                (aggregate.to_string(), column)
            })
            .collect();
        Self {
            stream,
            times,
            columns,
        }
    }

    fn into_columns(self, index: &[TimestampNano]) -> Vec<(ColumnKey, DataSeries)> {
        let stream = self.stream;
        let times = self.times;
        self.columns
            .into_iter()
            .map(|(agg, column)| {
                let values = match column {
                    FetchedColumn::Float64(vs) => {
                        SeriesValues::Float64(align_to_index(index, &times, &vs))
                    }
                    FetchedColumn::UInt64(vs) => {
                        SeriesValues::UInt64(align_to_index(index, &times, &vs))
                    }
                };
                let key = ColumnKey::new([
                    stream.collection.as_str(),
                    stream.unit(),
                    stream.name(),
                    agg.as_str(),
                ]);
                (key, DataSeries::new(values))
            })
            .collect()
    }
}

/// Fetches every stream over `[start, end)` and lays them out side by side on the union
/// of their timestamps.
///
/// Columns are keyed by `collection, unit, name, agg`. Streams without data in the range
/// are left out, and cells a stream has no point for are null.
pub async fn streams_to_df<C: StreamClient + ?Sized>(
    client: &C,
    streams: &[Stream],
    start: TimestampNano,
    end: TimestampNano,
    options: &StreamsFrameOptions,
) -> Result<TimeSeriesDataFrame> {
    let aggregates = match (options.resolution, &options.aggregates) {
        (Resolution::Raw, None) => vec![],
        (Resolution::Raw, Some(_)) => return Err(FrameError::AggregatesWithRawValues),
        (_, None) => return Err(FrameError::NoAggregates),
        (_, Some(selection)) => selection.aggregates(),
    };

    let mut fetched = Vec::<FetchedStream>::with_capacity(streams.len());
    for (ith, stream) in streams.iter().enumerate() {
        if !options.disable_progress {
            log::info!("Getting streams {}/{}: {}", ith + 1, streams.len(), stream);
        }

        let each = match options.resolution {
            Resolution::Raw => {
                let points = client.values(stream, start, end, options.version).await?;
                FetchedStream::from_raw(stream, strip_versions(points))
            }
            Resolution::Aligned(pw) => {
                let points = client
                    .aligned_windows(stream, start, end, pw, options.version)
                    .await?;
                FetchedStream::from_stat(stream, strip_versions(points), &aggregates)
            }
            Resolution::Windows { width, depth } => {
                let points = client
                    .windows(stream, start, end, width, depth, options.version)
                    .await?;
                FetchedStream::from_stat(stream, strip_versions(points), &aggregates)
            }
        };

        if each.times.is_empty() {
            log::debug!("{} has no data in range, skipped", stream);
            continue;
        }
        fetched.push(each);
    }

    if fetched.is_empty() {
        return Err(FrameError::NoData);
    }

    let index = union_index(fetched.iter().map(|f| f.times.as_slice()));
    let columns = fetched
        .into_iter()
        .flat_map(|f| f.into_columns(&index))
        .collect();

    let df = TimeSeriesDataFrame::new(
        TimeIndex::Nanos(index),
        STREAM_COLUMN_LEVELS.iter().map(|l| l.to_string()).collect(),
        columns,
    )?;

    if options.to_datetime {
        let index = df.index.clone().to_datetime();
        Ok(df.with_index(index)?)
    } else {
        Ok(df)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytics::client::{MemoryClient, StreamRecord};
    use uuid::Uuid;

    macro_rules! record {
        ($collection:expr, $name:expr, $unit:expr, [$(($t:expr, $v:expr)),*]) => {
            StreamRecord::new(
                Stream::new(Uuid::new_v4(), $collection, $name, $unit),
                vec![$(RawPoint::from(($t as i64, $v as f64))),*],
            )
        };
    }

    fn fixture() -> (MemoryClient, Vec<Stream>) {
        let records = vec![
            record!("sunshine/PMU1", "L1MAG", "volts", [(0, 1), (10, 2), (20, 3)]),
            record!("sunshine/PMU1", "C1MAG", "amps", [(10, 5), (30, 7)]),
            record!("sunshine/PMU2", "L1MAG", "volts", []),
        ];
        let streams = records.iter().map(|r| r.stream.clone()).collect();
        (MemoryClient::new(records), streams)
    }

    #[tokio::test]
    async fn test_raw_values() {
        let (client, streams) = fixture();
        let df = streams_to_df(
            &client,
            &streams,
            TimestampNano::new(0),
            TimestampNano::new(100),
            &StreamsFrameOptions::default(),
        )
        .await
        .unwrap();

        // the empty PMU2 stream is skipped
        assert_eq!(df.fields_len(), 2);
        assert_eq!(
            df.index,
            TimeIndex::Nanos(vec![0, 10, 20, 30].into_iter().map(TimestampNano::new).collect())
        );
        let volts = df
            .column(&["sunshine/PMU1", "volts", "L1MAG", "value"])
            .unwrap();
        assert_eq!(
            volts.values,
            SeriesValues::Float64(vec![Some(1f64), Some(2f64), Some(3f64), None])
        );
        let amps = df
            .column(&["sunshine/PMU1", "amps", "C1MAG", "value"])
            .unwrap();
        assert_eq!(
            amps.values,
            SeriesValues::Float64(vec![None, Some(5f64), None, Some(7f64)])
        );
    }

    #[tokio::test]
    async fn test_aligned_aggregates() {
        let (client, streams) = fixture();
        let options = StreamsFrameOptions {
            resolution: Resolution::Aligned(Pointwidth::new(4).unwrap()),
            aggregates: Some(AggregateSelection::Only(vec![
                Aggregate::Mean,
                Aggregate::Count,
                Aggregate::Mean,
            ])),
            to_datetime: true,
            disable_progress: true,
            ..Default::default()
        };
        let df = streams_to_df(
            &client,
            &streams[..1],
            TimestampNano::new(0),
            TimestampNano::new(32),
            &options,
        )
        .await
        .unwrap();

        let keys: Vec<String> = df.column_keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["sunshine/PMU1/volts/L1MAG/mean", "sunshine/PMU1/volts/L1MAG/count"]
        );
        assert!(matches!(df.index, TimeIndex::Datetime(_)));
        assert_eq!(
            df.column(&["sunshine/PMU1", "volts", "L1MAG", "mean"])
                .unwrap()
                .values,
            SeriesValues::Float64(vec![Some(1.5f64), Some(3f64)])
        );
        assert_eq!(
            df.column(&["sunshine/PMU1", "volts", "L1MAG", "count"])
                .unwrap()
                .values,
            SeriesValues::UInt64(vec![Some(2), Some(1)])
        );
    }

    #[tokio::test]
    async fn test_window_aggregates() {
        let (client, streams) = fixture();
        let options = StreamsFrameOptions {
            resolution: Resolution::Windows { width: 15, depth: 0 },
            aggregates: Some(AggregateSelection::Only(vec![Aggregate::Min, Aggregate::Max])),
            disable_progress: true,
            ..Default::default()
        };
        // windows [0, 15) and [15, 30); [30, 45) is not whole and is dropped
        let df = streams_to_df(
            &client,
            &streams[..2],
            TimestampNano::new(0),
            TimestampNano::new(35),
            &options,
        )
        .await
        .unwrap();

        assert_eq!(
            df.index,
            TimeIndex::Nanos(vec![TimestampNano::new(0), TimestampNano::new(15)])
        );
        let keys: Vec<String> = df.column_keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "sunshine/PMU1/volts/L1MAG/min",
                "sunshine/PMU1/volts/L1MAG/max",
                "sunshine/PMU1/amps/C1MAG/min",
                "sunshine/PMU1/amps/C1MAG/max",
            ]
        );
        assert_eq!(
            df.column(&["sunshine/PMU1", "volts", "L1MAG", "min"])
                .unwrap()
                .values,
            SeriesValues::Float64(vec![Some(1f64), Some(3f64)])
        );
        assert_eq!(
            df.column(&["sunshine/PMU1", "volts", "L1MAG", "max"])
                .unwrap()
                .values,
            SeriesValues::Float64(vec![Some(2f64), Some(3f64)])
        );
        assert_eq!(
            df.column(&["sunshine/PMU1", "amps", "C1MAG", "max"])
                .unwrap()
                .values,
            SeriesValues::Float64(vec![Some(5f64), None])
        );
    }

    #[tokio::test]
    async fn test_invalid_options() {
        let (client, streams) = fixture();
        let (start, end) = (TimestampNano::new(0), TimestampNano::new(100));

        let raw_with_aggregates = StreamsFrameOptions {
            aggregates: Some(AggregateSelection::All),
            ..Default::default()
        };
        assert!(matches!(
            streams_to_df(&client, &streams, start, end, &raw_with_aggregates).await,
            Err(FrameError::AggregatesWithRawValues)
        ));

        let windows_without_aggregates = StreamsFrameOptions {
            resolution: Resolution::Windows { width: 10, depth: 0 },
            ..Default::default()
        };
        assert!(matches!(
            streams_to_df(&client, &streams, start, end, &windows_without_aggregates).await,
            Err(FrameError::NoAggregates)
        ));

        assert!(matches!(
            streams_to_df(&client, &streams[2..], start, end, &StreamsFrameOptions::default())
                .await,
            Err(FrameError::NoData)
        ));
    }
}
