use super::{align_to_index, union_index, FrameError, PointResolution, Result};
use crate::analytics::client::StreamClient;
use crate::analytics::data_types::*;
use crate::analytics::datetime::{convert_timestamps, TimeConversion, TimestampNano};

pub const STREAM_LEVEL: &str = "stream";

#[derive(Debug, PartialEq, Clone, Default)]
pub struct CollectionFrameOptions {
    pub resolution: PointResolution,
    /// label columns with the stream name instead of `collection/name`
    pub rename_columns: bool,
    pub conversion: TimeConversion,
    pub version: Version,
}

/// Every stream of `collection` side by side over the time range of the first stream,
/// from its earliest point up to but excluding its latest point.
pub async fn collection_to_frame<C: StreamClient + ?Sized>(
    client: &C,
    collection: &str,
    filter: &StreamFilter,
    options: &CollectionFrameOptions,
) -> Result<TimeSeriesDataFrame> {
    let streams = client.streams_in_collection(collection, filter).await?;
    let first = streams
        .first()
        .ok_or_else(|| FrameError::EmptyCollection(collection.to_string()))?;

    let (start, end) = match (client.earliest(first).await?, client.latest(first).await?) {
        (Some((earliest, _)), Some((latest, _))) => (earliest.time, latest.time),
        _ => return Err(FrameError::NoData),
    };
    log::debug!(
        "collection {} with {} streams from {} to {}",
        collection,
        streams.len(),
        start,
        end
    );

    let mut fetched = Vec::<(Vec<TimestampNano>, Vec<f64>)>::with_capacity(streams.len());
    for stream in streams.iter() {
        let each: (Vec<TimestampNano>, Vec<f64>) = match options.resolution {
            PointResolution::Full => client
                .values(stream, start, end, options.version)
                .await?
                .into_iter()
                .map(|(p, _)| (p.time, p.value))
                .unzip(),
            PointResolution::Pointwidth(pw) => client
                .aligned_windows(stream, start, end, pw, options.version)
                .await?
                .into_iter()
                .map(|(p, _)| (p.time, p.mean))
                .unzip(),
        };
        fetched.push(each);
    }

    let index = union_index(fetched.iter().map(|(times, _)| times.as_slice()));
    let columns = streams
        .iter()
        .zip(fetched.iter())
        .map(|(stream, (times, values))| {
            let label = if options.rename_columns {
                stream.name().to_string()
            } else {
                stream.path()
            };
            (
                ColumnKey::new([label]),
                DataSeries::new(SeriesValues::Float64(align_to_index(&index, times, values))),
            )
        })
        .collect();

    let level = if options.rename_columns {
        NAME_LEVEL
    } else {
        STREAM_LEVEL
    };
    let index = if index.is_empty() {
        TimeIndex::Nanos(index)
    } else {
        convert_timestamps(index, None, options.conversion)?
    };

    Ok(TimeSeriesDataFrame::new(
        index,
        vec![level.to_string()],
        columns,
    )?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytics::client::{MemoryClient, StreamRecord};
    use crate::analytics::datetime::SEC_IN_NANOSEC;
    use pointwidth::Pointwidth;
    use uuid::Uuid;

    fn record(name: &str, unit: &str, points: &[(i64, f64)]) -> StreamRecord {
        StreamRecord::new(
            Stream::new(Uuid::new_v4(), "pmu/A", name, unit),
            points.iter().copied().map(RawPoint::from).collect(),
        )
    }

    fn fixture() -> MemoryClient {
        let s = SEC_IN_NANOSEC;
        MemoryClient::new(vec![
            record("L1MAG", "volts", &[(0, 1.0), (s, 2.0), (2 * s, 3.0)]),
            record("C1MAG", "amps", &[(s, 5.0), (3 * s, 7.0)]),
        ])
    }

    #[tokio::test]
    async fn test_full_resolution() {
        let client = fixture();
        let df = collection_to_frame(
            &client,
            "pmu/A",
            &StreamFilter::default(),
            &CollectionFrameOptions::default(),
        )
        .await
        .unwrap();

        // the range is [0s, 2s): the first stream's latest point at 2s is excluded
        assert_eq!(df.len(), 2);
        assert_eq!(df.column_levels, vec!["stream".to_string()]);
        assert_eq!(
            df.column(&["pmu/A/C1MAG"]).unwrap().values,
            SeriesValues::Float64(vec![None, Some(5.0)])
        );
        assert_eq!(
            df.column(&["pmu/A/L1MAG"]).unwrap().values,
            SeriesValues::Float64(vec![Some(1.0), Some(2.0)])
        );
    }

    #[tokio::test]
    async fn test_renamed_and_converted() {
        let client = fixture();
        let options = CollectionFrameOptions {
            rename_columns: true,
            conversion: TimeConversion::Relative,
            ..Default::default()
        };
        let df = collection_to_frame(&client, "pmu", &StreamFilter::default(), &options)
            .await
            .unwrap();
        assert_eq!(df.index, TimeIndex::Relative(vec![0.0, 1.0]));
        assert!(df.column(&["L1MAG"]).is_some());

        let options = CollectionFrameOptions {
            resolution: PointResolution::Pointwidth(Pointwidth::new(62).unwrap()),
            ..Default::default()
        };
        let df = collection_to_frame(&client, "pmu", &StreamFilter::default(), &options)
            .await
            .unwrap();
        assert_eq!(df.len(), 1);
        assert_eq!(
            df.column(&["pmu/A/L1MAG"]).unwrap().values,
            SeriesValues::Float64(vec![Some(2.0)])
        );
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let client = fixture();
        assert!(matches!(
            collection_to_frame(
                &client,
                "sunshine",
                &StreamFilter::default(),
                &CollectionFrameOptions::default()
            )
            .await,
            Err(FrameError::EmptyCollection(_))
        ));
    }
}
