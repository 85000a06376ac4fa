use super::{similar_to_regex, ClientError, Result, StreamClient};
use crate::analytics::data_types::*;
use crate::analytics::datetime::TimestampNano;
use crate::analytics::query::StreamQuery;
use async_trait::async_trait;
use itertools::Itertools;
use pointwidth::Pointwidth;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

const INITIAL_VERSION: Version = 10;

fn initial_version() -> Version {
    INITIAL_VERSION
}

/// A stream and its points as kept by [`MemoryClient`] and stored in fixture files.
#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct StreamRecord {
    #[serde(flatten)]
    pub stream: Stream,
    #[serde(default)]
    pub points: Vec<RawPoint>,
    #[serde(default = "initial_version")]
    pub version: Version,
}

impl StreamRecord {
    pub fn new(stream: Stream, mut points: Vec<RawPoint>) -> Self {
        points.sort_by_key(|p| p.time);
        Self {
            stream,
            points,
            version: INITIAL_VERSION,
        }
    }

    fn check_version(&self, version: Version) -> Result<Version> {
        if version == 0 || version == self.version {
            Ok(self.version)
        } else {
            Err(ClientError::VersionNotFound {
                uuid: self.stream.uuid,
                requested: version,
                current: self.version,
            })
        }
    }

    /// points with `start <= t < end`
    fn range(&self, start: TimestampNano, end: TimestampNano) -> &[RawPoint] {
        let from = self.points.partition_point(|p| p.time < start);
        let to = self.points.partition_point(|p| p.time < end);
        if from >= to {
            &[]
        } else {
            &self.points[from..to]
        }
    }

    fn merge(&mut self, points: &[RawPoint], merge: MergePolicy) {
        for point in points {
            let same_time = self
                .points
                .iter()
                .position(|existing| existing.time == point.time);
            match (merge, same_time) {
                (MergePolicy::Never, _) | (_, None) => self.points.push(*point),
                (MergePolicy::Equal, Some(_)) => {
                    if !self.points.iter().any(|existing| existing == point) {
                        self.points.push(*point)
                    }
                }
                (MergePolicy::Retain, Some(_)) => {}
                (MergePolicy::Replace, Some(_)) => {
                    self.points.retain(|existing| existing.time != point.time);
                    self.points.push(*point)
                }
            }
        }
        self.points.sort_by_key(|p| p.time);
        self.version += 1;
    }
}

#[derive(Debug, PartialEq, Clone, Default, Deserialize, Serialize)]
pub struct Fixture {
    pub streams: Vec<StreamRecord>,
}

/// In-process [`StreamClient`] over a set of stream records.
#[derive(Debug, Default)]
pub struct MemoryClient {
    records: RwLock<Vec<StreamRecord>>,
}

impl MemoryClient {
    pub fn new(records: Vec<StreamRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                record.points.sort_by_key(|p| p.time);
                record
            })
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// streams without any points
    pub fn with_streams(streams: Vec<Stream>) -> Self {
        Self::new(
            streams
                .into_iter()
                .map(|stream| StreamRecord::new(stream, vec![]))
                .collect(),
        )
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(s)?;
        Ok(Self::new(fixture.streams))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let client = Self::from_json_str(&content)?;
        log::debug!("loaded fixture from {}", path.as_ref().display());
        Ok(client)
    }

    pub async fn to_fixture(&self) -> Fixture {
        Fixture {
            streams: self.records.read().await.clone(),
        }
    }

    pub async fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let fixture = self.to_fixture().await;
        fs::write(path, serde_json::to_string_pretty(&fixture)?)?;
        Ok(())
    }

    pub async fn add_stream(&self, stream: Stream) {
        self.records
            .write()
            .await
            .push(StreamRecord::new(stream, vec![]));
    }

    async fn read_record<T, F>(&self, uuid: Uuid, f: F) -> Result<T>
    where
        F: FnOnce(&StreamRecord) -> Result<T>,
    {
        let records = self.records.read().await;
        let record = records
            .iter()
            .find(|r| r.stream.uuid == uuid)
            .ok_or(ClientError::StreamNotFound(uuid))?;
        f(record)
    }
}

fn collection_metadata_of<'a, I>(streams: I) -> CollectionMetadata
where
    I: Iterator<Item = &'a Stream>,
{
    let mut metadata = CollectionMetadata::default();
    for stream in streams {
        for key in stream.tags.keys() {
            *metadata.tags.entry(key.clone()).or_insert(0) += 1;
        }
        for key in stream.annotations.keys() {
            *metadata.annotations.entry(key.clone()).or_insert(0) += 1;
        }
    }
    metadata
}

#[async_trait]
impl StreamClient for MemoryClient {
    async fn streams_in_collection(
        &self,
        collection: &str,
        filter: &StreamFilter,
    ) -> Result<Vec<Stream>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| filter.matches(collection, &r.stream))
            .map(|r| r.stream.clone())
            .collect())
    }

    async fn collection_metadata(&self, collection: &str) -> Result<CollectionMetadata> {
        let records = self.records.read().await;
        Ok(collection_metadata_of(
            records
                .iter()
                .map(|r| &r.stream)
                .filter(|s| s.collection.starts_with(collection)),
        ))
    }

    async fn query_streams(&self, query: &StreamQuery) -> Result<Vec<StreamMetadata>> {
        let collection_re = similar_to_regex(&query.collection_pattern())?;
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| collection_re.is_match(&r.stream.collection))
            .map(|r| StreamMetadata::from(&r.stream))
            .filter(|metadata| query.matches(metadata))
            .collect())
    }

    async fn streams(&self, uuids: &[Uuid]) -> Result<Vec<Stream>> {
        let records = self.records.read().await;
        uuids
            .iter()
            .map(|uuid| {
                records
                    .iter()
                    .find(|r| r.stream.uuid == *uuid)
                    .map(|r| r.stream.clone())
                    .ok_or(ClientError::StreamNotFound(*uuid))
            })
            .collect()
    }

    async fn values(
        &self,
        stream: &Stream,
        start: TimestampNano,
        end: TimestampNano,
        version: Version,
    ) -> Result<Vec<(RawPoint, Version)>> {
        self.read_record(stream.uuid, |record| {
            let version = record.check_version(version)?;
            Ok(record
                .range(start, end)
                .iter()
                .map(|p| (*p, version))
                .collect())
        })
        .await
    }

    async fn aligned_windows(
        &self,
        stream: &Stream,
        start: TimestampNano,
        end: TimestampNano,
        pointwidth: Pointwidth,
        version: Version,
    ) -> Result<Vec<(StatPoint, Version)>> {
        let width = pointwidth.nanoseconds();
        let aligned_start = pointwidth.align(start.as_inner());
        let aligned_end = match pointwidth.align(end.as_inner()) {
            aligned if aligned < end.as_inner() => aligned.saturating_add(width),
            aligned => aligned,
        };

        self.read_record(stream.uuid, |record| {
            let version = record.check_version(version)?;
            let points = record.range(
                TimestampNano::new(aligned_start),
                TimestampNano::new(aligned_end),
            );

            let mut statpoints = vec![];
            let windows = points
                .iter()
                .group_by(|p| pointwidth.align(p.time.as_inner()));
            for (window_start, window) in &windows {
                let values: Vec<f64> = window.map(|p| p.value).collect();
                let window_start = TimestampNano::new(window_start);
                if let Some(sp) = StatPoint::from_values(window_start, &values) {
                    statpoints.push((sp, version));
                }
            }
            Ok(statpoints)
        })
        .await
    }

    async fn windows(
        &self,
        stream: &Stream,
        start: TimestampNano,
        end: TimestampNano,
        width: u64,
        depth: u8,
        version: Version,
    ) -> Result<Vec<(StatPoint, Version)>> {
        if width == 0 {
            return Err(ClientError::InvalidWindow("width must be positive".to_string()));
        }
        let width = i64::try_from(width)
            .map_err(|_| ClientError::InvalidWindow(format!("width {} is too large", width)))?;
        if depth != 0 {
            log::debug!("window depth {} has no effect on in-memory streams", depth);
        }

        self.read_record(stream.uuid, |record| {
            let version = record.check_version(version)?;
            let mut statpoints = vec![];
            let mut window_start = start.as_inner();
            while window_start.saturating_add(width) <= end.as_inner() {
                let window_end = window_start + width;
                let values: Vec<f64> = record
                    .range(TimestampNano::new(window_start), TimestampNano::new(window_end))
                    .iter()
                    .map(|p| p.value)
                    .collect();
                let time = TimestampNano::new(window_start);
                if let Some(sp) = StatPoint::from_values(time, &values) {
                    statpoints.push((sp, version));
                }
                window_start = window_end;
            }
            Ok(statpoints)
        })
        .await
    }

    async fn earliest(&self, stream: &Stream) -> Result<Option<(RawPoint, Version)>> {
        self.read_record(stream.uuid, |record| {
            Ok(record.points.first().map(|p| (*p, record.version)))
        })
        .await
    }

    async fn latest(&self, stream: &Stream) -> Result<Option<(RawPoint, Version)>> {
        self.read_record(stream.uuid, |record| {
            Ok(record.points.last().map(|p| (*p, record.version)))
        })
        .await
    }

    async fn count(&self, stream: &Stream) -> Result<u64> {
        self.read_record(stream.uuid, |record| Ok(record.points.len() as u64))
            .await
    }

    async fn insert(
        &self,
        stream: &Stream,
        points: &[RawPoint],
        merge: MergePolicy,
    ) -> Result<Version> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.stream.uuid == stream.uuid)
            .ok_or(ClientError::StreamNotFound(stream.uuid))?;

        record.merge(points, merge);
        log::debug!(
            "inserted {} points into {}, version {}",
            points.len(),
            stream,
            record.version
        );
        Ok(record.version)
    }
}
