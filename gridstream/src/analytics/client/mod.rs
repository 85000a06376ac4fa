pub mod memory;
mod similar_to;

pub use memory::*;
pub(crate) use similar_to::similar_to_regex;

use crate::analytics::data_types::*;
use crate::analytics::datetime::TimestampNano;
use crate::analytics::query::StreamQuery;
use async_trait::async_trait;
use pointwidth::Pointwidth;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("stream not found: {0}")]
    StreamNotFound(Uuid),

    #[error("version {requested} of stream {uuid} not found. current version is {current}")]
    VersionNotFound {
        uuid: Uuid,
        requested: Version,
        current: Version,
    },

    #[error("invalid window: {0}")]
    InvalidWindow(String),

    #[error("invalid stream query: {0}")]
    InvalidQuery(#[from] regex::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid fixture: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

pub(crate) type Result<T> = std::result::Result<T, ClientError>;

/// Surface of the time series database the helpers are written against.
///
/// Times are nanoseconds, ranges are `[start, end)`, and `version` 0 reads the latest
/// version of a stream. Every point comes back paired with the stream version it was
/// read at.
#[async_trait]
pub trait StreamClient: Send + Sync {
    async fn streams_in_collection(
        &self,
        collection: &str,
        filter: &StreamFilter,
    ) -> Result<Vec<Stream>>;

    async fn collection_metadata(&self, collection: &str) -> Result<CollectionMetadata>;

    async fn query_streams(&self, query: &StreamQuery) -> Result<Vec<StreamMetadata>>;

    async fn streams(&self, uuids: &[Uuid]) -> Result<Vec<Stream>>;

    async fn values(
        &self,
        stream: &Stream,
        start: TimestampNano,
        end: TimestampNano,
        version: Version,
    ) -> Result<Vec<(RawPoint, Version)>>;

    /// statpoints over windows of `2^pw` nanoseconds aligned to multiples of the width
    async fn aligned_windows(
        &self,
        stream: &Stream,
        start: TimestampNano,
        end: TimestampNano,
        pointwidth: Pointwidth,
        version: Version,
    ) -> Result<Vec<(StatPoint, Version)>>;

    /// statpoints over consecutive `width` nanosecond windows starting at `start`
    async fn windows(
        &self,
        stream: &Stream,
        start: TimestampNano,
        end: TimestampNano,
        width: u64,
        depth: u8,
        version: Version,
    ) -> Result<Vec<(StatPoint, Version)>>;

    async fn earliest(&self, stream: &Stream) -> Result<Option<(RawPoint, Version)>>;

    async fn latest(&self, stream: &Stream) -> Result<Option<(RawPoint, Version)>>;

    async fn count(&self, stream: &Stream) -> Result<u64>;

    /// returns the stream version after the insert
    async fn insert(
        &self,
        stream: &Stream,
        points: &[RawPoint],
        merge: MergePolicy,
    ) -> Result<Version>;
}
