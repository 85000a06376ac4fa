use ::gridstream::*;
use pointwidth::{NanoDelta, Pointwidth};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug)]
pub enum Operation {
    Describe(DescribeCondition),
    Streams(StreamsCondition),
    Fetch(FetchCondition),
    Collection(CollectionCondition),
    Summary(SummaryCondition),
    Pointwidth(PointwidthCondition),
    Mean(MeanCondition),
    Event(EventCondition),
    Plot(PlotCondition),
}

#[derive(Debug)]
pub struct DescribeCondition {
    pub data_file: PathBuf,
    pub collection: String,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct StreamsCondition {
    pub data_file: PathBuf,
    pub query: StreamQuery,
    pub uuids_only: bool,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct FetchCondition {
    pub data_file: PathBuf,
    pub uuids: Vec<Uuid>,
    pub start: TimestampNano,
    pub end: TimestampNano,
    pub options: StreamsFrameOptions,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct CollectionCondition {
    pub data_file: PathBuf,
    pub collection: String,
    pub options: CollectionFrameOptions,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct SummaryCondition {
    pub data_file: PathBuf,
    pub collection: String,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct PointwidthCondition {
    pub delta: NanoDelta,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct MeanCondition {
    pub data_file: PathBuf,
    pub uuid: Uuid,
    pub pointwidth: Pointwidth,
    pub version: Version,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct EventCondition {
    pub data_file: PathBuf,
    pub uuid: Uuid,
    pub event_time: TimestampNano,
    pub window: EventWindow,
    pub version: Version,
    pub output_setting: OutputSetting,
}

#[derive(Debug)]
pub struct PlotCondition {
    pub data_file: PathBuf,
    pub uuids: Vec<Uuid>,
    pub event_time: TimestampNano,
    pub window: EventWindow,
    pub path: PathBuf,
    pub plot_options: PlotOptions,
    pub disable_progress: bool,
}

pub(crate) fn load_client(data_file: &Path) -> Result<MemoryClient, ClientError> {
    log::debug!("loading streams from {}", data_file.display());
    MemoryClient::from_json_file(data_file)
}

/// the single stream behind `uuid`
pub(crate) async fn find_stream(client: &MemoryClient, uuid: Uuid) -> Result<Stream, ClientError> {
    client
        .streams(&[uuid])
        .await?
        .into_iter()
        .next()
        .ok_or(ClientError::StreamNotFound(uuid))
}
