mod args;
mod operation;

mod describe_collection;
mod event_points;
mod fetch_collection;
mod fetch_streams;
mod list_streams;
mod nearest_pointwidth;
mod plot_event;
mod stream_mean;
mod summarize_collection;

use ::gridstream::*;
use args::*;
use dotenv::dotenv;
use operation::*;
use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridstreamBinError {
    #[error("args error {0}")]
    ArgsError(#[from] ArgsError),

    #[error("client error {0}")]
    ClientError(#[from] ClientError),

    #[error("query error {0}")]
    QueryError(#[from] QueryError),

    #[error("frame error {0}")]
    FrameError(#[from] FrameError),

    #[error("dataframe error {0}")]
    DataframeError(#[from] DataframeError),

    #[error("describe error {0}")]
    DescribeError(#[from] DescribeError),

    #[error("stats error {0}")]
    StatsError(#[from] StatsError),

    #[error("plot error {0}")]
    PlotError(#[from] PlotError),

    #[error("pointwidth error {0}")]
    PointwidthError(#[from] pointwidth::Error),

    #[error("output error {0}")]
    OutputError(#[from] OutputError),

    #[error("logger error {0}")]
    LoggerError(String),
}

pub type Result<T> = std::result::Result<T, GridstreamBinError>;

fn init_logger() -> Result<()> {
    let sub = tracing_subscriber::FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(sub)
        .map_err(|e| GridstreamBinError::LoggerError(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| GridstreamBinError::LoggerError(e.to_string()))?;
    Ok(())
}

#[tokio::main]
pub async fn main() -> Result<()> {
    dotenv().ok();
    init_logger()?;

    let arg = parse_args_or_exits()?;
    let operation = arg.to_operation()?;
    log::debug!("{:?}", operation);
    match operation {
        Operation::Describe(condition) => describe_collection::execute(condition).await?,
        Operation::Streams(condition) => list_streams::execute(condition).await?,
        Operation::Fetch(condition) => fetch_streams::execute(condition).await?,
        Operation::Collection(condition) => fetch_collection::execute(condition).await?,
        Operation::Summary(condition) => summarize_collection::execute(condition).await?,
        Operation::Pointwidth(condition) => nearest_pointwidth::execute(condition).await?,
        Operation::Mean(condition) => stream_mean::execute(condition).await?,
        Operation::Event(condition) => event_points::execute(condition).await?,
        Operation::Plot(condition) => plot_event::execute(condition).await?,
    }
    Ok(())
}
