pub mod distribution;
pub mod event;
pub mod mean;
pub mod window;

pub use distribution::*;
pub use event::*;
pub use mean::*;
pub use window::*;

use crate::analytics::client::ClientError;
use crate::analytics::data_types::Stream;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("client error: {0}")]
    ClientError(#[from] ClientError),

    #[error("pointwidth error: {0}")]
    PointwidthError(#[from] pointwidth::Error),

    #[error("stream {0} has no points")]
    EmptyStream(String),

    #[error("no points in the event window of {0}")]
    EmptyEvent(String),

    #[error("window of {num_seconds}s holds no samples at a {sampling_period}s sampling period")]
    EmptyWindow {
        num_seconds: f64,
        sampling_period: f64,
    },

    #[error("invalid size range. {0} to {1} must satisfy min < max < 1")]
    InvalidSizeRange(f64, f64),
}

impl StatsError {
    pub(crate) fn empty_stream(stream: &Stream) -> Self {
        Self::EmptyStream(stream.to_string())
    }
}

pub(crate) type Result<T> = std::result::Result<T, StatsError>;
