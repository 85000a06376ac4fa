use crate::analytics::client::{ClientError, StreamClient};
use crate::analytics::data_types::*;
use crate::analytics::datetime::TimestampNano;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("client error: {0}")]
    ClientError(#[from] ClientError),

    #[error("{0} timestamps but {1} values")]
    UnmatchedLength(usize, usize),
}

type Result<T> = std::result::Result<T, WriteError>;

/// Inserts `values` at `times`, overwriting points that already exist at the same time.
/// Returns the new stream version.
pub async fn write_to_stream<C: StreamClient + ?Sized>(
    client: &C,
    stream: &Stream,
    times: &[TimestampNano],
    values: &[f64],
) -> Result<Version> {
    if times.len() != values.len() {
        return Err(WriteError::UnmatchedLength(times.len(), values.len()));
    }

    let points: Vec<RawPoint> = times
        .iter()
        .zip(values.iter())
        .map(|(time, value)| RawPoint::new(*time, *value))
        .collect();
    let version = client.insert(stream, &points, MergePolicy::Replace).await?;
    log::info!("wrote {} points to {}", points.len(), stream);
    Ok(version)
}
