pub mod collection;
pub mod points;
pub mod streams;

pub use collection::*;
pub use points::*;
pub use streams::*;

use crate::analytics::client::ClientError;
use crate::analytics::data_types::DataframeError;
use crate::analytics::datetime::{TimeConversionError, TimestampNano};
use itertools::Itertools;
use pointwidth::Pointwidth;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("client error: {0}")]
    ClientError(#[from] ClientError),

    #[error("dataframe error: {0}")]
    DataframeError(#[from] DataframeError),

    #[error("time conversion error: {0}")]
    TimeConversionError(#[from] TimeConversionError),

    #[error("aggregates can only be selected with a pointwidth or a window width")]
    AggregatesWithRawValues,

    #[error("windowed queries need at least one aggregate")]
    NoAggregates,

    #[error("none of the streams has data in the range")]
    NoData,

    #[error("no points to build a frame from")]
    EmptyPoints,

    #[error("no streams in collection {0}")]
    EmptyCollection(String),
}

pub(crate) type Result<T> = std::result::Result<T, FrameError>;

/// Raw points or aligned window statpoints.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum PointResolution {
    #[default]
    Full,
    Pointwidth(Pointwidth),
}

/// sorted and deduplicated union of several sorted time columns
pub(crate) fn union_index<'a, I>(times: I) -> Vec<TimestampNano>
where
    I: IntoIterator<Item = &'a [TimestampNano]>,
{
    times
        .into_iter()
        .map(|ts| ts.iter().copied())
        .kmerge()
        .dedup()
        .collect()
}

/// values of one sorted time column laid out on `index`, None where the column has no entry
pub(crate) fn align_to_index<T: Copy>(
    index: &[TimestampNano],
    times: &[TimestampNano],
    values: &[T],
) -> Vec<Option<T>> {
    index
        .iter()
        .map(|t| {
            times
                .binary_search(t)
                .ok()
                .and_then(|pos| values.get(pos).copied())
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn ts(vs: &[i64]) -> Vec<TimestampNano> {
        vs.iter().copied().map(TimestampNano::new).collect()
    }

    #[test]
    fn test_union_and_align() {
        let a = ts(&[1, 3, 5]);
        let b = ts(&[2, 3, 6]);
        let index = union_index(vec![a.as_slice(), b.as_slice()]);
        assert_eq!(index, ts(&[1, 2, 3, 5, 6]));

        let aligned = align_to_index(&index, &b, &[20f64, 30f64, 60f64]);
        assert_eq!(aligned, vec![None, Some(20f64), Some(30f64), None, Some(60f64)]);

        assert!(union_index(Vec::<&[TimestampNano]>::new()).is_empty());
    }
}
