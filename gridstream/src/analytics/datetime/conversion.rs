use super::timestamp_nano::{TimestampNano, SEC_IN_NANOSEC};
use crate::analytics::data_types::TimeIndex;
use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TimeConversionError {
    #[error("can not normalize timestamps over a zero length range. t0 and tf are both {0}")]
    ZeroLengthRange(TimestampNano),

    #[error("no timestamps to convert")]
    NoTimestamps,
}

type Result<T> = std::result::Result<T, TimeConversionError>;

/// How nanosecond timestamps are presented in a frame.
#[derive(AsRefStr, EnumString, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[strum(serialize_all = "snake_case")]
pub enum TimeConversion {
    #[default]
    None,
    Datetime,
    /// seconds elapsed since `t0`
    Relative,
    /// `(t - t0) / (tf - t0)`
    Normalized,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ConvertedTime {
    Nanos(TimestampNano),
    Datetime(DateTime<Utc>),
    Seconds(f64),
    Fraction(f64),
}

pub fn convert_timestamp(
    time: TimestampNano,
    t0: TimestampNano,
    tf: TimestampNano,
    conversion: TimeConversion,
) -> Result<ConvertedTime> {
    let converted = match conversion {
        TimeConversion::None => ConvertedTime::Nanos(time),
        TimeConversion::Datetime => ConvertedTime::Datetime(time.as_datetime()),
        TimeConversion::Relative => ConvertedTime::Seconds(relative_seconds(time, t0)),
        TimeConversion::Normalized => ConvertedTime::Fraction(normalized(time, t0, tf)?),
    };
    Ok(converted)
}

/// Converts a whole time column. Without explicit bounds the column's own minimum and
/// maximum are used for `t0` and `tf`.
pub fn convert_timestamps(
    times: Vec<TimestampNano>,
    bounds: Option<(TimestampNano, TimestampNano)>,
    conversion: TimeConversion,
) -> Result<TimeIndex> {
    if conversion == TimeConversion::None {
        return Ok(TimeIndex::Nanos(times));
    }
    if conversion == TimeConversion::Datetime {
        return Ok(TimeIndex::Datetime(
            times.iter().map(|t| t.as_datetime()).collect(),
        ));
    }

    let (t0, tf) = match bounds {
        Some(bounds) => bounds,
        None => {
            let t0 = times.iter().min().ok_or(TimeConversionError::NoTimestamps)?;
            let tf = times.iter().max().ok_or(TimeConversionError::NoTimestamps)?;
            (*t0, *tf)
        }
    };

    match conversion {
        TimeConversion::Relative => Ok(TimeIndex::Relative(
            times.iter().map(|t| relative_seconds(*t, t0)).collect(),
        )),
        _ => Ok(TimeIndex::Normalized(
            times
                .iter()
                .map(|t| normalized(*t, t0, tf))
                .collect::<Result<Vec<f64>>>()?,
        )),
    }
}

fn relative_seconds(time: TimestampNano, t0: TimestampNano) -> f64 {
    (time - t0) as f64 / SEC_IN_NANOSEC as f64
}

fn normalized(time: TimestampNano, t0: TimestampNano, tf: TimestampNano) -> Result<f64> {
    if tf == t0 {
        return Err(TimeConversionError::ZeroLengthRange(t0));
    }
    Ok((time - t0) as f64 / (tf - t0) as f64)
}
