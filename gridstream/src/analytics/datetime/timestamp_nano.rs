use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Deref, Sub};
use thiserror::Error;

pub const SEC_IN_NANOSEC: i64 = 1_000_000_000;

#[derive(Error, Debug, PartialEq)]
pub enum TimestampParseError {
    #[error("invalid datetime. {0}")]
    InvalidFormat(#[from] chrono::ParseError),

    #[error("{0} is out of the nanosecond timestamp range")]
    OutOfRange(String),
}

/// Nanoseconds since the unix epoch. Times before the epoch are negative.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampNano(pub i64);

impl TimestampNano {
    pub fn new(inner: i64) -> Self {
        TimestampNano(inner)
    }

    pub fn as_inner(&self) -> i64 {
        self.0
    }

    pub fn in_seconds(&self) -> i64 {
        self.0.div_euclid(SEC_IN_NANOSEC)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.0)
    }

    /// saturates at the ends of the i64 range
    pub fn add_nanos(&self, nanos: i64) -> Self {
        Self::new(self.0.saturating_add(nanos))
    }

    fn checked_from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Option<Self> {
        dt.timestamp()
            .checked_mul(SEC_IN_NANOSEC)?
            .checked_add(dt.timestamp_subsec_nanos() as i64)
            .map(TimestampNano)
    }
}

/// Saturates for datetimes outside of the nanosecond range (about 1677 to 2262).
impl<Tz: TimeZone> From<DateTime<Tz>> for TimestampNano {
    fn from(dt: DateTime<Tz>) -> Self {
        match Self::checked_from_datetime(&dt) {
            Some(ts) => ts,
            None if dt.timestamp() < 0 => TimestampNano(i64::MIN),
            None => TimestampNano(i64::MAX),
        }
    }
}

impl From<i64> for TimestampNano {
    fn from(v: i64) -> Self {
        TimestampNano(v)
    }
}

impl TryFrom<&str> for TimestampNano {
    type Error = TimestampParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let out_of_range = || TimestampParseError::OutOfRange(s.trim().to_string());
        match s.trim().parse::<i64>() {
            Ok(num_val) => {
                // unixtime: 10_000_000_000 => "Sat Nov 20 2286 17:46:40 GMT+0000"
                if num_val.abs() < 10_000_000_000 {
                    num_val
                        .checked_mul(SEC_IN_NANOSEC)
                        .map(TimestampNano)
                        .ok_or_else(out_of_range)
                } else {
                    Ok(TimestampNano(num_val))
                }
            }
            Err(_) => {
                let dt = DateTime::parse_from_rfc3339(s.trim())?;
                Self::checked_from_datetime(&dt).ok_or_else(out_of_range)
            }
        }
    }
}

impl fmt::Display for TimestampNano {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{nano}", nano = self.0)
    }
}

impl Deref for TimestampNano {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Sub<TimestampNano> for TimestampNano {
    type Output = i64;
    fn sub(self, other: Self) -> Self::Output {
        *self - *other
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use chrono::DateTime;

    #[test]
    fn to_date_time() {
        let dt = DateTime::parse_from_rfc3339("2021-09-27T09:45:01.1749178Z").unwrap();
        let tsn: TimestampNano = dt.clone().into();
        let cdt = tsn.as_datetime();
        assert_eq!(cdt, dt);
    }

    #[test]
    fn parse_timestamp() {
        assert_eq!(
            TimestampNano::try_from("1600000000").unwrap(),
            TimestampNano::new(1_600_000_000_000_000_000)
        );
        assert_eq!(
            TimestampNano::try_from("1600000000123456789").unwrap(),
            TimestampNano::new(1_600_000_000_123_456_789)
        );
        assert_eq!(
            TimestampNano::try_from("2020-09-13T12:26:40Z").unwrap(),
            TimestampNano::new(1_600_000_000_000_000_000)
        );
        assert!(TimestampNano::try_from("yesterday").is_err());
    }

    #[test]
    fn parse_out_of_range() {
        assert_eq!(
            TimestampNano::try_from("9999999999"),
            Err(TimestampParseError::OutOfRange("9999999999".to_string()))
        );
        assert!(matches!(
            TimestampNano::try_from("-9999999999"),
            Err(TimestampParseError::OutOfRange(_))
        ));
        assert!(matches!(
            TimestampNano::try_from("2300-01-01T00:00:00Z"),
            Err(TimestampParseError::OutOfRange(_))
        ));
        assert_eq!(
            TimestampNano::try_from("9223372036").unwrap(),
            TimestampNano::new(9_223_372_036_000_000_000)
        );
    }

    #[test]
    fn add_nanos_saturates() {
        let near_max = TimestampNano::new(i64::MAX - 1);
        assert_eq!(near_max.add_nanos(5), TimestampNano::new(i64::MAX));
        let near_min = TimestampNano::new(i64::MIN + 1);
        assert_eq!(near_min.add_nanos(-5), TimestampNano::new(i64::MIN));
        assert_eq!(TimestampNano::new(10).add_nanos(-3), TimestampNano::new(7));
    }

    #[test]
    fn before_epoch() {
        let ts = TimestampNano::new(-1);
        assert_eq!(ts.in_seconds(), -1);
        assert_eq!(ts.as_datetime().timestamp(), -1);
    }
}
