use std::convert::TryFrom;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("pointwidth out of range. max:{0} actual:{1}")]
    OutOfRange(u8, u8),

    #[error("duration must be positive to get a pointwidth. actual: {0}ns")]
    NonPositiveDuration(i64),
}

pub const NANOS_IN_MICROSECOND: f64 = 1_000f64;
pub const NANOS_IN_MILLISECOND: f64 = NANOS_IN_MICROSECOND * 1_000f64;
pub const NANOS_IN_SECOND: f64 = NANOS_IN_MILLISECOND * 1_000f64;
pub const NANOS_IN_MINUTE: f64 = NANOS_IN_SECOND * 60f64;
pub const NANOS_IN_HOUR: f64 = NANOS_IN_MINUTE * 60f64;
pub const NANOS_IN_DAY: f64 = NANOS_IN_HOUR * 24f64;

/// 2^63 overflows i64 nanoseconds.
pub const MAX_POINTWIDTH: u8 = 62;

/// A window of `2^pw` nanoseconds.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Pointwidth(u8);

impl Pointwidth {
    pub fn new(pw: u8) -> Result<Self> {
        if pw > MAX_POINTWIDTH {
            return Err(Error::OutOfRange(MAX_POINTWIDTH, pw));
        }
        Ok(Self(pw))
    }

    pub fn as_inner(&self) -> u8 {
        self.0
    }

    pub fn nanoseconds(&self) -> i64 {
        1i64 << self.0
    }

    pub fn seconds(&self) -> f64 {
        self.nanoseconds() as f64 / NANOS_IN_SECOND
    }

    /// round `ns` down to the start of the window that contains it
    pub fn align(&self, ns: i64) -> i64 {
        let width = self.nanoseconds();
        ns.div_euclid(width) * width
    }
}

impl TryFrom<u8> for Pointwidth {
    type Error = Error;
    fn try_from(pw: u8) -> Result<Self> {
        Pointwidth::new(pw)
    }
}

impl fmt::Display for Pointwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{pw}", pw = self.0)
    }
}

/// Sum of calendar-free time units. A non zero `hertz` replaces `seconds` with its period.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct NanoDelta {
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
    pub microseconds: f64,
    pub nanoseconds: f64,
    pub hertz: f64,
}

impl NanoDelta {
    pub fn days(days: f64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn hours(hours: f64) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    pub fn minutes(minutes: f64) -> Self {
        Self {
            minutes,
            ..Self::default()
        }
    }

    pub fn seconds(seconds: f64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    pub fn hertz(hertz: f64) -> Self {
        Self {
            hertz,
            ..Self::default()
        }
    }

    pub fn with_milliseconds(mut self, milliseconds: f64) -> Self {
        self.milliseconds = milliseconds;
        self
    }

    pub fn with_microseconds(mut self, microseconds: f64) -> Self {
        self.microseconds = microseconds;
        self
    }

    pub fn with_nanoseconds(mut self, nanoseconds: f64) -> Self {
        self.nanoseconds = nanoseconds;
        self
    }

    /// total length truncated to whole nanoseconds
    pub fn as_nanos(&self) -> i64 {
        let seconds = if self.hertz != 0f64 {
            1f64 / self.hertz
        } else {
            self.seconds
        };

        let total = self.days * NANOS_IN_DAY
            + self.hours * NANOS_IN_HOUR
            + self.minutes * NANOS_IN_MINUTE
            + seconds * NANOS_IN_SECOND
            + self.milliseconds * NANOS_IN_MILLISECOND
            + self.microseconds * NANOS_IN_MICROSECOND
            + self.nanoseconds;

        total as i64
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct NearestPointwidth {
    pub pointwidth: Pointwidth,
    /// distance between the requested delta and the pointwidth window, in nanoseconds
    pub error_nanos: i64,
}

pub fn to_nearest_pointwidth(delta: &NanoDelta) -> Result<NearestPointwidth> {
    let ns = delta.as_nanos();
    if ns <= 0 {
        return Err(Error::NonPositiveDuration(ns));
    }

    let prev_pw = (63 - ns.leading_zeros()) as u8;
    let prev = Pointwidth::new(prev_pw)?;
    let prev_err = ns - prev.nanoseconds();
    if prev_err == 0 || prev_pw == MAX_POINTWIDTH {
        return Ok(NearestPointwidth {
            pointwidth: prev,
            error_nanos: prev_err,
        });
    }

    let next = Pointwidth::new(prev_pw + 1)?;
    let next_err = next.nanoseconds() - ns;

    if prev_err <= next_err {
        Ok(NearestPointwidth {
            pointwidth: prev,
            error_nanos: prev_err,
        })
    } else {
        Ok(NearestPointwidth {
            pointwidth: next,
            error_nanos: next_err,
        })
    }
}

/// fractional pointwidth whose window is `seconds` long
pub fn seconds_to_pointwidth(seconds: f64) -> f64 {
    (NANOS_IN_SECOND * seconds).log2()
}
