use super::streams::RAW_VALUE_COLUMN;
use super::{FrameError, Result};
use crate::analytics::data_types::*;
use crate::analytics::datetime::{convert_timestamps, TimeConversion, TimestampNano};
use arrow::array::ArrayRef;
use arrow::datatypes::DataType;

pub const AGG_LEVEL: &str = "agg";

#[derive(Debug, PartialEq, Clone)]
pub struct PointsFrameOptions {
    pub conversion: TimeConversion,
    /// keeps time as the index instead of a leading `time` column
    pub use_time_as_index: bool,
    /// reference time for relative and normalized conversions, the first point by default
    pub t0: Option<TimestampNano>,
}

impl Default for PointsFrameOptions {
    fn default() -> Self {
        Self {
            conversion: TimeConversion::None,
            use_time_as_index: true,
            t0: None,
        }
    }
}

/// Frame built from the points of a single stream.
#[derive(Debug, PartialEq, Clone)]
pub enum PointsFrame {
    Indexed(TimeSeriesDataFrame),
    Plain(DataFrame),
}

impl PointsFrame {
    pub fn len(&self) -> usize {
        match self {
            Self::Indexed(df) => df.len(),
            Self::Plain(df) => df.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArrowConvertibleDataFrame for PointsFrame {
    fn arrow_columns(&self) -> Vec<(String, DataType, ArrayRef)> {
        match self {
            Self::Indexed(df) => df.arrow_columns(),
            Self::Plain(df) => df.arrow_columns(),
        }
    }

    fn column_names(&self) -> Vec<String> {
        match self {
            Self::Indexed(df) => df.column_names(),
            Self::Plain(df) => df.column_names(),
        }
    }

    fn row_values(&self, row: usize) -> Vec<CellValue> {
        match self {
            Self::Indexed(df) => df.row_values(row),
            Self::Plain(df) => df.row_values(row),
        }
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}

fn build_frame(
    times: Vec<TimestampNano>,
    columns: Vec<(ColumnKey, DataSeries)>,
    options: &PointsFrameOptions,
) -> Result<PointsFrame> {
    let (first, last) = match (times.first(), times.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(FrameError::EmptyPoints),
    };
    let t0 = options.t0.unwrap_or(first);
    let index = convert_timestamps(times, Some((t0, last)), options.conversion)?;

    let df = TimeSeriesDataFrame::new(index, vec![AGG_LEVEL.to_string()], columns)?;
    if options.use_time_as_index {
        Ok(PointsFrame::Indexed(df))
    } else {
        Ok(PointsFrame::Plain(df.into_dataframe()?))
    }
}

/// `time, value` frame of raw points
pub fn raw_points_to_frame(
    points: &[(RawPoint, Version)],
    options: &PointsFrameOptions,
) -> Result<PointsFrame> {
    let times = points.iter().map(|(p, _)| p.time).collect();
    let values = points.iter().map(|(p, _)| Some(p.value)).collect();
    build_frame(
        times,
        vec![(
            ColumnKey::new([RAW_VALUE_COLUMN]),
            DataSeries::new(SeriesValues::Float64(values)),
        )],
        options,
    )
}

/// frame with one column per selected statpoint aggregate
pub fn stat_points_to_frame(
    points: &[(StatPoint, Version)],
    aggregates: &AggregateSelection,
    options: &PointsFrameOptions,
) -> Result<PointsFrame> {
    let times = points.iter().map(|(p, _)| p.time).collect();
    let columns = aggregates
        .aggregates()
        .into_iter()
        .map(|aggregate| {
            let values = match aggregate {
                Aggregate::Count => {
                    SeriesValues::UInt64(points.iter().map(|(p, _)| Some(p.count)).collect())
                }
                _ => SeriesValues::Float64(
                    points
                        .iter()
                        .map(|(p, _)| match p.get(aggregate) {
                            AggregateValue::Float64(v) => Some(v),
                            AggregateValue::UInt64(v) => Some(v as f64),
                        })
                        .collect(),
                ),
            };
            (ColumnKey::new([aggregate.as_ref()]), DataSeries::new(values))
        })
        .collect();
    build_frame(times, columns, options)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytics::datetime::SEC_IN_NANOSEC;

    fn raw(points: &[(i64, f64)]) -> Vec<(RawPoint, Version)> {
        points.iter().map(|p| (RawPoint::from(*p), 1)).collect()
    }

    fn stat(time: i64, values: &[f64]) -> (StatPoint, Version) {
        (
            StatPoint::from_values(TimestampNano::new(time), values).unwrap(),
            1,
        )
    }

    #[test]
    fn test_raw_points() {
        let points = raw(&[
            (SEC_IN_NANOSEC, 1.0),
            (2 * SEC_IN_NANOSEC, 2.0),
            (4 * SEC_IN_NANOSEC, 3.0),
        ]);
        let frame = raw_points_to_frame(
            &points,
            &PointsFrameOptions {
                conversion: TimeConversion::Relative,
                ..Default::default()
            },
        )
        .unwrap();

        match frame {
            PointsFrame::Indexed(df) => {
                assert_eq!(df.index, TimeIndex::Relative(vec![0f64, 1f64, 3f64]));
                assert_eq!(
                    df.column(&["value"]).unwrap().values,
                    SeriesValues::Float64(vec![Some(1.0), Some(2.0), Some(3.0)])
                );
            }
            other => panic!("unexpected frame {:?}", other),
        }

        let frame = raw_points_to_frame(
            &points,
            &PointsFrameOptions {
                conversion: TimeConversion::Normalized,
                use_time_as_index: false,
                t0: None,
            },
        )
        .unwrap();
        assert_eq!(frame.column_names(), vec!["time".to_string(), "value".to_string()]);
        assert_eq!(frame.row_values(1)[0], CellValue::Float64(1f64 / 3f64));
        assert_eq!(frame.row_values(2)[0], CellValue::Float64(1f64));

        assert!(matches!(
            raw_points_to_frame(&[], &PointsFrameOptions::default()),
            Err(FrameError::EmptyPoints)
        ));
    }

    #[test]
    fn test_stat_points() {
        let points = vec![stat(0, &[1.0, 3.0]), stat(16, &[5.0])];
        let frame = stat_points_to_frame(
            &points,
            &AggregateSelection::Only(vec![Aggregate::Max, Aggregate::Count]),
            &PointsFrameOptions::default(),
        )
        .unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame.column_names(),
            vec!["time".to_string(), "max".to_string(), "count".to_string()]
        );
        assert_eq!(
            frame.row_values(0),
            vec![
                CellValue::TimestampNano(TimestampNano::new(0)),
                CellValue::Float64(3.0),
                CellValue::UInt64(2)
            ]
        );

        let frame = stat_points_to_frame(
            &points,
            &AggregateSelection::All,
            &PointsFrameOptions {
                conversion: TimeConversion::Relative,
                t0: Some(TimestampNano::new(-SEC_IN_NANOSEC)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(frame.column_names().len(), 6);
        assert_eq!(frame.row_values(0)[0], CellValue::Float64(1f64));
    }
}
