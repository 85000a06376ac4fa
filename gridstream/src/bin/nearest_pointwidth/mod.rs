use super::{operation::*, Result};

use ::gridstream::*;
use pointwidth::{seconds_to_pointwidth, to_nearest_pointwidth};

pub async fn execute(condition: PointwidthCondition) -> Result<()> {
    let nearest = to_nearest_pointwidth(&condition.delta)?;
    let requested_nanos = condition.delta.as_nanos();
    log::debug!("{:?} is {} nanoseconds", condition.delta, requested_nanos);

    let df = DataFrame::new(
        vec![
            SeriesValues::UInt64(vec![Some(nearest.pointwidth.as_inner() as u64)]).into(),
            SeriesValues::Float64(vec![Some(seconds_to_pointwidth(
                requested_nanos as f64 / SEC_IN_NANOSEC as f64,
            ))])
            .into(),
            SeriesValues::Float64(vec![Some(nearest.pointwidth.seconds())]).into(),
            SeriesValues::Float64(vec![Some(nearest.error_nanos as f64)]).into(),
        ],
        ["pointwidth", "exact_pointwidth", "window_seconds", "error_nanos"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    )?;
    condition.output_setting.write(&df)?;
    Ok(())
}
