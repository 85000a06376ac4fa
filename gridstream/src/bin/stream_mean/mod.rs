use super::{operation::*, Result};

use ::gridstream::*;

pub async fn execute(condition: MeanCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;
    let stream = find_stream(&client, condition.uuid).await?;
    let mean = global_mean(&client, &stream, condition.pointwidth, condition.version).await?;

    let df = DataFrame::new(
        vec![
            SeriesValues::String(vec![stream.collection.clone()]).into(),
            SeriesValues::String(vec![stream.name().to_string()]).into(),
            SeriesValues::String(vec![stream.uuid.to_string()]).into(),
            SeriesValues::UInt64(vec![Some(condition.pointwidth.as_inner() as u64)]).into(),
            SeriesValues::Float64(vec![Some(mean)]).into(),
        ],
        ["collection", "name", "uuid", "pointwidth", "mean"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    )?;
    condition.output_setting.write(&df)?;
    Ok(())
}
