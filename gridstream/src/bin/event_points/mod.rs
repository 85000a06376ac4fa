use super::{operation::*, Result};

use ::gridstream::*;

pub async fn execute(condition: EventCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;
    let stream = find_stream(&client, condition.uuid).await?;
    let event = event_data(
        &client,
        &stream,
        condition.event_time,
        condition.window,
        condition.version,
    )
    .await?;
    log::info!("{} points around {}", event.len(), condition.event_time);

    let df = DataFrame::new(
        vec![
            SeriesValues::TimestampNano(event.timestamps).into(),
            SeriesValues::Float64(event.values.into_iter().map(Some).collect()).into(),
        ],
        vec![INDEX_COLUMN_NAME.to_string(), stream.name().to_string()],
    )?;
    condition.output_setting.write(&df)?;
    Ok(())
}
