use super::{operation::*, Result};

use ::gridstream::*;

pub async fn execute(condition: PlotCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;
    let streams = client.streams(&condition.uuids).await?;
    let (start, end) = condition.window.range(condition.event_time);

    let options = StreamsFrameOptions {
        disable_progress: condition.disable_progress,
        ..StreamsFrameOptions::default()
    };
    let frame = streams_to_df(&client, &streams, start, end, &options).await?;
    plot_event_timeseries(&frame, &streams, &condition.path, &condition.plot_options)?;
    Ok(())
}
