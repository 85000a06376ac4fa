use super::{operation::*, Result};

use ::gridstream::*;

pub async fn execute(condition: FetchCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;
    let streams = client.streams(&condition.uuids).await?;

    let df = streams_to_df(
        &client,
        &streams,
        condition.start,
        condition.end,
        &condition.options,
    )
    .await?;
    condition.output_setting.write(&df)?;
    Ok(())
}
