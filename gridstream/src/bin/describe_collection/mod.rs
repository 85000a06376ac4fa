use super::{operation::*, Result};

use ::gridstream::*;

pub async fn execute(condition: DescribeCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;
    let streams = client
        .streams_in_collection(&condition.collection, &StreamFilter::default())
        .await?;
    if streams.is_empty() {
        log::warn!("no streams in collection {}", condition.collection);
    }

    let df = describe_streams(&streams)?;
    condition.output_setting.write(&df)?;
    Ok(())
}
