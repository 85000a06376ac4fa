use super::{operation::*, Result};

use ::gridstream::*;

pub async fn execute(condition: CollectionCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;
    let df = collection_to_frame(
        &client,
        &condition.collection,
        &StreamFilter::default(),
        &condition.options,
    )
    .await?;
    condition.output_setting.write(&df)?;
    Ok(())
}
