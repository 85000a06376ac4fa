use super::{operation::*, Result};

use ::gridstream::*;

pub async fn execute(condition: StreamsCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;

    if condition.uuids_only {
        let uuids = condition.query.fetch_uuids(&client).await?;
        condition.output_setting.destination.write(uuids)?;
        return Ok(());
    }

    match condition.output_setting.format {
        OutputFormat::Json => {
            let metadata = condition.query.fetch_metadata(&client).await?;
            let json_str = serde_json::to_string(&metadata).map_err(OutputError::SerdeJsonError)?;
            condition.output_setting.destination.write(vec![json_str])?
        }
        _ => {
            let streams = condition.query.fetch_streams(&client).await?;
            condition.output_setting.write(&describe_streams(&streams)?)?
        }
    };
    Ok(())
}
