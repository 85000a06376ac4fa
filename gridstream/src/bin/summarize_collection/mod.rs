use super::{operation::*, Result};

use ::gridstream::*;

/// One paragraph per stream followed by the annotations of the collection. Always plain text.
pub async fn execute(condition: SummaryCondition) -> Result<()> {
    let client = load_client(&condition.data_file)?;
    let streams = client
        .streams_in_collection(&condition.collection, &StreamFilter::default())
        .await?;

    let mut paragraphs = Vec::<String>::with_capacity(streams.len() + 1);
    for stream in streams.iter() {
        match stream_summary(&client, stream).await {
            Ok(summary) => paragraphs.push(format!("{}\n", summary)),
            Err(DescribeError::EmptyStream(stream)) => {
                log::warn!("skip empty stream {}", stream)
            }
            Err(e) => return Err(e.into()),
        }
    }
    paragraphs.push(metadata_summary(&client, &condition.collection).await?.to_string());

    condition.output_setting.destination.write(paragraphs)?;
    Ok(())
}
