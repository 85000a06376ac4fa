use super::{Result, StatsError};
use crate::analytics::client::StreamClient;
use crate::analytics::data_types::*;
use pointwidth::Pointwidth;

pub const GLOBAL_MEAN_POINTWIDTH: u8 = 55;

/// Mean of the whole stream taken from the coarsest statpoints. Handy to estimate the
/// nominal value of a measurement.
///
/// The statpoint means are averaged without weighting by their counts.
pub async fn global_mean<C: StreamClient + ?Sized>(
    client: &C,
    stream: &Stream,
    pointwidth: Pointwidth,
    version: Version,
) -> Result<f64> {
    let (earliest, latest) = match (client.earliest(stream).await?, client.latest(stream).await?) {
        (Some((earliest, _)), Some((latest, _))) => (earliest, latest),
        _ => return Err(StatsError::empty_stream(stream)),
    };

    let statpoints = strip_versions(
        client
            .aligned_windows(stream, earliest.time, latest.time, pointwidth, version)
            .await?,
    );
    log::debug!(
        "{} statpoints at pointwidth {} for {}",
        statpoints.len(),
        pointwidth,
        stream
    );
    if statpoints.is_empty() {
        return Err(StatsError::empty_stream(stream));
    }

    Ok(statpoints.iter().map(|sp| sp.mean).sum::<f64>() / statpoints.len() as f64)
}

/// [`global_mean`] at pointwidth 55 over the latest version
pub async fn default_global_mean<C: StreamClient + ?Sized>(
    client: &C,
    stream: &Stream,
) -> Result<f64> {
    let pointwidth = Pointwidth::new(GLOBAL_MEAN_POINTWIDTH)?;
    global_mean(client, stream, pointwidth, 0).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytics::client::{MemoryClient, StreamRecord};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_global_mean() {
        let stream = Stream::new(Uuid::new_v4(), "pmu", "L1MAG", "volts");
        let client = MemoryClient::new(vec![StreamRecord::new(
            stream.clone(),
            vec![(0, 7000.0), (8, 7200.0), (16, 7100.0), (17, 7300.0)]
                .into_iter()
                .map(RawPoint::from)
                .collect(),
        )]);

        assert_eq!(default_global_mean(&client, &stream).await.unwrap(), 7150.0);

        // windows of 16ns: means 7100 and 7200
        let pw = Pointwidth::new(4).unwrap();
        assert_eq!(global_mean(&client, &stream, pw, 0).await.unwrap(), 7150.0);

        let pw = Pointwidth::new(3).unwrap();
        // 7000, 7200 and 7200
        let mean = global_mean(&client, &stream, pw, 0).await.unwrap();
        assert!((mean - 7133.333333333333).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_latest_point_on_window_boundary() {
        let stream = Stream::new(Uuid::new_v4(), "pmu", "L1MAG", "volts");
        let client = MemoryClient::new(vec![StreamRecord::new(
            stream.clone(),
            vec![(0, 10.0), (4, 20.0), (16, 30.0)]
                .into_iter()
                .map(RawPoint::from)
                .collect(),
        )]);

        // the query ends at the latest point, so the window holding only 16 is not read
        let pw = Pointwidth::new(4).unwrap();
        assert_eq!(global_mean(&client, &stream, pw, 0).await.unwrap(), 15.0);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let stream = Stream::new(Uuid::new_v4(), "pmu", "L1MAG", "volts");
        let client = MemoryClient::with_streams(vec![stream.clone()]);
        assert!(matches!(
            default_global_mean(&client, &stream).await,
            Err(StatsError::EmptyStream(_))
        ));
    }
}
