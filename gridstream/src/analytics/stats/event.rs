use super::{Result, StatsError};
use crate::analytics::client::StreamClient;
use crate::analytics::data_types::*;
use crate::analytics::datetime::{TimestampNano, SEC_IN_NANOSEC};

/// Seconds of data to take before and after an event.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct EventWindow {
    pub left_seconds: f64,
    pub right_seconds: f64,
}

impl EventWindow {
    pub fn new(left_seconds: f64, right_seconds: f64) -> Self {
        Self {
            left_seconds,
            right_seconds,
        }
    }

    /// `[event - left, event + right)`
    pub fn range(&self, event_time: TimestampNano) -> (TimestampNano, TimestampNano) {
        let to_nanos = |seconds: f64| (seconds * SEC_IN_NANOSEC as f64) as i64;
        (
            event_time.add_nanos(-to_nanos(self.left_seconds)),
            event_time.add_nanos(to_nanos(self.right_seconds)),
        )
    }
}

impl Default for EventWindow {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct EventData {
    pub timestamps: Vec<TimestampNano>,
    pub values: Vec<f64>,
}

impl EventData {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Raw values of `stream` around `event_time`.
pub async fn event_data<C: StreamClient + ?Sized>(
    client: &C,
    stream: &Stream,
    event_time: TimestampNano,
    window: EventWindow,
    version: Version,
) -> Result<EventData> {
    let (start, end) = window.range(event_time);
    let points = strip_versions(client.values(stream, start, end, version).await?);
    if points.is_empty() {
        return Err(StatsError::EmptyEvent(stream.to_string()));
    }

    let (timestamps, values) = points.into_iter().map(|p| (p.time, p.value)).unzip();
    Ok(EventData { timestamps, values })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytics::client::{MemoryClient, StreamRecord};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_event_data() {
        let stream = Stream::new(Uuid::new_v4(), "pmu", "C1ANG", "deg");
        let half = SEC_IN_NANOSEC / 2;
        let event = 10 * SEC_IN_NANOSEC;
        let client = MemoryClient::new(vec![StreamRecord::new(
            stream.clone(),
            vec![
                (event - half - 1, 0.0),
                (event - half, 1.0),
                (event, 2.0),
                (event + half - 1, 3.0),
                (event + half, 4.0),
            ]
            .into_iter()
            .map(RawPoint::from)
            .collect(),
        )]);

        let data = event_data(
            &client,
            &stream,
            TimestampNano::new(event),
            EventWindow::default(),
            0,
        )
        .await
        .unwrap();
        assert_eq!(data.values, vec![1.0, 2.0, 3.0]);
        assert_eq!(data.timestamps[0], TimestampNano::new(event - half));

        let data = event_data(
            &client,
            &stream,
            TimestampNano::new(event),
            EventWindow::new(0.0, 1.0),
            0,
        )
        .await
        .unwrap();
        assert_eq!(data.values, vec![2.0, 3.0, 4.0]);

        assert!(matches!(
            event_data(&client, &stream, TimestampNano::new(0), EventWindow::default(), 0).await,
            Err(StatsError::EmptyEvent(_))
        ));
    }

    #[test]
    fn test_window_range_saturates() {
        let event = TimestampNano::new(1_500_000_000_000_000_000);
        let (start, end) = EventWindow::new(0.5, 1e10).range(event);
        assert_eq!(start, TimestampNano::new(1_499_999_999_500_000_000));
        assert_eq!(end, TimestampNano::new(i64::MAX));

        let (start, _) = EventWindow::new(f64::MAX, 0.5).range(TimestampNano::new(-1));
        assert_eq!(start, TimestampNano::new(i64::MIN));
    }
}
