use crate::analytics::data_types::*;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("drawing error: {0}")]
    DrawingError(String),

    #[error("no streams to plot")]
    NoStreams,
}

type Result<T> = std::result::Result<T, PlotError>;

pub const CURRENT_UNIT: &str = "amps";
pub const VOLTAGE_UNIT: &str = "volts";

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 300,
        }
    }
}

fn drawing_error<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::DrawingError(e.to_string())
}

struct Line {
    label: String,
    /// runs of consecutive non null cells
    segments: Vec<Vec<(f64, f64)>>,
}

impl Line {
    fn new(label: &str, xs: &[f64], ys: &[Option<f64>]) -> Self {
        let mut segments = vec![];
        let mut current = vec![];
        for (x, y) in xs.iter().zip(ys.iter()) {
            match y {
                Some(y) if y.is_finite() => current.push((*x, *y)),
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        Self {
            label: label.to_string(),
            segments,
        }
    }

    fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.segments.iter().flatten()
    }
}

struct Panel<'a> {
    title: String,
    y_label: &'a str,
    lines: Vec<Line>,
}

fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        0.0..1.0
    } else if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        min..max
    }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    panel: &Panel,
) -> Result<()> {
    let x_range = padded_range(panel.lines.iter().flat_map(|l| l.points().map(|p| p.0)));
    let y_range = padded_range(panel.lines.iter().flat_map(|l| l.points().map(|p| p.1)));

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .x_desc("Seconds")
        .y_desc(panel.y_label)
        .draw()
        .map_err(drawing_error)?;

    for (idx, line) in panel.lines.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        for segment in line.segments.iter() {
            chart
                .draw_series(LineSeries::new(segment.iter().copied(), color))
                .map_err(drawing_error)?;
        }
        chart
            .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), color))
            .map_err(drawing_error)?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if !panel.lines.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(drawing_error)?;
    }
    Ok(())
}

/// Renders the current and voltage streams of `frame` into two side by side SVG panels.
///
/// Each stream is looked up in `frame` and drawn against seconds since the first index
/// entry, labelled by its name. Streams in other units are ignored.
pub fn plot_event_timeseries<P: AsRef<Path>>(
    frame: &TimeSeriesDataFrame,
    streams: &[Stream],
    path: P,
    options: &PlotOptions,
) -> Result<()> {
    let collection = match streams.last() {
        Some(last) => last.collection.clone(),
        None => return Err(PlotError::NoStreams),
    };
    let xs = frame.index.seconds_from_start();

    let mut current = Panel {
        title: format!("{}: Current Streams", collection),
        y_label: "Amps",
        lines: vec![],
    };
    let mut voltage = Panel {
        title: format!("{}: Voltage Streams", collection),
        y_label: "Volts",
        lines: vec![],
    };

    for stream in streams {
        let panel = match stream.unit() {
            CURRENT_UNIT => &mut current,
            VOLTAGE_UNIT => &mut voltage,
            other => {
                log::debug!("{} in {} is not plotted", stream, other);
                continue;
            }
        };
        match frame.find_stream_column(stream) {
            Some((_, series)) => panel
                .lines
                .push(Line::new(stream.name(), &xs, &series.as_f64_values())),
            None => log::warn!("{} is not in the frame", stream),
        }
    }

    let root = SVGBackend::new(path.as_ref(), (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;
    let areas = root.split_evenly((1, 2));
    for (area, panel) in areas.iter().zip([current, voltage].iter()) {
        draw_panel(area, panel)?;
    }
    root.present().map_err(drawing_error)?;
    log::info!("plot written to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytics::datetime::{TimestampNano, SEC_IN_NANOSEC};
    use uuid::Uuid;

    #[test]
    fn test_line_segments() {
        let line = Line::new(
            "L1MAG",
            &[0.0, 1.0, 2.0, 3.0, 4.0],
            &[Some(1.0), Some(2.0), None, Some(4.0), Some(f64::NAN)],
        );
        assert_eq!(
            line.segments,
            vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(3.0, 4.0)]]
        );
        assert_eq!(padded_range([3.0, 3.0].into_iter()), 2.0..4.0);
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn test_plot_event_timeseries() {
        let volts = Stream::new(Uuid::new_v4(), "sunshine/PMU1", "L1MAG", "volts");
        let amps = Stream::new(Uuid::new_v4(), "sunshine/PMU1", "C1MAG", "amps");
        let angle = Stream::new(Uuid::new_v4(), "sunshine/PMU1", "L1ANG", "deg");

        let index = TimeIndex::Nanos(
            (0..4)
                .map(|i| TimestampNano::new(i * SEC_IN_NANOSEC / 120))
                .collect(),
        );
        let frame = TimeSeriesDataFrame::new(
            index,
            vec!["stream".to_string()],
            vec![
                (
                    ColumnKey::new([volts.path()]),
                    SeriesValues::Float64(vec![Some(7000.0), Some(7100.0), None, Some(7050.0)])
                        .into(),
                ),
                (
                    ColumnKey::new([amps.path()]),
                    SeriesValues::Float64(vec![Some(10.0), Some(12.0), Some(11.0), Some(9.0)])
                        .into(),
                ),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.svg");
        plot_event_timeseries(
            &frame,
            &[volts, amps, angle],
            &path,
            &PlotOptions::default(),
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("sunshine/PMU1: Current Streams"));
        assert!(svg.contains("sunshine/PMU1: Voltage Streams"));
        assert!(svg.contains("C1MAG"));

        assert!(matches!(
            plot_event_timeseries(&frame, &[], &path, &PlotOptions::default()),
            Err(PlotError::NoStreams)
        ));
    }
}
