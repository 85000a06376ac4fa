use super::operation::*;
use ::gridstream::{config::*, *};

use clap::{Parser, Subcommand};
use pointwidth::{NanoDelta, Pointwidth};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Subcommand, Clone, PartialEq, Debug)]
pub enum Command {
    /// Print the streams of a collection as a table
    Describe { collection: Option<String> },

    /// Select streams by collection, tag columns and annotations
    Streams {
        collections: Vec<String>,

        #[clap(
            long = "tag",
            help = "tag column filter as column=value. repeat the flag to pass several values. columns: distiller,ingress,name,unit,uuid,property_version"
        )]
        tags: Vec<String>,

        #[clap(long = "annotation", help = "annotation filter as key=value")]
        annotations: Vec<String>,

        #[clap(long = "uuids", help = "print only the uuids of the streams")]
        uuids_only: bool,
    },

    /// Fetch streams into one table indexed by time
    Fetch {
        #[clap(long = "uuid", required = true)]
        uuids: Vec<Uuid>,

        #[clap(long, help = "unix seconds, nanoseconds or RFC 3339")]
        start: String,

        #[clap(long, help = "exclusive. unix seconds, nanoseconds or RFC 3339")]
        end: String,

        #[clap(long = "pw", help = "query aligned windows of 2^pw nanoseconds")]
        pointwidth: Option<u8>,

        #[clap(long, help = "query windows of this many nanoseconds")]
        width: Option<u64>,

        #[clap(long, default_value_t = 0)]
        depth: u8,

        #[clap(long = "agg", help = "'all' or comma separated from min,mean,max,count,stddev")]
        aggregates: Option<String>,

        #[clap(long = "datetime", help = "index by UTC datetime instead of nanoseconds")]
        to_datetime: bool,

        #[clap(long, default_value_t = 0)]
        version: u64,
    },

    /// Fetch every stream of a collection over the range of its first stream
    Collection {
        collection: Option<String>,

        #[clap(long = "pw", help = "aligned window means instead of raw values")]
        pointwidth: Option<u8>,

        #[clap(long = "rename", help = "label columns by stream name only")]
        rename_columns: bool,

        #[clap(long = "time", help = "time conversion {none,datetime,relative,normalized}")]
        conversion: Option<String>,
    },

    /// Print duration and size of each stream in a collection and its annotations
    Summary { collection: Option<String> },

    /// Nearest pointwidth of a time delta or a frequency
    Pointwidth {
        #[clap(long, default_value_t = 0f64)]
        days: f64,
        #[clap(long, default_value_t = 0f64)]
        hours: f64,
        #[clap(long, default_value_t = 0f64)]
        minutes: f64,
        #[clap(long, default_value_t = 0f64)]
        seconds: f64,
        #[clap(long, default_value_t = 0f64)]
        milliseconds: f64,
        #[clap(long, default_value_t = 0f64)]
        microseconds: f64,
        #[clap(long, default_value_t = 0f64)]
        nanoseconds: f64,
        #[clap(long, default_value_t = 0f64)]
        hertz: f64,
    },

    /// Global mean of a stream from its coarsest statpoints
    Mean {
        uuid: Uuid,

        #[clap(long = "pw", default_value_t = GLOBAL_MEAN_POINTWIDTH)]
        pointwidth: u8,

        #[clap(long, default_value_t = 0)]
        version: u64,
    },

    /// Raw values of a stream around an event
    Event {
        uuid: Uuid,

        #[clap(long, help = "event time. unix seconds, nanoseconds or RFC 3339")]
        time: String,

        #[clap(long, default_value_t = 0.5)]
        left: f64,

        #[clap(long, default_value_t = 0.5)]
        right: f64,

        #[clap(long, default_value_t = 0)]
        version: u64,
    },

    /// Plot current and voltage streams around an event into an SVG file
    Plot {
        #[clap(long = "uuid", required = true)]
        uuids: Vec<Uuid>,

        #[clap(long, help = "event time. unix seconds, nanoseconds or RFC 3339")]
        time: String,

        #[clap(long, default_value_t = 0.5)]
        left: f64,

        #[clap(long, default_value_t = 0.5)]
        right: f64,

        #[clap(long = "svg", short = 's')]
        path: PathBuf,
    },
}

#[derive(Parser, Debug, Default)]
#[clap(author, version, about)]
pub struct Args {
    #[clap(
        long = "data",
        short = 'd',
        env = "GRIDSTREAM_DATA",
        help = "JSON fixture holding the streams and their points"
    )]
    data_file: Option<PathBuf>,

    #[clap(
        long = "config",
        short,
        env = "GRIDSTREAM_CONFIG",
        help = "config file path. Read ~/.config/gridstream/config.toml by default if it exists."
    )]
    config: Option<PathBuf>,

    #[clap(
        long = "format",
        short = 'f',
        help = "output format {table,json,tsv,parquet}. default: table"
    )]
    output_format: Option<String>,

    #[clap(long = "output", short = 'o', help = "output file path. default: stdout")]
    output: Option<String>,

    #[clap(long = "quiet", short = 'q', help = "do not report progress per stream")]
    quiet: bool,

    #[clap(skip)]
    default_collection: Option<String>,

    #[clap(skip)]
    plot_width: Option<u32>,

    #[clap(skip)]
    plot_height: Option<u32>,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// values given on the command line win over the config file
    fn merge_with_config(&mut self, config: Config) {
        if self.data_file.is_none() {
            self.data_file = config.data_file;
        }

        if self.output_format.is_none() {
            self.output_format = config.output_format;
        }

        if self.output.is_none() {
            self.output = config.output;
        }

        if let Some(show_progress) = config.show_progress {
            self.quiet = self.quiet || !show_progress;
        }

        self.default_collection = config.default_collection;
        self.plot_width = config.plot_width;
        self.plot_height = config.plot_height;
    }

    pub fn init(&mut self, load_default_config: bool) -> Result<()> {
        if let Some(config_path) = &self.config {
            let config = Config::read(config_path.as_path())?;
            self.merge_with_config(config);
        } else if load_default_config {
            if let Some(config) = Config::try_load_default() {
                log::info!("loading default config");
                self.merge_with_config(config);
            }
        }
        Ok(())
    }

    fn output_setting(&self) -> Result<OutputSetting> {
        let format = match &self.output_format {
            Some(format) => OutputFormat::from_str(format)?,
            None => OutputFormat::default(),
        };
        let destination = match &self.output {
            Some(output) => OutputDestination::from_str(output)?,
            None => OutputDestination::default(),
        };
        Ok(OutputSetting::new(format, destination))
    }

    fn data_file(&self) -> Result<PathBuf> {
        self.data_file.clone().ok_or(ArgsError::NoDataFile)
    }

    fn collection(&self, collection: &Option<String>) -> Result<String> {
        collection
            .clone()
            .or_else(|| self.default_collection.clone())
            .ok_or(ArgsError::NoCollection)
    }

    pub fn to_operation(&self) -> Result<Operation> {
        let command = self.command.clone().ok_or(ArgsError::NoCommand)?;
        let operation = match command {
            Command::Describe { collection } => Operation::Describe(DescribeCondition {
                data_file: self.data_file()?,
                collection: self.collection(&collection)?,
                output_setting: self.output_setting()?,
            }),

            Command::Streams {
                collections,
                tags,
                annotations,
                uuids_only,
            } => {
                let collections = if collections.is_empty() {
                    vec![self.collection(&None)?]
                } else {
                    collections
                };
                let mut query = StreamQuery::collections(collections);
                for (column, values) in parse_key_values(&tags)? {
                    let column = TagColumn::from_str(&column)
                        .map_err(|_| ArgsError::InvalidTagColumn(column.clone()))?;
                    query = query.tag(column, values);
                }
                for (key, values) in parse_key_values(&annotations)? {
                    query = query.annotation(key, values);
                }
                Operation::Streams(StreamsCondition {
                    data_file: self.data_file()?,
                    query,
                    uuids_only,
                    output_setting: self.output_setting()?,
                })
            }

            Command::Fetch {
                uuids,
                start,
                end,
                pointwidth,
                width,
                depth,
                aggregates,
                to_datetime,
                version,
            } => {
                let resolution = match (pointwidth, width) {
                    (Some(_), Some(_)) => return Err(ArgsError::PointwidthAndWidth),
                    (Some(pw), None) => Resolution::Aligned(Pointwidth::new(pw)?),
                    (None, Some(width)) => Resolution::Windows { width, depth },
                    (None, None) => Resolution::Raw,
                };
                let aggregates = match aggregates {
                    Some(aggregates) => Some(
                        AggregateSelection::parse(&aggregates)
                            .map_err(|_| ArgsError::InvalidAggregates(aggregates.clone()))?,
                    ),
                    None => None,
                };
                Operation::Fetch(FetchCondition {
                    data_file: self.data_file()?,
                    uuids,
                    start: parse_timestamp(&start)?,
                    end: parse_timestamp(&end)?,
                    options: StreamsFrameOptions {
                        resolution,
                        aggregates,
                        to_datetime,
                        disable_progress: self.quiet,
                        version,
                    },
                    output_setting: self.output_setting()?,
                })
            }

            Command::Collection {
                collection,
                pointwidth,
                rename_columns,
                conversion,
            } => {
                let resolution = match pointwidth {
                    Some(pw) => PointResolution::Pointwidth(Pointwidth::new(pw)?),
                    None => PointResolution::Full,
                };
                let conversion = match conversion {
                    Some(conversion) => TimeConversion::from_str(&conversion)
                        .map_err(|_| ArgsError::InvalidTimeConversion(conversion.clone()))?,
                    None => TimeConversion::None,
                };
                Operation::Collection(CollectionCondition {
                    data_file: self.data_file()?,
                    collection: self.collection(&collection)?,
                    options: CollectionFrameOptions {
                        resolution,
                        rename_columns,
                        conversion,
                        version: 0,
                    },
                    output_setting: self.output_setting()?,
                })
            }

            Command::Summary { collection } => Operation::Summary(SummaryCondition {
                data_file: self.data_file()?,
                collection: self.collection(&collection)?,
                output_setting: self.output_setting()?,
            }),

            Command::Pointwidth {
                days,
                hours,
                minutes,
                seconds,
                milliseconds,
                microseconds,
                nanoseconds,
                hertz,
            } => Operation::Pointwidth(PointwidthCondition {
                delta: NanoDelta {
                    days,
                    hours,
                    minutes,
                    seconds,
                    milliseconds,
                    microseconds,
                    nanoseconds,
                    hertz,
                },
                output_setting: self.output_setting()?,
            }),

            Command::Mean {
                uuid,
                pointwidth,
                version,
            } => Operation::Mean(MeanCondition {
                data_file: self.data_file()?,
                uuid,
                pointwidth: Pointwidth::new(pointwidth)?,
                version,
                output_setting: self.output_setting()?,
            }),

            Command::Event {
                uuid,
                time,
                left,
                right,
                version,
            } => Operation::Event(EventCondition {
                data_file: self.data_file()?,
                uuid,
                event_time: parse_timestamp(&time)?,
                window: EventWindow::new(left, right),
                version,
                output_setting: self.output_setting()?,
            }),

            Command::Plot {
                uuids,
                time,
                left,
                right,
                path,
            } => {
                let mut plot_options = PlotOptions::default();
                if let Some(width) = self.plot_width {
                    plot_options.width = width;
                }
                if let Some(height) = self.plot_height {
                    plot_options.height = height;
                }
                Operation::Plot(PlotCondition {
                    data_file: self.data_file()?,
                    uuids,
                    event_time: parse_timestamp(&time)?,
                    window: EventWindow::new(left, right),
                    path,
                    plot_options,
                    disable_progress: self.quiet,
                })
            }
        };
        Ok(operation)
    }
}

fn parse_timestamp(s: &str) -> Result<TimestampNano> {
    TimestampNano::try_from(s).map_err(|_| ArgsError::InvalidTimestamp(s.to_string()))
}

/// groups `key=value` pairs by key, keeping the order keys first appear in
fn parse_key_values(pairs: &[String]) -> Result<Vec<(String, Vec<String>)>> {
    let mut grouped: Vec<(String, Vec<String>)> = vec![];
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ArgsError::InvalidKeyValue(pair.clone()))?;
        let (key, value) = (key.trim(), value.trim());
        match grouped.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((key.to_string(), vec![value.to_string()])),
        }
    }
    Ok(grouped)
}

pub fn parse_args_or_exits() -> Result<Args> {
    let mut args = Args::parse();
    args.init(true)?;
    Ok(args)
}

#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("no data file. pass --data or set data_file in the config")]
    NoDataFile,

    #[error("no collection. pass one or set default_collection in the config")]
    NoCollection,

    #[error("no command given")]
    NoCommand,

    #[error("pass either --pw or --width, not both")]
    PointwidthAndWidth,

    #[error("invalid timestamp {0}")]
    InvalidTimestamp(String),

    #[error("invalid key=value pair {0}")]
    InvalidKeyValue(String),

    #[error("invalid tag column {0}")]
    InvalidTagColumn(String),

    #[error("invalid aggregates {0}")]
    InvalidAggregates(String),

    #[error("invalid time conversion {0}")]
    InvalidTimeConversion(String),

    #[error("pointwidth error. {0}")]
    PointwidthError(#[from] pointwidth::Error),

    #[error("config error. {0}")]
    ConfigError(#[from] ConfigError),

    #[error("output error. {0}")]
    OutputError(#[from] OutputError),
}

type Result<T> = std::result::Result<T, ArgsError>;

#[cfg(test)]
mod test {
    use super::*;

    fn args(command: Command) -> Args {
        Args {
            data_file: Some(PathBuf::from("/tmp/fixture.json")),
            command: Some(command),
            ..Args::default()
        }
    }

    #[test]
    fn test_streams_operation() {
        let args = args(Command::Streams {
            collections: vec!["agave/IC_B/B5".to_string()],
            tags: vec!["name=VPM".to_string(), "name = IPM".to_string()],
            annotations: vec!["sample_rate=30".to_string()],
            uuids_only: true,
        });

        match args.to_operation().unwrap() {
            Operation::Streams(condition) => {
                assert_eq!(
                    condition.query,
                    StreamQuery::new("agave/IC_B/B5")
                        .tag(TagColumn::Name, ["VPM", "IPM"])
                        .annotation("sample_rate", ["30"])
                );
                assert!(condition.uuids_only);
            }
            _ => panic!("unexpected operation"),
        }
    }

    #[test]
    fn test_fetch_operation() {
        let fetch = |pointwidth: Option<u8>, width: Option<u64>| {
            args(Command::Fetch {
                uuids: vec![Uuid::new_v4()],
                start: "1500000000".to_string(),
                end: "1500000060".to_string(),
                pointwidth,
                width,
                depth: 0,
                aggregates: Some("mean,max".to_string()),
                to_datetime: false,
                version: 0,
            })
        };

        match fetch(Some(30), None).to_operation().unwrap() {
            Operation::Fetch(condition) => {
                assert_eq!(condition.start, TimestampNano::new(1_500_000_000_000_000_000));
                assert_eq!(
                    condition.options.resolution,
                    Resolution::Aligned(Pointwidth::new(30).unwrap())
                );
                assert_eq!(
                    condition.options.aggregates,
                    Some(AggregateSelection::Only(vec![Aggregate::Mean, Aggregate::Max]))
                );
            }
            _ => panic!("unexpected operation"),
        }

        assert!(matches!(
            fetch(Some(30), Some(100)).to_operation(),
            Err(ArgsError::PointwidthAndWidth)
        ));
        assert!(matches!(
            fetch(Some(70), None).to_operation(),
            Err(ArgsError::PointwidthError(_))
        ));

        let mut out_of_range = fetch(None, None);
        if let Some(Command::Fetch { end, .. }) = out_of_range.command.as_mut() {
            *end = "9999999999".to_string();
        }
        assert!(matches!(
            out_of_range.to_operation(),
            Err(ArgsError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_missing_values() {
        let mut no_data = args(Command::Describe { collection: None });
        no_data.data_file = None;
        assert!(matches!(no_data.to_operation(), Err(ArgsError::NoDataFile)));

        let no_collection = args(Command::Summary { collection: None });
        assert!(matches!(
            no_collection.to_operation(),
            Err(ArgsError::NoCollection)
        ));

        let mut with_config = args(Command::Summary { collection: None });
        with_config.merge_with_config(
            Config::read_str("default_collection = \"sunshine\"\nshow_progress = false").unwrap(),
        );
        assert!(with_config.quiet);
        match with_config.to_operation().unwrap() {
            Operation::Summary(condition) => assert_eq!(condition.collection, "sunshine"),
            _ => panic!("unexpected operation"),
        }
    }

    #[test]
    fn test_parse_key_values() {
        assert_eq!(
            parse_key_values(&["a=1".to_string(), "b=2".to_string(), "a=3".to_string()]).unwrap(),
            vec![
                ("a".to_string(), vec!["1".to_string(), "3".to_string()]),
                ("b".to_string(), vec!["2".to_string()])
            ]
        );
        assert!(parse_key_values(&["a".to_string()]).is_err());
    }
}
