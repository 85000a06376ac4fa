pub mod format;

pub use format::*;

use crate::analytics::data_types::ArrowConvertibleDataFrame;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("io error: {0} ")]
    IOError(#[from] std::io::Error),

    #[error("invalid output format: {0} ")]
    InvalidOutputFormat(String),

    #[error("invalid json: {0} ")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("arrow error: {0} ")]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0} ")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("parquet can only be written to a file")]
    ParquetToStdout,
}

pub(crate) type Result<T> = std::result::Result<T, OutputError>;

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Tsv,
    Parquet,
}

impl FromStr for OutputFormat {
    type Err = OutputError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let r = match s {
            "table" => Self::Table,
            "json" => Self::Json,
            "tsv" => Self::Tsv,
            "parquet" => Self::Parquet,
            invalid_format => {
                return Err(OutputError::InvalidOutputFormat(invalid_format.to_string()))
            }
        };
        Ok(r)
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub enum OutputDestination {
    #[default]
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    /// one line per item
    pub fn write<I: IntoIterator<Item = D>, D: std::fmt::Display>(&self, datas: I) -> Result<()> {
        match self {
            Self::Stdout => write_to_stdout(datas),
            Self::File(path) => write_to_file(path.as_ref(), datas),
        }
    }

    fn open(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(BufWriter::new(stdout()))),
            Self::File(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        }
    }
}

impl FromStr for OutputDestination {
    type Err = OutputError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        if value == "stdout" {
            Ok(OutputDestination::Stdout)
        } else {
            Ok(OutputDestination::File(PathBuf::from(value)))
        }
    }
}

fn write_to_stdout<I: IntoIterator<Item = D>, D: std::fmt::Display>(datas: I) -> Result<()> {
    let out = stdout();
    let mut out = BufWriter::new(out.lock());

    for each in datas {
        writeln!(out, "{}", each)?;
    }
    out.flush()?;
    Ok(())
}

fn write_to_file<I: IntoIterator<Item = D>, D: std::fmt::Display>(
    p: &Path,
    datas: I,
) -> Result<()> {
    let dest = File::create(p)?;
    let mut dest = BufWriter::new(dest);

    for each_data in datas {
        writeln!(dest, "{}", each_data)?;
    }

    dest.flush()?;
    Ok(())
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct OutputSetting {
    pub format: OutputFormat,
    pub destination: OutputDestination,
}

impl OutputSetting {
    pub fn new(format: OutputFormat, destination: OutputDestination) -> Self {
        Self {
            format,
            destination,
        }
    }

    pub fn write<D: ArrowConvertibleDataFrame>(&self, df: &D) -> Result<()> {
        let record_batch = df.as_arrow_record_batch()?;
        log::debug!(
            "writing {} rows as {:?} to {:?}",
            record_batch.num_rows(),
            self.format,
            self.destination
        );

        match (&self.format, &self.destination) {
            (OutputFormat::Parquet, OutputDestination::Stdout) => Err(OutputError::ParquetToStdout),
            (OutputFormat::Parquet, OutputDestination::File(path)) => {
                ParquetDfOutput(File::create(path)?).output(record_batch)
            }
            (OutputFormat::Table, dest) => TableDfOutput(dest.open()?).output(record_batch),
            (OutputFormat::Json, dest) => JsonDfOutput(dest.open()?).output(record_batch),
            (OutputFormat::Tsv, dest) => TsvDfOutput(dest.open()?).output(record_batch),
        }
    }
}
