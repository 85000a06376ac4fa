use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("no such config file. {0}")]
    NoSuchConfigFile(String),
}

#[derive(Deserialize, Debug, PartialEq, Default)]
pub struct Config {
    /// JSON fixture loaded into the in-memory client
    pub data_file: Option<PathBuf>,
    pub default_collection: Option<String>,
    pub output_format: Option<String>,
    pub output: Option<String>,
    pub show_progress: Option<bool>,
    pub plot_width: Option<u32>,
    pub plot_height: Option<u32>,
}

impl Config {
    pub fn try_load_default() -> Option<Self> {
        default_config_path()
            .as_ref()
            .and_then(|f| match Self::read(f) {
                Err(_) => None,
                Ok(c) => Some(c),
            })
    }

    pub fn read(config_path: &Path) -> Result<Self> {
        if config_path.exists() && config_path.is_file() {
            let config_file_contents = fs::read_to_string(config_path)?;
            Self::read_str(config_file_contents.as_ref())
        } else {
            Err(ConfigError::NoSuchConfigFile(
                config_path.display().to_string(),
            ))
        }
    }

    pub fn read_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    let dir = home_dir();
    dir.map(|mut d| {
        d.push(".config/gridstream/config.toml");
        d
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_config() {
        let test_contents = r#"

            data_file = "/tmp/gridstream/fixture.json"
            default_collection = "sunshine/PMU1"

            output_format = "tsv"
            output = "/tmp/out.tsv"
            show_progress = false
            plot_width = 1200
            plot_height = 400

            "#;

        let config: Config = Config::read_str(test_contents).unwrap();
        assert_eq!(
            config,
            Config {
                data_file: Some("/tmp/gridstream/fixture.json".into()),
                default_collection: Some("sunshine/PMU1".to_string()),
                output_format: Some("tsv".to_string()),
                output: Some("/tmp/out.tsv".to_string()),
                show_progress: Some(false),
                plot_width: Some(1200),
                plot_height: Some(400),
            }
        );
    }

    #[test]
    fn parse_partial_config() {
        let config = Config::read_str("show_progress = true").unwrap();
        assert_eq!(
            config,
            Config {
                show_progress: Some(true),
                ..Config::default()
            }
        );

        assert!(Config::read_str("plot_width = \"wide\"").is_err());
        assert!(matches!(
            Config::read(Path::new("/no/such/gridstream.toml")),
            Err(ConfigError::NoSuchConfigFile(_))
        ));
    }
}
