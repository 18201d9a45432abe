use std::path::Path;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::Result;

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Bin {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Ip2Location {
    pub bin: Bin,
    pub input: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Transform {
    pub side: common::config::Side,
    pub schemas_enable: bool,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub ip2location: Ip2Location,
    pub transform: Transform,
    pub log: Log,
}

/// Values set on the command line. They win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bin_path: Option<PathBuf>,
    pub input: Option<String>,
    pub side: Option<Side>,
    pub schemas_enable: bool,
    pub log_level: Option<LogLevel>,
}

impl Config {
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("ip2location.bin.path", "")?
            .set_default("ip2location.input", "")?
            .set_default("transform.side", "value")?
            .set_default("transform.schemas_enable", false)?
            .set_default("log.level", "info")?;
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }

        if let Some(bin_path) = &overrides.bin_path {
            builder =
                builder.set_override("ip2location.bin.path", bin_path.to_string_lossy().to_string())?;
        }
        if let Some(input) = &overrides.input {
            builder = builder.set_override("ip2location.input", input.as_str())?;
        }
        if let Some(side) = overrides.side {
            builder = builder.set_override("transform.side", side.as_str())?;
        }
        if overrides.schemas_enable {
            builder = builder.set_override("transform.schemas_enable", true)?;
        }
        if let Some(level) = overrides.log_level {
            builder = builder.set_override("log.level", level.as_str())?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

impl From<Config> for common::config::Config {
    fn from(cfg: Config) -> Self {
        common::config::Config {
            ip2location: common::config::Ip2Location {
                bin_path: cfg.ip2location.bin.path,
                input: cfg.ip2location.input,
            },
            transform: common::config::Transform {
                side: cfg.transform.side,
                schemas_enable: cfg.transform.schemas_enable,
            },
            log: common::config::Log {
                level: cfg.log.level.into(),
            },
        }
    }
}

/// Command line form of [`common::config::Side`].
#[derive(Copy, Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Key,
    Value,
}

impl Side {
    fn as_str(&self) -> &'static str {
        match self {
            Side::Key => "key",
            Side::Value => "value",
        }
    }
}

#[derive(Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}
