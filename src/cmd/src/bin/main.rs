use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cmd::config::Config;
use cmd::config::LogLevel;
use cmd::config::Overrides;
use cmd::config::Side;
use cmd::enrich;
use cmd::error::Error;
use cmd::error::Result;
use cmd::json::JsonConverter;
use enricher::lookup::maxmind::MaxmindLocator;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Adds IP2Location fields to JSON records read line by line.
#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Geolocation database
    #[arg(long)]
    bin_path: Option<PathBuf>,
    /// Field holding the IP address
    #[arg(long)]
    input: Option<String>,
    #[arg(long, value_enum)]
    side: Option<Side>,
    /// Keys and values are schema envelopes
    #[arg(long)]
    schemas_enable: bool,
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
    /// Records to enrich. Reads stdin when omitted
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let overrides = Overrides {
        bin_path: args.bin_path.clone(),
        input: args.input.clone(),
        side: args.side,
        schemas_enable: args.schemas_enable,
        log_level: args.log_level,
    };
    let cfg: common::config::Config = Config::load(args.config.as_deref(), &overrides)?.into();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cfg.log.level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Error::SetGlobalDefaultError)?;

    let version = env!("CARGO_PKG_VERSION");
    info!("ip2location-enrich v{version}");
    info!(
        "database {:?}, input field {:?}, {:?} side",
        cfg.ip2location.bin_path, cfg.ip2location.input, cfg.transform.side
    );

    let xform = enrich::transformer(&cfg, Arc::new(MaxmindLocator));
    let mut converter = JsonConverter::new(cfg.transform.schemas_enable);
    let stdout = io::stdout().lock();
    let res = match &args.file {
        Some(path) => enrich::run(
            xform.as_ref(),
            &mut converter,
            BufReader::new(File::open(path)?),
            stdout,
        ),
        None => enrich::run(xform.as_ref(), &mut converter, io::stdin().lock(), stdout),
    };
    xform.close();

    res.map(|_| ())
}
