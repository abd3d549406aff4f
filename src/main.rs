use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use carimg::compose::{OutputEncoding, PlaceholderComposer};
use carimg::ToolConfig;

#[derive(Parser)]
#[command(name = "carimg", version, about = "Car listing image tooling")]
struct Cli {
    /// JSON configuration file; omitted fields keep their built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory to write composed or downloaded images into
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Backend base URL for `check`
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose JPEG placeholders for every catalog entry
    Raster,
    /// Compose SVG placeholders for every catalog entry
    Vector,
    /// Download the configured stock photos
    Fetch,
    /// Probe the backend's image and listing endpoints
    Check,
}

fn load_config(cli: &Cli) -> anyhow::Result<ToolConfig> {
    let mut config = match &cli.config {
        Some(path) => ToolConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ToolConfig::default(),
    };
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

fn compose(config: &ToolConfig, encoding: OutputEncoding, out: &mut impl Write) -> anyhow::Result<()> {
    let label = match encoding {
        OutputEncoding::Raster => "test images",
        OutputEncoding::Vector => "SVG images",
    };
    writeln!(out, "Creating {} for the cars...", label)?;
    let composer = PlaceholderComposer::new(config);
    let summary = composer.compose_all(&config.catalog, encoding, out)?;
    info!("{} of {} placeholders written", summary.succeeded(), summary.total());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = load_config(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Raster => compose(&config, OutputEncoding::Raster, &mut out)?,
        Command::Vector => compose(&config, OutputEncoding::Vector, &mut out)?,
        #[cfg(feature = "net")]
        Command::Fetch => {
            writeln!(out, "Downloading car images...")?;
            let fetcher = carimg::fetch::RemoteAssetFetcher::new(&config)?;
            fetcher.fetch_all(&config.sources, &mut out)?;
        }
        #[cfg(feature = "net")]
        Command::Check => {
            let checker = carimg::reachability::ServiceReachabilityChecker::new(&config)?;
            checker.check_images(&config.probe_names, &mut out)?;
            checker.check_listing_api(&mut out)?;
        }
        #[cfg(not(feature = "net"))]
        Command::Fetch | Command::Check => {
            anyhow::bail!("this build of carimg was compiled without the `net` feature")
        }
    }

    out.flush()?;
    Ok(())
}
