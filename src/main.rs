use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pixcache::domain::{CacheKey, ImageSource, LoadedImage};
use pixcache::infrastructure::{
    AppConfig, CliArgs, ConfigStore, DiskImageCache, ImageLoader, ImageLoaderConfig, LoadHandle,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = ConfigStore::locate(args.config.as_deref()).load()?;
    config.merge_with_args(args);
    Ok(config)
}

#[derive(Debug, Serialize)]
struct LoadReport<'a> {
    round: u32,
    url: &'a str,
    ok: bool,
    source: Option<ImageSource>,
    width: Option<u32>,
    height: Option<u32>,
}

impl<'a> LoadReport<'a> {
    fn new(round: u32, url: &'a str, loaded: Option<&LoadedImage>) -> Self {
        Self {
            round,
            url,
            ok: loaded.is_some(),
            source: loaded.map(|l| l.source),
            width: loaded.map(|l| l.image.width()),
            height: loaded.map(|l| l.image.height()),
        }
    }

    fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string(self)?);
        } else {
            match (self.source, self.width, self.height) {
                (Some(source), Some(w), Some(h)) => {
                    println!("{source:<8} {w:>5} x {h:<5} {}", self.url);
                }
                _ => println!("{:<8} {:>13} {}", "failed", "-", self.url),
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = pixcache::VERSION, "Starting {}", pixcache::NAME);

    let disk_cache = match &config.cache_dir {
        Some(dir) => DiskImageCache::new(dir.clone()).await?,
        None => DiskImageCache::default_location().await?,
    };
    let loader = Arc::new(ImageLoader::with_reqwest(
        ImageLoaderConfig::from(&config),
        Arc::new(disk_cache),
    )?);

    if args.clear_cache {
        loader.clear_all().await;
    }

    let mut failures = 0usize;
    for round in 1..=args.repeat.max(1) {
        let handles: Vec<_> = args
            .urls
            .iter()
            .map(|url| loader.spawn_load(CacheKey::new(url.as_str())))
            .collect();
        let results = join_all(handles.into_iter().map(LoadHandle::result)).await;

        for (url, loaded) in args.urls.iter().zip(&results) {
            if loaded.is_none() {
                failures += 1;
            }
            LoadReport::new(round, url, loaded.as_ref()).print(args.json)?;
        }
    }

    info!(stats = %loader.memory_cache_stats(), "Done");

    if failures > 0 {
        bail!("{failures} load(s) produced no image");
    }
    Ok(())
}
