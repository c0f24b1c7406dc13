//! HTTP service entry point for sharestream.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use sharestream_core::{AppConfig, FolderService, server};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Sharestream starting");

    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(settle_ms) = args.settle_ms {
        config.crawl.settle_window = Duration::from_millis(settle_ms);
    }
    if let Some(max_files) = args.max_files {
        config.crawl.max_files = max_files;
    }

    if config.cookie.is_none() {
        warn!(
            "no SHARESTREAM_COOKIE configured; requests must supply their own \
             cookie (body field or x-session-cookie header)"
        );
    }

    let settle_ms = u64::try_from(config.crawl.settle_window.as_millis()).unwrap_or(u64::MAX);
    info!(
        port = config.port,
        settle_ms,
        max_files = config.crawl.max_files,
        "configuration assembled"
    );

    let service = FolderService::from_config(&config);
    server::serve(config, service).await
}
