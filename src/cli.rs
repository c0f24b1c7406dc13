//! CLI argument definitions using clap derive macros.

use clap::Parser;

/// Crawl cloud shared-folder pages and proxy file byte streams.
///
/// Sharestream opens a shared-folder link in a headless browser, extracts
/// the file list from the page's own network traffic, and serves an HTTP API
/// for listing, resolving, and streaming the discovered files.
///
/// The session cookie is read from the `SHARESTREAM_COOKIE` environment
/// variable (or supplied per request) — it is never passed on the command
/// line.
#[derive(Parser, Debug)]
#[command(name = "sharestream")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Port to listen on (overrides the PORT environment variable)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Crawl settle window in milliseconds (how long the page is given to
    /// finish its asynchronous folder-listing calls)
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Maximum number of files returned per crawl
    #[arg(long)]
    pub max_files: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["sharestream"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.port.is_none());
        assert!(args.settle_ms.is_none());
        assert!(args.max_files.is_none());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["sharestream", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_port_and_crawl_overrides() {
        let args = Args::try_parse_from([
            "sharestream",
            "--port",
            "8080",
            "--settle-ms",
            "2500",
            "--max-files",
            "50",
        ])
        .unwrap();
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.settle_ms, Some(2500));
        assert_eq!(args.max_files, Some(50));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["sharestream", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
