// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Parser;
use std::path::PathBuf;

// Sub-modules for organized CLI arguments
mod keyword_args;
mod notify_args;
mod output_args;
mod stream_args;

// Re-export sub-structs
pub use keyword_args::KeywordArgs;
pub use notify_args::NotifyArgs;
pub use output_args::OutputArgs;
pub use stream_args::StreamArgs;

/// certwatch - Certificate Transparency keyword watcher
///
/// Path options without an explicit flag fall back to the config file, then to
/// the documented defaults.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(name = "certwatch")]
#[command(about = "Watch Certificate Transparency for domains matching keyword tiers", long_about = None)]
pub struct Args {
    /// Configuration file (TOML format)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    // ============ Keyword Lists ============
    #[command(flatten)]
    pub keywords: KeywordArgs,

    // ============ Certificate Stream ============
    #[command(flatten)]
    pub stream: StreamArgs,

    // ============ Notifications ============
    #[command(flatten)]
    pub notify: NotifyArgs,

    // ============ Output and Logging ============
    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = Args::parse_from(["certwatch"]);
        assert!(args.config.is_none());
        assert!(args.keywords.monitor_file.is_none());
        assert!(args.output.log_file.is_none());
        assert!(!args.notify.test_alert);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from([
            "certwatch", "-f", "out.log", "-m", "m.txt", "-a", "a.txt", "-H", "h.txt",
        ]);
        assert_eq!(args.output.log_file, Some(PathBuf::from("out.log")));
        assert_eq!(args.keywords.monitor_file, Some(PathBuf::from("m.txt")));
        assert_eq!(args.keywords.alert_file, Some(PathBuf::from("a.txt")));
        assert_eq!(args.keywords.highlight_file, Some(PathBuf::from("h.txt")));
    }

    #[test]
    fn test_stream_and_output_flags() {
        let args = Args::parse_from([
            "certwatch",
            "--certstream-url",
            "ws://127.0.0.1:4000/",
            "--reconnect-delay",
            "2",
            "--stats-interval",
            "60",
            "--no-color",
            "--test-alert",
        ]);
        assert_eq!(args.stream.url.as_deref(), Some("ws://127.0.0.1:4000/"));
        assert_eq!(args.stream.reconnect_delay, Some(2));
        assert_eq!(args.output.stats_interval, Some(60));
        assert!(args.output.no_color);
        assert!(args.notify.test_alert);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
