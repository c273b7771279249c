// Output and logging arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// Output options
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Path of the record log file [default: certstream.log]
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored console output
    #[arg(long = "no-color", alias = "no-colour")]
    pub no_color: bool,

    /// Log pipeline statistics every N seconds (0 disables) [default: 0]
    #[arg(long = "stats-interval", value_name = "SECS")]
    pub stats_interval: Option<u64>,
}
