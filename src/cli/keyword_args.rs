// Keyword list file arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// Keyword list options
///
/// Each file holds one regular expression per line. Blank lines and lines
/// starting with `#` are ignored.
#[derive(Args, Debug, Clone, Default)]
pub struct KeywordArgs {
    /// Keywords matched against the certificate subject [default: monitor.txt]
    #[arg(short = 'm', long = "monitor-file", value_name = "FILE")]
    pub monitor_file: Option<PathBuf>,

    /// Keywords that trigger a push notification [default: alerts.txt]
    #[arg(short = 'a', long = "alert-file", value_name = "FILE")]
    pub alert_file: Option<PathBuf>,

    /// Keywords that highlight the logged record [default: highlight.txt]
    #[arg(short = 'H', long = "highlight-file", value_name = "FILE")]
    pub highlight_file: Option<PathBuf>,
}
