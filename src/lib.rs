// certwatch - Certificate Transparency keyword watcher
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! certwatch follows the public Certificate Transparency stream and classifies
//! every newly issued certificate against three operator-supplied keyword tiers:
//! monitor (gate on the certificate subject), highlight (raise record severity)
//! and alert (push notification per matching domain).

pub mod cli;
pub mod commands;
pub mod ct_logs;
pub mod error;
pub mod keywords;
pub mod monitor;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::error::WatchError;
pub use crate::keywords::{KeywordList, KeywordSet, KeywordTier};
pub use crate::monitor::{Dispatcher, WatchConfig};

/// Result type for certwatch commands
pub type Result<T> = anyhow::Result<T>;

/// Error type for certwatch commands
pub use anyhow::Error;
