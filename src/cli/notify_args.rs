// Push notification arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Push notification options
///
/// Pushover is enabled when both the application token and the user key are set,
/// either here or in the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct NotifyArgs {
    /// Pushover application API token
    #[arg(long = "pushover-token", env = "PUSHOVER_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub pushover_token: Option<String>,

    /// Pushover recipient user or group key
    #[arg(long = "pushover-user", env = "PUSHOVER_USER", value_name = "KEY", hide_env_values = true)]
    pub pushover_user: Option<String>,

    /// Send a test alert to all configured channels and exit
    #[arg(long = "test-alert")]
    pub test_alert: bool,
}
