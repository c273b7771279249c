// Certificate stream connection arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Certificate stream options
#[derive(Args, Debug, Clone, Default)]
pub struct StreamArgs {
    /// Certstream websocket URL [default: wss://certstream.calidog.io/]
    #[arg(long = "certstream-url", value_name = "URL")]
    pub url: Option<String>,

    /// Seconds to wait before reconnecting [default: 5]
    #[arg(long = "reconnect-delay", value_name = "SECS")]
    pub reconnect_delay: Option<u64>,

    /// Seconds without any frame before reconnecting (0 disables) [default: 90]
    #[arg(long = "idle-timeout", value_name = "SECS")]
    pub idle_timeout: Option<u64>,
}
