// CommandRouter - Routes CLI arguments to appropriate Command
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{Command, TestAlertCommand, WatchCommand};
use crate::monitor::WatchConfig;
use crate::{Args, Result};

/// CommandRouter determines which Command to execute based on CLI arguments
///
/// Routing priority:
/// 1. Alert channel test (--test-alert)
/// 2. Certificate stream watch (default)
pub struct CommandRouter;

impl CommandRouter {
    /// Resolve configuration and route to the matching command
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed
    pub fn route(args: Args) -> Result<Box<dyn Command>> {
        let config = WatchConfig::from_args(&args)?;

        if args.notify.test_alert {
            return Ok(Box::new(TestAlertCommand::new(config)));
        }

        Ok(Box::new(WatchCommand::new(config)))
    }
}
