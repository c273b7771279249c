// Commands module - Command Pattern implementation
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

mod command;
mod router;

// Individual command implementations
mod test_alert;
mod watch;

pub use command::Command;
pub use router::CommandRouter;

// Re-export individual commands for testing purposes
pub use test_alert::TestAlertCommand;
pub use watch::WatchCommand;
