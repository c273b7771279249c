// Command trait - Defines the interface for all command implementations
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use async_trait::async_trait;

/// Command trait - one operational mode of certwatch
///
/// Each command validates its own preconditions and returns a Result. Startup
/// failures surface here and terminate the process; once a command is running,
/// per-event failures are handled inside it.
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute the command asynchronously
    async fn execute(&self) -> Result<()>;

    /// Get a human-readable name for this command (for logging/debugging)
    fn name(&self) -> &'static str;
}
