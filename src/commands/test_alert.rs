// TestAlertCommand - Exercise the configured alert channels
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::monitor::{AlertManager, WatchConfig};
use crate::Result;
use async_trait::async_trait;
use tracing::info;

/// TestAlertCommand validates credentials and sends one test alert per channel
pub struct TestAlertCommand {
    config: WatchConfig,
}

impl TestAlertCommand {
    /// Create a new TestAlertCommand with the given configuration
    pub fn new(config: WatchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for TestAlertCommand {
    async fn execute(&self) -> Result<()> {
        info!("Testing alert channels...");
        let manager = AlertManager::from_config(&self.config.alerts)?;
        let results = manager.test_channels().await;

        println!("\nAlert Channel Tests:");
        println!("{}", "=".repeat(80));

        if results.is_empty() {
            println!("No alert channels configured");
            println!();
            return Ok(());
        }

        let mut failed = 0;
        for (channel_name, result) in &results {
            let status = if result.is_ok() { "✓" } else { "✗" };
            let message = result
                .as_ref()
                .map(|_| "Success".to_string())
                .unwrap_or_else(|e| format!("Failed: {}", e));
            if result.is_err() {
                failed += 1;
            }
            println!("  {} {} - {}", status, channel_name, message);
        }
        println!();

        if failed > 0 {
            anyhow::bail!("{} of {} alert channel test(s) failed", failed, results.len());
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "TestAlertCommand"
    }
}
