// WatchCommand - Stream certificates and classify them against keyword tiers
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::ct_logs::CertstreamSource;
use crate::keywords::KeywordSet;
use crate::monitor::{AlertManager, Dispatcher, LogSink, WatchConfig};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// WatchCommand runs the certificate classification pipeline
///
/// This command is responsible for:
/// - Opening the record log and loading the keyword tiers (fatal on failure)
/// - Building the configured alert channels
/// - Connecting to certstream and dispatching events until a shutdown signal
pub struct WatchCommand {
    config: WatchConfig,
}

impl WatchCommand {
    /// Create a new WatchCommand with the given configuration
    pub fn new(config: WatchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for WatchCommand {
    async fn execute(&self) -> Result<()> {
        let config = &self.config;

        let sink = LogSink::open(&config.log_file)?.with_color(config.output.color);
        info!("Writing records to {}", config.log_file.display());

        let keywords = Arc::new(KeywordSet::load(&config.keywords)?);
        if keywords.monitor.is_empty() {
            warn!(
                "Monitor keyword list {} is empty, every certificate will be dropped",
                config.keywords.monitor.display()
            );
        }

        let alerts = AlertManager::from_config(&config.alerts)?;
        if alerts.is_empty() && !keywords.alert.is_empty() {
            warn!("Alert keywords are loaded but no alert channel is configured");
        }
        info!("Configured {} alert channel(s)", alerts.channel_count());

        let source = CertstreamSource::new(&config.stream.url, config.stream.reconnect_delay())
            .with_idle_timeout(config.stream.idle_timeout());
        let (streams, source_handle) = source.spawn();

        let mut dispatcher = Dispatcher::new(keywords, sink, alerts);

        let reporter = (config.output.stats_interval_secs > 0).then(|| {
            dispatcher
                .stats()
                .spawn_reporter(Duration::from_secs(config.output.stats_interval_secs))
        });

        dispatcher.run(streams, shutdown_signal()).await;

        if let Some(handle) = reporter {
            handle.abort();
        }
        source_handle.abort();

        info!("Certificate watch stopped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "WatchCommand"
    }
}

/// Resolves on SIGTERM or SIGINT (Ctrl+C elsewhere)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to install signal handlers: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C");
    }
}
