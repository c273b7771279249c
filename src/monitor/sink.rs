// Record Sink - Console and file record log
//
// Every record goes to the console (colored by severity) and to the log file
// (plain). `sync` flushes the buffered writer and fsyncs the file.

use crate::error::{Result, WatchError};
use chrono::{DateTime, Local};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Timestamp layout shared by console and file lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Record severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Monitored certificate, nothing highlighted
    Notice,
    /// Decode, delivery or stream failure
    Error,
    /// Monitored certificate with a highlighted domain
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Notice => "NOTICE",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Append-only record log with on-demand durability
pub trait RecordSink: Send {
    /// Append one record
    fn append(&mut self, severity: Severity, message: &str) -> Result<()>;

    /// Make every appended record durable
    fn sync(&mut self) -> Result<()>;
}

/// One formatted record
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub message: String,
}

impl Record {
    pub fn now(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            severity,
            message: message.into(),
        }
    }

    /// Plain line, as written to the log file
    pub fn plain_line(&self) -> String {
        format!(
            "{} {:<8} {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.severity.label(),
            self.message
        )
    }

    /// Console line with the timestamp and level colored by severity
    pub fn console_line(&self) -> String {
        let head = format!(
            "{} {:<8}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.severity.label()
        );
        let head = match self.severity {
            Severity::Critical => head.magenta().bold(),
            Severity::Error => head.red(),
            Severity::Notice => head.green(),
        };
        format!("{} {}", head, self.message)
    }
}

/// Console + file sink
pub struct LogSink {
    path: PathBuf,
    writer: BufWriter<File>,
    console: bool,
    color: bool,
}

impl LogSink {
    /// Open (or create) the log file in append mode
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o660);
        }

        let file = options.open(path).map_err(|source| WatchError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            console: true,
            color: true,
        })
    }

    /// Enable or disable console echo
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Enable or disable console colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for LogSink {
    fn append(&mut self, severity: Severity, message: &str) -> Result<()> {
        let record = Record::now(severity, message);

        if self.console {
            if self.color {
                eprintln!("{}", record.console_line());
            } else {
                eprintln!("{}", record.plain_line());
            }
        }

        writeln!(self.writer, "{}", record.plain_line())?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Error > Severity::Notice);
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_plain_line_has_no_escape_codes() {
        let record = Record::now(Severity::Critical, "[paypal-login.x.test]");
        let line = record.plain_line();

        assert!(!line.contains('\u{1b}'));
        assert!(line.contains("CRITICAL"));
        assert!(line.ends_with("[paypal-login.x.test]"));
    }

    #[test]
    fn test_console_line_keeps_message() {
        let record = Record::now(Severity::Notice, "[example.com www.example.com]");
        assert!(record.console_line().ends_with("[example.com www.example.com]"));
    }

    #[test]
    fn test_log_sink_appends_and_syncs() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("certstream.log");

        let mut sink = LogSink::open(&path)?.with_console(false);
        sink.append(Severity::Notice, "[example.com www.example.com]")?;
        sink.append(Severity::Error, "Certificate stream error: closed")?;
        sink.sync()?;

        let contents = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("NOTICE"));
        assert!(lines[0].ends_with("[example.com www.example.com]"));
        assert!(lines[1].contains("ERROR"));
        Ok(())
    }

    #[test]
    fn test_log_sink_appends_to_existing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("certstream.log");
        std::fs::write(&path, "previous line\n")?;

        let mut sink = LogSink::open(&path)?.with_console(false);
        sink.append(Severity::Critical, "[a.test]")?;
        sink.sync()?;

        let contents = std::fs::read_to_string(&path)?;
        assert!(contents.starts_with("previous line\n"));
        assert_eq!(contents.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_log_sink_open_failure() {
        let err = LogSink::open("/nonexistent/certwatch/certstream.log").err().unwrap();
        assert!(matches!(err, WatchError::LogFile { .. }));
    }
}
