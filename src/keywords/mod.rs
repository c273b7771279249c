// Keyword Tiers - Operator-supplied pattern lists
//
// Three independent tiers are loaded once at startup and shared read-only:
// - Monitor: gates an event on its primary subject
// - Highlight: upgrades the severity of the logged record
// - Alert: triggers a push notification per matching domain

pub mod matcher;

pub use matcher::{KeywordList, matches};

use crate::error::{Result, WatchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Keyword tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordTier {
    Monitor,
    Highlight,
    Alert,
}

impl fmt::Display for KeywordTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordTier::Monitor => write!(f, "monitor"),
            KeywordTier::Highlight => write!(f, "highlight"),
            KeywordTier::Alert => write!(f, "alert"),
        }
    }
}

/// Locations of the three keyword files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordPaths {
    pub monitor: PathBuf,
    pub highlight: PathBuf,
    pub alert: PathBuf,
}

impl Default for KeywordPaths {
    fn default() -> Self {
        Self {
            monitor: PathBuf::from("monitor.txt"),
            highlight: PathBuf::from("highlight.txt"),
            alert: PathBuf::from("alerts.txt"),
        }
    }
}

/// The three compiled tiers
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    pub monitor: KeywordList,
    pub highlight: KeywordList,
    pub alert: KeywordList,
}

impl KeywordSet {
    pub fn new(monitor: KeywordList, highlight: KeywordList, alert: KeywordList) -> Self {
        Self {
            monitor,
            highlight,
            alert,
        }
    }

    /// Load all three tiers from disk
    ///
    /// Any unreadable file or malformed pattern is fatal.
    pub fn load(paths: &KeywordPaths) -> Result<Self> {
        let set = Self {
            monitor: load_keyword_file(&paths.monitor)?,
            highlight: load_keyword_file(&paths.highlight)?,
            alert: load_keyword_file(&paths.alert)?,
        };

        info!(
            "Loaded keywords: {} monitor, {} highlight, {} alert",
            set.monitor.len(),
            set.highlight.len(),
            set.alert.len()
        );

        Ok(set)
    }

    /// Get the list for a tier
    pub fn tier(&self, tier: KeywordTier) -> &KeywordList {
        match tier {
            KeywordTier::Monitor => &self.monitor,
            KeywordTier::Highlight => &self.highlight,
            KeywordTier::Alert => &self.alert,
        }
    }
}

/// Read and compile one keyword file
pub fn load_keyword_file<P: AsRef<Path>>(path: P) -> Result<KeywordList> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| WatchError::KeywordFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_keywords(&contents, path)
}

/// Parse keyword file contents
///
/// One pattern per line. Surrounding whitespace is trimmed, blank lines are skipped
/// and lines starting with `#` are comments. Every remaining line must compile.
pub fn parse_keywords(contents: &str, path: &Path) -> Result<KeywordList> {
    let mut patterns = Vec::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        regex::Regex::new(line).map_err(|source| WatchError::InvalidPattern {
            path: path.to_path_buf(),
            line: idx + 1,
            pattern: line.to_string(),
            source,
        })?;

        patterns.push(line.to_string());
    }

    KeywordList::new(&patterns).map_err(|e| WatchError::ConfigError {
        message: format!("Keyword set {} could not be compiled: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_blank_and_comments() {
        let contents = "# brands\n\npaypal\n   \n  # indented comment\n^login\\.\n";
        let list = parse_keywords(contents, Path::new("alerts.txt")).unwrap();

        assert_eq!(list.patterns(), ["paypal", r"^login\."]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let list = parse_keywords("  bank  \r\n", Path::new("monitor.txt")).unwrap();
        assert_eq!(list.patterns(), ["bank"]);
        assert!(list.matches("mybank.test"));
    }

    #[test]
    fn test_parse_rejects_malformed_with_line() {
        let err = parse_keywords("ok\n(broken\n", Path::new("highlight.txt")).unwrap_err();
        match err {
            WatchError::InvalidPattern { line, pattern, .. } => {
                assert_eq!(line, 2);
                assert_eq!(pattern, "(broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_never_matches() {
        let list = parse_keywords("", Path::new("alerts.txt")).unwrap();
        assert!(list.is_empty());
        assert!(!list.matches("example.com"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_keyword_file("/nonexistent/certwatch/monitor.txt").unwrap_err();
        assert!(matches!(err, WatchError::KeywordFile { .. }));
    }

    #[test]
    fn test_load_set_from_files() -> Result<()> {
        let mut monitor = NamedTempFile::new()?;
        writeln!(monitor, ".*")?;
        let mut highlight = NamedTempFile::new()?;
        writeln!(highlight, "paypal")?;
        let alert = NamedTempFile::new()?;

        let set = KeywordSet::load(&KeywordPaths {
            monitor: monitor.path().to_path_buf(),
            highlight: highlight.path().to_path_buf(),
            alert: alert.path().to_path_buf(),
        })?;

        assert!(set.tier(KeywordTier::Monitor).matches("anything.test"));
        assert!(set.tier(KeywordTier::Highlight).matches("paypal.test"));
        assert!(set.tier(KeywordTier::Alert).is_empty());
        Ok(())
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(KeywordTier::Monitor.to_string(), "monitor");
        assert_eq!(KeywordTier::Alert.to_string(), "alert");
    }
}
