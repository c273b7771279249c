// Keyword Matcher - Compiled regular expression lists
//
// A candidate matches a list when at least one pattern finds a match anywhere in it.
// Patterns are unanchored unless they anchor themselves.

use regex::RegexSet;
use tracing::warn;

/// An immutable, compiled list of keyword patterns
///
/// The compiled set is `Send + Sync` and holds no evaluation state, so one list can
/// be shared by any number of concurrent readers.
#[derive(Debug, Clone)]
pub struct KeywordList {
    patterns: Vec<String>,
    set: RegexSet,
}

impl KeywordList {
    /// A list that never matches
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: RegexSet::empty(),
        }
    }

    /// Compile a list, failing on the first malformed pattern
    ///
    /// Empty patterns are dropped rather than compiled, since the empty regex would
    /// match every candidate.
    pub fn new<I, S>(patterns: I) -> std::result::Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let set = RegexSet::new(&patterns)?;
        Ok(Self { patterns, set })
    }

    /// Compile a list, dropping malformed patterns instead of failing
    pub fn lenient<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let valid: Vec<String> = patterns
            .into_iter()
            .filter_map(|p| {
                let p = p.as_ref();
                if p.is_empty() {
                    return None;
                }
                match regex::Regex::new(p) {
                    Ok(_) => Some(p.to_string()),
                    Err(e) => {
                        warn!("Ignoring malformed keyword pattern {:?}: {}", p, e);
                        None
                    }
                }
            })
            .collect();

        match Self::new(&valid) {
            Ok(list) => list,
            Err(e) => {
                warn!("Keyword set could not be compiled, treating as empty: {}", e);
                Self::empty()
            }
        }
    }

    /// Returns true iff `candidate` matches at least one pattern
    pub fn matches(&self, candidate: &str) -> bool {
        self.set.is_match(candidate)
    }

    /// Source patterns, in load order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for KeywordList {
    fn default() -> Self {
        Self::empty()
    }
}

/// Check a candidate against raw pattern strings
///
/// Malformed or empty patterns never match and never cause a failure.
pub fn matches<I, S>(candidate: &str, patterns: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    KeywordList::lenient(patterns).matches(candidate)
}
