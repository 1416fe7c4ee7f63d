//! # Regex Literals
//!
//! A [`Pattern`] is a compiled regular expression that remembers the
//! literal it came from, so it can be rendered back to the `/pattern/flags`
//! form used by the schema language. Only the `i` (case-insensitive) and
//! `m` (multi-line) flags are recognized.
//!
//! Pattern bodies are compiled with the `regex` crate, which has no
//! look-around or backreferences. Literals that rely on those features are
//! reported as invalid rather than silently approximated.

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Serialize, Serializer};

use crate::error::PatternError;

/// A compiled regular expression carrying its source and flags.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
    multi_line: bool,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` with the given flag string (any combination of `i`
    /// and `m`, each at most once).
    pub fn new(source: &str, flags: &str) -> Result<Self, PatternError> {
        let (case_insensitive, multi_line) = parse_flags(flags)?;
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .multi_line(multi_line)
            .build()
            .map_err(|e| PatternError::Compile {
                source_text: source.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            source: source.to_string(),
            case_insensitive,
            multi_line,
            regex,
        })
    }

    /// Parse a `/pattern/flags` literal.
    ///
    /// The pattern body extends to the last `/`, so slashes inside the body
    /// need no escaping.
    pub fn parse(literal: &str) -> Result<Self, PatternError> {
        let malformed = || PatternError::MalformedLiteral {
            literal: literal.to_string(),
        };
        let body = literal.strip_prefix('/').ok_or_else(malformed)?;
        let (source, flags) = body.rsplit_once('/').ok_or_else(malformed)?;
        if !matches!(flags, "" | "i" | "m" | "im" | "mi") {
            return Err(malformed());
        }
        Self::new(source, flags)
    }

    /// The pattern body, without delimiters or flags.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flag string in canonical order (`i` before `m`).
    pub fn flags(&self) -> &'static str {
        match (self.case_insensitive, self.multi_line) {
            (false, false) => "",
            (true, false) => "i",
            (false, true) => "m",
            (true, true) => "im",
        }
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The underlying compiled regex.
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

fn parse_flags(flags: &str) -> Result<(bool, bool), PatternError> {
    let mut case_insensitive = false;
    let mut multi_line = false;
    for flag in flags.chars() {
        let slot = match flag {
            'i' => &mut case_insensitive,
            'm' => &mut multi_line,
            _ => {
                return Err(PatternError::UnsupportedFlags {
                    flags: flags.to_string(),
                })
            }
        };
        if *slot {
            return Err(PatternError::UnsupportedFlags {
                flags: flags.to_string(),
            });
        }
        *slot = true;
    }
    Ok((case_insensitive, multi_line))
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.case_insensitive == other.case_insensitive
            && self.multi_line == other.multi_line
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({self})")
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
