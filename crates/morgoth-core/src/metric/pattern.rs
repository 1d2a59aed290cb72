//! Supervisor patterns and the first-match resolver.
//!
//! A pattern is a delimiter-separated sequence of segment rules:
//!
//! | token     | matches                                         |
//! |-----------|-------------------------------------------------|
//! | `errors`  | exactly the segment `errors` (case-sensitive)   |
//! | `*`       | exactly one segment, any content                |
//! | `web-*`   | one segment; `*` matches any run of characters  |
//! | `**`      | zero or more whole segments                     |
//!
//! The delimiter is `/` when the pattern source contains a `/`, otherwise
//! `.`. Ids are split with the pattern's delimiter, so `app.*.errors` never
//! matches `app/web/errors`.
//!
//! Overlapping patterns are disambiguated only by position: `resolve` returns
//! the first pattern, in slice order, that matches.

use std::fmt;
use std::str::FromStr;

use crate::error::{MorgothError, Result};
use crate::metric::MetricId;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`
    Any,
    /// Segment containing `*` alongside other characters.
    Glob(String),
    /// `**`
    AnyDepth,
}

impl Segment {
    fn matches(&self, s: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == s,
            Segment::Any => true,
            Segment::Glob(g) => glob_match(g.as_bytes(), s.as_bytes()),
            // Spans are handled by `match_segments`; never compared directly.
            Segment::AnyDepth => false,
        }
    }
}

/// Compiled matching rule over metric id space.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    delim: char,
    segments: Vec<Segment>,
    has_any_depth: bool,
}

impl Pattern {
    /// Compile `source` into a pattern.
    pub fn parse(source: &str) -> Result<Self> {
        if source.is_empty() {
            return Err(MorgothError::InvalidPattern("pattern must not be empty".into()));
        }
        if source.chars().any(char::is_whitespace) {
            return Err(MorgothError::InvalidPattern(format!(
                "pattern must not contain whitespace: {source:?}"
            )));
        }

        let delim = if source.contains('/') { '/' } else { '.' };
        let mut segments: Vec<Segment> = Vec::new();

        for raw in source.split(delim) {
            if raw.is_empty() {
                return Err(MorgothError::InvalidPattern(format!(
                    "empty segment in pattern: {source}"
                )));
            }
            let seg = if raw == "**" {
                // `a.**.**.b` is the same rule as `a.**.b`
                if segments.last() == Some(&Segment::AnyDepth) {
                    continue;
                }
                Segment::AnyDepth
            } else if raw.contains("**") {
                return Err(MorgothError::InvalidPattern(format!(
                    "`**` must be a whole segment: {source}"
                )));
            } else if raw == "*" {
                Segment::Any
            } else if raw.contains('*') {
                Segment::Glob(raw.to_string())
            } else {
                Segment::Literal(raw.to_string())
            };
            segments.push(seg);
        }

        let has_any_depth = segments.contains(&Segment::AnyDepth);
        tracing::trace!(pattern = %source, segments = segments.len(), "pattern compiled");

        Ok(Self {
            source: source.to_string(),
            delim,
            segments,
            has_any_depth,
        })
    }

    /// Original pattern text. Two patterns are duplicates iff these are equal.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn delimiter(&self) -> char {
        self.delim
    }

    /// Structural match of `id` against this pattern.
    pub fn matches(&self, id: &MetricId) -> bool {
        self.matches_str(id.as_str())
    }

    pub fn matches_str(&self, id: &str) -> bool {
        if !self.has_any_depth {
            // Fixed arity: walk both sides in lockstep without allocating.
            let mut parts = id.split(self.delim);
            for seg in &self.segments {
                match parts.next() {
                    Some(p) if seg.matches(p) => {}
                    _ => return false,
                }
            }
            return parts.next().is_none();
        }

        let parts: Vec<&str> = id.split(self.delim).collect();
        match_segments(&self.segments, &parts)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Pattern {
    type Err = MorgothError;

    fn from_str(s: &str) -> Result<Self> {
        Pattern::parse(s)
    }
}

/// Pattern Matcher: index of the first pattern in `patterns` matching `id`.
///
/// `None` means no supervisor is configured for this series; callers treat it
/// as a normal outcome, not an error.
pub fn resolve(id: &MetricId, patterns: &[Pattern]) -> Option<usize> {
    patterns.iter().position(|p| p.matches(id))
}

/// Segment-level twin of `glob_match`: `**` spans any run of whole segments.
///
/// Only the most recent `**` is retried, which keeps this O(segments * parts)
/// no matter how many `**` the pattern has.
fn match_segments(segs: &[Segment], parts: &[&str]) -> bool {
    let (mut s, mut p) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while p < parts.len() {
        if s < segs.len() && segs[s] == Segment::AnyDepth {
            star = Some(s);
            mark = p;
            s += 1;
        } else if s < segs.len() && segs[s].matches(parts[p]) {
            s += 1;
            p += 1;
        } else if let Some(st) = star {
            s = st + 1;
            mark += 1;
            p = mark;
        } else {
            return false;
        }
    }
    while s < segs.len() && segs[s] == Segment::AnyDepth {
        s += 1;
    }
    s == segs.len()
}

/// In-segment glob where `*` matches any (possibly empty) run of bytes.
fn glob_match(pat: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while t < text.len() {
        if p < pat.len() && pat[p] == b'*' {
            star = Some(p);
            mark = t;
            p += 1;
        } else if p < pat.len() && pat[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some(s) = star {
            p = s + 1;
            mark += 1;
            t = mark;
        } else {
            return false;
        }
    }
    while p < pat.len() && pat[p] == b'*' {
        p += 1;
    }
    p == pat.len()
}
