//! Glob patterns for custom ids.
//!
//! Component and modal features match on the developer-chosen custom id of
//! the interaction. Ids are commonly namespaced (`confirm:accept`,
//! `page:3:next`), so features bind an [`IdPattern`] rather than a literal:
//! `*` matches any run of characters (including none) and `?` matches
//! exactly one.
//!
//! An empty pattern matches every id, preserving the original registry
//! semantics where a blank identifier meant "receive all".

use std::fmt;

/// A compiled glob pattern over interaction custom ids.
///
/// Patterns without metacharacters take a literal-equality fast path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPattern {
    pattern: String,
    literal: bool,
}

impl IdPattern {
    /// Compiles a pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let literal = !pattern.contains(['*', '?']);
        Self { pattern, literal }
    }

    /// A pattern that matches every custom id.
    pub fn any() -> Self {
        Self::new("*")
    }

    /// Returns the source pattern string.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the given custom id matches this pattern.
    pub fn matches(&self, id: &str) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        if self.literal {
            return self.pattern == id;
        }
        glob_match(self.pattern.as_bytes(), id.as_bytes())
    }
}

impl From<&str> for IdPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for IdPattern {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}

impl fmt::Display for IdPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Iterative glob match with backtracking on `*`.
///
/// Matching is byte-wise: custom ids are developer-chosen ASCII in practice,
/// and byte-wise `?` over multi-byte UTF-8 would count code units, which is
/// acceptable for this use.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            // Record the star and try matching it against nothing first.
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            // Backtrack: let the last star absorb one more byte.
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    // Only trailing stars may remain.
    pattern[p..].iter().all(|&b| b == b'*')
}
