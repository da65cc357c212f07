//! Group-name pattern matching.
//!
//! Policy lists name ACL groups with shell-glob patterns (`*`, `?`,
//! `[a-z]`, `[!x]`). Matching is case-sensitive and anchored to the
//! whole group name. There are no path semantics: `*` also matches `/`.
//!
//! Outside bracket expressions a backslash makes the next character
//! literal (`status\*` matches only `status*`), and runs of `*` behave as
//! a single `*`.
//!
//! A pattern that fails to compile (e.g. an unclosed `[`) never matches
//! anything. It is not an error.

use glob::Pattern;

/// A compiled group-name pattern.
///
/// Keeps the pattern text for diagnostics and equality.
///
/// # Example
///
/// ```
/// use sesame_auth::GroupPattern;
///
/// let pattern = GroupPattern::new("status-*");
/// assert!(pattern.matches("status-syslog"));
/// assert!(!pattern.matches("Status-syslog"));
/// assert!(!pattern.matches("system-status-syslog"));
///
/// let broken = GroupPattern::new("[admin");
/// assert!(!broken.is_valid());
/// assert!(!broken.matches("[admin"));
/// ```
#[derive(Debug, Clone)]
pub struct GroupPattern {
    source: String,
    compiled: Option<Pattern>,
}

impl GroupPattern {
    /// Compiles a pattern. Malformed syntax yields a never-matching pattern.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Pattern::new(&normalize(&source)).ok();
        Self { source, compiled }
    }

    /// Returns the pattern text as written in the policy.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `false` if the pattern could not be compiled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }

    /// Tests the whole group name against the pattern.
    #[must_use]
    pub fn matches(&self, group: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|pattern| pattern.matches(group))
    }
}

impl PartialEq for GroupPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GroupPattern {}

impl From<&str> for GroupPattern {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for GroupPattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl std::fmt::Display for GroupPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Rewrites shell-glob syntax the `glob` crate reads differently.
///
/// `\c` becomes `[c]` for metacharacters and plain `c` otherwise; `**`
/// collapses to `*`. Bracket expressions are copied through unchanged.
fn normalize(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('*' | '?' | '[' | ']')) => {
                    out.push('[');
                    out.push(escaped);
                    out.push(']');
                }
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            },
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push('*');
            }
            '[' => {
                out.push('[');
                if let Some(&negation @ '!') = chars.peek() {
                    out.push(negation);
                    chars.next();
                }
                // A leading `]` is a member, not the terminator.
                if let Some(&first @ ']') = chars.peek() {
                    out.push(first);
                    chars.next();
                }
                for member in chars.by_ref() {
                    out.push(member);
                    if member == ']' {
                        break;
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// One-shot match of `pattern` against `group`.
///
/// Compiles the pattern on every call; prefer [`GroupPattern`] when the
/// same pattern is tested repeatedly.
#[must_use]
pub fn matches(pattern: &str, group: &str) -> bool {
    GroupPattern::new(pattern).matches(group)
}
