//! Loosely-ordered version identifiers.
//!
//! Toolchain versions are not semver: release names like `2023a` mix
//! numeric components with single-letter year-half suffixes, and symbolic
//! markers like `system` are valid versions that never take part in
//! ordering. Numeric components compare numerically; the suffixes `a` and
//! `b` are treated as equivalent to `.01` (January) and `.07` (July) for
//! ordering purposes only.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, ToolchainError};

/// One parsed component of a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// A numeric run, compared numerically.
    Number(u64),
    /// A single-letter year-half suffix: `a` is 1, `b` is 7.
    Suffix(u8),
    /// Any other alphabetic run; orders before numeric components.
    Text(String),
}

impl Component {
    fn numeric_value(&self) -> Option<u64> {
        match self {
            Component::Number(n) => Some(*n),
            Component::Suffix(s) => Some(u64::from(*s)),
            Component::Text(_) => None,
        }
    }
}

/// A parsed, comparable version.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<Component>,
}

impl Version {
    /// Parse a version string like `2023a`, `19.1.2` or `21`.
    ///
    /// Components are split on `.`, `-` and `_` separators and on
    /// digit/letter boundaries. Empty input, empty components, and
    /// characters outside `[A-Za-z0-9.\-_]` are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(ToolchainError::Parse {
                input: input.to_string(),
                detail: "empty version string".to_string(),
            });
        }

        let mut components = Vec::new();
        let mut pending = String::new();
        let mut pending_is_digit = false;

        let mut flush = |pending: &mut String, is_digit: bool| -> Result<()> {
            if pending.is_empty() {
                return Err(ToolchainError::Parse {
                    input: input.to_string(),
                    detail: "empty version component".to_string(),
                });
            }
            let component = if is_digit {
                let n = pending.parse::<u64>().map_err(|e| ToolchainError::Parse {
                    input: input.to_string(),
                    detail: format!("numeric component '{pending}': {e}"),
                })?;
                Component::Number(n)
            } else {
                match pending.as_str() {
                    "a" => Component::Suffix(1),
                    "b" => Component::Suffix(7),
                    other => Component::Text(other.to_string()),
                }
            };
            components.push(component);
            pending.clear();
            Ok(())
        };

        for c in input.chars() {
            match c {
                '.' | '-' | '_' => flush(&mut pending, pending_is_digit)?,
                c if c.is_ascii_digit() => {
                    if !pending.is_empty() && !pending_is_digit {
                        flush(&mut pending, false)?;
                    }
                    pending_is_digit = true;
                    pending.push(c);
                }
                c if c.is_ascii_alphabetic() => {
                    if !pending.is_empty() && pending_is_digit {
                        flush(&mut pending, true)?;
                    }
                    pending_is_digit = false;
                    pending.push(c);
                }
                other => {
                    return Err(ToolchainError::Parse {
                        input: input.to_string(),
                        detail: format!("unexpected character '{other}'"),
                    });
                }
            }
        }
        flush(&mut pending, pending_is_digit)?;

        Ok(Self {
            raw: input.to_string(),
            components,
        })
    }

    /// The original string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed components.
    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.components.iter();
        let mut right = other.components.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                // A version is greater than any prefix of itself.
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(a), Some(b)) => {
                    let ord = match (a.numeric_value(), b.numeric_value()) {
                        (Some(x), Some(y)) => x.cmp(&y),
                        (Some(_), None) => Ordering::Greater,
                        (None, Some(_)) => Ordering::Less,
                        (None, None) => match (a, b) {
                            (Component::Text(x), Component::Text(y)) => x.cmp(y),
                            _ => unreachable!("non-text components have numeric values"),
                        },
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
    }
}

/// Rewrite a release name so it is safe to compare numerically.
///
/// The first `a` becomes `.01` (January) and the first `b` becomes `.07`
/// (July): `2023b` turns into `2023.07`. Only single-letter year-half
/// suffixes are supported; other letters pass through untouched.
pub fn normalize_release(version: &str) -> String {
    version.replacen('a', ".01", 1).replacen('b', ".07", 1)
}

/// Whether a version string is symbolic rather than numeric.
///
/// Symbolic versions (e.g. the marker for a system-installed toolchain)
/// do not start with a digit and never take part in ordering.
pub fn is_symbolic(version: &str) -> bool {
    !version.chars().next().is_some_and(|c| c.is_ascii_digit())
}
