//! Page references and materialized paths.
//!
//! A [`Reference`] names a page inside path strings: a slug derived from the
//! title followed by `-` and a unique suffix, e.g. `meeting-notes-3f2a...`.
//!
//! A [`PagePath`] lists the references of a page's ancestors, root first.
//! Root pages have no path at all (`Option::None`). The rendered form is a
//! leading `/` followed by `,<reference>,/` for each ancestor:
//!
//! ```text
//! []            -> (no path, root page)
//! [a-1]         -> /,a-1,/
//! [a-1, b-2]    -> /,a-1,/,b-2,/
//! ```
//!
//! Every ancestor therefore shows up as the exact substring `/,<reference>,/`,
//! which is what descendant lookups match on. References may not contain
//! either delimiter, so a token can never straddle two segments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separates path segments.
pub const PATH_DELIMITER: char = '/';

/// Wraps a reference inside a path segment.
pub const TOKEN_DELIMITER: char = ',';

/// Separates the slug from the unique suffix in a reference.
const SUFFIX_DELIMITER: char = '-';

/// Errors produced while parsing references and paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("reference must not be empty")]
    EmptyReference,

    #[error("reference {reference:?} contains reserved character {ch:?}")]
    ReservedCharacter { reference: String, ch: char },

    #[error("path must contain at least one segment")]
    EmptyPath,

    #[error("malformed path: {0:?}")]
    Malformed(String),
}

/// A page reference: `<slug>-<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference(String);

impl Reference {
    /// Validates an existing reference string.
    pub fn parse(s: impl Into<String>) -> Result<Self, PathError> {
        let s = s.into();
        if s.is_empty() {
            return Err(PathError::EmptyReference);
        }
        if let Some(ch) = s
            .chars()
            .find(|c| *c == PATH_DELIMITER || *c == TOKEN_DELIMITER)
        {
            return Err(PathError::ReservedCharacter { reference: s, ch });
        }
        Ok(Self(s))
    }

    /// Builds a fresh reference for a new page title with a random suffix.
    pub fn for_title(title: &str) -> Self {
        Self::with_suffix(title, &Uuid::new_v4().simple().to_string())
    }

    /// Builds `<slug(title)>-<suffix>`.
    pub fn with_suffix(title: &str, suffix: &str) -> Self {
        let suffix: String = suffix.chars().filter(|c| !is_reserved(*c)).collect();
        Self(format!("{}{}{}", slugify(title), SUFFIX_DELIMITER, suffix))
    }

    /// The unique part: everything after the last `-`, or the whole
    /// reference when it has no `-`.
    pub fn suffix(&self) -> &str {
        self.0
            .rsplit(SUFFIX_DELIMITER)
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Derives the reference for a renamed page. The suffix is kept so the
    /// page stays uniquely identifiable; only the slug changes.
    pub fn renamed(&self, title: &str) -> Self {
        Self::with_suffix(title, self.suffix())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Reference {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Reference {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Reference> for String {
    fn from(r: Reference) -> Self {
        r.0
    }
}

fn is_reserved(c: char) -> bool {
    c == PATH_DELIMITER || c == TOKEN_DELIMITER
}

/// Dash-joins the words of a title.
///
/// Words are split on single spaces, so runs of spaces produce empty words
/// (`"a  b"` becomes `a--b`), and nothing is percent-encoded. Only the two
/// path delimiters are dropped.
pub fn slugify(title: &str) -> String {
    title
        .split(' ')
        .map(|word| word.chars().filter(|c| !is_reserved(*c)).collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// Ancestor chain of a non-root page, root first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PagePath(Vec<Reference>);

impl PagePath {
    pub fn new(segments: Vec<Reference>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::EmptyPath);
        }
        Ok(Self(segments))
    }

    /// Path of a page created directly under `parent`.
    pub fn child_of(parent_path: Option<&PagePath>, parent_reference: &Reference) -> Self {
        let mut segments = parent_path.map(|p| p.0.clone()).unwrap_or_default();
        segments.push(parent_reference.clone());
        Self(segments)
    }

    pub fn segments(&self) -> &[Reference] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The direct parent's reference.
    pub fn parent(&self) -> &Reference {
        // Non-empty by construction.
        &self.0[self.0.len() - 1]
    }

    /// Whether `reference` is one of this path's ancestors.
    ///
    /// Equivalent to the rendered path containing [`segment_pattern`].
    pub fn contains(&self, reference: &Reference) -> bool {
        self.0.iter().any(|r| r == reference)
    }

    /// Replaces every occurrence of `old` with `new`.
    pub fn replace(&self, old: &Reference, new: &Reference) -> Self {
        Self(
            self.0
                .iter()
                .map(|r| if r == old { new.clone() } else { r.clone() })
                .collect(),
        )
    }
}

/// The substring `/,<reference>,/` that marks `reference` as an ancestor.
pub fn segment_pattern(reference: &Reference) -> String {
    format!("{PATH_DELIMITER}{TOKEN_DELIMITER}{reference}{TOKEN_DELIMITER}{PATH_DELIMITER}")
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PATH_DELIMITER}")?;
        for segment in &self.0 {
            write!(f, "{TOKEN_DELIMITER}{segment}{TOKEN_DELIMITER}{PATH_DELIMITER}")?;
        }
        Ok(())
    }
}

impl FromStr for PagePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix(PATH_DELIMITER)
            .and_then(|rest| rest.strip_suffix(PATH_DELIMITER))
            .ok_or_else(|| PathError::Malformed(s.to_string()))?;

        if inner.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let segments = inner
            .split(PATH_DELIMITER)
            .map(|segment| {
                segment
                    .strip_prefix(TOKEN_DELIMITER)
                    .and_then(|t| t.strip_suffix(TOKEN_DELIMITER))
                    .ok_or_else(|| PathError::Malformed(s.to_string()))
                    .and_then(Reference::parse)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(segments)
    }
}

impl TryFrom<String> for PagePath {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PagePath> for String {
    fn from(p: PagePath) -> Self {
        p.to_string()
    }
}
