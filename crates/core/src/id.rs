//! Fully-qualified result IDs
//!
//! An ID is a dot-separated path from the root node, e.g.
//! `root.singlevar.region.bar`. The first segment is always `root`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Segment separator
pub const SEPARATOR: char = '.';

/// ID of the root container
pub const ROOT: &str = "root";

/// Fully-qualified ID of a result node
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    /// The root container ID
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Parse a fully-qualified ID, checking every segment
    pub fn parse(id: &str) -> Result<Self> {
        let mut segments = id.split(SEPARATOR);
        if segments.next() != Some(ROOT) {
            return Err(Error::validation(format!(
                "Result ID must start with '{}': {}",
                ROOT, id
            )));
        }
        for segment in segments {
            if segment.is_empty() {
                return Err(Error::validation(format!("Empty segment in result ID: {}", id)));
            }
            validate_segment(segment)?;
        }
        Ok(Self(id.to_string()))
    }

    /// Qualify an unqualified segment under this ID
    pub fn child(&self, segment: &str) -> Result<Self> {
        validate_segment(segment)?;
        Ok(Self(format!("{}{}{}", self.0, SEPARATOR, segment)))
    }

    /// ID with the last segment removed; `None` for the root
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once(SEPARATOR)
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Last segment (the unqualified ID)
    pub fn segment(&self) -> &str {
        match self.0.rsplit_once(SEPARATOR) {
            Some((_, last)) => last,
            None => &self.0,
        }
    }

    /// Iterate over the segments, root first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.0.matches(SEPARATOR).count()
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Characters that would escape the results directory in an artifact name
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Check an unqualified segment: non-empty, no dots, no path separators
pub fn validate_segment(segment: &str) -> Result<()> {
    if segment.contains(SEPARATOR) {
        return Err(Error::validation(format!(
            "Result ID cannot contain dots: {}",
            segment
        )));
    }
    if segment.contains(PATH_SEPARATORS) {
        return Err(Error::validation(format!(
            "Result ID cannot contain path separators: {}",
            segment
        )));
    }
    if segment.is_empty() {
        return Err(Error::validation("Result ID cannot be empty"));
    }
    Ok(())
}

impl fmt::Debug for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultId({})", self.0)
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResultId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResultId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ResultId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ResultId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
