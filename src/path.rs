//! Field locations inside an encoded document.
//!
//! [`FieldPath`] names the field a conversion was performed for, so that a
//! failed conversion can be reported against the field that caused it
//! (e.g. `data.attributes.owner_id` or `included[3].id`).

use std::fmt::{self, Display};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named member, such as `attributes` or `id`.
    Key(String),
    /// A position in an array.
    Index(usize),
}

/// The location of a field within a document.
///
/// Paths are built by appending segments to [`FieldPath::root`]. The
/// `push_*` methods consume the path; [`FieldPath::child`] borrows it, which
/// suits loops that derive many sibling paths from one parent.
///
/// # Example
///
/// ```rust
/// use typebridge::FieldPath;
///
/// let path = FieldPath::root()
///     .push_key("included")
///     .push_index(3)
///     .push_key("id");
///
/// assert_eq!(path.to_string(), "included[3].id");
/// assert_eq!(FieldPath::root().to_string(), "(root)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, denoting the document itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// A single-key path.
    pub fn key(name: impl Into<String>) -> Self {
        Self::root().push_key(name)
    }

    /// Appends a named member.
    pub fn push_key(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(name.into()));
        self
    }

    /// Appends an array position.
    pub fn push_index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Returns a new path with `name` appended, leaving `self` unchanged.
    pub fn child(&self, name: impl Into<String>) -> Self {
        self.clone().push_key(name)
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the final segment, or `None` for the root path.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) if i == 0 => f.write_str(name)?,
                Segment::Key(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        Self::key(name)
    }
}

impl From<String> for FieldPath {
    fn from(name: String) -> Self {
        Self::key(name)
    }
}
