//! Field-level conversion errors.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use super::ConversionError;
use crate::path::FieldPath;

/// A conversion failure attributed to a document field.
///
/// # Example
///
/// ```rust
/// use typebridge::{ConversionError, FieldError, FieldPath, TypeKey};
///
/// let error = FieldError::new(
///     FieldPath::key("attributes").push_key("owner"),
///     ConversionError::NotRegistered(TypeKey::of::<u32>()),
/// );
///
/// assert_eq!(
///     error.to_string(),
///     "attributes.owner: no custom type registered for `u32`"
/// );
/// ```
#[derive(Debug)]
pub struct FieldError {
    /// The field whose value failed to convert.
    pub path: FieldPath,
    /// The underlying failure.
    pub error: ConversionError,
}

impl FieldError {
    pub fn new(path: FieldPath, error: ConversionError) -> Self {
        Self { path, error }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A non-empty collection of [`FieldError`]s.
///
/// Converting a document reports every failing field rather than only the
/// first. `FieldErrors` implements `Semigroup` so partial results can be
/// merged.
#[derive(Debug)]
pub struct FieldErrors(NonEmptyVec<FieldError>);

impl FieldErrors {
    pub fn single(error: FieldError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Builds a collection from `errors`, or `None` if it is empty.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = NonEmptyVec::singleton(errors.next()?);
        Some(Self(errors.fold(head, |acc, e| {
            acc.combine(NonEmptyVec::singleton(e))
        })))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn first(&self) -> &FieldError {
        self.0.head()
    }

    /// Returns the errors reported for `path`.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&FieldError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0.into_vec()
    }
}

impl Semigroup for FieldErrors {
    fn combine(self, other: Self) -> Self {
        FieldErrors(self.0.combine(other.0))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} field(s) failed to convert:", self.len())?;
        for error in self.iter() {
            writeln!(f, "  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}
