//! The error returned by a single conversion.

use crate::value::TypeKey;

/// Boxed error produced by a caller-supplied marshaller or unmarshaller.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a marshal or unmarshal call failed.
///
/// Type mismatches carry both the registered (`expected`) and the observed
/// (`actual`) type. Errors raised by the conversion capability itself are
/// passed through as [`ConversionError::Capability`], whose `Display` and
/// `source` are those of the original error.
///
/// # Example
///
/// ```rust
/// use typebridge::{ConversionError, TypeKey};
///
/// let error = ConversionError::IncorrectInputType {
///     expected: TypeKey::of::<u64>(),
///     actual: TypeKey::of::<String>(),
/// };
///
/// assert!(error.is_type_mismatch());
/// assert_eq!(error.expected(), Some(TypeKey::of::<u64>()));
/// assert_eq!(
///     error.to_string(),
///     "incorrect input type for custom type: expected `u64`, got `alloc::string::String`"
/// );
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The value on the application side did not have the registered
    /// application type.
    #[error("incorrect input type for custom type: expected `{expected}`, got `{actual}`")]
    IncorrectInputType { expected: TypeKey, actual: TypeKey },

    /// The value on the wire side did not have the registered wire type.
    #[error("incorrect output type for custom type: expected `{expected}`, got `{actual}`")]
    IncorrectOutputType { expected: TypeKey, actual: TypeKey },

    /// The marshaller or unmarshaller returned an error.
    #[error(transparent)]
    Capability(BoxError),

    /// No conversion is registered for the type.
    #[error("no custom type registered for `{0}`")]
    NotRegistered(TypeKey),
}

impl ConversionError {
    /// Returns true for `IncorrectInputType` and `IncorrectOutputType`.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Self::IncorrectInputType { .. } | Self::IncorrectOutputType { .. }
        )
    }

    /// The registered type a mismatching value was checked against.
    pub fn expected(&self) -> Option<TypeKey> {
        match self {
            Self::IncorrectInputType { expected, .. }
            | Self::IncorrectOutputType { expected, .. } => Some(*expected),
            _ => None,
        }
    }

    /// The type the mismatching value actually had.
    pub fn actual(&self) -> Option<TypeKey> {
        match self {
            Self::IncorrectInputType { actual, .. } | Self::IncorrectOutputType { actual, .. } => {
                Some(*actual)
            }
            _ => None,
        }
    }

    /// Borrows the capability's error, if this is a capability failure.
    pub fn capability_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Capability(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Recovers the capability's original error.
    pub fn into_capability_error(self) -> Option<BoxError> {
        match self {
            Self::Capability(err) => Some(err),
            _ => None,
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ConversionError>();
    assert_sync::<ConversionError>();
};
