//! Conversion records with type-checked marshalling.
//!
//! A [`CustomType`] bridges one application type and one wire type. Because
//! its marshaller and unmarshaller are arbitrary caller code, every call
//! checks the value's type both before and after the conversion runs.

use std::any::Any;
use std::fmt::{self, Debug};

use tracing::trace;

use crate::capability::{TypeMarshaller, TypeUnmarshaller};
use crate::error::{BoxError, ConversionError};
use crate::value::{DynValue, TypeKey};

/// An immutable conversion between an application type and a wire type.
///
/// # Example
///
/// ```rust
/// use typebridge::{ConversionError, CustomType, DynValue, TypeKey};
///
/// #[derive(Debug, PartialEq)]
/// struct Identifier(u64);
///
/// let id_type = CustomType::typed(
///     |id: Identifier| Ok::<_, std::num::ParseIntError>(id.0.to_string()),
///     |s: String| s.parse().map(Identifier),
/// );
///
/// let wire = id_type.marshal(DynValue::new(Identifier(42))).unwrap();
/// assert_eq!(wire.downcast_ref::<String>().map(String::as_str), Some("42"));
///
/// let app = id_type.unmarshal(DynValue::new("42".to_string())).unwrap();
/// assert_eq!(app.downcast::<Identifier>().unwrap(), Identifier(42));
///
/// let err = id_type.unmarshal(DynValue::new(42_i32)).unwrap_err();
/// assert!(matches!(err, ConversionError::IncorrectOutputType { .. }));
/// ```
pub struct CustomType {
    app_type: TypeKey,
    wire_type: TypeKey,
    marshaller: Box<dyn TypeMarshaller>,
    unmarshaller: Box<dyn TypeUnmarshaller>,
}

impl CustomType {
    /// Creates a record from two type keys and the conversions between them.
    ///
    /// Nothing is validated here; the types are checked on every call to
    /// [`marshal`](Self::marshal) and [`unmarshal`](Self::unmarshal).
    pub fn new<M, U>(
        app_type: TypeKey,
        wire_type: TypeKey,
        marshaller: M,
        unmarshaller: U,
    ) -> Self
    where
        M: TypeMarshaller + 'static,
        U: TypeUnmarshaller + 'static,
    {
        Self {
            app_type,
            wire_type,
            marshaller: Box::new(marshaller),
            unmarshaller: Box::new(unmarshaller),
        }
    }

    /// Creates a record from statically typed conversions.
    ///
    /// The type keys are taken from `A` and `W`, and the closures receive
    /// their argument already unwrapped. The resulting record behaves like
    /// any other: values are still checked at runtime on every call.
    pub fn typed<A, W, E, M, U>(marshal: M, unmarshal: U) -> Self
    where
        A: Any + Send + Sync,
        W: Any + Send + Sync,
        E: Into<BoxError>,
        M: Fn(A) -> Result<W, E> + Send + Sync + 'static,
        U: Fn(W) -> Result<A, E> + Send + Sync + 'static,
    {
        let marshaller = move |value: DynValue| -> Result<DynValue, BoxError> {
            let value = unwrap_as::<A>(value, |expected, actual| {
                ConversionError::IncorrectInputType { expected, actual }
            })?;
            marshal(value).map(DynValue::new).map_err(Into::into)
        };
        let unmarshaller = move |value: DynValue| -> Result<DynValue, BoxError> {
            let value = unwrap_as::<W>(value, |expected, actual| {
                ConversionError::IncorrectOutputType { expected, actual }
            })?;
            unmarshal(value).map(DynValue::new).map_err(Into::into)
        };
        Self::new(TypeKey::of::<A>(), TypeKey::of::<W>(), marshaller, unmarshaller)
    }

    /// The application type this record converts from.
    pub fn app_type(&self) -> TypeKey {
        self.app_type
    }

    /// The wire type this record converts to.
    pub fn wire_type(&self) -> TypeKey {
        self.wire_type
    }

    /// Converts an application value into its wire representation.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::IncorrectInputType`] if `value` is not of the
    ///   application type.
    /// - [`ConversionError::Capability`] if the marshaller fails.
    /// - [`ConversionError::IncorrectOutputType`] if the marshaller returned
    ///   something other than the wire type.
    pub fn marshal(&self, value: DynValue) -> Result<DynValue, ConversionError> {
        trace!(app_type = %self.app_type, wire_type = %self.wire_type, "marshalling custom type");

        if value.type_key() != self.app_type {
            return Err(ConversionError::IncorrectInputType {
                expected: self.app_type,
                actual: value.type_key(),
            });
        }

        let out = self
            .marshaller
            .marshal(value)
            .map_err(ConversionError::Capability)?;

        if out.type_key() != self.wire_type {
            return Err(ConversionError::IncorrectOutputType {
                expected: self.wire_type,
                actual: out.type_key(),
            });
        }

        Ok(out)
    }

    /// Converts a wire value back into its application representation.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::IncorrectOutputType`] if `value` is not of the
    ///   wire type.
    /// - [`ConversionError::Capability`] if the unmarshaller fails.
    /// - [`ConversionError::IncorrectInputType`] if the unmarshaller returned
    ///   something other than the application type.
    pub fn unmarshal(&self, value: DynValue) -> Result<DynValue, ConversionError> {
        trace!(app_type = %self.app_type, wire_type = %self.wire_type, "unmarshalling custom type");

        if value.type_key() != self.wire_type {
            return Err(ConversionError::IncorrectOutputType {
                expected: self.wire_type,
                actual: value.type_key(),
            });
        }

        let out = self
            .unmarshaller
            .unmarshal(value)
            .map_err(ConversionError::Capability)?;

        if out.type_key() != self.app_type {
            return Err(ConversionError::IncorrectInputType {
                expected: self.app_type,
                actual: out.type_key(),
            });
        }

        Ok(out)
    }
}

impl Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("app_type", &self.app_type)
            .field("wire_type", &self.wire_type)
            .finish_non_exhaustive()
    }
}

fn unwrap_as<T: Any>(
    value: DynValue,
    mismatch: fn(TypeKey, TypeKey) -> ConversionError,
) -> Result<T, BoxError> {
    value
        .downcast::<T>()
        .map_err(|value| mismatch(TypeKey::of::<T>(), value.type_key()).into())
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<CustomType>();
    assert_sync::<CustomType>();
};
