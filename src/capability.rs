//! Conversion capabilities.
//!
//! A capability converts one [`DynValue`] into another and may fail. Both
//! directions are single-method traits so that closures, function pointers
//! and hand-written converter types are accepted interchangeably.

use crate::error::BoxError;
use crate::value::DynValue;

/// Converts an application value into its wire representation.
///
/// Implemented for every `Fn(DynValue) -> Result<DynValue, BoxError>`, so a
/// closure or function can be registered directly.
///
/// # Example
///
/// ```rust
/// use typebridge::{BoxError, DynValue, TypeMarshaller};
///
/// struct Decimal;
///
/// impl TypeMarshaller for Decimal {
///     fn marshal(&self, value: DynValue) -> Result<DynValue, BoxError> {
///         let n = value.downcast::<u32>().map_err(|_| "expected u32")?;
///         Ok(DynValue::new(n.to_string()))
///     }
/// }
///
/// let wire = Decimal.marshal(DynValue::new(12_u32)).unwrap();
/// assert_eq!(wire.downcast::<String>().unwrap(), "12");
/// ```
pub trait TypeMarshaller: Send + Sync {
    fn marshal(&self, value: DynValue) -> Result<DynValue, BoxError>;
}

/// Converts a wire value back into its application representation.
///
/// Implemented for every `Fn(DynValue) -> Result<DynValue, BoxError>`.
pub trait TypeUnmarshaller: Send + Sync {
    fn unmarshal(&self, value: DynValue) -> Result<DynValue, BoxError>;
}

impl<F> TypeMarshaller for F
where
    F: Fn(DynValue) -> Result<DynValue, BoxError> + Send + Sync,
{
    fn marshal(&self, value: DynValue) -> Result<DynValue, BoxError> {
        self(value)
    }
}

impl<F> TypeUnmarshaller for F
where
    F: Fn(DynValue) -> Result<DynValue, BoxError> + Send + Sync,
{
    fn unmarshal(&self, value: DynValue) -> Result<DynValue, BoxError> {
        self(value)
    }
}
