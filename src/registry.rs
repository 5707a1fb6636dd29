//! Custom type registry.
//!
//! This module provides the [`CustomTypes`] registry, which maps an
//! application type to the [`CustomType`] record that converts it to and
//! from its wire type. A document encoder consults the registry for every
//! field whose type it does not know how to encode natively.

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::Validation;
use tracing::debug;

use crate::capability::{TypeMarshaller, TypeUnmarshaller};
use crate::custom_type::CustomType;
use crate::error::{BoxError, ConversionError, FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::value::{DynValue, TypeKey};
use crate::ConversionResult;

/// Type alias for the record storage map.
type TypeMap = Arc<RwLock<HashMap<TypeKey, Arc<CustomType>>>>;

/// A thread-safe registry of custom type conversions.
///
/// Records are keyed by their application type. Registering a type that is
/// already present replaces the earlier record.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Lookups and conversions from many threads proceed concurrently
/// - `register` and `clear` take the write lock and are serialized
/// - Conversions run on a shared [`CustomType`] after the lock is released,
///   so a marshaller may itself consult the registry
///
/// Cloning a registry yields a handle to the same records.
///
/// # Example
///
/// ```rust
/// use typebridge::{CustomTypes, DynValue, TypeKey};
///
/// #[derive(Debug, PartialEq)]
/// struct Identifier(u64);
///
/// let registry = CustomTypes::new();
/// registry.register_typed(
///     |id: Identifier| Ok::<_, std::num::ParseIntError>(id.0.to_string()),
///     |s: String| s.parse().map(Identifier),
/// );
///
/// assert!(registry.is_registered(TypeKey::of::<Identifier>()));
///
/// let wire = registry.marshal(DynValue::new(Identifier(42))).unwrap();
/// assert_eq!(wire.downcast_ref::<String>().map(String::as_str), Some("42"));
///
/// registry.clear();
/// assert!(!registry.is_registered_type::<Identifier>());
/// ```
pub struct CustomTypes {
    types: TypeMap,
}

impl CustomTypes {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            types: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates an empty registry with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            types: Arc::new(RwLock::new(HashMap::with_capacity(capacity))),
        }
    }

    /// Registers a conversion between `app_type` and `wire_type`.
    ///
    /// Any record previously registered for `app_type` is replaced. The
    /// types and capabilities are not validated here; mismatches surface as
    /// errors when the record is used.
    pub fn register<M, U>(
        &self,
        app_type: TypeKey,
        wire_type: TypeKey,
        marshaller: M,
        unmarshaller: U,
    ) where
        M: TypeMarshaller + 'static,
        U: TypeUnmarshaller + 'static,
    {
        self.insert(CustomType::new(app_type, wire_type, marshaller, unmarshaller));
    }

    /// Registers a conversion given as two plain functions or closures.
    ///
    /// Behaves exactly like [`register`](Self::register); the closure
    /// signature is spelled out here so that closure arguments need no
    /// annotations at the call site.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typebridge::{CustomTypes, DynValue, TypeKey};
    ///
    /// let registry = CustomTypes::new();
    /// registry.register_fn(
    ///     TypeKey::of::<bool>(),
    ///     TypeKey::of::<String>(),
    ///     |v| Ok(DynValue::new(v.downcast::<bool>().map_err(|_| "not a bool")?.to_string())),
    ///     |v| Ok(DynValue::new(v.downcast::<String>().map_err(|_| "not a string")? == "true")),
    /// );
    ///
    /// let wire = registry.marshal(DynValue::new(true)).unwrap();
    /// assert_eq!(wire.downcast::<String>().unwrap(), "true");
    /// ```
    pub fn register_fn<M, U>(
        &self,
        app_type: TypeKey,
        wire_type: TypeKey,
        marshaller: M,
        unmarshaller: U,
    ) where
        M: Fn(DynValue) -> Result<DynValue, BoxError> + Send + Sync + 'static,
        U: Fn(DynValue) -> Result<DynValue, BoxError> + Send + Sync + 'static,
    {
        self.register(app_type, wire_type, marshaller, unmarshaller);
    }

    /// Registers a conversion between `A` and `W` from typed closures.
    ///
    /// See [`CustomType::typed`].
    pub fn register_typed<A, W, E, M, U>(&self, marshal: M, unmarshal: U)
    where
        A: Any + Send + Sync,
        W: Any + Send + Sync,
        E: Into<BoxError>,
        M: Fn(A) -> Result<W, E> + Send + Sync + 'static,
        U: Fn(W) -> Result<A, E> + Send + Sync + 'static,
    {
        self.insert(CustomType::typed(marshal, unmarshal));
    }

    fn insert(&self, record: CustomType) {
        let app_type = record.app_type();
        let wire_type = record.wire_type();
        let replaced = self
            .types
            .write()
            .insert(app_type, Arc::new(record))
            .is_some();

        debug!(%app_type, %wire_type, replaced, "registered custom type");
    }

    /// Returns true if a conversion is registered for `app_type`.
    pub fn is_registered(&self, app_type: TypeKey) -> bool {
        self.types.read().contains_key(&app_type)
    }

    /// Returns true if a conversion is registered for `T`.
    pub fn is_registered_type<T: ?Sized + 'static>(&self) -> bool {
        self.is_registered(TypeKey::of::<T>())
    }

    /// Returns the record registered for `app_type`, if any.
    ///
    /// The record is immutable and may be kept and used after the registry
    /// changes; it is unaffected by later registrations or [`clear`](Self::clear).
    pub fn get(&self, app_type: TypeKey) -> Option<Arc<CustomType>> {
        self.types.read().get(&app_type).cloned()
    }

    /// Removes every registered conversion.
    pub fn clear(&self) {
        let discarded = {
            let mut types = self.types.write();
            let discarded = types.len();
            types.clear();
            discarded
        };

        debug!(discarded, "cleared custom types");
    }

    /// Returns the number of registered conversions.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Returns the application types that currently have a conversion, in
    /// no particular order.
    pub fn registered_types(&self) -> Vec<TypeKey> {
        self.types.read().keys().copied().collect()
    }

    /// Marshals `value` with the conversion registered for its own type.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::NotRegistered`] if the value's type has no
    /// conversion, and otherwise any error of [`CustomType::marshal`].
    pub fn marshal(&self, value: DynValue) -> Result<DynValue, ConversionError> {
        let record = self
            .get(value.type_key())
            .ok_or(ConversionError::NotRegistered(value.type_key()))?;
        record.marshal(value)
    }

    /// Unmarshals `value` into `app_type` with the conversion registered
    /// for `app_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::NotRegistered`] if `app_type` has no
    /// conversion, and otherwise any error of [`CustomType::unmarshal`].
    pub fn unmarshal(
        &self,
        app_type: TypeKey,
        value: DynValue,
    ) -> Result<DynValue, ConversionError> {
        let record = self
            .get(app_type)
            .ok_or(ConversionError::NotRegistered(app_type))?;
        record.unmarshal(value)
    }

    /// Marshals every field of a document.
    ///
    /// Fields whose type has a registered conversion are marshalled; all
    /// others are passed through unchanged for the encoder to handle. Every
    /// failing field is reported, each with its path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typebridge::{CustomTypes, DynValue, FieldPath};
    ///
    /// struct Identifier(u64);
    ///
    /// let registry = CustomTypes::new();
    /// registry.register_typed(
    ///     |id: Identifier| Ok::<_, std::num::ParseIntError>(id.0.to_string()),
    ///     |s: String| s.parse().map(Identifier),
    /// );
    ///
    /// let fields = registry
    ///     .marshal_fields(vec![
    ///         ("id", DynValue::new(Identifier(7))),
    ///         ("title", DynValue::new("hello".to_string())),
    ///     ])
    ///     .into_result()
    ///     .unwrap();
    ///
    /// assert_eq!(fields[0].0, FieldPath::key("id"));
    /// assert_eq!(fields[0].1.downcast_ref::<String>().map(String::as_str), Some("7"));
    /// assert_eq!(fields[1].1.downcast_ref::<String>().map(String::as_str), Some("hello"));
    /// ```
    pub fn marshal_fields<I, P>(&self, fields: I) -> ConversionResult<Vec<(FieldPath, DynValue)>>
    where
        I: IntoIterator<Item = (P, DynValue)>,
        P: Into<FieldPath>,
    {
        collect_fields(fields.into_iter().map(|(path, value)| {
            let path = path.into();
            let converted = match self.get(value.type_key()) {
                Some(record) => record.marshal(value),
                None => Ok(value),
            };
            (path, converted)
        }))
    }

    /// Unmarshals every field of a document.
    ///
    /// Each field names the application type it should be decoded into.
    /// Fields whose target type has no registered conversion are passed
    /// through unchanged. Every failing field is reported, each with its path.
    pub fn unmarshal_fields<I, P>(&self, fields: I) -> ConversionResult<Vec<(FieldPath, DynValue)>>
    where
        I: IntoIterator<Item = (P, TypeKey, DynValue)>,
        P: Into<FieldPath>,
    {
        collect_fields(fields.into_iter().map(|(path, app_type, value)| {
            let path = path.into();
            let converted = match self.get(app_type) {
                Some(record) => record.unmarshal(value),
                None => Ok(value),
            };
            (path, converted)
        }))
    }
}

fn collect_fields<I>(results: I) -> ConversionResult<Vec<(FieldPath, DynValue)>>
where
    I: Iterator<Item = (FieldPath, Result<DynValue, ConversionError>)>,
{
    let mut converted = Vec::new();
    let mut errors = Vec::new();

    for (path, result) in results {
        match result {
            Ok(value) => converted.push((path, value)),
            Err(error) => errors.push(FieldError::new(path, error)),
        }
    }

    match FieldErrors::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(converted),
    }
}

impl Default for CustomTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CustomTypes {
    fn clone(&self) -> Self {
        Self {
            types: Arc::clone(&self.types),
        }
    }
}

impl std::fmt::Debug for CustomTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.types.read().keys()).finish()
    }
}
