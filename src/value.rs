//! Runtime type identities and dynamically typed values.
//!
//! This module provides [`TypeKey`], an opaque handle naming a concrete Rust
//! type, and [`DynValue`], a value tagged with the [`TypeKey`] of its payload.
//! Conversions exchange `DynValue`s so that any application or wire type can
//! be registered at runtime and still be checked on every call.

use std::any::{Any, TypeId};
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

/// An opaque, comparable handle naming a concrete type.
///
/// Two keys are equal iff they denote the same type. The type name is kept
/// for diagnostics only and takes no part in equality or hashing.
///
/// # Example
///
/// ```rust
/// use typebridge::TypeKey;
///
/// assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
/// assert_ne!(TypeKey::of::<String>(), TypeKey::of::<&'static str>());
/// assert_eq!(TypeKey::of::<u64>().name(), "u64");
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the underlying [`TypeId`].
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the type name, as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this key names type `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A value paired with the [`TypeKey`] of its payload.
///
/// `DynValue` is the currency of conversions: marshallers receive and return
/// them, and the conversion record compares their keys against the types it
/// was registered with. The key is always derived from the payload, so it
/// cannot drift from the value it describes.
///
/// # Example
///
/// ```rust
/// use typebridge::{DynValue, TypeKey};
///
/// let value = DynValue::new(String::from("42"));
/// assert_eq!(value.type_key(), TypeKey::of::<String>());
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("42"));
///
/// // A failed downcast hands the value back untouched.
/// let value = value.downcast::<u64>().unwrap_err();
/// assert_eq!(value.downcast::<String>().unwrap(), "42");
/// ```
pub struct DynValue {
    type_key: TypeKey,
    payload: Box<dyn Any + Send + Sync>,
}

impl DynValue {
    /// Wraps `value`, tagging it with `TypeKey::of::<T>()`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            payload: Box::new(value),
        }
    }

    /// Returns the key of the wrapped value's type.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Returns the wrapped value's type name.
    pub fn type_name(&self) -> &'static str {
        self.type_key.name()
    }

    /// Returns true if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Borrows the wrapped value as a `T`, or `None` if it is another type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Unwraps the value as a `T`.
    ///
    /// On a type mismatch the original `DynValue` is returned as the error.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_key = self.type_key;
        match self.payload.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(payload) => Err(Self { type_key, payload }),
        }
    }
}

impl Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynValue({})", self.type_key.name)
    }
}
