//! # Typebridge
//!
//! A registry of type-checked conversions between application types and the
//! wire types a JSON document encoder knows how to write.
//!
//! ## Overview
//!
//! An encoder cannot know every type an application puts in its documents.
//! Typebridge lets the application register, once, how a type such as an
//! identifier maps to a wire type such as `String`. The encoder then looks the
//! type up and asks the registry to marshal or unmarshal values of it.
//!
//! Conversions are caller code, so each call checks the value's type both
//! before and after the conversion runs. A conversion that returns the wrong
//! type is reported as a typed error instead of leaking into the document.
//!
//! ## Core Types
//!
//! - [`CustomTypes`]: The registry, keyed by application type
//! - [`CustomType`]: One registered conversion with type-checked `marshal`/`unmarshal`
//! - [`TypeKey`] / [`DynValue`]: Runtime type identities and the values they tag
//! - [`ConversionError`]: Why a conversion failed
//! - [`FieldErrors`]: All failed fields of a document, each with its [`FieldPath`]
//!
//! ## Example
//!
//! ```rust
//! use typebridge::{ConversionError, CustomTypes, DynValue, TypeKey};
//!
//! #[derive(Debug, PartialEq)]
//! struct Identifier(u64);
//!
//! let registry = CustomTypes::new();
//! registry.register_typed(
//!     |id: Identifier| Ok::<_, std::num::ParseIntError>(id.0.to_string()),
//!     |s: String| s.parse().map(Identifier),
//! );
//!
//! let record = registry.get(TypeKey::of::<Identifier>()).unwrap();
//!
//! let wire = record.marshal(DynValue::new(Identifier(42))).unwrap();
//! assert_eq!(wire.downcast_ref::<String>().map(String::as_str), Some("42"));
//!
//! // Values of the wrong type are rejected before the conversion runs
//! let err = record.marshal(DynValue::new("not-an-identifier")).unwrap_err();
//! assert!(matches!(err, ConversionError::IncorrectInputType { .. }));
//! ```

pub mod capability;
pub mod custom_type;
pub mod error;
pub mod path;
pub mod registry;
pub mod value;

pub use capability::{TypeMarshaller, TypeUnmarshaller};
pub use custom_type::CustomType;
pub use error::{BoxError, ConversionError, FieldError, FieldErrors};
pub use path::{FieldPath, Segment};
pub use registry::CustomTypes;
pub use value::{DynValue, TypeKey};

/// Type alias for document-level conversion results using FieldErrors
pub type ConversionResult<T> = stillwater::Validation<T, FieldErrors>;
