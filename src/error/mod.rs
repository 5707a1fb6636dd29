//! Error types for failed conversions.
//!
//! [`ConversionError`] describes why a single marshal or unmarshal call
//! failed. [`FieldError`] ties such a failure to the document field it
//! happened in, and [`FieldErrors`] accumulates them across a whole document.

mod conversion_error;
mod field_error;

pub use conversion_error::{BoxError, ConversionError};
pub use field_error::{FieldError, FieldErrors};
