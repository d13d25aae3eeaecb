//! Object references of the form `oidx_<n>`.
//!
//! Perceptual predicates are applied to objects that the grounding layer
//! names `oidx_0`, `oidx_1`, ….  The integer suffix is the zero-based index
//! the classifier bank uses to look up the object's features.

use thiserror::Error;

/// Prefix shared by every encoded object reference.
pub const OBJECT_REF_PREFIX: &str = "oidx_";

/// Why a symbol could not be decoded as an object reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectRefError {
    #[error("'{0}' is not an object reference of the form oidx_<n>")]
    NotAnObjectRef(String),

    #[error("object index {index} is outside [0, {max_objects})")]
    OutOfRange { index: usize, max_objects: usize },
}

/// Decode `oidx_<n>` into `n`, requiring `n < max_objects`.
///
/// The suffix must be a non-empty run of ASCII digits.
///
/// ```
/// use factkb_perception::object_ref::{decode_object_ref, ObjectRefError};
///
/// assert_eq!(decode_object_ref("oidx_7", 32), Ok(7));
/// assert!(matches!(decode_object_ref("oidx_32", 32), Err(ObjectRefError::OutOfRange { .. })));
/// assert!(matches!(decode_object_ref("block1", 32), Err(ObjectRefError::NotAnObjectRef(_))));
/// ```
pub fn decode_object_ref(symbol: &str, max_objects: usize) -> Result<usize, ObjectRefError> {
    let not_ref = || ObjectRefError::NotAnObjectRef(symbol.to_string());

    let digits = symbol.strip_prefix(OBJECT_REF_PREFIX).ok_or_else(not_ref)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_ref());
    }
    let index: usize = digits.parse().map_err(|_| not_ref())?;
    if index >= max_objects {
        return Err(ObjectRefError::OutOfRange { index, max_objects });
    }
    Ok(index)
}

/// Encode an object index as `oidx_<n>`.
pub fn encode_object_ref(index: usize) -> String {
    format!("{OBJECT_REF_PREFIX}{index}")
}
