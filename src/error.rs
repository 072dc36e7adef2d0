//! Stable error vocabulary for the arithmetic core.
//!
//! Every fallible operation in this crate returns `Result<T, MpiError>`.
//! Variants name the failure *kind*, not the call site that produced it,
//! so a caller layering RSA, Diffie-Hellman, or EC scalar logic on top of
//! this crate can match on a single, stable set of outcomes regardless of
//! which primitive failed.

use core::fmt;

/// A failure produced by an arithmetic-core operation.
///
/// Variants carry no payload: they are stable, comparison-friendly
/// identifiers, matching the "stable integer identifiers" framing of the
/// error table this type implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MpiError {
    /// I/O failure in an optional, external file codec. This crate never
    /// produces this variant itself (file-based I/O is out of scope for
    /// the core); it exists so callers that layer file codecs on top of
    /// this crate can report through the same error type.
    FileIo,
    /// An argument violates a documented precondition.
    BadInput,
    /// A character outside the alphabet of the requested radix.
    InvalidCharacter,
    /// An output buffer is too small for the value being written.
    BufferTooSmall,
    /// An operation would produce, or was asked to operate on, a
    /// forbidden sign (e.g. a non-positive modulus).
    NegativeValue,
    /// The divisor of a division or modulo operation is zero.
    DivisionByZero,
    /// The operation has no solution (a non-invertible value, or a
    /// composite candidate under primality testing).
    NotAcceptable,
    /// Allocation failed, or would have exceeded `MAX_LIMBS`.
    Alloc,
}

impl fmt::Display for MpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MpiError::FileIo => "I/O failure in optional file codec",
            MpiError::BadInput => "argument violates a precondition",
            MpiError::InvalidCharacter => "unrecognized digit for the requested radix",
            MpiError::BufferTooSmall => "output buffer insufficient",
            MpiError::NegativeValue => {
                "operation would produce or require a forbidden sign"
            }
            MpiError::DivisionByZero => "divisor is zero",
            MpiError::NotAcceptable => "operation has no solution",
            MpiError::Alloc => "allocation failed or exceeded MAX_LIMBS",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for MpiError {}

/// Convenience alias used throughout the crate.
pub type MpiResult<T> = Result<T, MpiError>;
