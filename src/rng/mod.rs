//! Random number generation for the arithmetic core.
//!
//! `is_prime`, `gen_prime`, and the random-fill codec helper never generate
//! their own randomness; they draw it from a caller-supplied [`MpiRng`].
//! This module defines that trait and also ships a ready-to-use
//! implementation, [`Csprng`], built on a ChaCha20 DRBG seeded from the
//! operating system, for callers who do not want to plumb their own RNG
//! through every call site.

use crate::error::MpiError;

/// Design goals of the bundled generator:
/// - Cryptographic security
/// - Deterministic expansion from a secure seed
/// - Forward secrecy through periodic rekeying
/// - No heap allocation
/// - Minimal and explicit API surface
pub(crate) mod chacha20;
mod csprng;

/// A source of cryptographically secure randomness.
///
/// This is the Rust expression of the spec's `(context, out_buffer,
/// length) -> status` callback contract: `self` plays the role of the
/// opaque `context`, and a failing fill propagates whatever [`MpiError`]
/// the implementation produces, unchanged, to the caller of `is_prime`,
/// `gen_prime`, or the random-fill codec helper.
///
/// Implementations must fill the entire buffer on success; a partial
/// fill followed by `Ok(())` is a contract violation.
pub trait MpiRng {
    /// Fills `buf` with random bytes, or fails without touching `buf`.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), MpiError>;
}

/// Adapts any `FnMut(&mut [u8]) -> Result<(), MpiError>` closure into an
/// [`MpiRng`], mirroring the ergonomics of the spec's bare callback
/// signature for callers who do not need a stateful generator type.
impl<F> MpiRng for F
where
    F: FnMut(&mut [u8]) -> Result<(), MpiError>,
{
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), MpiError> {
        self(buf)
    }
}

/// Cryptographically secure pseudorandom number generator.
///
/// This type is the crate's default [`MpiRng`] source, suitable for
/// seeding Miller-Rabin witnesses and prime-candidate generation when the
/// caller has no generator of its own to supply.
pub use csprng::{Csprng, SystemRng};
