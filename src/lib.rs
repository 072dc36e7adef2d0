//! Multi-precision integer arithmetic for `mpi`
//!
//! This crate provides the arithmetic core that RSA, Diffie-Hellman, DSA,
//! and elliptic-curve scalar operations are built from: arbitrary-precision
//! signed integers represented as a sign and a little-endian array of
//! fixed-width unsigned limbs, plus the add/subtract/multiply/divide,
//! Montgomery modular exponentiation, and number-theoretic primitives
//! those protocols require.
//!
//! The focus is on **numerical correctness and predictable failure modes**
//! first, and narrow, explicitly-scoped **constant-time behavior** second —
//! only [`mpi::Mpi::safe_cond_assign`], [`mpi::Mpi::safe_cond_swap`], and
//! the conditional subtract inside Montgomery reduction carry that
//! guarantee. Every other routine (comparison, division, string codecs,
//! `bitlen`) is explicitly variable-time and must not be used on secret
//! values without caller-side hardening.
//!
//! # Module overview
//!
//! - `config`
//!   Build-time configuration: limb width (`Limb`/`DoubleLimb`, selected by
//!   the `limb32` feature), `MAX_LIMBS`/`MAX_BITS`, and the sliding-window
//!   exponentiation cap.
//!
//! - `error`
//!   The crate-wide [`error::MpiError`] vocabulary every fallible operation
//!   returns through, so callers layering RSA/DH/EC logic on top of this
//!   crate match on one stable set of failure kinds.
//!
//! - `mpi`
//!   The [`mpi::Mpi`] value type and its storage manager, the unsigned
//!   kernel (`mpi::unsigned`), the signed layer (`mpi::signed`), the
//!   Montgomery core (`mpi::montgomery`) and modular exponentiation
//!   (`mpi::expmod`), number theory (`mpi::numtheory`: GCD, modular
//!   inverse, Miller-Rabin, prime generation), the codec surface
//!   (`mpi::codec`), and the constant-time selection primitives
//!   (`mpi::ct`, crate-private).
//!
//! - `rng`
//!   The [`rng::MpiRng`] callback trait that `is_prime`, `gen_prime`, and
//!   random-fill draw randomness from, plus a bundled ChaCha20-based
//!   [`rng::Csprng`] for callers that do not want to wire up their own
//!   generator.
//!
//! # Design goals
//!
//! - No side-channel hardening beyond the narrow constant-time scope above
//! - Single-threaded per value: no internal synchronization, callers
//!   serialize access to a shared `Mpi`
//! - Explicit `Result`-returning APIs; a panic is a programmer-error
//!   condition already documented as such (e.g. the operator overloads in
//!   `mpi::ops`), never a representation of a runtime failure
//! - Sensitive storage (exponents, private-key material, Montgomery
//!   residues) zeroized on drop
//!
//! This crate is not a general-purpose bignum library: it has no
//! floating-point support, no RSA/DH/ECC protocol logic, and no
//! file-backed I/O. Those are the job of the layers built on top of it.

mod os;

pub mod config;
pub mod error;
pub mod mpi;
pub mod rng;

pub use error::{MpiError, MpiResult};
pub use mpi::Mpi;
