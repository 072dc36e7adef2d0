//! Build-time configuration.
//!
//! Limb width, the allocation ceiling, and the sliding-window exponent cap
//! are collected here so the rest of the crate refers to one source of
//! truth instead of scattering `cfg` attributes across modules.
//!
//! The same algorithms in [`crate::mpi`] must produce identical numeric
//! results under either limb width; `tests/mpi_limb_width.rs` exercises
//! both (run once per limb width as part of CI).

/// A single machine-word limb.
///
/// 64-bit by default; built with `--features limb32` to use 32-bit limbs
/// on targets without an efficient native 64x64->128 multiply/divide.
#[cfg(not(feature = "limb32"))]
pub type Limb = u64;
#[cfg(feature = "limb32")]
pub type Limb = u32;

/// The double-width type used for limb x limb -> double-limb multiply
/// and double-limb / limb divide, per the limb primitives in
/// [`crate::mpi::limb`].
#[cfg(not(feature = "limb32"))]
pub type DoubleLimb = u128;
#[cfg(feature = "limb32")]
pub type DoubleLimb = u64;

/// Bit width of a single [`Limb`].
pub const LIMB_BITS: u32 = Limb::BITS;

/// Byte width of a single [`Limb`].
pub const LIMB_BYTES: usize = (LIMB_BITS / 8) as usize;

/// Hard upper bound on the number of limbs an [`crate::mpi::Mpi`] may
/// allocate. Exceeding this during growth fails with
/// [`crate::error::MpiError::Alloc`].
pub const MAX_LIMBS: usize = 10_000;

/// Derived cap on user-facing bit lengths.
pub const MAX_BITS: usize = MAX_LIMBS * LIMB_BITS as usize;

/// Maximum sliding-window width used by [`crate::mpi::expmod::exp_mod`].
/// The spec allows window widths up to, and including, this cap; the
/// window actually chosen for a given exponent is never wider than the
/// bit length of the exponent warrants (see `expmod::window_size`).
pub const EXP_WINDOW_MAX: u32 = 6;
