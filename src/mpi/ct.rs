//! Constant-time selection primitives.
//!
//! These helpers back the only three operations in the crate whose
//! control flow and memory-access pattern are guaranteed independent of a
//! secret: [`super::Mpi::safe_cond_assign`], [`super::Mpi::safe_cond_swap`],
//! and the conditional subtract inside Montgomery reduction
//! (`super::montgomery`). Every other routine — comparison, division,
//! bit length, string codecs — is explicitly variable-time and must not
//! be used on secret values without caller-side hardening.

use crate::config::Limb;

/// Normalizes `flag` to exactly 0 or 1 without branching on its value.
///
/// For any nonzero N-bit unsigned integer `x`, `x | wrapping_neg(x)` has
/// its top bit set; shifting that bit down yields 1, and 0 stays 0. The
/// same "fold a nonzero test into the sign bit" idiom recurs throughout
/// this crate wherever a secret-independent branch is required.
#[inline(always)]
pub(crate) fn normalize_flag(flag: u8) -> u8 {
    let x = flag as u32;
    ((x | x.wrapping_neg()) >> 31) as u8
}

/// Expands a normalized 0/1 flag into an all-zero or all-one [`Limb`] mask.
#[inline(always)]
pub(crate) fn limb_mask(flag01: u8) -> Limb {
    (0 as Limb).wrapping_sub(flag01 as Limb)
}

/// Expands a normalized 0/1 flag into an all-zero or all-one `i8` mask.
#[inline(always)]
pub(crate) fn i8_mask(flag01: u8) -> i8 {
    -(flag01 as i8)
}

/// Selects `b` when `flag` (already normalized to 0/1) is 1, `a` otherwise,
/// with no data-dependent branch.
#[inline(always)]
pub(crate) fn select_limb(a: Limb, b: Limb, flag01: u8) -> Limb {
    let mask = limb_mask(flag01);
    a ^ ((a ^ b) & mask)
}

/// Conditionally swaps `a` and `b` in place when `flag01` is 1, with no
/// data-dependent branch.
#[inline(always)]
pub(crate) fn cswap_limb(a: &mut Limb, b: &mut Limb, flag01: u8) {
    let mask = limb_mask(flag01);
    let x = (*a ^ *b) & mask;
    *a ^= x;
    *b ^= x;
}

/// Conditionally swaps two `i8` sign fields in place when `flag01` is 1.
#[inline(always)]
pub(crate) fn cswap_i8(a: &mut i8, b: &mut i8, flag01: u8) {
    let mask = i8_mask(flag01);
    let x = (*a ^ *b) & mask;
    *a ^= x;
    *b ^= x;
}

/// Selects `b` when `flag01` is 1, `a` otherwise, with no data-dependent
/// branch.
#[inline(always)]
pub(crate) fn select_i8(a: i8, b: i8, flag01: u8) -> i8 {
    let mask = i8_mask(flag01);
    a ^ ((a ^ b) & mask)
}
