//! Multi-precision integer arithmetic core.
//!
//! This module owns the [`Mpi`] value type and its storage manager: the
//! allocation, growth, shrinkage, copying, and constant-time selection
//! primitives every higher-level operation (unsigned kernel, signed
//! layer, Montgomery core, number theory, codecs) builds on.
//!
//! # Representation
//!
//! An [`Mpi`] is a sign and a little-endian sequence of machine-word
//! limbs: `value = sign * sum(limbs[i] * 2^(i * LIMB_BITS))`. Leading
//! (high-index) limbs may be zero — the representation is not required
//! to be minimal — but whenever the numeric value is zero, `sign` is
//! canonically `+1`. There is no `-0`.
//!
//! # Ownership
//!
//! Each `Mpi` exclusively owns its limb buffer. `Drop` zeroizes the
//! buffer before it is released, so callers do not need to call an
//! explicit `free` to satisfy the crate's zeroization contract; `clear`
//! is provided for callers that want to wipe a value in place without
//! ending its lifetime.

pub(crate) mod ct;
pub mod codec;
pub mod expmod;
pub mod limb;
pub mod montgomery;
pub mod numtheory;
pub mod ops;
pub mod signed;
pub mod unsigned;

use crate::config::{Limb as LimbWord, MAX_LIMBS};
use crate::error::{MpiError, MpiResult};

/// An arbitrary-precision signed integer.
///
/// See the module documentation for the representation and ownership
/// contract. `Mpi` is `Clone` (a deep copy of storage, equivalent to
/// [`Mpi::copy_from`]) but deliberately not `Copy`: unlike a fixed-size
/// stack value, an `Mpi` owns heap storage, so an implicit bitwise copy
/// would silently alias two values' limb buffers.
#[derive(Debug)]
pub struct Mpi {
    /// +1 or -1. Always +1 when the numeric value is zero.
    sign: i8,
    /// Little-endian limbs. `limbs.len()` is `used` from the spec: the
    /// allocated limb count, not the count of significant limbs.
    limbs: Vec<LimbWord>,
}

impl Mpi {
    /// Creates the empty value: no storage, sign `+1`, value zero.
    pub fn new() -> Self {
        Mpi {
            sign: 1,
            limbs: Vec::new(),
        }
    }

    /// The number of allocated limbs (`used`), not the count of
    /// significant limbs.
    pub fn used(&self) -> usize {
        self.limbs.len()
    }

    /// The count of limbs up to and including the highest non-zero limb.
    /// Zero when the value is zero.
    pub fn significant_limbs(&self) -> usize {
        self.limbs.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1)
    }

    /// `true` when the numeric value is zero.
    pub fn is_zero(&self) -> bool {
        self.significant_limbs() == 0
    }

    /// `true` when the sign is negative. Never `true` for a zero value.
    pub fn is_negative(&self) -> bool {
        self.sign < 0
    }

    pub(crate) fn sign(&self) -> i8 {
        self.sign
    }

    pub(crate) fn limbs(&self) -> &[LimbWord] {
        &self.limbs
    }

    pub(crate) fn limbs_mut(&mut self) -> &mut [LimbWord] {
        &mut self.limbs
    }

    /// Re-canonicalizes the sign: if the value is zero, forces `sign =
    /// +1`. Every arithmetic exit point calls this so invariant 4 (no
    /// `-0`) holds everywhere.
    pub(crate) fn canonicalize_sign(&mut self) {
        if self.is_zero() {
            self.sign = 1;
        }
    }

    pub(crate) fn set_sign_raw(&mut self, sign: i8) {
        debug_assert!(sign == 1 || sign == -1);
        self.sign = sign;
        self.canonicalize_sign();
    }

    /// Grows storage to exactly `n` limbs if `used < n`; a no-op
    /// otherwise. New high limbs are zero-filled. Fresh storage is
    /// allocated, existing limbs are copied across, and the old buffer
    /// is zeroized before being released — never shrinks.
    ///
    /// Fails with [`MpiError::Alloc`] when `n > MAX_LIMBS`.
    pub fn grow(&mut self, n: usize) -> MpiResult<()> {
        if self.limbs.len() >= n {
            return Ok(());
        }
        if n > MAX_LIMBS {
            return Err(MpiError::Alloc);
        }

        let mut fresh: Vec<LimbWord> = Vec::new();
        fresh.try_reserve_exact(n).map_err(|_| MpiError::Alloc)?;
        fresh.resize(n, 0);
        fresh[..self.limbs.len()].copy_from_slice(&self.limbs);

        for limb in self.limbs.iter_mut() {
            *limb = 0;
        }
        self.limbs = fresh;
        Ok(())
    }

    /// Resizes storage to exactly `max(n, significant_limbs())`. A no-op
    /// when that is already `used`. When the target exceeds `used`, this
    /// allocates exactly as [`Mpi::grow`] would; otherwise it zeroizes
    /// and releases the truncated high limbs.
    pub fn shrink(&mut self, n: usize) -> MpiResult<()> {
        let keep = n.max(self.significant_limbs());
        if self.limbs.len() == keep {
            return Ok(());
        }
        if keep > self.limbs.len() {
            return self.grow(keep);
        }
        for limb in self.limbs[keep..].iter_mut() {
            *limb = 0;
        }
        self.limbs.truncate(keep);
        self.limbs.shrink_to_fit();
        Ok(())
    }

    /// Copies `src`'s value into `self`. A no-op if `src` and `self`
    /// alias the same storage. Otherwise grows `self` to `src`'s
    /// significant-limb count, copies those limbs, zero-fills any
    /// remaining high limbs `self` already had, and adopts `src`'s sign
    /// (canonicalized).
    pub fn copy_from(&mut self, src: &Mpi) -> MpiResult<()> {
        if std::ptr::eq(self, src) {
            return Ok(());
        }

        let sig = src.significant_limbs();
        self.grow(sig)?;
        self.limbs[..sig].copy_from_slice(&src.limbs[..sig]);
        for limb in self.limbs[sig..].iter_mut() {
            *limb = 0;
        }
        self.sign = if sig == 0 { 1 } else { src.sign };
        Ok(())
    }

    /// Exchanges storage and metadata between `self` and `other`.
    pub fn swap(&mut self, other: &mut Mpi) {
        std::mem::swap(self, other);
    }

    /// Zeroizes and empties `self` in place without ending its lifetime,
    /// resetting it to the same state as [`Mpi::new`].
    pub fn clear(&mut self) {
        for limb in self.limbs.iter_mut() {
            *limb = 0;
        }
        self.limbs.clear();
        self.limbs.shrink_to_fit();
        self.sign = 1;
    }

    /// Sets `self` to the value of a signed machine integer.
    pub fn lset(&mut self, value: i64) -> MpiResult<()> {
        let sign: i8 = if value < 0 { -1 } else { 1 };
        let mag = value.unsigned_abs();

        let needed = if mag == 0 {
            0
        } else {
            let bits = 64 - mag.leading_zeros() as usize;
            bits.div_ceil(crate::config::LIMB_BITS as usize)
        };
        self.grow(needed.max(1))?;
        for limb in self.limbs.iter_mut() {
            *limb = 0;
        }

        let mut remaining = mag;
        let mut i = 0;
        while remaining != 0 && i < self.limbs.len() {
            self.limbs[i] = remaining as LimbWord;
            remaining = remaining
                .checked_shr(crate::config::LIMB_BITS)
                .unwrap_or(0);
            i += 1;
        }

        self.sign = sign;
        self.canonicalize_sign();
        Ok(())
    }

    /// Constant-time conditional assign: when `flag` is nonzero, `self`
    /// becomes a copy of `other`'s value; when `flag` is zero, `self` is
    /// left unchanged. Any nonzero `flag` is treated identically to 1.
    ///
    /// Control flow and the memory-access pattern are independent of
    /// `flag`: both operands are read and written in full regardless of
    /// its value. `self` is grown to at least `other`'s allocated limb
    /// count first (an allocation, not a data-dependent branch).
    pub fn safe_cond_assign(&mut self, other: &Mpi, flag: u8) -> MpiResult<()> {
        let flag01 = ct::normalize_flag(flag);
        if other.limbs.len() > self.limbs.len() {
            self.grow(other.limbs.len())?;
        }

        for i in 0..self.limbs.len() {
            let o = other.limbs.get(i).copied().unwrap_or(0);
            self.limbs[i] = ct::select_limb(self.limbs[i], o, flag01);
        }
        self.sign = ct::select_i8(self.sign, other.sign, flag01);
        Ok(())
    }

    /// Constant-time conditional swap: when `flag` is nonzero, `self` and
    /// `other` exchange values; when `flag` is zero, both are left
    /// unchanged. Both operands are grown to a common limb count first
    /// (an allocation, not a data-dependent branch) so the per-limb
    /// selection touches the same addresses regardless of `flag`.
    pub fn safe_cond_swap(&mut self, other: &mut Mpi, flag: u8) -> MpiResult<()> {
        let flag01 = ct::normalize_flag(flag);
        let n = self.limbs.len().max(other.limbs.len());
        self.grow(n)?;
        other.grow(n)?;

        for i in 0..n {
            ct::cswap_limb(&mut self.limbs[i], &mut other.limbs[i], flag01);
        }
        ct::cswap_i8(&mut self.sign, &mut other.sign, flag01);
        Ok(())
    }
}

impl Default for Mpi {
    fn default() -> Self {
        Mpi::new()
    }
}

impl Clone for Mpi {
    fn clone(&self) -> Self {
        let mut out = Mpi::new();
        out.copy_from(self)
            .expect("cloning a value that already satisfies MAX_LIMBS cannot fail");
        out
    }
}

impl Drop for Mpi {
    /// Overwrites the limb buffer with zero before it is released,
    /// satisfying the crate's "zeroize on free" invariant without
    /// requiring callers to remember an explicit teardown call.
    fn drop(&mut self) {
        for limb in self.limbs.iter_mut() {
            *limb = 0;
        }
    }
}

impl PartialEq for Mpi {
    fn eq(&self, other: &Self) -> bool {
        signed::cmp_mpi(self, other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Mpi {}

impl PartialOrd for Mpi {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(signed::cmp_mpi(self, other))
    }
}
