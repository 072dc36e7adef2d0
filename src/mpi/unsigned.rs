//! Unsigned kernel: magnitude-only operations.
//!
//! `cmp_abs`, `add_abs`, and `sub_abs` compare and combine two values by
//! magnitude alone; they are implemented as free functions returning a
//! freshly allocated [`Mpi`] rather than writing into a caller-supplied
//! destination. The spec's C-style `(dst, a, b)` signature requires `dst`
//! to tolerate aliasing either source — in Rust, a function that borrows
//! its operands and returns a new value sidesteps that requirement
//! entirely, since two shared borrows of the same value (`add_abs(&x,
//! &x)`) are always legal. See `DESIGN.md` for the full rationale.
//!
//! Bit-level accessors (`shift_l`, `shift_r`, `get_bit`, `set_bit`,
//! `lsb`, `bitlen`, `size`) operate on a single value in place and are
//! inherent methods on [`Mpi`].

use std::cmp::Ordering;

use super::Mpi;
use crate::config::{Limb, LIMB_BITS, MAX_LIMBS};
use crate::error::{MpiError, MpiResult};

use super::limb;

/// Compares `|a|` and `|b|`, scanning from the most significant non-zero
/// limb downward. Returns `Ordering::Equal` only when every limb up to
/// the larger significant-limb count matches.
pub fn cmp_abs(a: &Mpi, b: &Mpi) -> Ordering {
    let sig_a = a.significant_limbs();
    let sig_b = b.significant_limbs();

    match sig_a.cmp(&sig_b) {
        Ordering::Equal => {}
        other => return other,
    }

    for i in (0..sig_a).rev() {
        match a.limbs()[i].cmp(&b.limbs()[i]) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Schoolbook magnitude addition: `|a| + |b|`. The result is allocated
/// with `max(sig(a), sig(b)) + 1` limbs to absorb a final carry.
pub fn add_abs(a: &Mpi, b: &Mpi) -> MpiResult<Mpi> {
    let sig_a = a.significant_limbs();
    let sig_b = b.significant_limbs();
    let n = sig_a.max(sig_b);
    if n + 1 > MAX_LIMBS {
        return Err(MpiError::Alloc);
    }

    let mut out = vec![0 as Limb; n + 1];
    let mut carry: Limb = 0;
    for (i, slot) in out.iter_mut().take(n).enumerate() {
        let x = a.limbs().get(i).copied().unwrap_or(0);
        let y = b.limbs().get(i).copied().unwrap_or(0);
        let (sum, c) = limb::adc(x, y, carry);
        *slot = sum;
        carry = c;
    }
    out[n] = carry;

    Ok(Mpi::from_limbs_unsigned(out))
}

/// Schoolbook magnitude subtraction: `|a| - |b|`.
///
/// # Errors
/// Returns [`MpiError::NegativeValue`] if `|a| < |b|`.
pub fn sub_abs(a: &Mpi, b: &Mpi) -> MpiResult<Mpi> {
    if cmp_abs(a, b) == Ordering::Less {
        return Err(MpiError::NegativeValue);
    }

    let sig_a = a.significant_limbs();
    let mut out = vec![0 as Limb; sig_a];
    let mut borrow: Limb = 0;
    for (i, slot) in out.iter_mut().enumerate() {
        let x = a.limbs()[i];
        let y = b.limbs().get(i).copied().unwrap_or(0);
        let (diff, br) = limb::sbb(x, y, borrow);
        *slot = diff;
        borrow = br;
    }
    debug_assert_eq!(borrow, 0, "borrow must fully resolve when |a| >= |b|");

    Ok(Mpi::from_limbs_unsigned(out))
}

impl Mpi {
    /// Builds a (sign `+1`) `Mpi` directly from a little-endian limb
    /// vector, canonicalizing the sign if the value is zero.
    pub(crate) fn from_limbs_unsigned(limbs: Vec<Limb>) -> Mpi {
        let mut m = Mpi { sign: 1, limbs };
        m.canonicalize_sign();
        m
    }

    /// Builds a (sign `+1`) `Mpi` from a single limb, canonicalizing to
    /// the empty representation when it is zero.
    pub(crate) fn from_single_limb(limb: Limb) -> Mpi {
        if limb == 0 {
            Mpi::new()
        } else {
            Mpi::from_limbs_unsigned(vec![limb])
        }
    }

    /// One-based index of the most significant set bit. Zero when the
    /// value is zero.
    pub fn bitlen(&self) -> usize {
        let sig = self.significant_limbs();
        if sig == 0 {
            return 0;
        }
        let top = self.limbs()[sig - 1];
        (sig - 1) * LIMB_BITS as usize + (LIMB_BITS - top.leading_zeros()) as usize
    }

    /// `ceil(bitlen / 8)`: the number of bytes needed for a minimal
    /// big-endian encoding of the magnitude.
    pub fn size(&self) -> usize {
        self.bitlen().div_ceil(8)
    }

    /// Zero-based index of the least significant set bit.
    ///
    /// By spec, `lsb(0)` returns 0 — the same value as `lsb(1)`. Callers
    /// must not use `lsb` alone to distinguish a zero value from a value
    /// whose least significant bit is bit 0; use [`Mpi::is_zero`] for that.
    pub fn lsb(&self) -> usize {
        for (i, &limb) in self.limbs().iter().enumerate() {
            if limb != 0 {
                return i * LIMB_BITS as usize + limb.trailing_zeros() as usize;
            }
        }
        0
    }

    /// Reads bit `pos` (zero-based, little-endian). Reading beyond the
    /// allocated storage returns 0 and never grows or fails.
    pub fn get_bit(&self, pos: usize) -> u8 {
        let limb_idx = pos / LIMB_BITS as usize;
        let bit_idx = pos % LIMB_BITS as usize;
        match self.limbs().get(limb_idx) {
            Some(&limb) => ((limb >> bit_idx) & 1) as u8,
            None => 0,
        }
    }

    /// Writes bit `pos` (zero-based, little-endian) to `v`.
    ///
    /// Grows storage only when writing a 1 beyond the current allocation;
    /// writing a 0 beyond storage is a no-op.
    ///
    /// # Errors
    /// Returns [`MpiError::BadInput`] if `v` is not 0 or 1.
    pub fn set_bit(&mut self, pos: usize, v: u8) -> MpiResult<()> {
        if v > 1 {
            return Err(MpiError::BadInput);
        }

        let limb_idx = pos / LIMB_BITS as usize;
        let bit_idx = pos % LIMB_BITS as usize;

        if limb_idx >= self.limbs().len() {
            if v == 0 {
                return Ok(());
            }
            self.grow(limb_idx + 1)?;
        }

        let mask: Limb = 1 << bit_idx;
        if v == 1 {
            self.limbs_mut()[limb_idx] |= mask;
        } else {
            self.limbs_mut()[limb_idx] &= !mask;
            self.canonicalize_sign();
        }
        Ok(())
    }

    /// Shifts `self` left by `k` bits in place, growing storage by
    /// `ceil(k / LIMB_BITS)` limbs to hold the result. A no-op when
    /// `self` is zero or `k` is zero.
    pub fn shift_l(&mut self, k: usize) -> MpiResult<()> {
        if k == 0 || self.is_zero() {
            return Ok(());
        }

        let limb_shift = k / LIMB_BITS as usize;
        let bit_shift = k % LIMB_BITS as usize;
        let sig = self.significant_limbs();
        let new_len = sig + limb_shift + 1;
        if new_len > MAX_LIMBS {
            return Err(MpiError::Alloc);
        }

        let old: Vec<Limb> = self.limbs()[..sig].to_vec();
        self.grow(new_len)?;
        for limb in self.limbs_mut().iter_mut() {
            *limb = 0;
        }

        if bit_shift == 0 {
            self.limbs_mut()[limb_shift..limb_shift + sig].copy_from_slice(&old);
        } else {
            let mut carry: Limb = 0;
            for (i, &word) in old.iter().enumerate() {
                let dst = limb_shift + i;
                self.limbs_mut()[dst] = (word << bit_shift) | carry;
                carry = word >> (LIMB_BITS as usize - bit_shift);
            }
            self.limbs_mut()[limb_shift + sig] = carry;
        }
        Ok(())
    }

    /// Shifts `self` right by `k` bits in place. Never shrinks storage.
    /// A no-op when `self` is zero or `k` is zero.
    pub fn shift_r(&mut self, k: usize) -> MpiResult<()> {
        if k == 0 || self.is_zero() {
            return Ok(());
        }

        let limb_shift = k / LIMB_BITS as usize;
        let bit_shift = k % LIMB_BITS as usize;
        let used = self.used();

        if limb_shift >= used {
            for limb in self.limbs_mut().iter_mut() {
                *limb = 0;
            }
            self.canonicalize_sign();
            return Ok(());
        }

        let old: Vec<Limb> = self.limbs().to_vec();
        let remaining = used - limb_shift;

        if bit_shift == 0 {
            self.limbs_mut()[..remaining].copy_from_slice(&old[limb_shift..]);
        } else {
            for i in 0..remaining {
                let lo = old[limb_shift + i] >> bit_shift;
                let hi = if limb_shift + i + 1 < used {
                    old[limb_shift + i + 1] << (LIMB_BITS as usize - bit_shift)
                } else {
                    0
                };
                self.limbs_mut()[i] = lo | hi;
            }
        }
        for limb in self.limbs_mut()[remaining..].iter_mut() {
            *limb = 0;
        }
        self.canonicalize_sign();
        Ok(())
    }
}
