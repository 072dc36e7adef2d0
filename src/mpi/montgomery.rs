//! Montgomery multiplication core.
//!
//! Montgomery form trades a direct representation of a residue `A mod N`
//! for `A * R mod N`, where `R = 2^(k * LIMB_BITS)` for a limb count `k`
//! covering `N`. In that form, reducing a product by `N` becomes a
//! sequence of word-sized multiply-accumulate passes instead of a
//! division — the same trick [`super::expmod::exp_mod`] leans on for
//! every squaring and multiply in its sliding-window loop.
//!
//! [`MontgomeryCache`] exists because `R^2 mod N` and the per-word
//! Montgomery inverse `m'` are expensive to recompute and depend only on
//! `N`; a caller performing many exponentiations against the same
//! modulus (RSA, DH, DSA all do) computes them once and reuses them
//! across calls. The cache keeps a snapshot of `N` and recomputes both
//! values automatically if a caller passes a different modulus in.

use super::{ct, limb, unsigned, Mpi};
use crate::config::Limb;
use crate::error::{MpiError, MpiResult};

/// Caller-owned cache of the values Montgomery arithmetic needs that
/// depend only on the modulus: `R^2 mod N` and the word-sized
/// Montgomery inverse `m' = -N^-1 mod 2^LIMB_BITS`.
///
/// Constructing or refreshing the cache is the expensive step (an
/// `O(k^2)` reduction for `R^2 mod N` plus a handful of Newton
/// iterations for `m'`); reusing one across repeated [`exp_mod`] calls
/// against the same modulus amortizes that cost. The cache detects
/// staleness by comparing against a snapshot of `N`, so passing a
/// different modulus through the same cache just pays the recompute
/// once and keeps working correctly.
///
/// [`exp_mod`]: super::expmod::exp_mod
#[derive(Debug, Clone)]
pub struct MontgomeryCache {
    n_snapshot: Mpi,
    m_prime: Limb,
    rr: Mpi,
}

impl MontgomeryCache {
    /// Builds a cache for `n`, which must be a positive odd modulus.
    ///
    /// # Errors
    /// Returns [`MpiError::BadInput`] if `n` is not a positive odd value.
    pub fn new(n: &Mpi) -> MpiResult<Self> {
        let mut cache = MontgomeryCache {
            n_snapshot: Mpi::new(),
            m_prime: 0,
            rr: Mpi::new(),
        };
        cache.refresh(n)?;
        Ok(cache)
    }

    fn refresh(&mut self, n: &Mpi) -> MpiResult<()> {
        if n.is_zero() || n.is_negative() || n.limbs()[0] & 1 == 0 {
            return Err(MpiError::BadInput);
        }
        self.m_prime = mont_inv_limb(n.limbs()[0]);
        self.rr = compute_rr(n)?;
        self.n_snapshot.copy_from(n)?;
        Ok(())
    }

    /// Returns `(R^2 mod N, m')` for `n`, recomputing both first if `n`
    /// differs from the snapshot taken at the last refresh.
    pub(crate) fn ensure(&mut self, n: &Mpi) -> MpiResult<(&Mpi, Limb)> {
        if self.n_snapshot != *n {
            self.refresh(n)?;
        }
        Ok((&self.rr, self.m_prime))
    }
}

/// Computes `m' = -N^-1 mod 2^LIMB_BITS` from `N`'s lowest limb via
/// Newton-Raphson iteration on the 2-adic inverse.
///
/// For odd `n0`, `n0` itself is already correct to 3 bits as an
/// approximation of `n0^-1 mod 2^LIMB_BITS` (every odd square is `1 mod
/// 8`); each iteration of `x := x * (2 - n0*x)` doubles the number of
/// correct low bits, so six rounds comfortably cover both the 32-bit and
/// 64-bit limb widths.
pub(crate) fn mont_inv_limb(n0: Limb) -> Limb {
    debug_assert!(n0 & 1 == 1, "Montgomery modulus must be odd");
    let two: Limb = 2;
    let mut x: Limb = n0;
    for _ in 0..6 {
        x = x.wrapping_mul(two.wrapping_sub(n0.wrapping_mul(x)));
    }
    x.wrapping_neg()
}

/// Computes `R^2 mod N` where `R = 2^(significant_limbs(n) * LIMB_BITS)`.
fn compute_rr(n: &Mpi) -> MpiResult<Mpi> {
    let k = n.significant_limbs();
    let mut r = Mpi::new();
    r.set_bit(2 * k * crate::config::LIMB_BITS as usize, 1)?;
    super::signed::mod_mpi(&r, n)
}

/// Converts `a` (a reduced residue, `0 <= a < n`) into Montgomery form
/// `a * R mod N`.
pub(crate) fn to_montgomery(a: &Mpi, n: &Mpi, rr: &Mpi, m_prime: Limb) -> Mpi {
    montmul(a, rr, n, m_prime)
}

/// Converts `a_mont` out of Montgomery form, back to the plain residue
/// `a_mont * R^-1 mod N`.
pub(crate) fn from_montgomery(a_mont: &Mpi, n: &Mpi, m_prime: Limb) -> Mpi {
    let one = Mpi::from_limbs_unsigned(vec![1]);
    montmul(a_mont, &one, n, m_prime)
}

/// Montgomery multiplication: `X * Y * R^-1 mod N`.
///
/// Computes the full product `X * Y` into working storage, then
/// performs `k` rounds of word-at-a-time Montgomery reduction (each
/// round clears one low limb of the accumulator by adding a multiple of
/// `N`), and finally applies the one constant-time conditional subtract
/// that brings the result from `< 2N` down to `< N`.
///
/// Requires `0 <= X, Y < N` and `N` odd; callers within this crate are
/// `expmod::exp_mod` and `MontgomeryCache` itself, both of which
/// maintain that invariant.
pub(crate) fn montmul(x: &Mpi, y: &Mpi, n: &Mpi, m_prime: Limb) -> Mpi {
    let k = n.significant_limbs();
    let sig_x = x.significant_limbs();
    let sig_y = y.significant_limbs();
    debug_assert!(sig_x <= k && sig_y <= k, "Montgomery operands must be reduced mod N");

    let mut t = vec![0 as Limb; 2 * k + 2];

    for i in 0..sig_x {
        let xi = x.limbs()[i];
        if xi == 0 {
            continue;
        }
        let mut carry: Limb = 0;
        for j in 0..sig_y {
            let (lo, hi) = limb::mac(xi, y.limbs()[j], t[i + j], carry);
            t[i + j] = lo;
            carry = hi;
        }
        let mut p = i + sig_y;
        while carry != 0 {
            let (sum, c) = limb::adc(t[p], carry, 0);
            t[p] = sum;
            carry = c;
            p += 1;
        }
    }

    for i in 0..k {
        let u = t[i].wrapping_mul(m_prime);
        let mut carry: Limb = 0;
        for j in 0..k {
            let (lo, hi) = limb::mac(u, n.limbs()[j], t[i + j], carry);
            t[i + j] = lo;
            carry = hi;
        }
        let mut p = i + k;
        while carry != 0 {
            let (sum, c) = limb::adc(t[p], carry, 0);
            t[p] = sum;
            carry = c;
            p += 1;
        }
    }

    let mut result = t[k..2 * k + 1].to_vec();
    conditional_subtract(&mut result, n, k);
    result.truncate(k);
    Mpi::from_limbs_unsigned(result)
}

/// Subtracts `n` from `result` (`k+1` limbs) in constant time, keeping
/// the subtracted value when it didn't underflow and the original
/// otherwise. The subtraction's own borrow-out doubles as the secret
/// selector: no separate comparison against `n` is needed.
fn conditional_subtract(result: &mut [Limb], n: &Mpi, k: usize) {
    let mut sub = vec![0 as Limb; k + 1];
    let mut borrow: Limb = 0;
    for i in 0..k {
        let ni = n.limbs().get(i).copied().unwrap_or(0);
        let (diff, br) = limb::sbb(result[i], ni, borrow);
        sub[i] = diff;
        borrow = br;
    }
    let (diff, br) = limb::sbb(result[k], 0, borrow);
    sub[k] = diff;
    borrow = br;

    // borrow == 1: result < n, the subtraction underflowed, keep result.
    // borrow == 0: result >= n, use the subtracted value.
    let keep_original = borrow as u8;
    for i in 0..=k {
        result[i] = ct::select_limb(sub[i], result[i], keep_original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpi::signed;

    fn from_u64(v: u64) -> Mpi {
        let mut m = Mpi::new();
        m.lset(v as i64).unwrap();
        m
    }

    #[test]
    fn mont_inv_limb_satisfies_newton_identity() {
        let n0: Limb = 0xDEAD_BEEF_DEAD_BEEF_u64 as Limb | 1;
        let m_prime = mont_inv_limb(n0);
        let product = n0.wrapping_mul(m_prime);
        assert_eq!(product.wrapping_add(1), 0, "n0 * m' must be -1 mod 2^LIMB_BITS");
    }

    #[test]
    fn montmul_round_trips_through_montgomery_form() {
        let n = from_u64(997);
        let cache_n = n.clone();
        let m_prime = mont_inv_limb(cache_n.limbs()[0]);
        let rr = compute_rr(&n).unwrap();

        let a = from_u64(123);
        let b = from_u64(456);

        let a_mont = to_montgomery(&a, &n, &rr, m_prime);
        let b_mont = to_montgomery(&b, &n, &rr, m_prime);
        let prod_mont = montmul(&a_mont, &b_mont, &n, m_prime);
        let prod = from_montgomery(&prod_mont, &n, m_prime);

        let expected = signed::mod_mpi(&signed::mul_mpi(&a, &b).unwrap(), &n).unwrap();
        assert_eq!(prod, expected);
    }

    #[test]
    fn cache_recomputes_when_modulus_changes() {
        let mut cache = MontgomeryCache::new(&from_u64(101)).unwrap();
        let (_, m_prime_101) = cache.ensure(&from_u64(101)).unwrap();
        assert_eq!(m_prime_101, mont_inv_limb(101));

        let (_, m_prime_103) = cache.ensure(&from_u64(103)).unwrap();
        assert_eq!(m_prime_103, mont_inv_limb(103));
    }

    #[test]
    fn rejects_even_modulus() {
        assert_eq!(
            MontgomeryCache::new(&from_u64(100)).unwrap_err(),
            MpiError::BadInput
        );
    }
}
