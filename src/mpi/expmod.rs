//! Modular exponentiation.
//!
//! `exp_mod` is the routine RSA, DH, and DSA all bottom out in:
//! `A^E mod N`. It is built entirely out of [`super::montgomery`] —
//! every squaring and multiply in the sliding-window loop below runs in
//! Montgomery form, so no division ever appears on the hot path.

use std::cmp::Ordering;

use super::montgomery::{self, MontgomeryCache};
use super::{signed, Mpi};
use crate::config::EXP_WINDOW_MAX;
use crate::error::{MpiError, MpiResult};

/// Computes `A^E mod N` using left-to-right sliding-window
/// exponentiation in Montgomery form.
///
/// `cache` lets a caller reuse the Montgomery constants for `N` across
/// repeated calls; pass `None` to have this call build and discard a
/// one-off cache.
///
/// # Preconditions
/// `N` must be greater than 1 and odd — an even modulus is rejected
/// rather than silently falling back to a non-Montgomery path, since the
/// spec this crate implements treats Montgomery reduction as the only
/// supported exponentiation strategy. `E` must be non-negative.
///
/// # Errors
/// Returns [`MpiError::BadInput`] if `N <= 1`, `N` is even, or `E` is
/// negative.
pub fn exp_mod(
    a: &Mpi,
    e: &Mpi,
    n: &Mpi,
    cache: Option<&mut MontgomeryCache>,
) -> MpiResult<Mpi> {
    if n.is_negative() || signed::cmp_int(n, 1)? != Ordering::Greater {
        return Err(MpiError::BadInput);
    }
    if n.limbs()[0] & 1 == 0 {
        return Err(MpiError::BadInput);
    }
    if e.is_negative() {
        return Err(MpiError::BadInput);
    }

    if e.is_zero() {
        return Ok(Mpi::from_limbs_unsigned(vec![1]));
    }

    let a0 = signed::mod_mpi(a, n)?;

    let mut owned_cache;
    let cache_ref: &mut MontgomeryCache = match cache {
        Some(c) => c,
        None => {
            owned_cache = MontgomeryCache::new(n)?;
            &mut owned_cache
        }
    };
    let (rr, m_prime) = {
        let (rr, m_prime) = cache_ref.ensure(n)?;
        (rr.clone(), m_prime)
    };

    let one_mont = montgomery::to_montgomery(&Mpi::from_limbs_unsigned(vec![1]), n, &rr, m_prime);
    let a_mont = montgomery::to_montgomery(&a0, n, &rr, m_prime);

    let w = window_size(e.bitlen());
    let table_size = 1usize << (w - 1);
    let mut odd_powers = Vec::with_capacity(table_size);
    odd_powers.push(a_mont.clone());
    if table_size > 1 {
        let a_sq = montgomery::montmul(&a_mont, &a_mont, n, m_prime);
        for k in 1..table_size {
            let next = montgomery::montmul(&odd_powers[k - 1], &a_sq, n, m_prime);
            odd_powers.push(next);
        }
    }

    let mut result = one_mont;
    let mut i = e.bitlen() - 1;
    loop {
        if e.get_bit(i) == 0 {
            result = montgomery::montmul(&result, &result, n, m_prime);
            if i == 0 {
                break;
            }
            i -= 1;
        } else {
            let lower_bound = if i + 1 >= w as usize { i + 1 - w as usize } else { 0 };
            let mut l = lower_bound;
            while e.get_bit(l) == 0 {
                l += 1;
            }
            for _ in 0..=(i - l) {
                result = montgomery::montmul(&result, &result, n, m_prime);
            }
            let window_val = extract_bits(e, l, i);
            result = montgomery::montmul(&result, &odd_powers[(window_val - 1) / 2], n, m_prime);
            if l == 0 {
                break;
            }
            i = l - 1;
        }
    }

    Ok(montgomery::from_montgomery(&result, n, m_prime))
}

/// Picks a sliding-window width from the exponent's bit length, capped
/// at [`EXP_WINDOW_MAX`]. Wider windows trade a larger odd-power table
/// for fewer multiplies; the thresholds below only affect performance,
/// never correctness — any width in `1..=EXP_WINDOW_MAX` yields the same
/// result.
fn window_size(bitlen: usize) -> u32 {
    let w = if bitlen > 671 {
        6
    } else if bitlen > 239 {
        5
    } else if bitlen > 79 {
        4
    } else if bitlen > 23 {
        3
    } else if bitlen > 1 {
        2
    } else {
        1
    };
    w.min(EXP_WINDOW_MAX)
}

/// Reads bits `l..=i` of `e` (little-endian) as a `usize`, most
/// significant bit (index `i`) first.
fn extract_bits(e: &Mpi, l: usize, i: usize) -> usize {
    let mut v = 0usize;
    for pos in (l..=i).rev() {
        v = (v << 1) | e.get_bit(pos) as usize;
    }
    v
}
