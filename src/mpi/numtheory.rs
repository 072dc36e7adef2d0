//! Number theory: GCD, modular inverse, primality testing, and prime
//! generation — the layer RSA key generation and Diffie-Hellman
//! parameter validation sit on top of.

use std::cmp::Ordering;

use super::expmod;
use super::montgomery::MontgomeryCache;
use super::{limb, signed, Mpi};
use crate::config::Limb;
use crate::error::{MpiError, MpiResult};
use crate::rng::MpiRng;

const SMALL_PRIMES: &[u32] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

fn from_u32(v: u32) -> Mpi {
    Mpi::from_limbs_unsigned(vec![v as Limb])
}

/// Computes the non-negative GCD of `|a|` and `|b|` via Stein's binary
/// GCD: repeatedly strip common and individual factors of two with
/// shifts, then subtract the smaller odd value from the larger until one
/// side reaches zero.
///
/// # Errors
/// Cannot fail in practice; returns [`MpiError`] only if an intermediate
/// allocation would exceed `MAX_LIMBS`, which cannot happen since every
/// intermediate value is bounded by `max(|a|, |b|)`.
pub fn gcd(a: &Mpi, b: &Mpi) -> MpiResult<Mpi> {
    let mut x = a.clone();
    x.set_sign_raw(1);
    let mut y = b.clone();
    y.set_sign_raw(1);

    if x.is_zero() {
        return Ok(y);
    }
    if y.is_zero() {
        return Ok(x);
    }

    let shift = x.lsb().min(y.lsb());
    x.shift_r(x.lsb())?;

    loop {
        y.shift_r(y.lsb())?;
        if super::unsigned::cmp_abs(&x, &y) == Ordering::Greater {
            std::mem::swap(&mut x, &mut y);
        }
        y = super::unsigned::sub_abs(&y, &x)?;
        if y.is_zero() {
            break;
        }
    }
    x.shift_l(shift)?;
    Ok(x)
}

/// Computes `a^-1 mod n` via the extended Euclidean algorithm.
///
/// # Errors
/// Returns [`MpiError::BadInput`] if `n <= 1`, or [`MpiError::NotAcceptable`]
/// if `gcd(a, n) != 1` (no inverse exists).
pub fn inv_mod(a: &Mpi, n: &Mpi) -> MpiResult<Mpi> {
    if signed::cmp_int(n, 1)? != Ordering::Greater {
        return Err(MpiError::BadInput);
    }

    let mut old_r = signed::mod_mpi(a, n)?;
    let mut r = n.clone();
    let mut old_s = Mpi::from_limbs_unsigned(vec![1]);
    let mut s = Mpi::new();

    while !r.is_zero() {
        let (q, rem) = signed::div_mpi(&old_r, &r)?;
        old_r = r.clone();
        r = rem;

        let qs = signed::mul_mpi(&q, &s)?;
        let new_s = signed::sub_mpi(&old_s, &qs)?;
        old_s = s;
        s = new_s;
    }

    let is_unit = old_r.significant_limbs() == 1 && old_r.limbs()[0] == 1;
    if !is_unit {
        return Err(MpiError::NotAcceptable);
    }

    signed::mod_mpi(&old_s, n)
}

/// `a mod d` for a small positive `u32` divisor, computed limb-by-limb
/// from the most significant end without materializing an `Mpi` divisor.
fn mod_small(a: &Mpi, d: Limb) -> Limb {
    let mut rem: Limb = 0;
    for &word in a.limbs().iter().rev() {
        let (_, r) = limb::divrem_wide(rem, word, d);
        rem = r;
    }
    rem
}

/// Picks a uniformly random `Mpi` in `[low, high)` by rejection sampling:
/// fill a byte buffer sized to `high`'s bit length, interpret it
/// big-endian, and retry until it lands in range.
fn random_in_range(low: &Mpi, high: &Mpi, rng: &mut dyn MpiRng) -> MpiResult<Mpi> {
    let nbytes = high.bitlen().div_ceil(8).max(1);
    loop {
        let mut buf = vec![0u8; nbytes];
        rng.fill(&mut buf).map_err(|_| MpiError::BadInput)?;

        let mut candidate = Mpi::new();
        for &byte in &buf {
            candidate.shift_l(8)?;
            candidate = signed::add_int(&candidate, byte as i64)?;
        }

        if signed::cmp_mpi(&candidate, low) != Ordering::Less
            && signed::cmp_mpi(&candidate, high) == Ordering::Less
        {
            return Ok(candidate);
        }
    }
}

/// Number of Miller-Rabin rounds for a given candidate bit length,
/// following the spirit of the FIPS 186-5 round-count tables (more
/// rounds for smaller candidates, where a false witness is easier to
/// stumble on by chance).
fn rounds_for(bitlen: usize) -> u32 {
    match bitlen {
        0..=128 => 40,
        129..=256 => 32,
        257..=512 => 24,
        513..=1024 => 16,
        1025..=2048 => 8,
        _ => 4,
    }
}

/// Tests `n` for primality: a small-prime trial-division pre-filter
/// followed by a Miller-Rabin test with a bit-length-dependent round
/// count.
///
/// # Errors
/// Returns [`MpiError::BadInput`] if `n < 2`. Returns
/// [`MpiError::NotAcceptable`] if `n` is found to be composite. `Ok(())`
/// means `n` is probably prime, with a false-positive probability bounded
/// by the round count in [`rounds_for`].
pub fn is_prime(n: &Mpi, rng: &mut dyn MpiRng) -> MpiResult<()> {
    if signed::cmp_int(n, 2)? == Ordering::Less {
        return Err(MpiError::BadInput);
    }

    for &p in SMALL_PRIMES {
        let pm = from_u32(p);
        if signed::cmp_mpi(n, &pm) == Ordering::Equal {
            return Ok(());
        }
        if mod_small(n, p as Limb) == 0 {
            return Err(MpiError::NotAcceptable);
        }
    }

    miller_rabin(n, rounds_for(n.bitlen()), rng)
}

fn miller_rabin(n: &Mpi, rounds: u32, rng: &mut dyn MpiRng) -> MpiResult<()> {
    let one = Mpi::from_limbs_unsigned(vec![1]);
    let two = Mpi::from_limbs_unsigned(vec![2]);
    let n_minus_1 = signed::sub_mpi(n, &one)?;

    let s = n_minus_1.lsb();
    let mut d = n_minus_1.clone();
    d.shift_r(s)?;

    let mut cache = MontgomeryCache::new(n)?;

    for _ in 0..rounds {
        let a = random_in_range(&two, &n_minus_1, rng)?;
        let mut x = expmod::exp_mod(&a, &d, n, Some(&mut cache))?;

        if signed::cmp_mpi(&x, &one) == Ordering::Equal
            || signed::cmp_mpi(&x, &n_minus_1) == Ordering::Equal
        {
            continue;
        }

        let mut witnessed_composite = true;
        for _ in 1..s {
            x = expmod::exp_mod(&x, &two, n, Some(&mut cache))?;
            if signed::cmp_mpi(&x, &n_minus_1) == Ordering::Equal {
                witnessed_composite = false;
                break;
            }
        }
        if witnessed_composite {
            return Err(MpiError::NotAcceptable);
        }
    }

    Ok(())
}

/// Generates a random odd `nbits`-bit value with the top two bits and
/// the bottom bit forced set (so its bit length is exactly `nbits`, it is
/// odd, and the product of two such primes is exactly `2 * nbits` bits
/// long) from fresh random bytes.
fn random_odd_with_exact_bitlen(nbits: usize, rng: &mut dyn MpiRng) -> MpiResult<Mpi> {
    let nbytes = nbits.div_ceil(8);
    let mut buf = vec![0u8; nbytes];
    rng.fill(&mut buf).map_err(|_| MpiError::BadInput)?;

    let mut candidate = Mpi::new();
    for &byte in &buf {
        candidate.shift_l(8)?;
        candidate = signed::add_int(&candidate, byte as i64)?;
    }

    for pos in nbits..nbytes * 8 {
        candidate.set_bit(pos, 0)?;
    }
    candidate.set_bit(nbits - 1, 1)?;
    candidate.set_bit(nbits - 2, 1)?;
    candidate.set_bit(0, 1)?;
    Ok(candidate)
}

/// Generates a random probable prime of exactly `nbits` bits.
///
/// When `safe` is set, the result `p` additionally satisfies that `q =
/// (p - 1) / 2` is also probably prime. A safe prime can never be `1 mod
/// 3` (that would force `3 | q`), so candidates are nudged into the `2
/// mod 3` residue class and then stepped by 4 to stay there, rather than
/// re-rolling the low bits from scratch on every rejection.
///
/// # Errors
/// Returns [`MpiError::BadInput`] if `nbits < 3`.
pub fn gen_prime(nbits: usize, safe: bool, rng: &mut dyn MpiRng) -> MpiResult<Mpi> {
    if nbits < 3 {
        return Err(MpiError::BadInput);
    }

    let four = Mpi::from_limbs_unsigned(vec![4]);

    loop {
        let mut candidate = random_odd_with_exact_bitlen(nbits, rng)?;

        if safe {
            let bump = match mod_small(&candidate, 3) {
                2 => 0,
                1 => 4,
                _ => 2,
            };
            if bump != 0 {
                candidate = signed::add_int(&candidate, bump)?;
            }
        }

        while candidate.bitlen() <= nbits {
            let candidate_is_prime = is_prime(&candidate, rng).is_ok();
            if candidate_is_prime {
                if !safe {
                    return Ok(candidate);
                }
                let mut q = signed::sub_int(&candidate, 1)?;
                q.shift_r(1)?;
                if is_prime(&q, rng).is_ok() {
                    return Ok(candidate);
                }
            }

            candidate = if safe {
                signed::add_mpi(&candidate, &four)?
            } else {
                signed::add_int(&candidate, 2)?
            };
        }
    }
}
