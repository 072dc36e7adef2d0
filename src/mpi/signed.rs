//! Signed layer: sign-aware arithmetic built on the unsigned kernel.
//!
//! As with [`super::unsigned`], the multi-operand routines here (`add_mpi`,
//! `sub_mpi`, `mul_mpi`, `div_mpi`) are free functions that borrow their
//! operands and return a freshly allocated [`Mpi`] (or pair of `Mpi`s for
//! division), rather than writing through a `dst` out-parameter. This
//! makes the aliasing guarantees the spec asks for ("every multi-operand
//! routine must tolerate `dst` aliasing any source") automatic: two
//! shared borrows of the same value are always valid Rust, so
//! `mul_mpi(&x, &x)` (squaring) needs no special case.

use std::cmp::Ordering;

use super::unsigned;
use super::{limb, Mpi};
use crate::config::{DoubleLimb, Limb, LIMB_BITS, MAX_LIMBS};
use crate::error::{MpiError, MpiResult};

/// Returns `-a`, canonicalizing to `+0` if `a` is zero.
pub fn negate(a: &Mpi) -> Mpi {
    let mut out = a.clone();
    out.set_sign_raw(-a.sign());
    out
}

/// Sign-aware addition.
///
/// If the signs agree, magnitudes are added and the common sign is
/// inherited. Otherwise the smaller magnitude is subtracted from the
/// larger, and the result takes the sign of the larger operand (`+1` if
/// the magnitudes are equal, so the result canonicalizes to `+0`).
pub fn add_mpi(a: &Mpi, b: &Mpi) -> MpiResult<Mpi> {
    let mut out = if a.sign() == b.sign() {
        let mut r = unsigned::add_abs(a, b)?;
        r.set_sign_raw(a.sign());
        r
    } else {
        match unsigned::cmp_abs(a, b) {
            Ordering::Equal => Mpi::new(),
            Ordering::Greater => {
                let mut r = unsigned::sub_abs(a, b)?;
                r.set_sign_raw(a.sign());
                r
            }
            Ordering::Less => {
                let mut r = unsigned::sub_abs(b, a)?;
                r.set_sign_raw(b.sign());
                r
            }
        }
    };
    out.canonicalize_sign();
    Ok(out)
}

/// `a - b`, defined as `add_mpi(a, -b)`.
pub fn sub_mpi(a: &Mpi, b: &Mpi) -> MpiResult<Mpi> {
    add_mpi(a, &negate(b))
}

/// `a + v` for a signed machine-integer scalar `v`.
pub fn add_int(a: &Mpi, v: i64) -> MpiResult<Mpi> {
    let mut scalar = Mpi::new();
    scalar.lset(v)?;
    add_mpi(a, &scalar)
}

/// `a - v` for a signed machine-integer scalar `v`.
pub fn sub_int(a: &Mpi, v: i64) -> MpiResult<Mpi> {
    let mut scalar = Mpi::new();
    scalar.lset(v)?;
    sub_mpi(a, &scalar)
}

/// Compares `a` and `b` as signed values: differing signs are decided by
/// sign alone; equal signs fall back to a magnitude comparison, oriented
/// so that a negative pair reverses the magnitude order.
pub fn cmp_mpi(a: &Mpi, b: &Mpi) -> Ordering {
    if a.is_zero() && b.is_zero() {
        return Ordering::Equal;
    }
    if a.sign() != b.sign() {
        return if a.sign() > b.sign() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    let mag = unsigned::cmp_abs(a, b);
    if a.sign() > 0 {
        mag
    } else {
        mag.reverse()
    }
}

/// Compares `a` against a signed machine-integer scalar `v`.
pub fn cmp_int(a: &Mpi, v: i64) -> MpiResult<Ordering> {
    let mut scalar = Mpi::new();
    scalar.lset(v)?;
    Ok(cmp_mpi(a, &scalar))
}

/// Schoolbook multiplication, `O(sig(a) * sig(b))`. The result is
/// allocated with `sig(a) + sig(b)` limbs. The sign of the result is the
/// product of the operand signs; either operand being zero forces the
/// result to canonical `+0`.
pub fn mul_mpi(a: &Mpi, b: &Mpi) -> MpiResult<Mpi> {
    let sig_a = a.significant_limbs();
    let sig_b = b.significant_limbs();
    if sig_a == 0 || sig_b == 0 {
        return Ok(Mpi::new());
    }

    let n = sig_a + sig_b;
    if n > MAX_LIMBS {
        return Err(MpiError::Alloc);
    }

    let mut out = vec![0 as Limb; n];
    for i in 0..sig_a {
        let ai = a.limbs()[i];
        if ai == 0 {
            continue;
        }
        let mut carry: Limb = 0;
        for j in 0..sig_b {
            let (lo, hi) = limb::mac(ai, b.limbs()[j], out[i + j], carry);
            out[i + j] = lo;
            carry = hi;
        }
        let mut k = i + sig_b;
        while carry != 0 {
            let (sum, c) = limb::adc(out[k], carry, 0);
            out[k] = sum;
            carry = c;
            k += 1;
        }
    }

    let mut result = Mpi::from_limbs_unsigned(out);
    result.set_sign_raw(a.sign() * b.sign());
    Ok(result)
}

fn quotient_sign(a: &Mpi, b: &Mpi) -> i8 {
    if a.is_zero() || b.is_zero() {
        1
    } else {
        a.sign() * b.sign()
    }
}

/// Schoolbook long division producing `(quotient, remainder)` such that
/// `a == quotient * b + remainder` and `|remainder| < |b|`.
///
/// Implements Knuth Algorithm D: the divisor is normalized (left-shifted
/// so its top bit is set), each quotient digit is estimated from the top
/// two divisor limbs and refined against the top three, and a trial
/// subtraction that borrows past zero is corrected by adding the
/// divisor back and decrementing the digit.
///
/// `quotient` carries the sign of `a * b` (canonicalized to `+1` if the
/// product is zero); `remainder` carries the sign of `a`.
///
/// # Errors
/// Returns [`MpiError::DivisionByZero`] if `b` is zero.
pub fn div_mpi(a: &Mpi, b: &Mpi) -> MpiResult<(Mpi, Mpi)> {
    if b.is_zero() {
        return Err(MpiError::DivisionByZero);
    }

    let (mut q, mut r) = divrem_abs(a, b)?;
    q.set_sign_raw(quotient_sign(a, b));
    r.set_sign_raw(a.sign());
    Ok((q, r))
}

/// `div_mpi` with a one-limb scalar divisor.
pub fn div_int(a: &Mpi, v: i64) -> MpiResult<(Mpi, Mpi)> {
    let mut scalar = Mpi::new();
    scalar.lset(v)?;
    div_mpi(a, &scalar)
}

/// The canonical non-negative residue `a mod b`, satisfying
/// `mod_mpi(a, b) in [0, b)`.
///
/// # Errors
/// Returns [`MpiError::NegativeValue`] if `b <= 0`: the contract forbids
/// a non-positive modulus.
pub fn mod_mpi(a: &Mpi, b: &Mpi) -> MpiResult<Mpi> {
    if b.is_zero() || b.is_negative() {
        return Err(MpiError::NegativeValue);
    }
    let (_, r) = div_mpi(a, b)?;
    if r.is_negative() {
        add_mpi(&r, b)
    } else {
        Ok(r)
    }
}

/// Magnitude-only division dispatcher: fast path for a one-limb divisor,
/// Knuth Algorithm D otherwise.
fn divrem_abs(a: &Mpi, b: &Mpi) -> MpiResult<(Mpi, Mpi)> {
    let sig_b = b.significant_limbs();
    let sig_a = a.significant_limbs();

    if sig_a < sig_b {
        let mut r = Mpi::new();
        r.copy_from(a)?;
        r.set_sign_raw(1);
        return Ok((Mpi::new(), r));
    }

    if sig_b == 1 {
        return div_small(a, b.limbs()[0]);
    }

    knuth_div(a, b)
}

fn div_small(a: &Mpi, divisor: Limb) -> MpiResult<(Mpi, Mpi)> {
    let sig = a.significant_limbs();
    let mut q = vec![0 as Limb; sig];
    let mut rem: Limb = 0;
    for i in (0..sig).rev() {
        let (qd, r) = limb::divrem_wide(rem, a.limbs()[i], divisor);
        q[i] = qd;
        rem = r;
    }
    Ok((Mpi::from_limbs_unsigned(q), Mpi::from_single_limb(rem)))
}

/// Knuth Algorithm D for a divisor of two or more significant limbs.
fn knuth_div(a: &Mpi, b: &Mpi) -> MpiResult<(Mpi, Mpi)> {
    let n = b.significant_limbs();
    debug_assert!(n >= 2);
    let sig_a = a.significant_limbs();
    let m = sig_a - n;

    let shift = b.limbs()[n - 1].leading_zeros() as usize;

    let mut v = vec![0 as Limb; n];
    shl_exact(&b.limbs()[..n], shift, &mut v);

    let mut u = vec![0 as Limb; sig_a + 1];
    shl_extend(&a.limbs()[..sig_a], shift, &mut u);

    let mut q = vec![0 as Limb; m + 1];

    let base: DoubleLimb = 1 << LIMB_BITS;
    let vn1 = v[n - 1] as DoubleLimb;
    let vn2 = v[n - 2] as DoubleLimb;

    for j in (0..=m).rev() {
        let ujn = u[j + n] as DoubleLimb;
        let ujn1 = u[j + n - 1] as DoubleLimb;
        let num = (ujn << LIMB_BITS) | ujn1;

        let mut qhat = num / vn1;
        let mut rhat = num % vn1;

        loop {
            let ujn2 = u[j + n - 2] as DoubleLimb;
            if qhat >= base || qhat * vn2 > (rhat << LIMB_BITS) + ujn2 {
                qhat -= 1;
                rhat += vn1;
                if rhat < base {
                    continue;
                }
            }
            break;
        }

        let mut borrow: Limb = 0;
        let mut carry: Limb = 0;
        for i in 0..n {
            let (lo, hi) = limb::mac(qhat as Limb, v[i], 0, carry);
            carry = hi;
            let (diff, br) = limb::sbb(u[j + i], lo, borrow);
            u[j + i] = diff;
            borrow = br;
        }
        let (diff, br) = limb::sbb(u[j + n], carry, borrow);
        u[j + n] = diff;
        borrow = br;

        if borrow != 0 {
            // The estimate was one too large: add the divisor back and
            // discard the resulting (exactly canceling) top borrow.
            qhat -= 1;
            let mut carry2: Limb = 0;
            for i in 0..n {
                let (sum, c) = limb::adc(u[j + i], v[i], carry2);
                u[j + i] = sum;
                carry2 = c;
            }
            u[j + n] = u[j + n].wrapping_add(carry2);
        }

        q[j] = qhat as Limb;
    }

    let quotient = Mpi::from_limbs_unsigned(q);

    let mut rem_limbs = u[..n].to_vec();
    shr_inplace(&mut rem_limbs, shift);
    let remainder = Mpi::from_limbs_unsigned(rem_limbs);

    Ok((quotient, remainder))
}

/// Left-shifts `src` by `shift` bits into `out` (`out.len() == src.len()`),
/// assuming (as guaranteed when `shift` is the leading-zero count of
/// `src`'s top limb) that no bits overflow past `out`'s last limb.
fn shl_exact(src: &[Limb], shift: usize, out: &mut [Limb]) {
    if shift == 0 {
        out.copy_from_slice(src);
        return;
    }
    let mut carry: Limb = 0;
    for i in 0..src.len() {
        out[i] = (src[i] << shift) | carry;
        carry = src[i] >> (LIMB_BITS as usize - shift);
    }
}

/// Left-shifts `src` by `shift` bits into `out` (`out.len() == src.len() +
/// 1`), capturing any overflow in the extra high limb.
fn shl_extend(src: &[Limb], shift: usize, out: &mut [Limb]) {
    if shift == 0 {
        out[..src.len()].copy_from_slice(src);
        out[src.len()] = 0;
        return;
    }
    let mut carry: Limb = 0;
    for i in 0..src.len() {
        out[i] = (src[i] << shift) | carry;
        carry = src[i] >> (LIMB_BITS as usize - shift);
    }
    out[src.len()] = carry;
}

/// Right-shifts `buf` by `shift` bits in place.
fn shr_inplace(buf: &mut [Limb], shift: usize) {
    if shift == 0 {
        return;
    }
    let len = buf.len();
    for i in 0..len {
        let lo = buf[i] >> shift;
        let hi = if i + 1 < len {
            buf[i + 1] << (LIMB_BITS as usize - shift)
        } else {
            0
        };
        buf[i] = lo | hi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses an uppercase hex literal into an `Mpi` using only
    /// operations already defined in this module, since the string codec
    /// lives in a higher layer that depends on `signed` rather than the
    /// other way around.
    fn from_hex(s: &str) -> Mpi {
        let mut sixteen = Mpi::new();
        sixteen.lset(16).unwrap();

        let mut out = Mpi::new();
        for c in s.chars() {
            let digit = c.to_digit(16).expect("valid hex digit") as i64;
            out = mul_mpi(&out, &sixteen).unwrap();
            out = add_int(&out, digit).unwrap();
        }
        out
    }

    #[test]
    fn s1_division_boundary_scenario() {
        // A = 0xDEADBEEFCAFEBABE, B = 0x100000001
        // Expect Q = 0xDEADBEEE, R = 0xDCAFFAD0.
        let a = from_hex("DEADBEEFCAFEBABE");
        let b = from_hex("100000001");
        let (q, r) = div_mpi(&a, &b).unwrap();
        assert_eq!(q, from_hex("DEADBEEE"));
        assert_eq!(r, from_hex("DCAFFAD0"));

        let rebuilt = add_mpi(&mul_mpi(&q, &b).unwrap(), &r).unwrap();
        assert_eq!(rebuilt, a);
    }

    #[test]
    fn s2_mod_mpi_with_negative_dividend() {
        let a = negate(&from_hex("11")); // -17
        let b = from_hex("5");
        assert_eq!(mod_mpi(&a, &b).unwrap(), from_hex("3"));
    }

    #[test]
    fn division_identity_holds_for_mixed_signs() {
        let a = negate(&from_hex("2A"));
        let b = from_hex("7");
        let (q, r) = div_mpi(&a, &b).unwrap();
        let rebuilt = add_mpi(&mul_mpi(&q, &b).unwrap(), &r).unwrap();
        assert_eq!(rebuilt, a);
        assert!(unsigned::cmp_abs(&r, &b) == Ordering::Less);
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let a = from_hex("1");
        let zero = Mpi::new();
        assert_eq!(div_mpi(&a, &zero).unwrap_err(), MpiError::DivisionByZero);
    }

    #[test]
    fn mod_mpi_rejects_non_positive_modulus() {
        let a = from_hex("A");
        let zero = Mpi::new();
        assert_eq!(mod_mpi(&a, &zero).unwrap_err(), MpiError::NegativeValue);
        let neg = negate(&from_hex("5"));
        assert_eq!(mod_mpi(&a, &neg).unwrap_err(), MpiError::NegativeValue);
    }

    #[test]
    fn multiplication_is_commutative_and_associative() {
        let a = from_hex("1234567890ABCDEF");
        let b = from_hex("FEDCBA0987654321");
        let c = from_hex("ABCDEF");

        assert_eq!(mul_mpi(&a, &b).unwrap(), mul_mpi(&b, &a).unwrap());
        let lhs = mul_mpi(&mul_mpi(&a, &b).unwrap(), &c).unwrap();
        let rhs = mul_mpi(&a, &mul_mpi(&b, &c).unwrap()).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn add_then_subtract_is_identity() {
        let a = from_hex("DEADBEEF");
        let b = from_hex("CAFEBABE");
        let sum = add_mpi(&a, &b).unwrap();
        let back = sub_mpi(&sum, &b).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn negate_of_self_cancels_to_canonical_zero() {
        let a = from_hex("7B");
        let cancelled = add_mpi(&a, &negate(&a)).unwrap();
        assert!(cancelled.is_zero());
        assert!(!cancelled.is_negative());
    }
}
