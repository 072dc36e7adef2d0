//! Binary and string codecs, and callback-driven random fill.
//!
//! Binary import/export is big-endian and unsigned: it carries no sign and
//! no length prefix, matching the format RSA/DH/DSA wire encodings expect
//! a caller to frame on their own. String import/export additionally
//! carries an optional leading `-` and supports radices 2..16. Random fill
//! interprets caller-supplied random bytes as a big-endian unsigned value
//! of exactly the requested length, the same shape `is_prime` and
//! `gen_prime` (`super::numtheory`) already draw their candidates from.

use super::Mpi;
use crate::config::{Limb, LIMB_BYTES, MAX_LIMBS};
use crate::error::{MpiError, MpiResult};
use crate::rng::MpiRng;

const DIGITS: &[u8] = b"0123456789abcdef";

impl Mpi {
    /// Imports a big-endian unsigned magnitude. Grows `self` as needed and
    /// sets `sign = +1`; an empty slice decodes to zero.
    pub fn read_binary(buf: &[u8]) -> MpiResult<Mpi> {
        let trimmed = match buf.iter().position(|&b| b != 0) {
            Some(i) => &buf[i..],
            None => return Ok(Mpi::new()),
        };

        let nlimbs = trimmed.len().div_ceil(LIMB_BYTES);
        if nlimbs > MAX_LIMBS {
            return Err(MpiError::Alloc);
        }

        let mut limbs = vec![0 as Limb; nlimbs];
        // Fill from the least significant end: the last byte of `trimmed`
        // is the low byte of limb 0.
        for (i, &byte) in trimmed.iter().rev().enumerate() {
            let limb_idx = i / LIMB_BYTES;
            let byte_idx = i % LIMB_BYTES;
            limbs[limb_idx] |= (byte as Limb) << (byte_idx * 8);
        }

        Ok(Mpi::from_limbs_unsigned(limbs))
    }

    /// Exports `|self|` as a big-endian unsigned magnitude, left-padded
    /// with zeros to fill `buf` exactly.
    ///
    /// # Errors
    /// Returns [`MpiError::BufferTooSmall`] if `buf.len() < self.size()`.
    pub fn write_binary(&self, buf: &mut [u8]) -> MpiResult<()> {
        let needed = self.size();
        if buf.len() < needed {
            return Err(MpiError::BufferTooSmall);
        }

        for b in buf.iter_mut() {
            *b = 0;
        }
        for i in 0..needed {
            let limb_idx = i / LIMB_BYTES;
            let byte_idx = i % LIMB_BYTES;
            let limb = self.limbs().get(limb_idx).copied().unwrap_or(0);
            buf[buf.len() - 1 - i] = ((limb >> (byte_idx * 8)) & 0xff) as u8;
        }
        Ok(())
    }

    /// Parses a signed radix-`r` string (`r` in `2..=16`): an optional
    /// leading `-`, then digits `[0-9a-fA-F]`, case-insensitive for hex.
    ///
    /// # Errors
    /// Returns [`MpiError::BadInput`] if `radix` is outside `2..=16`, or
    /// [`MpiError::InvalidCharacter`] if a character falls outside the
    /// requested radix's alphabet (or the string has no digits at all).
    pub fn read_string(s: &str, radix: u32) -> MpiResult<Mpi> {
        if !(2..=16).contains(&radix) {
            return Err(MpiError::BadInput);
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() {
            return Err(MpiError::InvalidCharacter);
        }

        let mut radix_mpi = Mpi::new();
        radix_mpi.lset(radix as i64)?;

        let mut out = Mpi::new();
        for c in digits.chars() {
            let digit = c
                .to_digit(16)
                .filter(|&d| d < radix)
                .ok_or(MpiError::InvalidCharacter)?;
            out = super::signed::mul_mpi(&out, &radix_mpi)?;
            out = super::signed::add_int(&out, digit as i64)?;
        }

        if negative {
            out.set_sign_raw(-1);
        }
        Ok(out)
    }

    /// Writes `self` as a signed radix-`r` string into `buf`, returning the
    /// number of bytes written (not including a terminator).
    ///
    /// Calling with `buf.len() == 0` is a sizing query: it always fails
    /// with [`MpiError::BufferTooSmall`], and the value it would have
    /// needed (digits, plus one for a leading `-`, plus one for a NUL
    /// terminator, matching the C contract this mirrors) is returned
    /// through `needed_out` when provided.
    ///
    /// # Errors
    /// Returns [`MpiError::BadInput`] if `radix` is outside `2..=16`, or
    /// [`MpiError::BufferTooSmall`] if `buf` cannot hold the digits, sign,
    /// and terminator.
    pub fn write_string(
        &self,
        radix: u32,
        buf: &mut [u8],
        needed_out: Option<&mut usize>,
    ) -> MpiResult<usize> {
        if !(2..=16).contains(&radix) {
            return Err(MpiError::BadInput);
        }

        let digits = self.to_radix_digits(radix);
        let negative = self.is_negative();
        let needed = digits.len() + usize::from(negative) + 1; // + NUL

        if let Some(out) = needed_out {
            *out = needed;
        }
        if buf.len() < needed {
            return Err(MpiError::BufferTooSmall);
        }

        let mut i = 0;
        if negative {
            buf[i] = b'-';
            i += 1;
        }
        buf[i..i + digits.len()].copy_from_slice(&digits);
        i += digits.len();
        buf[i] = 0;
        Ok(i)
    }

    /// Renders `self` as a signed radix-`r` string, without the fixed
    /// buffer sizing dance [`Mpi::write_string`] exposes for C-style
    /// callers.
    ///
    /// # Errors
    /// Returns [`MpiError::BadInput`] if `radix` is outside `2..=16`.
    pub fn to_radix_string(&self, radix: u32) -> MpiResult<String> {
        if !(2..=16).contains(&radix) {
            return Err(MpiError::BadInput);
        }
        let digits = self.to_radix_digits(radix);
        let mut s = String::with_capacity(digits.len() + 1);
        if self.is_negative() {
            s.push('-');
        }
        s.push_str(std::str::from_utf8(&digits).expect("radix digits are ASCII"));
        Ok(s)
    }

    /// Renders `self` in hexadecimal (lowercase, no `0x` prefix), with a
    /// leading `-` for negative values. A convenience shorthand for
    /// `to_radix_string(16)`, intended for logging and test fixtures.
    pub fn to_hex_string(&self) -> String {
        let digits = self.to_radix_digits(16);
        let mut s = String::with_capacity(digits.len() + 1);
        if self.is_negative() {
            s.push('-');
        }
        s.push_str(std::str::from_utf8(&digits).expect("radix digits are ASCII"));
        s
    }

    /// Computes the unsigned digit string for `radix`, most significant
    /// digit first. Zero renders as a single `"0"`.
    fn to_radix_digits(&self, radix: u32) -> Vec<u8> {
        if self.is_zero() {
            return vec![b'0'];
        }

        let mut mag = self.clone();
        mag.set_sign_raw(1);

        let mut radix_mpi = Mpi::new();
        radix_mpi.lset(radix as i64).expect("radix fits one limb");

        let mut digits = Vec::new();
        while !mag.is_zero() {
            let (q, r) = super::signed::div_mpi(&mag, &radix_mpi).expect("radix is nonzero");
            let d = r.limbs().first().copied().unwrap_or(0);
            digits.push(DIGITS[d as usize]);
            mag = q;
        }
        digits.reverse();
        digits
    }

    /// Fills `self` from `nbytes` bytes drawn from `rng`, interpreted as a
    /// big-endian unsigned magnitude of exactly that length (`sign = +1`).
    /// The RNG's failure is propagated unchanged.
    pub fn fill_random(nbytes: usize, rng: &mut dyn MpiRng) -> MpiResult<Mpi> {
        let mut buf = vec![0u8; nbytes];
        rng.fill(&mut buf)?;
        Mpi::read_binary(&buf)
    }
}

impl TryFrom<&[u8]> for Mpi {
    type Error = MpiError;
    fn try_from(value: &[u8]) -> MpiResult<Mpi> {
        Mpi::read_binary(value)
    }
}

impl std::fmt::Display for Mpi {
    /// Renders `self` in decimal, matching [`Mpi::to_radix_string`] with
    /// `radix = 10`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_radix_string(10).expect("radix 10 is always valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_round_trip() {
        let mut x = Mpi::new();
        x.lset(0x00AB_CDEF).unwrap();
        let mut buf = [0u8; 8];
        x.write_binary(&mut buf).unwrap();
        let back = Mpi::read_binary(&buf).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn write_binary_rejects_too_small_buffer() {
        let mut x = Mpi::new();
        x.lset(0x1234_5678).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(x.write_binary(&mut buf).unwrap_err(), MpiError::BufferTooSmall);
    }

    #[test]
    fn read_binary_strips_leading_zero_bytes() {
        let buf = [0x00, 0x00, 0x01, 0x02];
        let x = Mpi::read_binary(&buf).unwrap();
        assert_eq!(x.size(), 2);
    }

    #[test]
    fn read_binary_of_empty_slice_is_zero() {
        assert!(Mpi::read_binary(&[]).unwrap().is_zero());
    }

    #[test]
    fn string_round_trip_all_radices() {
        let mut x = Mpi::new();
        x.lset(-987_654).unwrap();
        for radix in 2..=16u32 {
            let s = x.to_radix_string(radix).unwrap();
            let back = Mpi::read_string(&s, radix).unwrap();
            assert_eq!(back, x, "radix {radix}");
        }
    }

    #[test]
    fn read_string_rejects_bad_digit() {
        assert_eq!(
            Mpi::read_string("12g", 16).unwrap_err(),
            MpiError::InvalidCharacter
        );
        assert_eq!(
            Mpi::read_string("19", 8).unwrap_err(),
            MpiError::InvalidCharacter
        );
    }

    #[test]
    fn read_string_is_case_insensitive_for_hex() {
        let lower = Mpi::read_string("deadbeef", 16).unwrap();
        let upper = Mpi::read_string("DEADBEEF", 16).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn write_string_zero_length_buffer_is_sizing_query() {
        let mut x = Mpi::new();
        x.lset(255).unwrap();
        let mut needed = 0usize;
        let err = x.write_string(16, &mut [], Some(&mut needed)).unwrap_err();
        assert_eq!(err, MpiError::BufferTooSmall);
        assert_eq!(needed, 3); // "ff" + NUL terminator
        let mut buf = vec![0u8; needed];
        let len = x.write_string(16, &mut buf, None).unwrap();
        assert_eq!(&buf[..len], b"ff");
    }

    #[test]
    fn write_string_rejects_bad_radix() {
        let x = Mpi::new();
        assert_eq!(
            x.write_string(17, &mut [0u8; 8], None).unwrap_err(),
            MpiError::BadInput
        );
    }

    #[test]
    fn display_matches_decimal_radix_string() {
        let mut x = Mpi::new();
        x.lset(-42).unwrap();
        assert_eq!(format!("{x}"), "-42");
    }

    #[test]
    fn fill_random_produces_requested_length() {
        struct FixedRng(u8);
        impl MpiRng for FixedRng {
            fn fill(&mut self, buf: &mut [u8]) -> MpiResult<()> {
                buf.fill(self.0);
                Ok(())
            }
        }
        let mut rng = FixedRng(0x7f);
        let x = Mpi::fill_random(4, &mut rng).unwrap();
        assert_eq!(x.size(), 4);
        assert!(!x.is_negative());
    }

    #[test]
    fn fill_random_propagates_rng_failure() {
        struct FailingRng;
        impl MpiRng for FailingRng {
            fn fill(&mut self, _buf: &mut [u8]) -> MpiResult<()> {
                Err(MpiError::BadInput)
            }
        }
        assert_eq!(
            Mpi::fill_random(4, &mut FailingRng).unwrap_err(),
            MpiError::BadInput
        );
    }
}
