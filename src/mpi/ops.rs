//! Idiomatic operator overloads over the named fallible functions in
//! [`super::signed`].
//!
//! These exist purely for ergonomics (`&a + &b` instead of
//! `signed::add_mpi(&a, &b)?`); they panic on the same conditions the
//! underlying function documents as programmer error (allocation beyond
//! `MAX_LIMBS`, division by zero), matching the teacher's `impl Add for
//! U256` convention of an infallible operator over a fallible primitive.
//! Code that needs to handle those conditions should call the named
//! function in `signed` directly instead of the operator.

use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use super::signed;
use super::Mpi;

impl Add for &Mpi {
    type Output = Mpi;
    fn add(self, rhs: &Mpi) -> Mpi {
        signed::add_mpi(self, rhs).expect("addition exceeded MAX_LIMBS")
    }
}

impl Sub for &Mpi {
    type Output = Mpi;
    fn sub(self, rhs: &Mpi) -> Mpi {
        signed::sub_mpi(self, rhs).expect("subtraction exceeded MAX_LIMBS")
    }
}

impl Mul for &Mpi {
    type Output = Mpi;
    fn mul(self, rhs: &Mpi) -> Mpi {
        signed::mul_mpi(self, rhs).expect("multiplication exceeded MAX_LIMBS")
    }
}

impl Div for &Mpi {
    type Output = Mpi;
    fn div(self, rhs: &Mpi) -> Mpi {
        signed::div_mpi(self, rhs)
            .expect("division by zero or allocation exceeded MAX_LIMBS")
            .0
    }
}

impl Rem for &Mpi {
    type Output = Mpi;
    fn rem(self, rhs: &Mpi) -> Mpi {
        signed::div_mpi(self, rhs)
            .expect("division by zero or allocation exceeded MAX_LIMBS")
            .1
    }
}

impl Neg for &Mpi {
    type Output = Mpi;
    fn neg(self) -> Mpi {
        signed::negate(self)
    }
}

impl Neg for Mpi {
    type Output = Mpi;
    fn neg(self) -> Mpi {
        signed::negate(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_i64(v: i64) -> Mpi {
        let mut m = Mpi::new();
        m.lset(v).unwrap();
        m
    }

    #[test]
    fn operators_match_named_functions() {
        let a = from_i64(17);
        let b = from_i64(5);
        assert_eq!(&a + &b, signed::add_mpi(&a, &b).unwrap());
        assert_eq!(&a - &b, signed::sub_mpi(&a, &b).unwrap());
        assert_eq!(&a * &b, signed::mul_mpi(&a, &b).unwrap());
        assert_eq!(&a / &b, signed::div_mpi(&a, &b).unwrap().0);
        assert_eq!(&a % &b, signed::div_mpi(&a, &b).unwrap().1);
        assert_eq!(-&a, signed::negate(&a));
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn div_by_zero_panics() {
        let a = from_i64(1);
        let zero = Mpi::new();
        let _ = &a / &zero;
    }
}
