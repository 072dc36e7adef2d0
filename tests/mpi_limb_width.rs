//! Boundary scenarios (S1-S6) and universally-quantified invariants from
//! the arithmetic core's testable-properties section, run against
//! whichever limb width the crate was built with.
//!
//! Run once with the default 64-bit limbs and once with `--features
//! limb32`; both runs must produce identical results, since the spec
//! requires the same numeric outcomes regardless of `Limb`'s width.

use mpi::mpi::expmod::exp_mod;
use mpi::mpi::numtheory::{gcd, inv_mod, is_prime};
use mpi::mpi::signed::{add_mpi, cmp_mpi, div_mpi, mod_mpi, mul_mpi, negate, sub_mpi};
use mpi::rng::Csprng;
use mpi::Mpi;

fn hex(s: &str) -> Mpi {
    Mpi::read_string(s, 16).unwrap()
}

fn dec(v: i64) -> Mpi {
    let mut m = Mpi::new();
    m.lset(v).unwrap();
    m
}

#[test]
fn s1_division_boundary_scenario() {
    let a = hex("DEADBEEFCAFEBABE");
    let b = hex("100000001");
    let (q, r) = div_mpi(&a, &b).unwrap();
    assert_eq!(q, hex("DEADBEEE"));
    assert_eq!(r, hex("DCAFFAD0"));
    assert_eq!(add_mpi(&mul_mpi(&q, &b).unwrap(), &r).unwrap(), a);
}

#[test]
fn s2_mod_with_negative_dividend() {
    let a = negate(&dec(17));
    let b = dec(5);
    assert_eq!(mod_mpi(&a, &b).unwrap(), dec(3));
}

#[test]
fn s3_exp_mod_small() {
    assert_eq!(exp_mod(&dec(4), &dec(13), &dec(497), None).unwrap(), dec(445));
}

#[test]
fn s4_inv_mod() {
    assert_eq!(inv_mod(&dec(3), &dec(11)).unwrap(), dec(4));
}

#[test]
fn s5_gcd() {
    assert_eq!(gcd(&dec(693), &dec(609)).unwrap(), dec(21));
}

#[test]
fn s6_primality_mersenne_and_fermat() {
    let mut rng = Csprng::from_seed([11u8; 32]);

    let mut mersenne = Mpi::new();
    mersenne.set_bit(127, 1).unwrap();
    mersenne = sub_mpi(&mersenne, &dec(1)).unwrap();
    assert!(is_prime(&mersenne, &mut rng).is_ok());

    let mut fermat = Mpi::new();
    fermat.set_bit(64, 1).unwrap();
    fermat = add_mpi(&fermat, &dec(1)).unwrap();
    assert!(is_prime(&fermat, &mut rng).is_err());
}

#[test]
fn invariant_negate_then_add_is_canonical_zero() {
    let a = hex("CAFEBABEDEADBEEF");
    let z = add_mpi(&a, &negate(&a)).unwrap();
    assert!(z.is_zero());
    assert!(!z.is_negative());
}

#[test]
fn invariant_add_then_subtract_is_identity() {
    let a = hex("1234567890ABCDEF1122334455");
    let b = hex("FEDCBA0987654321");
    assert_eq!(sub_mpi(&add_mpi(&a, &b).unwrap(), &b).unwrap(), a);
}

#[test]
fn invariant_multiplication_commutes_and_associates() {
    let a = hex("1122334455667788");
    let b = hex("99AABBCCDDEEFF00");
    let c = dec(12345);

    assert_eq!(mul_mpi(&a, &b).unwrap(), mul_mpi(&b, &a).unwrap());
    assert_eq!(
        mul_mpi(&mul_mpi(&a, &b).unwrap(), &c).unwrap(),
        mul_mpi(&a, &mul_mpi(&b, &c).unwrap()).unwrap()
    );
}

#[test]
fn invariant_division_identity_and_remainder_bound() {
    let a = hex("DEADBEEFCAFEBABE1234567890");
    let b = hex("987654321");
    let (q, r) = div_mpi(&a, &b).unwrap();
    assert_eq!(add_mpi(&mul_mpi(&q, &b).unwrap(), &r).unwrap(), a);
    assert!(mpi::mpi::unsigned::cmp_abs(&r, &b) == std::cmp::Ordering::Less);
}

#[test]
fn invariant_mod_is_always_non_negative() {
    let b = dec(97);
    for v in [-1000i64, -3, 0, 3, 1000] {
        let a = dec(v);
        let r = mod_mpi(&a, &b).unwrap();
        assert!(cmp_mpi(&r, &Mpi::new()) != std::cmp::Ordering::Less);
        assert!(cmp_mpi(&r, &b) == std::cmp::Ordering::Less);
    }
}

#[test]
fn invariant_exp_mod_respects_identity_and_additive_exponents() {
    let a = dec(7);
    let n = dec(101);
    let e1 = dec(11);
    let e2 = dec(19);

    assert_eq!(exp_mod(&a, &dec(0), &n, None).unwrap(), dec(1));
    assert_eq!(exp_mod(&a, &dec(1), &n, None).unwrap(), mod_mpi(&a, &n).unwrap());

    let lhs = exp_mod(&a, &dec(30), &n, None).unwrap();
    let rhs = mod_mpi(
        &mul_mpi(
            &exp_mod(&a, &e1, &n, None).unwrap(),
            &exp_mod(&a, &e2, &n, None).unwrap(),
        )
        .unwrap(),
        &n,
    )
    .unwrap();
    assert_eq!(lhs, rhs);
}

#[test]
fn invariant_inv_mod_round_trips() {
    let a = dec(17);
    let n = dec(3120);
    let inv = inv_mod(&a, &n).unwrap();
    assert_eq!(mod_mpi(&mul_mpi(&a, &inv).unwrap(), &n).unwrap(), dec(1));
}

#[test]
fn invariant_gcd_divides_both_operands() {
    let a = hex("1A4");
    let b = hex("261");
    let g = gcd(&a, &b).unwrap();
    assert!(mod_mpi(&a, &g).unwrap().is_zero());
    assert!(mod_mpi(&b, &g).unwrap().is_zero());

    assert_eq!(gcd(&a, &Mpi::new()).unwrap(), a);
}
