//! Cross-cutting codec behavior beyond what `mpi::codec`'s own unit tests
//! cover: round-trips across both binary and string encodings, and the
//! buffer-sizing edge cases the spec calls out explicitly (S9 in the
//! testable-properties section).

use mpi::error::MpiError;
use mpi::rng::MpiRng;
use mpi::Mpi;

fn dec(v: i64) -> Mpi {
    let mut m = Mpi::new();
    m.lset(v).unwrap();
    m
}

#[test]
fn binary_round_trip_matches_magnitude() {
    let mut x = Mpi::new();
    x.lset(-123_456_789).unwrap();

    let mut buf = vec![0u8; x.size()];
    x.write_binary(&mut buf).unwrap();
    let back = Mpi::read_binary(&buf).unwrap();

    // Binary codec is unsigned: round-tripping a negative value yields
    // its magnitude, sign +1, per spec S9 ("read_binary(write_binary(X))
    // = |X|").
    assert!(!back.is_negative());
    assert_eq!(back.size(), x.size());
}

#[test]
fn string_round_trip_across_all_radices() {
    for &v in &[0i64, 1, -1, 255, -255, 65535, i64::from(u16::MAX) + 1] {
        let x = dec(v);
        for radix in 2..=16u32 {
            let s = x.to_radix_string(radix).unwrap();
            let back = Mpi::read_string(&s, radix).unwrap();
            assert_eq!(back, x, "v={v} radix={radix}");
        }
    }
}

#[test]
fn write_binary_buffer_too_small_leaves_destination_error() {
    let mut x = Mpi::new();
    x.lset(0x0102_0304).unwrap();
    let mut tiny = [0u8; 1];
    assert_eq!(x.write_binary(&mut tiny).unwrap_err(), MpiError::BufferTooSmall);
}

#[test]
fn write_string_sizing_query_then_success() {
    let mut x = Mpi::new();
    x.lset(-4096).unwrap();

    let mut needed = 0usize;
    assert_eq!(
        x.write_string(16, &mut [], Some(&mut needed)).unwrap_err(),
        MpiError::BufferTooSmall
    );

    let mut buf = vec![0u8; needed];
    let len = x.write_string(16, &mut buf, None).unwrap();
    assert_eq!(&buf[..len], b"-1000");
}

#[test]
fn read_string_rejects_invalid_digit_for_radix() {
    assert_eq!(
        Mpi::read_string("102", 2).unwrap_err(),
        MpiError::InvalidCharacter
    );
}

#[test]
fn read_string_rejects_out_of_range_radix() {
    assert_eq!(Mpi::read_string("10", 1).unwrap_err(), MpiError::BadInput);
    assert_eq!(Mpi::read_string("10", 17).unwrap_err(), MpiError::BadInput);
}

#[test]
fn fill_random_yields_exact_byte_length_and_propagates_rng_errors() {
    struct Pattern(u8);
    impl MpiRng for Pattern {
        fn fill(&mut self, buf: &mut [u8]) -> Result<(), MpiError> {
            buf.fill(self.0);
            Ok(())
        }
    }

    let mut rng = Pattern(0x5a);
    let x = Mpi::fill_random(16, &mut rng).unwrap();
    assert_eq!(x.size(), 16);

    let mut failing = |_: &mut [u8]| Err(MpiError::BadInput);
    assert_eq!(Mpi::fill_random(8, &mut failing).unwrap_err(), MpiError::BadInput);
}

#[test]
fn try_from_bytes_matches_read_binary() {
    let buf = [0xDE, 0xAD, 0xBE, 0xEF];
    let via_trait: Mpi = Mpi::try_from(&buf[..]).unwrap();
    let via_method = Mpi::read_binary(&buf).unwrap();
    assert_eq!(via_trait, via_method);
}

#[test]
fn display_renders_decimal_with_sign() {
    assert_eq!(format!("{}", dec(42)), "42");
    assert_eq!(format!("{}", dec(-42)), "-42");
    assert_eq!(format!("{}", Mpi::new()), "0");
}
