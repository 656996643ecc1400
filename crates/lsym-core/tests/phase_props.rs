use lsym_core::{gcd, Bits512, LsError, Phase};
use proptest::prelude::*;

proptest! {
    #[test]
    fn phases_stay_reduced(a in 0u32..64, b in 1u32..64, c in 0u32..64, d in 1u32..64) {
        let x = Phase::new(a, b).unwrap();
        let y = Phase::new(c, d).unwrap();
        let z = x.add(y).unwrap();
        prop_assert!(z.numerator() < z.denominator());
        prop_assert_eq!(gcd(u64::from(z.numerator()), u64::from(z.denominator())), 1);
        prop_assert_eq!(z, y.add(x).unwrap());
    }

    #[test]
    fn wide_denominators_add_exactly(
        a in any::<u32>(),
        b in (u32::MAX - 1024)..=u32::MAX,
        c in any::<u32>(),
        d in 1u32..=u32::MAX,
    ) {
        let x = Phase::new(a, b).unwrap();
        let y = Phase::new(c, d).unwrap();
        match x.add(y) {
            Ok(z) => {
                prop_assert!(z.numerator() < z.denominator());
                // x + y and z differ by an integer.
                let (xn, xd) = (u128::from(x.numerator()), u128::from(x.denominator()));
                let (yn, yd) = (u128::from(y.numerator()), u128::from(y.denominator()));
                let (zn, zd) = (u128::from(z.numerator()), u128::from(z.denominator()));
                let sum = xn * yd + yn * xd;
                let modulus = xd * yd * zd;
                prop_assert_eq!((sum * zd) % modulus, (zn * xd * yd) % modulus);
            }
            Err(err) => prop_assert!(matches!(err, LsError::IncompatibleSymmetries(_))),
        }
    }

    #[test]
    fn wide_order_matches_u128(a in any::<u128>(), b in any::<u128>()) {
        let x = Bits512::from_u128(a);
        let y = Bits512::from_u128(b);
        prop_assert_eq!(x.cmp(&y), a.cmp(&b));
    }

    #[test]
    fn wide_parse_round_trips(a in any::<u128>()) {
        let x = Bits512::from_u128(a);
        let parsed: Bits512 = x.to_string().parse().unwrap();
        prop_assert_eq!(parsed, x);
    }
}

#[test]
fn zero_denominator_is_rejected() {
    assert!(Phase::new(1, 0).is_err());
}

#[test]
fn sums_near_the_top_of_u32_do_not_overflow() {
    let max = u32::MAX;
    let x = Phase::new(max - 1, max).unwrap();
    assert_eq!(x.add(x).unwrap(), Phase::new(max - 2, max).unwrap());

    let big_order = 3_234_846_615u32;
    let t = Phase::new(big_order - 1, big_order).unwrap();
    assert_eq!(t.add(t).unwrap(), Phase::new(big_order - 2, big_order).unwrap());
}

#[test]
fn unrepresentable_denominator_is_an_error() {
    let x = Phase::new(1, u32::MAX).unwrap();
    let y = Phase::new(1, u32::MAX - 1).unwrap();
    assert!(matches!(
        x.add(y),
        Err(LsError::IncompatibleSymmetries(_))
    ));
}
