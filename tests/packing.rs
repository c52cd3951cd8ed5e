//! Packing layout and lane-level properties of vectors.

use num::complex::Complex64;
use simdlanes::harness::{self, pack, random_scalars, unpack};
use simdlanes::{
    capabilities, ArithOp, DivideOp, Generic, Scalar, UnaryMinusOp, Vector, VectorError,
};

#[test]
fn test_pack_round_trip_is_exact() {
    let scalars = random_scalars::<f64>(4096, 99);

    let by_four = pack::<f64, 4, Generic>(&scalars).unwrap();
    let by_sixty_four = pack::<f64, 64, Generic>(&scalars).unwrap();

    assert_eq!(by_four.len(), 1024);
    assert_eq!(by_sixty_four.len(), 64);
    assert_eq!(unpack(&by_four), scalars);
    assert_eq!(unpack(&by_sixty_four), scalars);
}

#[test]
fn test_lane_j_of_vector_i_is_scalar_i_l_plus_j() {
    let scalars = random_scalars::<Complex64>(96, 3);
    let packed = pack::<Complex64, 32, Generic>(&scalars).unwrap();

    for (k, &scalar) in scalars.iter().enumerate() {
        assert_eq!(packed[k / 32][k % 32], scalar, "scalar {k}");
    }
}

#[test]
fn test_pack_rejects_lengths_that_are_not_a_multiple() {
    let scalars = random_scalars::<f64>(30, 1);
    let error = pack::<f64, 8, Generic>(&scalars).unwrap_err();

    assert!(matches!(error, VectorError::Length { len: 30, lanes: 8, .. }));
    println!("{error}");
}

#[test]
fn test_adding_the_negation_gives_zero() {
    let scalars = random_scalars::<f64>(256, 5);
    for v in pack::<f64, 8, Generic>(&scalars).unwrap() {
        let sum = v + (-v);
        assert!(sum.iter().all(|&lane| lane == 0.0), "{v} + (-{v}) = {sum}");
    }

    let scalars = random_scalars::<Complex64>(256, 6);
    for v in pack::<Complex64, 4, Generic>(&scalars).unwrap() {
        let sum = v + (-v);
        assert!(sum.iter().all(|lane| lane.re == 0.0 && lane.im == 0.0));
    }
}

#[test]
fn test_division_by_zero_matches_scalar_ieee() {
    let a = vec![1.0, -2.0, 0.0, 3.5, -0.0, f64::INFINITY, 7.0, 1e-300];
    let b = vec![0.0, 0.0, 0.0, -0.0, 0.0, 0.0, f64::INFINITY, 0.0];

    let mut expected = vec![0.0; 8];
    harness::reference::<DivideOp, f64>(&a, &b, &mut expected);

    let quotient = Vector::<f64, 8, Generic>::new(a.clone().try_into().unwrap())
        / Vector::new(b.clone().try_into().unwrap());

    for j in 0..8 {
        // NaN sign and payload are not fixed by IEEE; only NaN-ness is compared.
        if expected[j].is_nan() {
            assert!(quotient[j].is_nan(), "{} / {} gave {}", a[j], b[j], quotient[j]);
            continue;
        }

        assert_eq!(
            quotient[j].to_bits(),
            expected[j].to_bits(),
            "{} / {} gave {} instead of {}",
            a[j],
            b[j],
            quotient[j],
            expected[j]
        );
    }
}

#[test]
fn test_in_place_negate_through_parallel_for() {
    let scalars = random_scalars::<f64>(64, 11);
    let packed = pack::<f64, 4, Generic>(&scalars).unwrap();
    let mut negated = packed.clone();

    harness::parallel_for::<UnaryMinusOp, Vector<f64, 4, Generic>>(&packed, &packed, &mut negated);

    for (x, y) in unpack(&negated).iter().zip(&scalars) {
        assert_eq!(*x, -*y);
    }
}

#[test]
fn test_capabilities_of_generic_vectors() {
    type V = Vector<Complex64, 32, Generic>;

    assert!(ArithOp::ALL.into_iter().all(V::supports));
    assert_eq!(V::capabilities(), capabilities::<Complex64, Generic>());
    assert_eq!(V::label(), "generic");
    assert_eq!(<Complex64 as Scalar>::NAME, V::capabilities().scalar);
}
