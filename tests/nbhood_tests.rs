mod common;

use common::{assert_plane_matches, masked_fixture, ones_with_zero_centre, RADIUS, SPACING};
use gridsmooth::{
    neighbourhood_average, FieldStack, Float, Mask, Mode, NeighbourhoodConfig, Plane,
};
use num_complex::Complex;

fn mean_cfg(re_mask: bool) -> NeighbourhoodConfig {
    NeighbourhoodConfig {
        radius: RADIUS,
        mode: Mode::Mean,
        re_mask,
    }
}

#[test]
fn test_mean_with_central_hole() {
    let (out, out_mask) =
        neighbourhood_average(&ones_with_zero_centre(), None, SPACING, &mean_cfg(true)).unwrap();
    let expected = vec![
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
    ];
    assert_plane_matches(&out, &expected, 1e-6);
    // a zero data value is valid data, not a hole
    assert!(!out_mask.any());
}

#[test]
fn test_uniform_plane_is_a_fixed_point() {
    let plane: Plane = Plane::filled(5, 5, 0.4);
    let (out, _) = neighbourhood_average(&plane, None, SPACING, &mean_cfg(true)).unwrap();
    for &v in out.data() {
        assert!((v - 0.4).abs() < 1e-6);
    }
}

#[test]
fn test_masked_mean_re_mask_true() {
    let (data, mask) = masked_fixture();
    let (out, out_mask) =
        neighbourhood_average(&data, Some(&mask), SPACING, &mean_cfg(true)).unwrap();
    let expected = vec![
        vec![1.0, 0.666667, 0.600000, 0.500000, 0.50],
        vec![1.0, 0.750000, 0.571429, 0.428571, 0.25],
        vec![1.0, 1.000000, 0.714286, 0.571429, 0.25],
        vec![Float::NAN, 1.000000, 0.666667, 0.571429, 0.25],
        vec![Float::NAN, 1.000000, 0.750000, 0.750000, 0.50],
    ];
    assert_plane_matches(&out, &expected, 1e-5);
    // output mask reproduces the input mask: the windows left without
    // any valid neighbour all sit under already-masked cells here
    for i in 0..5 {
        for j in 0..5 {
            assert_eq!(out_mask.is_masked(i, j), mask.is_masked(i, j), "({}, {})", i, j);
        }
    }
}

#[test]
fn test_masked_mean_re_mask_false() {
    let (data, mask) = masked_fixture();
    let (out, out_mask) =
        neighbourhood_average(&data, Some(&mask), SPACING, &mean_cfg(false)).unwrap();
    // identical values, but nothing is re-masked; the two degenerate
    // windows still surface as NaN
    assert!(!out_mask.any());
    assert!(out.at(3, 0).is_nan());
    assert!(out.at(4, 0).is_nan());
    assert!((out.at(1, 2) - 0.571429).abs() < 1e-5);
}

#[test]
fn test_nan_input_cell() {
    let mut data = ones_with_zero_centre();
    data.set(0, 0, Float::NAN);
    let (out, out_mask) = neighbourhood_average(&data, None, SPACING, &mean_cfg(true)).unwrap();
    let expected = vec![
        vec![Float::NAN, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 0.875, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
    ];
    assert_plane_matches(&out, &expected, 1e-6);
    assert!(out_mask.is_masked(0, 0));
}

#[test]
fn test_nan_and_mask_give_identical_valid_cells() {
    let mut with_nan = ones_with_zero_centre();
    with_nan.set(1, 3, Float::NAN);
    let (out_nan, _) = neighbourhood_average(&with_nan, None, SPACING, &mean_cfg(true)).unwrap();

    let mut mask = Mask::none(5, 5);
    mask.set(1, 3, true);
    let (out_masked, _) =
        neighbourhood_average(&ones_with_zero_centre(), Some(&mask), SPACING, &mean_cfg(true))
            .unwrap();

    for i in 0..5 {
        for j in 0..5 {
            if (i, j) == (1, 3) {
                continue;
            }
            assert!(
                (out_nan.at(i, j) - out_masked.at(i, j)).abs() < 1e-6,
                "({}, {})",
                i,
                j
            );
        }
    }
}

#[test]
fn test_complex_plane() {
    let mut data: Plane<Complex<Float>> = Plane::filled(5, 5, Complex::new(1.0, 0.0));
    data.set(2, 2, Complex::new(0.0, 0.0));
    data.set(1, 3, Complex::new(0.5, 0.5));
    data.set(4, 3, Complex::new(0.4, 0.6));
    let (out, _) = neighbourhood_average(&data, None, SPACING, &mean_cfg(true)).unwrap();
    let expected: Vec<Vec<(Float, Float)>> = vec![
        vec![
            (1.0, 0.0),
            (1.0, 0.0),
            (0.91666667, 0.08333333),
            (0.91666667, 0.08333333),
            (0.875, 0.125),
        ],
        vec![
            (1.0, 0.0),
            (0.88888889, 0.0),
            (0.83333333, 0.05555556),
            (0.83333333, 0.05555556),
            (0.91666667, 0.08333333),
        ],
        vec![
            (1.0, 0.0),
            (0.88888889, 0.0),
            (0.83333333, 0.05555556),
            (0.83333333, 0.05555556),
            (0.91666667, 0.08333333),
        ],
        vec![
            (1.0, 0.0),
            (0.88888889, 0.0),
            (0.82222222, 0.06666667),
            (0.82222222, 0.06666667),
            (0.9, 0.1),
        ],
        vec![(1.0, 0.0), (1.0, 0.0), (0.9, 0.1), (0.9, 0.1), (0.85, 0.15)],
    ];
    for (i, row) in expected.iter().enumerate() {
        for (j, &(re, im)) in row.iter().enumerate() {
            let v = out.at(i, j);
            assert!((v.re - re).abs() < 1e-6, "re ({}, {}): {}", i, j, v.re);
            assert!((v.im - im).abs() < 1e-6, "im ({}, {}): {}", i, j, v.im);
        }
    }
}

#[test]
fn test_stack_of_planes() {
    let mut second: Plane = Plane::filled(5, 5, 1.0);
    second.set(1, 2, 0.0);
    let stack = FieldStack::new(vec![ones_with_zero_centre(), second]).unwrap();
    let out = stack.neighbourhood_average_all(SPACING, &mean_cfg(true)).unwrap();
    let expected_1 = vec![
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
    ];
    let expected_2 = vec![
        vec![1.0, 0.83333333, 0.83333333, 0.83333333, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 0.88888889, 0.88888889, 0.88888889, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 1.0],
    ];
    assert_plane_matches(out.plane(0), &expected_1, 1e-6);
    assert_plane_matches(out.plane(1), &expected_2, 1e-6);
}

#[test]
fn test_sum_mode_over_masked_fixture() {
    let (data, mask) = masked_fixture();
    let cfg = NeighbourhoodConfig {
        radius: RADIUS,
        mode: Mode::Sum,
        re_mask: false,
    };
    let (out, _) = neighbourhood_average(&data, Some(&mask), SPACING, &cfg).unwrap();
    // valid cells in the window of (0, 2): (0,2)=0, (0,3)=1, (1,1)=1,
    // (1,2)=1, (1,3)=0
    assert!((out.at(0, 2) - 3.0).abs() < 1e-6);
    // no valid neighbours at all
    assert!((out.at(3, 0) - 0.0).abs() < 1e-6);
}
