#![allow(dead_code)]

use gridsmooth::{Float, Mask, Plane};

/// Grid spacing (m) shared by the fixture planes.
pub const SPACING: Float = 2000.0;
/// Search radius (m) reaching exactly one cell at [`SPACING`].
pub const RADIUS: Float = 2500.0;

/// 5x5 plane of ones with a zero at the centre.
pub fn ones_with_zero_centre() -> Plane {
    let mut p: Plane = Plane::filled(5, 5, 1.0);
    p.set(2, 2, 0.0);
    p
}

/// 5x5 plane of zeros carrying a "+"-shaped bump, peaking at the
/// centre and decaying along both arms.
pub fn bump_plane() -> Plane {
    Plane::from_rows(&[
        vec![0.00, 0.00, 0.10, 0.00, 0.00],
        vec![0.00, 0.00, 0.25, 0.00, 0.00],
        vec![0.10, 0.25, 0.50, 0.25, 0.10],
        vec![0.00, 0.00, 0.25, 0.00, 0.00],
        vec![0.00, 0.00, 0.10, 0.00, 0.00],
    ])
}

/// 5x5 binary plane with a mask leaving a ragged band of valid cells.
pub fn masked_fixture() -> (Plane, Mask) {
    let data: Plane = Plane::from_rows(&[
        vec![1.0, 1.0, 0.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0, 0.0, 0.0],
        vec![1.0, 0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0, 0.0, 1.0],
    ]);
    let mask = Mask::from_flags(&[
        vec![1, 1, 0, 0, 1],
        vec![1, 0, 0, 0, 1],
        vec![1, 1, 0, 0, 0],
        vec![1, 1, 0, 0, 1],
        vec![1, 1, 0, 0, 1],
    ]);
    (data, mask)
}

/// Cell-by-cell comparison against a nested-row fixture; NaN entries in
/// the fixture demand NaN in the result.
pub fn assert_plane_matches(actual: &Plane, expected: &[Vec<Float>], eps: Float) {
    assert_eq!(actual.shape(), (expected.len(), expected[0].len()));
    for (i, row) in expected.iter().enumerate() {
        for (j, &e) in row.iter().enumerate() {
            let a = actual.at(i, j);
            if e.is_nan() {
                assert!(a.is_nan(), "expected NaN at ({}, {}), got {}", i, j, a);
            } else {
                assert!(
                    (a - e).abs() < eps,
                    "mismatch at ({}, {}): got {}, expected {}",
                    i,
                    j,
                    a,
                    e
                );
            }
        }
    }
}
