// boresight_core/src/math.rs

//! Vector and rotation primitives.
//!
//! Every rotation in the library is a `Rotation3<f64>`: a 3x3 matrix that is
//! orthonormal (`R * Rᵀ = I`) and proper (`det R = +1`). Constructors that accept
//! raw numbers are marked as such. Configuration input goes through
//! `checked_rotation_from_rows`, which validates and then snaps to the nearest
//! exact rotation.

use nalgebra::{Matrix3, Rotation3, Unit, UnitQuaternion, Vector3};

use crate::error::{Result, TransformError};

/// Tolerance used when checking that a matrix is a proper rotation.
/// Loose enough for the 3-4 significant digit matrices people type by hand.
pub const ROTATION_TOLERANCE: f64 = 1e-3;

/// Unit basis vectors `i`, `j`, `k` in the order they appear as rotation columns.
pub fn unit_vectors() -> [Vector3<f64>; 3] {
    [Vector3::x(), Vector3::y(), Vector3::z()]
}

/// Matrix-vector product `R * v`.
pub fn apply(rotation: &Rotation3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    rotation * v
}

/// Matrix product `a * b`. Order matters: composing "A-from-B" with "B-from-C"
/// yields "A-from-C".
pub fn compose(a: &Rotation3<f64>, b: &Rotation3<f64>) -> Rotation3<f64> {
    a * b
}

/// The inverse of a rotation, computed as its transpose.
///
/// Only valid because every `Rotation3` in the library is orthonormal. A matrix
/// built with `rotation_from_rows`/`rotation_from_columns` from numbers that are not
/// orthonormal gets a wrong answer here, not an error.
pub fn invert(rotation: &Rotation3<f64>) -> Rotation3<f64> {
    rotation.transpose()
}

/// Returns `true` when `m` is orthonormal and proper within `tolerance`.
pub fn is_rotation(m: &Matrix3<f64>, tolerance: f64) -> bool {
    let orthonormal_error = (m * m.transpose() - Matrix3::identity()).amax();
    orthonormal_error <= tolerance && (m.determinant() - 1.0).abs() <= tolerance
}

/// Builds a rotation from its three rows without checking the invariant.
pub fn rotation_from_rows(rows: &[[f64; 3]; 3]) -> Rotation3<f64> {
    Rotation3::from_matrix_unchecked(Matrix3::new(
        rows[0][0], rows[0][1], rows[0][2], //
        rows[1][0], rows[1][1], rows[1][2], //
        rows[2][0], rows[2][1], rows[2][2],
    ))
}

/// Builds a rotation whose columns are `columns`, without checking the invariant.
pub fn rotation_from_columns(columns: &[Vector3<f64>; 3]) -> Rotation3<f64> {
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(columns))
}

/// Like `rotation_from_rows`, but rejects matrices that are not proper rotations
/// within `ROTATION_TOLERANCE`. Accepted matrices are replaced by the nearest exact
/// rotation, so the transpose is the inverse to machine precision.
/// `label` names the offending input in the error.
pub fn checked_rotation_from_rows(rows: &[[f64; 3]; 3], label: &str) -> Result<Rotation3<f64>> {
    let rotation = rotation_from_rows(rows);
    if !is_rotation(rotation.matrix(), ROTATION_TOLERANCE) {
        return Err(TransformError::NotARotation(label.to_string()));
    }
    // Start the iteration from an exact rotation close to the input.
    let guess = UnitQuaternion::from_rotation_matrix(&rotation).to_rotation_matrix();
    Ok(Rotation3::from_matrix_eps(rotation.matrix(), 1e-12, 100, guess))
}

/// The columns of `rotation`. For a rotation that converts frame-F vectors into
/// frame-P vectors these are F's `i`, `j`, `k` axes expressed in P.
pub fn basis_vectors(rotation: &Rotation3<f64>) -> [Vector3<f64>; 3] {
    let m = rotation.matrix();
    [
        m.column(0).into_owned(),
        m.column(1).into_owned(),
        m.column(2).into_owned(),
    ]
}

/// Angle in radians between two non-zero vectors, robust near 0 and π.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

fn elementary_axis(axis: char) -> Option<Unit<Vector3<f64>>> {
    match axis.to_ascii_lowercase() {
        'x' => Some(Vector3::x_axis()),
        'y' => Some(Vector3::y_axis()),
        'z' => Some(Vector3::z_axis()),
        _ => None,
    }
}

/// Builds a rotation matrix from an euler sequence, angles in degrees.
///
/// Lowercase axes (`"yz"`) are extrinsic, uppercase (`"YZ"`) intrinsic; mixing the
/// two is rejected. The matrix produced is the same one scipy's
/// `Rotation.from_euler(seq, angles, degrees=True).as_matrix()` returns, e.g.
/// `("y", [-30])` gives `[[0.866, 0, -0.5], [0, 1, 0], [0.5, 0, 0.866]]`.
pub fn rotation_from_euler_deg(sequence: &str, degrees: &[f64]) -> Result<Rotation3<f64>> {
    let invalid = |why: &str| TransformError::InvalidEulerSequence(format!("'{sequence}': {why}"));

    if sequence.is_empty() || sequence.len() > 3 {
        return Err(invalid("expected one to three axes"));
    }
    if sequence.chars().count() != degrees.len() {
        return Err(invalid("one angle is required per axis"));
    }
    let extrinsic = sequence.chars().all(|c| c.is_ascii_lowercase());
    let intrinsic = sequence.chars().all(|c| c.is_ascii_uppercase());
    if !extrinsic && !intrinsic {
        return Err(invalid("axes must be all lowercase (extrinsic) or all uppercase (intrinsic)"));
    }

    let mut rotation = Rotation3::identity();
    for (axis, angle) in sequence.chars().zip(degrees) {
        let axis = elementary_axis(axis).ok_or_else(|| invalid("axes must be x, y or z"))?;
        let step = Rotation3::from_axis_angle(&axis, angle.to_radians());
        // Extrinsic steps act in the fixed frame and stack on the left.
        rotation = if extrinsic { step * rotation } else { rotation * step };
    }
    Ok(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn transpose_is_inverse() {
        let r = rotation_from_euler_deg("zyx", &[20.0, -35.0, 110.0]).unwrap();
        assert_relative_eq!(
            compose(&r, &invert(&r)),
            Rotation3::identity(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn compose_chains_frames_in_order() {
        // A-from-B * B-from-C == A-from-C, and the order cannot be swapped.
        let a_from_b = rotation_from_euler_deg("z", &[90.0]).unwrap();
        let b_from_c = rotation_from_euler_deg("x", &[90.0]).unwrap();
        let a_from_c = compose(&a_from_b, &b_from_c);

        let v = Vector3::new(0.3, -1.2, 2.0);
        assert_relative_eq!(
            apply(&a_from_c, &v),
            apply(&a_from_b, &apply(&b_from_c, &v)),
            epsilon = 1e-12
        );
        assert!((compose(&b_from_c, &a_from_b).matrix() - a_from_c.matrix()).norm() > 0.5);
    }

    #[test]
    fn euler_matches_known_matrices() {
        let body = rotation_from_euler_deg("y", &[-30.0]).unwrap();
        let expected = rotation_from_rows(&[[0.866, 0.0, -0.5], [0.0, 1.0, 0.0], [0.5, 0.0, 0.866]]);
        assert_relative_eq!(*body.matrix(), *expected.matrix(), epsilon = 1e-3);

        let housing = rotation_from_euler_deg("yz", &[180.0, 30.0]).unwrap();
        let expected =
            rotation_from_rows(&[[-0.866, -0.5, 0.0], [-0.5, 0.866, 0.0], [0.0, 0.0, -1.0]]);
        assert_relative_eq!(*housing.matrix(), *expected.matrix(), epsilon = 1e-3);

        let stuck = rotation_from_euler_deg("yz", &[15.0, 10.0]).unwrap();
        let expected = rotation_from_rows(&[
            [0.95125124, -0.17364818, 0.254887],
            [0.16773126, 0.98480775, 0.04494346],
            [-0.25881905, 0.0, 0.96592583],
        ]);
        assert_relative_eq!(*stuck.matrix(), *expected.matrix(), epsilon = 1e-6);
    }

    #[test]
    fn intrinsic_is_reverse_of_extrinsic() {
        let extrinsic = rotation_from_euler_deg("xyz", &[10.0, 20.0, 30.0]).unwrap();
        let intrinsic = rotation_from_euler_deg("ZYX", &[30.0, 20.0, 10.0]).unwrap();
        assert_relative_eq!(extrinsic, intrinsic, epsilon = 1e-12);
    }

    #[test]
    fn bad_euler_sequences_are_rejected() {
        for (seq, angles) in [
            ("", &[][..]),
            ("xyzx", &[1.0, 2.0, 3.0, 4.0][..]),
            ("xy", &[1.0][..]),
            ("xY", &[1.0, 2.0][..]),
            ("xw", &[1.0, 2.0][..]),
        ] {
            assert!(matches!(
                rotation_from_euler_deg(seq, angles),
                Err(TransformError::InvalidEulerSequence(_))
            ));
        }
    }

    #[test]
    fn rotation_check_rejects_reflections_and_scaling() {
        let reflection = Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert!(!is_rotation(&reflection, ROTATION_TOLERANCE));
        assert!(!is_rotation(&(Matrix3::identity() * 2.0), ROTATION_TOLERANCE));
        assert!(is_rotation(&Matrix3::identity(), ROTATION_TOLERANCE));

        let rows = [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(
            checked_rotation_from_rows(&rows, "mirror"),
            Err(TransformError::NotARotation("mirror".into()))
        );
    }

    #[test]
    fn hand_typed_rows_snap_to_exact_rotation() {
        let rows = [[0.866, 0.0, -0.5], [0.0, 1.0, 0.0], [0.5, 0.0, 0.866]];
        assert!(!is_rotation(rotation_from_rows(&rows).matrix(), 1e-6));

        let snapped = checked_rotation_from_rows(&rows, "Body").unwrap();
        assert!(is_rotation(snapped.matrix(), 1e-12));
        let exact = rotation_from_euler_deg("y", &[-30.0]).unwrap();
        assert_relative_eq!(*snapped.matrix(), *exact.matrix(), epsilon = 1e-4);

        let v = Vector3::new(10.0, 0.0, 0.0);
        assert_relative_eq!(apply(&invert(&snapped), &apply(&snapped, &v)), v, epsilon = 1e-12);

        // Exact input, including a half turn, comes back unchanged.
        let half_turn = [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
        assert_relative_eq!(
            *checked_rotation_from_rows(&half_turn, "Station").unwrap().matrix(),
            *rotation_from_rows(&half_turn).matrix(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn basis_vectors_are_columns() {
        let r = rotation_from_euler_deg("z", &[90.0]).unwrap();
        let [i, j, k] = basis_vectors(&r);
        assert_relative_eq!(i, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(j, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(k, Vector3::z(), epsilon = 1e-12);
        for (axis, unit) in [i, j, k].iter().zip(unit_vectors()) {
            assert_relative_eq!(*axis, apply(&r, &unit), epsilon = 1e-12);
        }
    }

    #[test]
    fn angle_between_handles_extremes() {
        let x = Vector3::x();
        assert_relative_eq!(angle_between(&x, &(x * 3.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(angle_between(&x, &-x), std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(
            angle_between(&x, &Vector3::y()),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
    }
}
