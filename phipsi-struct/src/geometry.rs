//! Torsion geometry.

use crate::types::Point3D;

/// Dihedral (torsion) angle in degrees defined by four points.
///
/// Uses the IUPAC sign convention. The result lies in (-180, 180]; an exact
/// -180 is reported as 180. Collinear input has no defined torsion and
/// comes back as 0; non-finite coordinates come back as NaN.
pub fn dihedral_points(p1: &Point3D, p2: &Point3D, p3: &Point3D, p4: &Point3D) -> f64 {
    let b1 = p2.sub(p1);
    let b2 = p3.sub(p2);
    let b3 = p4.sub(p3);

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let m1 = n1.cross(&b2.normalize());

    let x = n1.dot(&n2);
    let y = m1.dot(&n2);

    normalize_degrees((-y).atan2(x).to_degrees())
}

/// Wrap an angle in degrees into (-180, 180].
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Smallest absolute difference between two angles in degrees, in [0, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    normalize_degrees(a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dihedral_trans_is_positive_180() {
        let p1 = Point3D::new(1.0, 0.0, 0.0);
        let p2 = Point3D::new(0.0, 0.0, 0.0);
        let p3 = Point3D::new(0.0, 1.0, 0.0);
        let p4 = Point3D::new(-1.0, 1.0, 0.0);
        let d = dihedral_points(&p1, &p2, &p3, &p4);
        assert!((d - 180.0).abs() < 1e-10, "got {}", d);
    }

    #[test]
    fn test_dihedral_cis_is_zero() {
        let p1 = Point3D::new(1.0, 0.0, 0.0);
        let p2 = Point3D::new(0.0, 0.0, 0.0);
        let p3 = Point3D::new(0.0, 1.0, 0.0);
        let p4 = Point3D::new(1.0, 1.0, 0.0);
        assert!(dihedral_points(&p1, &p2, &p3, &p4).abs() < 1e-10);
    }

    #[test]
    fn test_dihedral_sign() {
        // p4 on +z and its mirror image on -z
        let p1 = Point3D::new(1.0, 0.0, 0.0);
        let p2 = Point3D::new(0.0, 0.0, 0.0);
        let p3 = Point3D::new(0.0, 1.0, 0.0);
        let p4 = Point3D::new(0.0, 1.0, 1.0);
        let d = dihedral_points(&p1, &p2, &p3, &p4);
        assert!((d + 90.0).abs() < 1e-10, "got {}", d);
        let mirrored = Point3D::new(0.0, 1.0, -1.0);
        let d = dihedral_points(&p1, &p2, &p3, &mirrored);
        assert!((d - 90.0).abs() < 1e-10, "got {}", d);
    }


    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert!((normalize_degrees(190.0) + 170.0).abs() < 1e-10);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < 1e-10);
        assert!((normalize_degrees(540.0) - 180.0).abs() < 1e-10);
        assert!(normalize_degrees(f64::NAN).is_nan());
    }

    #[test]
    fn test_angular_difference() {
        assert!((angular_difference(179.0, -179.0) - 2.0).abs() < 1e-10);
        assert!((angular_difference(-60.0, 60.0) - 120.0).abs() < 1e-10);
    }
}
