//! Rigid (rotation + translation) transformations between surface coordinate frames.
#![warn(missing_docs)]
use std::fmt::Display;

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use uom::si::{
    f64::{Angle, Length},
    length::millimeter,
};

use crate::{
    error::{SeqError, SeqResult},
    meter,
};

/// A rigid transformation of a coordinate frame.
///
/// An [`Isometry`] describes the orientation and position of a local frame `B` inside a frame `A`. Transforming a point
/// given in `B` coordinates yields its coordinates in `A`: `p_a = R * p_b + t`. Internally, the translation is stored in
/// meters while the public interface accepts and returns [`Length`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isometry {
    transform: Isometry3<f64>,
}
impl Default for Isometry {
    fn default() -> Self {
        Self::identity()
    }
}
impl Isometry {
    /// Creates a new [`Isometry`] from a translation (origin of the local frame) and the rotation angles about the
    /// x, y and z axes.
    ///
    /// # Errors
    ///
    /// This function will return an error if any of the given values is not finite.
    pub fn new(translation: Point3<Length>, axisangles: Point3<Angle>) -> SeqResult<Self> {
        if translation.iter().any(|t| !t.is_finite()) {
            return Err(SeqError::InvalidGeometryRequest(
                "translation must be finite".into(),
            ));
        }
        if axisangles.iter().any(|a| !a.is_finite()) {
            return Err(SeqError::InvalidGeometryRequest(
                "rotation angles must be finite".into(),
            ));
        }
        let rotation = Rotation3::from_euler_angles(
            axisangles.x.value,
            axisangles.y.value,
            axisangles.z.value,
        );
        Ok(Self::from_parts(
            &translation.map(|c| c.value).coords,
            &rotation,
        ))
    }
    /// Creates an [`Isometry`] from a translation vector (in meters) and a rotation.
    #[must_use]
    pub fn from_parts(translation_in_m: &Vector3<f64>, rotation: &Rotation3<f64>) -> Self {
        Self {
            transform: Isometry3::from_parts(
                Translation3::from(*translation_in_m),
                UnitQuaternion::from_rotation_matrix(rotation),
            ),
        }
    }
    /// Creates the identity [`Isometry`] (no translation, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            transform: Isometry3::identity(),
        }
    }
    /// Returns the rotation part of this [`Isometry`].
    #[must_use]
    pub fn rotation(&self) -> Rotation3<f64> {
        self.transform.rotation.to_rotation_matrix()
    }
    /// Returns the translation of this [`Isometry`] (origin of the local frame in the parent frame).
    #[must_use]
    pub fn translation(&self) -> Point3<Length> {
        let t = self.transform.translation.vector;
        meter!(t.x, t.y, t.z)
    }
    /// Returns the translation vector of this [`Isometry`] in meters.
    #[must_use]
    pub fn translation_vec_in_m(&self) -> Vector3<f64> {
        self.transform.translation.vector
    }
    /// Chain a further transformation to this [`Isometry`].
    ///
    /// If `self` maps frame `B` into frame `A` and `step` maps frame `C` into frame `B`, the result maps `C` into `A`:
    /// `R = R_self * R_step`, `t = R_self * t_step + t_self`.
    #[must_use]
    pub fn append(&self, step: &Self) -> Self {
        Self {
            transform: self.transform * step.transform,
        }
    }
    /// Returns the inverse of this [`Isometry`].
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            transform: self.transform.inverse(),
        }
    }
    /// Transform a point from the local into the parent frame.
    #[must_use]
    pub fn transform_point(&self, p: &Point3<Length>) -> Point3<Length> {
        let transformed = self.transform_point_f64(&p.map(|c| c.value));
        meter!(transformed.x, transformed.y, transformed.z)
    }
    /// Transform a point (given in meters) from the local into the parent frame.
    #[must_use]
    pub fn transform_point_f64(&self, p: &Point3<f64>) -> Point3<f64> {
        self.transform.transform_point(p)
    }
    /// Transform a point from the parent into the local frame.
    #[must_use]
    pub fn inverse_transform_point(&self, p: &Point3<Length>) -> Point3<Length> {
        let transformed = self.inverse_transform_point_f64(&p.map(|c| c.value));
        meter!(transformed.x, transformed.y, transformed.z)
    }
    /// Transform a point (given in meters) from the parent into the local frame.
    #[must_use]
    pub fn inverse_transform_point_f64(&self, p: &Point3<f64>) -> Point3<f64> {
        self.transform.inverse_transform_point(p)
    }
    /// Rotate a (direction) vector from the local into the parent frame.
    #[must_use]
    pub fn transform_vector_f64(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.transform.transform_vector(v)
    }
    /// Rotate a (direction) vector from the parent into the local frame.
    #[must_use]
    pub fn inverse_transform_vector_f64(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.transform.inverse_transform_vector(v)
    }
}
impl AbsDiffEq for Isometry {
    type Epsilon = f64;
    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.transform.abs_diff_eq(&other.transform, epsilon)
    }
}
impl RelativeEq for Isometry {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }
    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.transform
            .relative_eq(&other.transform, epsilon, max_relative)
    }
}
impl Display for Isometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let t = self.translation();
        let (roll, pitch, yaw) = self.rotation().euler_angles();
        write!(
            f,
            "translation: ({:.6}, {:.6}, {:.6}) mm, rotation: ({:.6}, {:.6}, {:.6}) deg",
            t.x.get::<millimeter>(),
            t.y.get::<millimeter>(),
            t.z.get::<millimeter>(),
            roll.to_degrees(),
            pitch.to_degrees(),
            yaw.to_degrees()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, millimeter};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Vector3;

    #[test]
    fn new() {
        assert!(Isometry::new(
            millimeter!(f64::NAN, 0.0, 0.0),
            degree!(0.0, 0.0, 0.0)
        )
        .is_err());
        assert!(Isometry::new(
            millimeter!(0.0, 0.0, 0.0),
            degree!(0.0, f64::INFINITY, 0.0)
        )
        .is_err());
        let iso = Isometry::new(millimeter!(1.0, 2.0, 3.0), degree!(0.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(iso.translation_vec_in_m(), Vector3::new(1e-3, 2e-3, 3e-3));
    }
    #[test]
    fn identity() {
        let iso = Isometry::identity();
        let p = millimeter!(1.0, 2.0, 3.0);
        assert_eq!(iso.transform_point(&p), p);
        assert_eq!(iso, Isometry::default());
    }
    #[test]
    fn transform_point_and_vector() {
        let iso = Isometry::new(millimeter!(0.0, 0.0, 10.0), degree!(90.0, 0.0, 0.0)).unwrap();
        let p = iso.transform_point(&millimeter!(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(p.x.value, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.y.value, 0.0, epsilon = 1e-15);
        assert_relative_eq!(p.z.value, 0.011);
        let v = iso.transform_vector_f64(&Vector3::y());
        assert_abs_diff_eq!(v, Vector3::z(), epsilon = 1e-15);
        let back = iso.inverse_transform_point(&p);
        assert_abs_diff_eq!(back.y.value, 0.001, epsilon = 1e-15);
        let v_back = iso.inverse_transform_vector_f64(&v);
        assert_abs_diff_eq!(v_back, Vector3::y(), epsilon = 1e-15);
    }
    #[test]
    fn append() {
        let a = Isometry::new(millimeter!(0.0, 0.0, 10.0), degree!(0.0, 0.0, 90.0)).unwrap();
        let b = Isometry::new(millimeter!(1.0, 0.0, 0.0), degree!(0.0, 0.0, 0.0)).unwrap();
        let c = a.append(&b);
        // t = R_a * t_b + t_a
        assert_abs_diff_eq!(
            c.translation_vec_in_m(),
            Vector3::new(0.0, 1e-3, 10e-3),
            epsilon = 1e-15
        );
        let p = millimeter!(0.5, 0.5, 0.5);
        assert_abs_diff_eq!(
            c.transform_point_f64(&p.map(|v| v.value)),
            a.transform_point_f64(&b.transform_point_f64(&p.map(|v| v.value))),
            epsilon = 1e-15
        );
    }
    #[test]
    fn inverse() {
        let a = Isometry::new(millimeter!(1.0, -2.0, 10.0), degree!(5.0, -3.0, 20.0)).unwrap();
        assert_relative_eq!(a.append(&a.inverse()), Isometry::identity(), epsilon = 1e-12);
    }
    #[test]
    fn display() {
        let iso = Isometry::new(millimeter!(1.0, 2.0, 3.0), degree!(0.0, 0.0, 0.0)).unwrap();
        assert!(format!("{iso}").starts_with("translation: (1.000000, 2.000000, 3.000000) mm"));
    }
}
