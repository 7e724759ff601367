//! Spherical surface profile
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::{
    conic::{conic_intersect, conic_normal, conic_sag},
    profile::{Profile, ProfileType},
};
use crate::{
    error::{SeqError, SeqResult},
    ray_trace_config::RayTraceConfig,
};

/// A spherical (or flat) profile given by its vertex curvature.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Spherical {
    curvature: f64,
}
impl Spherical {
    /// Creates a new [`Spherical`] profile with the given curvature (in 1/m).
    ///
    /// # Errors
    ///
    /// This function will return an error if the curvature is not finite.
    pub fn new(curvature: f64) -> SeqResult<Self> {
        if !curvature.is_finite() {
            return Err(SeqError::Other("curvature must be finite".into()));
        }
        Ok(Self { curvature })
    }
    /// Creates a new [`Spherical`] profile with the given radius of curvature.
    ///
    /// An infinite radius yields a flat profile.
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius is zero or NaN.
    pub fn from_radius(radius: Length) -> SeqResult<Self> {
        if radius.is_nan() || radius.value == 0.0 {
            return Err(SeqError::Other("radius must be != 0.0 and not NaN".into()));
        }
        Ok(Self {
            curvature: 1.0 / radius.value,
        })
    }
    pub(crate) const fn from_curvature_unchecked(curvature: f64) -> Self {
        Self { curvature }
    }
}
impl Profile for Spherical {
    fn curvature(&self) -> f64 {
        self.curvature
    }
    fn set_curvature(&mut self, curvature: f64) {
        self.curvature = curvature;
    }
    fn sag_f64(&self, x: f64, y: f64) -> Option<f64> {
        conic_sag(self.curvature, 0.0, x.mul_add(x, y * y))
    }
    fn normal_f64(&self, point: &Point3<f64>) -> Vector3<f64> {
        conic_normal(self.curvature, 0.0, point)
    }
    fn intersect_f64(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        z_dir: f64,
        _config: &RayTraceConfig,
    ) -> Option<(f64, Point3<f64>)> {
        conic_intersect(self.curvature, 0.0, origin, direction, z_dir)
    }
    fn name(&self) -> String {
        "Spherical".into()
    }
    fn to_enum(&self) -> ProfileType {
        ProfileType::Spherical(self.clone())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::meter;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::vector;
    #[test]
    fn new() {
        assert!(Spherical::new(f64::NAN).is_err());
        assert!(Spherical::new(f64::INFINITY).is_err());
        assert_eq!(Spherical::new(2.0).unwrap().curvature(), 2.0);
    }
    #[test]
    fn from_radius() {
        assert!(Spherical::from_radius(meter!(0.0)).is_err());
        assert!(Spherical::from_radius(meter!(f64::NAN)).is_err());
        assert_eq!(
            Spherical::from_radius(meter!(f64::INFINITY))
                .unwrap()
                .curvature(),
            0.0
        );
        assert_eq!(Spherical::from_radius(meter!(-0.5)).unwrap().curvature(), -2.0);
    }
    #[test]
    fn sag() {
        let s = Spherical::new(1.0).unwrap();
        assert_eq!(s.sag_f64(0.0, 0.0).unwrap(), 0.0);
        assert_relative_eq!(s.sag_f64(1.0, 0.0).unwrap(), 1.0);
        assert_relative_eq!(s.sag_f64(0.0, 0.6).unwrap(), 0.2);
        assert!(s.sag_f64(1.1, 0.0).is_none());
        assert_eq!(Spherical::default().sag_f64(5.0, 5.0).unwrap(), 0.0);
    }
    #[test]
    fn normal() {
        let s = Spherical::new(1.0).unwrap();
        assert_eq!(s.normal_f64(&Point3::origin()), Vector3::z());
        let n = s.normal_f64(&Point3::new(0.0, 0.6, 0.2));
        assert_abs_diff_eq!(n, vector![0.0, -0.6, 0.8], epsilon = 1e-15);
    }
    #[test]
    fn intersect_flat() {
        let s = Spherical::default();
        let (dist, p) = s
            .intersect_f64(
                &Point3::new(0.1, 0.2, -1.0),
                &Vector3::z(),
                1.0,
                &RayTraceConfig::default(),
            )
            .unwrap();
        assert_relative_eq!(dist, 1.0);
        assert_eq!(p, Point3::new(0.1, 0.2, 0.0));
    }
    #[test]
    fn intersect_sphere() {
        let s = Spherical::new(1.0).unwrap();
        let (dist, p) = s
            .intersect_f64(
                &Point3::new(0.0, 0.6, -1.0),
                &Vector3::z(),
                1.0,
                &RayTraceConfig::default(),
            )
            .unwrap();
        assert_relative_eq!(dist, 1.2);
        assert_abs_diff_eq!(p, Point3::new(0.0, 0.6, 0.2), epsilon = 1e-15);
        // ray travelling backwards
        let (dist, p) = s
            .intersect_f64(
                &Point3::new(0.0, 0.6, 1.0),
                &-Vector3::z(),
                -1.0,
                &RayTraceConfig::default(),
            )
            .unwrap();
        assert_relative_eq!(dist, 0.8);
        assert_abs_diff_eq!(p, Point3::new(0.0, 0.6, 0.2), epsilon = 1e-15);
    }
    #[test]
    fn intersect_miss() {
        let s = Spherical::new(1.0).unwrap();
        assert!(s
            .intersect_f64(
                &Point3::new(0.0, 1.5, -1.0),
                &Vector3::z(),
                1.0,
                &RayTraceConfig::default(),
            )
            .is_none());
    }
}
