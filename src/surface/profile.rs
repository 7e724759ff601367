//! Module for handling surface profiles.
//!
//! A [`Profile`] describes the shape of a [`Surface`](super::Surface) in its local coordinate frame: the sag, the
//! surface normal and the intersection with a ray. The vertex of the profile is located at the origin of the local
//! frame and the optical axis points along the z axis.
#![warn(missing_docs)]
use std::fmt::Display;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};
use uom::si::f64::Length;

use super::{conic::Conic, even_polynomial::EvenPolynomial, spherical::Spherical};
use crate::{meter, ray_trace_config::RayTraceConfig};

/// First-order (paraxial) ray data at a surface.
///
/// This data is used by [`Profile::derive_from_ray_data`] in order to adapt a profile to a paraxial design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstOrderData {
    /// slope of the axial ray before the surface
    pub slope_before: f64,
    /// slope of the axial ray after the surface
    pub slope_after: f64,
    /// height of the axial ray at the surface
    pub height: Length,
    /// (signed) refractive index before the surface
    pub n_before: f64,
    /// (signed) refractive index after the surface
    pub n_after: f64,
}

/// All surface profiles must implement this trait.
///
/// Internally, all calculations are performed in meters. Curvatures and optical powers are given in `1/m`.
pub trait Profile {
    /// Returns the vertex curvature of this profile.
    fn curvature(&self) -> f64;
    /// Sets the vertex curvature of this profile.
    fn set_curvature(&mut self, curvature: f64);
    /// Returns the vertex radius of curvature or `None` for a flat profile.
    fn radius(&self) -> Option<Length> {
        let cv = self.curvature();
        if cv == 0.0 {
            None
        } else {
            Some(meter!(1.0 / cv))
        }
    }
    /// Returns the sag (z coordinate) of the profile at the given lateral position (in meters).
    ///
    /// This function returns `None` if the profile is not defined at this position.
    fn sag_f64(&self, x: f64, y: f64) -> Option<f64>;
    /// Returns the sag (z coordinate) of the profile at the given lateral position.
    ///
    /// This function returns `None` if the profile is not defined at this position.
    fn sag(&self, x: Length, y: Length) -> Option<Length> {
        self.sag_f64(x.value, y.value).map(|s| meter!(s))
    }
    /// Returns the normalized surface normal at a given point (in meters) of the profile.
    ///
    /// The normal points into the direction of the positive z axis.
    fn normal_f64(&self, point: &Point3<f64>) -> Vector3<f64>;
    /// Returns the normalized surface normal at a given point of the profile.
    fn normal(&self, point: &Point3<Length>) -> Vector3<f64> {
        self.normal_f64(&point.map(|c| c.value))
    }
    /// Calculate the intersection of a ray with this profile.
    ///
    /// The ray starts at `origin` (in meters) and propagates along the normalized `direction`. `z_dir` is the sign of
    /// the propagation along the optical axis (`1.0` or `-1.0`). It determines which of multiple intersections is used.
    /// Returns the distance along the ray and the intersection point or `None` if the ray misses the profile.
    fn intersect_f64(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        z_dir: f64,
        config: &RayTraceConfig,
    ) -> Option<(f64, Point3<f64>)>;
    /// Calculate the intersection of a ray with this profile.
    ///
    /// See [`Profile::intersect_f64`].
    fn intersect(
        &self,
        origin: &Point3<Length>,
        direction: &Vector3<f64>,
        z_dir: f64,
        config: &RayTraceConfig,
    ) -> Option<(Length, Point3<Length>)> {
        self.intersect_f64(&origin.map(|c| c.value), direction, z_dir, config)
            .map(|(s, p)| (meter!(s), meter!(p.x, p.y, p.z)))
    }
    /// Returns the optical power of the profile for the given (signed) index difference across the surface.
    fn optical_power(&self, delta_n: f64) -> f64 {
        delta_n * self.curvature()
    }
    /// Set the curvature of this profile such that it has the given optical power for the given index difference.
    ///
    /// If the index difference is zero, the profile becomes flat.
    fn set_optical_power(&mut self, power: f64, delta_n: f64) {
        if delta_n == 0.0 {
            self.set_curvature(0.0);
        } else {
            self.set_curvature(power / delta_n);
        }
    }
    /// Adapt higher-order shape parameters of the profile to the given first-order ray data.
    ///
    /// The default implementation does nothing.
    fn derive_from_ray_data(&mut self, _data: &FirstOrderData) {}
    /// Returns the name of the profile type.
    fn name(&self) -> String;
    /// Create a corresponding [`ProfileType`] value (e.g. for serialization).
    fn to_enum(&self) -> ProfileType;
}

/// Kind of a surface profile without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum ProfileKind {
    /// spherical profile
    Spherical,
    /// conic profile
    Conic,
    /// even polynomial asphere
    EvenPolynomial,
}

/// The available surface profiles.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum ProfileType {
    /// Spherical profile
    Spherical(Spherical),
    /// Conic profile
    Conic(Conic),
    /// Conic profile with additional even polynomial terms
    EvenPolynomial(EvenPolynomial),
}
impl Default for ProfileType {
    fn default() -> Self {
        Self::Spherical(Spherical::default())
    }
}
impl ProfileType {
    /// Returns the [`ProfileKind`] of this profile.
    #[must_use]
    pub const fn kind(&self) -> ProfileKind {
        match self {
            Self::Spherical(_) => ProfileKind::Spherical,
            Self::Conic(_) => ProfileKind::Conic,
            Self::EvenPolynomial(_) => ProfileKind::EvenPolynomial,
        }
    }
    /// Convert this profile into a profile of a different kind.
    ///
    /// The vertex curvature is always kept. The conic constant is kept when converting between a conic and an even
    /// polynomial profile. Converting to the same kind returns an unchanged copy.
    #[must_use]
    pub fn mutate(&self, kind: ProfileKind) -> Self {
        if self.kind() == kind {
            return self.clone();
        }
        let cv = self.curvature();
        let conic_constant = match self {
            Self::Spherical(_) => 0.0,
            Self::Conic(c) => c.conic_constant(),
            Self::EvenPolynomial(p) => p.conic_constant(),
        };
        match kind {
            ProfileKind::Spherical => Self::Spherical(Spherical::from_curvature_unchecked(cv)),
            ProfileKind::Conic => {
                Self::Conic(Conic::from_parts_unchecked(cv, conic_constant, false))
            }
            ProfileKind::EvenPolynomial => Self::EvenPolynomial(
                EvenPolynomial::from_parts_unchecked(cv, conic_constant, Vec::new()),
            ),
        }
    }
    fn inner(&self) -> &dyn Profile {
        match self {
            Self::Spherical(p) => p,
            Self::Conic(p) => p,
            Self::EvenPolynomial(p) => p,
        }
    }
    fn inner_mut(&mut self) -> &mut dyn Profile {
        match self {
            Self::Spherical(p) => p,
            Self::Conic(p) => p,
            Self::EvenPolynomial(p) => p,
        }
    }
}
impl Profile for ProfileType {
    fn curvature(&self) -> f64 {
        self.inner().curvature()
    }
    fn set_curvature(&mut self, curvature: f64) {
        self.inner_mut().set_curvature(curvature);
    }
    fn sag_f64(&self, x: f64, y: f64) -> Option<f64> {
        self.inner().sag_f64(x, y)
    }
    fn normal_f64(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.inner().normal_f64(point)
    }
    fn intersect_f64(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        z_dir: f64,
        config: &RayTraceConfig,
    ) -> Option<(f64, Point3<f64>)> {
        self.inner().intersect_f64(origin, direction, z_dir, config)
    }
    fn derive_from_ray_data(&mut self, data: &FirstOrderData) {
        self.inner_mut().derive_from_ray_data(data);
    }
    fn name(&self) -> String {
        self.inner().name()
    }
    fn to_enum(&self) -> ProfileType {
        self.clone()
    }
}
impl Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spherical(p) => write!(f, "{}: c={:.6} 1/m", p.name(), p.curvature()),
            Self::Conic(p) => write!(
                f,
                "{}: c={:.6} 1/m, k={:.6}",
                p.name(),
                p.curvature(),
                p.conic_constant()
            ),
            Self::EvenPolynomial(p) => write!(
                f,
                "{}: c={:.6} 1/m, k={:.6}, coefficients={:?}",
                p.name(),
                p.curvature(),
                p.conic_constant(),
                p.coefficients()
            ),
        }
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::millimeter;
    use approx::assert_relative_eq;
    use std::str::FromStr;
    #[test]
    fn default() {
        let p = ProfileType::default();
        assert_eq!(p.kind(), ProfileKind::Spherical);
        assert_eq!(p.curvature(), 0.0);
        assert!(p.radius().is_none());
    }
    #[test]
    fn radius() {
        let p = ProfileType::Spherical(Spherical::new(10.0).unwrap());
        assert_relative_eq!(p.radius().unwrap().value, 0.1);
    }
    #[test]
    fn optical_power() {
        let mut p = ProfileType::Spherical(Spherical::new(10.0).unwrap());
        assert_relative_eq!(p.optical_power(0.5), 5.0);
        p.set_optical_power(2.0, 0.5);
        assert_relative_eq!(p.curvature(), 4.0);
        p.set_optical_power(2.0, 0.0);
        assert_eq!(p.curvature(), 0.0);
    }
    #[test]
    fn mutate() {
        let p = ProfileType::Conic(Conic::new(5.0, -1.0).unwrap());
        let asphere = p.mutate(ProfileKind::EvenPolynomial);
        assert_eq!(asphere.kind(), ProfileKind::EvenPolynomial);
        assert_eq!(asphere.curvature(), 5.0);
        let ProfileType::EvenPolynomial(e) = &asphere else {
            panic!("wrong profile type")
        };
        assert_eq!(e.conic_constant(), -1.0);
        let sphere = asphere.mutate(ProfileKind::Spherical);
        assert_eq!(sphere, ProfileType::Spherical(Spherical::new(5.0).unwrap()));
        assert_eq!(sphere.mutate(ProfileKind::Spherical), sphere);
    }
    #[test]
    fn kind_from_str() {
        assert_eq!(ProfileKind::from_str("conic").unwrap(), ProfileKind::Conic);
        assert_eq!(
            ProfileKind::from_str("EvenPolynomial").unwrap(),
            ProfileKind::EvenPolynomial
        );
        assert!(ProfileKind::from_str("torus").is_err());
        assert_eq!(format!("{}", ProfileKind::Spherical), "Spherical");
    }
    #[test]
    fn sag() {
        let p = ProfileType::Spherical(Spherical::new(1.0).unwrap());
        let s = p.sag(millimeter!(0.0), millimeter!(0.0)).unwrap();
        assert_eq!(s.value, 0.0);
        assert!(p.sag(millimeter!(2000.0), millimeter!(0.0)).is_none());
    }
    #[test]
    fn display() {
        let p = ProfileType::Spherical(Spherical::new(10.0).unwrap());
        assert_eq!(format!("{p}"), "Spherical: c=10.000000 1/m");
    }
}
