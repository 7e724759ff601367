//! Even polynomial asphere
//!
//! The sag is given by a conic base plus a polynomial in even powers of the radial distance:
//! `z = c r² / (1 + sqrt(1 - (1 + k) c² r²)) + a₄ r⁴ + a₆ r⁶ + ...`
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::{
    conic::{conic_intersect, conic_sag},
    profile::{Profile, ProfileType},
};
use crate::{
    error::{SeqError, SeqResult},
    ray_trace_config::RayTraceConfig,
    utils::usize_to_f64,
};

/// An even polynomial asphere.
///
/// The polynomial coefficients start with the r⁴ term and are given in SI units (e.g. `1/m³` for a₄).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct EvenPolynomial {
    curvature: f64,
    conic_constant: f64,
    coefficients: Vec<f64>,
}
impl EvenPolynomial {
    /// Creates a new [`EvenPolynomial`] asphere.
    ///
    /// # Errors
    ///
    /// This function will return an error if any of the given parameters is not finite.
    pub fn new(curvature: f64, conic_constant: f64, coefficients: Vec<f64>) -> SeqResult<Self> {
        if !curvature.is_finite()
            || !conic_constant.is_finite()
            || coefficients.iter().any(|c| !c.is_finite())
        {
            return Err(SeqError::Other(
                "all asphere parameters must be finite".into(),
            ));
        }
        Ok(Self {
            curvature,
            conic_constant,
            coefficients,
        })
    }
    pub(crate) const fn from_parts_unchecked(
        curvature: f64,
        conic_constant: f64,
        coefficients: Vec<f64>,
    ) -> Self {
        Self {
            curvature,
            conic_constant,
            coefficients,
        }
    }
    /// Returns the conic constant of the base conic.
    #[must_use]
    pub const fn conic_constant(&self) -> f64 {
        self.conic_constant
    }
    /// Returns the polynomial coefficients (starting with the r⁴ term).
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
    /// Sets the polynomial coefficients (starting with the r⁴ term).
    ///
    /// # Errors
    ///
    /// This function will return an error if any of the coefficients is not finite.
    pub fn set_coefficients(&mut self, coefficients: Vec<f64>) -> SeqResult<()> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(SeqError::Other("coefficients must be finite".into()));
        }
        self.coefficients = coefficients;
        Ok(())
    }
    fn polynomial_sag(&self, r_sq: f64) -> f64 {
        // Horner scheme in r² starting with the highest order
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc: f64, a| acc.mul_add(r_sq, *a))
            * r_sq
            * r_sq
    }
    /// Derivative of the sag with respect to r, divided by r.
    fn sag_slope_over_r(&self, r_sq: f64) -> f64 {
        let arg = ((1.0 + self.conic_constant) * self.curvature * self.curvature)
            .mul_add(-r_sq, 1.0)
            .max(f64::EPSILON);
        let mut slope = self.curvature / arg.sqrt();
        let mut r_power = r_sq;
        for (i, a) in self.coefficients.iter().enumerate() {
            slope += usize_to_f64(2 * i + 4) * a * r_power;
            r_power *= r_sq;
        }
        slope
    }
}
impl Profile for EvenPolynomial {
    fn curvature(&self) -> f64 {
        self.curvature
    }
    fn set_curvature(&mut self, curvature: f64) {
        self.curvature = curvature;
    }
    fn sag_f64(&self, x: f64, y: f64) -> Option<f64> {
        let r_sq = x.mul_add(x, y * y);
        conic_sag(self.curvature, self.conic_constant, r_sq).map(|z| z + self.polynomial_sag(r_sq))
    }
    fn normal_f64(&self, point: &Point3<f64>) -> Vector3<f64> {
        let q = self.sag_slope_over_r(point.x.mul_add(point.x, point.y * point.y));
        Vector3::new(-q * point.x, -q * point.y, 1.0).normalize()
    }
    /// Newton iteration starting at the intersection with the base conic (or the vertex plane).
    fn intersect_f64(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        z_dir: f64,
        config: &RayTraceConfig,
    ) -> Option<(f64, Point3<f64>)> {
        let d = direction.normalize();
        let mut s = conic_intersect(self.curvature, self.conic_constant, origin, &d, z_dir)
            .map_or_else(|| -origin.z / d.z, |(s, _)| s);
        let tolerance = config.intersection_tolerance().value;
        for _ in 0..config.max_iterations() {
            if !s.is_finite() {
                return None;
            }
            let p = origin + s * d;
            let delta = p.z - self.sag_f64(p.x, p.y)?;
            if delta.abs() < tolerance {
                return Some((s, p));
            }
            let normal = self.normal_f64(&p);
            let slope = normal.dot(&d);
            if slope == 0.0 {
                return None;
            }
            s -= delta * normal.z / slope;
        }
        None
    }
    fn name(&self) -> String {
        "EvenPolynomial".into()
    }
    fn to_enum(&self) -> ProfileType {
        ProfileType::EvenPolynomial(self.clone())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::ray_trace_config::RayTraceConfig;
    use approx::assert_relative_eq;
    #[test]
    fn new() {
        assert!(EvenPolynomial::new(f64::NAN, 0.0, vec![]).is_err());
        assert!(EvenPolynomial::new(0.0, f64::NAN, vec![]).is_err());
        assert!(EvenPolynomial::new(0.0, 0.0, vec![1.0, f64::INFINITY]).is_err());
        let p = EvenPolynomial::new(1.0, -0.5, vec![1.0, 2.0]).unwrap();
        assert_eq!(p.coefficients(), &[1.0, 2.0]);
        assert_eq!(p.conic_constant(), -0.5);
    }
    #[test]
    fn sag() {
        let p = EvenPolynomial::new(0.0, 0.0, vec![1.0, 2.0]).unwrap();
        // z = r⁴ + 2 r⁶
        assert_relative_eq!(p.sag_f64(0.5, 0.0).unwrap(), 0.0625 + 2.0 * 0.015625);
        let sphere = EvenPolynomial::new(1.0, 0.0, vec![]).unwrap();
        assert_relative_eq!(sphere.sag_f64(0.0, 0.6).unwrap(), 0.2);
    }
    #[test]
    fn normal() {
        let p = EvenPolynomial::new(0.0, 0.0, vec![1.0]).unwrap();
        // dz/dr = 4 r³ = 0.5 at r = 0.5
        let n = p.normal_f64(&Point3::new(0.5, 0.0, 0.0625));
        assert_relative_eq!(n, Vector3::new(-0.5, 0.0, 1.0).normalize(), epsilon = 1e-14);
    }
    #[test]
    fn intersect() {
        let p = EvenPolynomial::new(0.0, 0.0, vec![1.0]).unwrap();
        let (s, pt) = p
            .intersect_f64(
                &Point3::new(0.5, 0.0, -1.0),
                &Vector3::z(),
                1.0,
                &RayTraceConfig::default(),
            )
            .unwrap();
        assert_relative_eq!(s, 1.0625, epsilon = 1e-12);
        assert_relative_eq!(pt.z, 0.0625, epsilon = 1e-12);
        // agrees with closed form for a pure sphere
        let sphere = EvenPolynomial::new(1.0, 0.0, vec![]).unwrap();
        let (s, _) = sphere
            .intersect_f64(
                &Point3::new(0.0, 0.6, -1.0),
                &Vector3::z(),
                1.0,
                &RayTraceConfig::default(),
            )
            .unwrap();
        assert_relative_eq!(s, 1.2, epsilon = 1e-12);
    }
}
