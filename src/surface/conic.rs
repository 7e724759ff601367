//! Conic surface profile
//!
//! The sag of a conic is given by `z = c r² / (1 + sqrt(1 - (1 + k) c² r²))` with the vertex curvature `c` and the
//! conic constant `k` (`k = 0`: sphere, `k = -1`: paraboloid, `k < -1`: hyperboloid, `-1 < k < 0`: prolate
//! ellipsoid, `k > 0`: oblate ellipsoid).
use log::debug;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::profile::{FirstOrderData, Profile, ProfileType};
use crate::{
    error::{SeqError, SeqResult},
    ray_trace_config::RayTraceConfig,
};

/// Sag of a conic at the squared radial distance `r_sq`.
pub(crate) fn conic_sag(curvature: f64, conic_constant: f64, r_sq: f64) -> Option<f64> {
    let arg = ((1.0 + conic_constant) * curvature * curvature).mul_add(-r_sq, 1.0);
    if arg < 0.0 {
        return None;
    }
    Some(curvature * r_sq / (1.0 + arg.sqrt()))
}

/// Normalized normal of a conic at a point lying on the conic.
pub(crate) fn conic_normal(curvature: f64, conic_constant: f64, p: &Point3<f64>) -> Vector3<f64> {
    Vector3::new(
        -curvature * p.x,
        -curvature * p.y,
        (curvature * (1.0 + conic_constant)).mul_add(-p.z, 1.0),
    )
    .normalize()
}

/// Closed-form intersection of a ray with a conic.
///
/// Inserting the ray `p + s d` into `c (x² + y² + (1 + k) z²) - 2 z = 0` yields a quadratic equation in `s`. The root
/// is evaluated in a form which stays accurate for flat profiles (`c -> 0`).
pub(crate) fn conic_intersect(
    curvature: f64,
    conic_constant: f64,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    z_dir: f64,
) -> Option<(f64, Point3<f64>)> {
    let d = direction.normalize();
    let p = origin.coords;
    let ax2 = curvature * (conic_constant * d.z).mul_add(d.z, 1.0);
    let cx2 = curvature.mul_add(conic_constant.mul_add(p.z * p.z, p.dot(&p)), -2.0 * p.z);
    let b = curvature.mul_add(conic_constant.mul_add(d.z * p.z, d.dot(&p)), -d.z);
    let inside = b.mul_add(b, -ax2 * cx2);
    if inside < 0.0 {
        return None;
    }
    let denominator = z_dir.signum().mul_add(inside.sqrt(), -b);
    if denominator == 0.0 {
        return None;
    }
    let s = cx2 / denominator;
    if !s.is_finite() {
        return None;
    }
    Some((s, origin + s * d))
}

/// A conic profile.
///
/// A conic can be marked as `stigmatic`. In this case the conic constant is derived from first-order ray data
/// (see [`Profile::derive_from_ray_data`]) such that the paraxial object point is imaged without spherical aberration
/// (if possible for the given conjugates).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Conic {
    curvature: f64,
    conic_constant: f64,
    #[serde(default)]
    stigmatic: bool,
}
impl Conic {
    /// Creates a new [`Conic`] with the given vertex curvature (in 1/m) and conic constant.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the parameters is not finite.
    pub fn new(curvature: f64, conic_constant: f64) -> SeqResult<Self> {
        if !curvature.is_finite() || !conic_constant.is_finite() {
            return Err(SeqError::Other(
                "curvature and conic constant must be finite".into(),
            ));
        }
        Ok(Self {
            curvature,
            conic_constant,
            stigmatic: false,
        })
    }
    /// Creates a new stigmatic [`Conic`] with the given vertex curvature (in 1/m).
    ///
    /// # Errors
    ///
    /// This function will return an error if the curvature is not finite.
    pub fn new_stigmatic(curvature: f64) -> SeqResult<Self> {
        let mut conic = Self::new(curvature, 0.0)?;
        conic.stigmatic = true;
        Ok(conic)
    }
    pub(crate) const fn from_parts_unchecked(
        curvature: f64,
        conic_constant: f64,
        stigmatic: bool,
    ) -> Self {
        Self {
            curvature,
            conic_constant,
            stigmatic,
        }
    }
    /// Returns the conic constant of this [`Conic`].
    #[must_use]
    pub const fn conic_constant(&self) -> f64 {
        self.conic_constant
    }
    /// Sets the conic constant of this [`Conic`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given value is not finite.
    pub fn set_conic_constant(&mut self, conic_constant: f64) -> SeqResult<()> {
        if !conic_constant.is_finite() {
            return Err(SeqError::Other("conic constant must be finite".into()));
        }
        self.conic_constant = conic_constant;
        Ok(())
    }
    /// Returns true if the conic constant is derived from first-order ray data.
    #[must_use]
    pub const fn is_stigmatic(&self) -> bool {
        self.stigmatic
    }
    /// Mark this conic as stigmatic (or not).
    pub fn set_stigmatic(&mut self, stigmatic: bool) {
        self.stigmatic = stigmatic;
    }
}
impl Profile for Conic {
    fn curvature(&self) -> f64 {
        self.curvature
    }
    fn set_curvature(&mut self, curvature: f64) {
        self.curvature = curvature;
    }
    fn sag_f64(&self, x: f64, y: f64) -> Option<f64> {
        conic_sag(self.curvature, self.conic_constant, x.mul_add(x, y * y))
    }
    fn normal_f64(&self, point: &Point3<f64>) -> Vector3<f64> {
        conic_normal(self.curvature, self.conic_constant, point)
    }
    fn intersect_f64(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        z_dir: f64,
        _config: &RayTraceConfig,
    ) -> Option<(f64, Point3<f64>)> {
        conic_intersect(
            self.curvature,
            self.conic_constant,
            origin,
            direction,
            z_dir,
        )
    }
    fn derive_from_ray_data(&mut self, data: &FirstOrderData) {
        if !self.stigmatic {
            return;
        }
        let y = data.height.value;
        if data.n_before * data.n_after < 0.0 {
            // mirror: both conjugates are foci of the conic
            if y == 0.0 {
                return;
            }
            let l = if data.slope_before == 0.0 {
                f64::INFINITY
            } else {
                -y / data.slope_before
            };
            let l_prime = if data.slope_after == 0.0 {
                f64::INFINITY
            } else {
                -y / data.slope_after
            };
            self.conic_constant = if l.is_infinite() || l_prime.is_infinite() {
                -1.0
            } else if l + l_prime == 0.0 {
                debug!("conjugates of stigmatic mirror are symmetric, keeping conic constant");
                return;
            } else {
                -((l_prime - l) / (l_prime + l)).powi(2)
            };
        } else if data.slope_before == 0.0 && data.n_after != 0.0 {
            // collimated input
            self.conic_constant = -(data.n_before / data.n_after).powi(2);
        } else if data.slope_after == 0.0 && data.n_before != 0.0 {
            // collimated output
            self.conic_constant = -(data.n_after / data.n_before).powi(2);
        } else {
            debug!("no stigmatic conic for finite conjugate refraction, keeping conic constant");
        }
    }
    fn name(&self) -> String {
        "Conic".into()
    }
    fn to_enum(&self) -> ProfileType {
        ProfileType::Conic(self.clone())
    }
}
