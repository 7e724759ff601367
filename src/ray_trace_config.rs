//! Configuration of real ray tracing through a sequential model
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::{
    error::{SeqError, SeqResult},
    meter,
};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
/// Configuration data for real ray tracing.
///
/// The config contains the following info
///   - the convergence tolerance of iterative ray / surface intersections
///   - the maximum number of iterations of such an intersection
///   - the default number of rays of a ray fan
pub struct RayTraceConfig {
    intersection_tolerance: Length,
    max_iterations: usize,
    fan_ray_count: usize,
}
impl Default for RayTraceConfig {
    /// Create a default config for ray tracing with the following parameters:
    ///   - intersection tolerance: `1e-12 m`
    ///   - maximum number of intersection iterations: `50`
    ///   - number of rays in a fan: `21`
    fn default() -> Self {
        Self {
            intersection_tolerance: meter!(1e-12),
            max_iterations: 50,
            fan_ray_count: 21,
        }
    }
}
impl RayTraceConfig {
    /// Returns the convergence tolerance for iterative ray / surface intersections.
    #[must_use]
    pub fn intersection_tolerance(&self) -> Length {
        self.intersection_tolerance
    }
    /// Sets the convergence tolerance for iterative ray / surface intersections.
    ///
    /// # Errors
    ///
    /// This function will return an error if the tolerance is <= 0.0 or not finite.
    pub fn set_intersection_tolerance(&mut self, tolerance: Length) -> SeqResult<()> {
        if !tolerance.is_normal() || tolerance.is_sign_negative() {
            return Err(SeqError::Other(
                "intersection tolerance must be > 0.0 and finite".into(),
            ));
        }
        self.intersection_tolerance = tolerance;
        Ok(())
    }
    /// Returns the maximum number of iterations of an intersection calculation.
    #[must_use]
    pub const fn max_iterations(&self) -> usize {
        self.max_iterations
    }
    /// Sets the maximum number of iterations of an intersection calculation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given number is zero.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> SeqResult<()> {
        if max_iterations == 0 {
            return Err(SeqError::Other(
                "maximum number of iterations must be > 0".into(),
            ));
        }
        self.max_iterations = max_iterations;
        Ok(())
    }
    /// Returns the default number of rays of a ray fan.
    #[must_use]
    pub const fn fan_ray_count(&self) -> usize {
        self.fan_ray_count
    }
    /// Sets the default number of rays of a ray fan.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given number is < 2.
    pub fn set_fan_ray_count(&mut self, fan_ray_count: usize) -> SeqResult<()> {
        if fan_ray_count < 2 {
            return Err(SeqError::Other("a ray fan needs at least 2 rays".into()));
        }
        self.fan_ray_count = fan_ray_count;
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn default() {
        let rt_conf = RayTraceConfig::default();
        assert_eq!(rt_conf.intersection_tolerance(), meter!(1e-12));
        assert_eq!(rt_conf.max_iterations(), 50);
        assert_eq!(rt_conf.fan_ray_count(), 21);
    }
    #[test]
    fn set_intersection_tolerance() {
        let mut rt_conf = RayTraceConfig::default();
        assert!(rt_conf.set_intersection_tolerance(meter!(0.0)).is_err());
        assert!(rt_conf.set_intersection_tolerance(meter!(-1e-9)).is_err());
        assert!(rt_conf.set_intersection_tolerance(meter!(f64::NAN)).is_err());
        assert!(rt_conf
            .set_intersection_tolerance(meter!(f64::INFINITY))
            .is_err());
        assert!(rt_conf.set_intersection_tolerance(meter!(1e-9)).is_ok());
        assert_eq!(rt_conf.intersection_tolerance(), meter!(1e-9));
    }
    #[test]
    fn set_max_iterations() {
        let mut rt_conf = RayTraceConfig::default();
        assert!(rt_conf.set_max_iterations(0).is_err());
        assert!(rt_conf.set_max_iterations(10).is_ok());
        assert_eq!(rt_conf.max_iterations(), 10);
    }
    #[test]
    fn set_fan_ray_count() {
        let mut rt_conf = RayTraceConfig::default();
        assert!(rt_conf.set_fan_ray_count(1).is_err());
        assert!(rt_conf.set_fan_ray_count(5).is_ok());
        assert_eq!(rt_conf.fan_ray_count(), 5);
    }
}
