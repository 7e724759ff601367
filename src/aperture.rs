//! Clear apertures of the surfaces of a sequential model.
//!
//! The clear aperture of a surface is the radius of the smallest circle (centered on the local z axis) which contains
//! all intersection points of the boundary rays of all fields. It is determined during a model refresh and used to
//! flag rays passing outside a surface.
//! ```rust
//! use seqoptics::{
//!     aperture::clear_apertures, optical_spec::OpticalSpecs, ray_trace_config::RayTraceConfig,
//!     sequential_model::SequentialModel,
//! };
//!
//! let model = SequentialModel::default();
//! let apertures =
//!     clear_apertures(&model, &OpticalSpecs::default(), &RayTraceConfig::default()).unwrap();
//! assert_eq!(apertures.len(), 2);
//! ```
use log::warn;
use uom::si::f64::Length;

use crate::{
    error::SeqResult, meter, optical_spec::OpticalSpecs, ray_trace_config::RayTraceConfig,
    raytrace::{trace_boundary_rays, RayBundle}, sequential_model::SequentialModel,
};

/// Returns the maximum radial distance of the ray intersection points at each of `nr_of_surfaces` surfaces.
///
/// Blocked rays do not contribute. Surfaces without any ray get a clear aperture of zero.
#[must_use]
pub fn max_ray_radii(rayset: &[RayBundle], nr_of_surfaces: usize) -> Vec<Length> {
    let mut radii = vec![0.0_f64; nr_of_surfaces];
    for path in rayset.iter().flatten().filter_map(|p| p.as_ref().ok()) {
        for (radius, segment) in radii.iter_mut().zip(path.segments()) {
            let r = segment.point.x.value.hypot(segment.point.y.value);
            if r > *radius {
                *radius = r;
            }
        }
    }
    radii.into_iter().map(|r| meter!(r)).collect()
}

/// Determine the clear apertures of all surfaces from the boundary rays of all fields.
///
/// # Errors
///
/// This function will return an error if the ray aiming failed.
pub fn clear_apertures(
    model: &SequentialModel,
    specs: &OpticalSpecs,
    config: &RayTraceConfig,
) -> SeqResult<Vec<Length>> {
    let rayset = trace_boundary_rays(model, specs, config)?;
    for (field, bundle) in rayset.iter().enumerate() {
        for (ray, result) in bundle.iter().enumerate() {
            if let Err(e) = result {
                warn!("boundary ray {ray} of field {field} ignored for clear apertures: {e}");
            }
        }
    }
    Ok(max_ray_radii(&rayset, model.surface_count()))
}
