//! Real (non-paraxial) ray tracing through a [`SequentialModel`].
//!
//! Rays are traced surface by surface. At each surface the ray is transformed into the local surface frame,
//! intersected with the profile and refracted or reflected at the surface normal. Rays are aimed at the entrance
//! pupil, whose position is determined from the paraxial model.
use std::fmt::Display;

use kahan::KahanSummator;
use log::warn;
use nalgebra::{Point2, Point3, Vector3};
use rayon::prelude::*;
use strum::{EnumIter, EnumString};
use uom::si::{f64::Length, length::millimeter};

use crate::{
    error::{BlockReason, SeqError, SeqResult},
    meter,
    optical_spec::{FieldType, OpticalSpecs},
    paraxial::{entrance_pupil_position, sequence_to_paraxial},
    ray_trace_config::RayTraceConfig,
    sequential_model::SequentialModel,
    surface::{InteractionMode, Profile},
    transform::forward_transform,
    utils::{geom_transformation::Isometry, math_utils::linspace},
};

/// Relative pupil coordinates of the boundary rays: chief ray followed by the marginal rays in x and y.
pub const BOUNDARY_RAYS: [(f64, f64); 5] = [(0.0, 0.0), (1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];

/// The state of a ray at a surface.
///
/// All values are given in the local frame of the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RaySegment {
    /// the intersection point with the surface
    pub point: Point3<Length>,
    /// the (normalized) direction after the interaction with the surface
    pub direction: Vector3<f64>,
    /// the surface normal at the intersection point
    pub normal: Vector3<f64>,
    /// distance from the previous intersection point
    pub distance: Length,
}

/// The path of a ray through all surfaces of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct RayPath {
    segments: Vec<RaySegment>,
    optical_path_length: Length,
    wavelength: Length,
    clipped: Vec<usize>,
}
impl RayPath {
    /// Returns the ray state at each surface (starting with the object surface).
    #[must_use]
    pub fn segments(&self) -> &[RaySegment] {
        &self.segments
    }
    /// Returns the optical path length from the start point to the image surface.
    #[must_use]
    pub fn optical_path_length(&self) -> Length {
        self.optical_path_length
    }
    /// Returns the wavelength of this ray.
    #[must_use]
    pub fn wavelength(&self) -> Length {
        self.wavelength
    }
    /// Returns the indices of the surfaces where the ray passed outside the clear aperture.
    #[must_use]
    pub fn clipped(&self) -> &[usize] {
        &self.clipped
    }
    /// Returns the ray state at the image surface.
    #[must_use]
    pub fn image_segment(&self) -> Option<&RaySegment> {
        self.segments.last()
    }
}

/// The result of tracing a set of rays. Each ray is traced independently and may be blocked.
pub type RayBundle = Vec<SeqResult<RayPath>>;

/// Refract a (normalized) direction at a surface with the (normalized) normal.
///
/// `n_in` and `n_out` are the (unsigned) refractive indices before and after the surface. Returns `None` in case of
/// total internal reflection.
#[must_use]
pub fn bend(direction: &Vector3<f64>, normal: &Vector3<f64>, n_in: f64, n_out: f64) -> Option<Vector3<f64>> {
    let cos_i = direction.dot(normal);
    let radicand = (n_in * n_in).mul_add(-cos_i.mul_add(-cos_i, 1.0), n_out * n_out);
    if radicand < 0.0 {
        return None;
    }
    let n_cos_ip = radicand.sqrt().copysign(cos_i);
    let alpha = n_in.mul_add(-cos_i, n_cos_ip);
    Some(((n_in * direction + alpha * normal) / n_out).normalize())
}

/// Reflect a (normalized) direction at a surface with the (normalized) normal.
#[must_use]
pub fn reflect(direction: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Trace a ray through a (refreshed) model.
///
/// The ray starts at `origin` with the given `direction`, both given in the frame of the object surface. The start
/// point is not intersected with the object surface.
///
/// # Errors
///
/// This function will return an error if
///   - the ray misses a surface or is totally internally reflected ([`SeqError::RayBlocked`]).
///   - the refractive index of a medium could not be determined.
///   - the direction is a zero vector.
pub fn trace(
    model: &SequentialModel,
    origin: Point3<Length>,
    direction: Vector3<f64>,
    wavelength: Length,
    config: &RayTraceConfig,
) -> SeqResult<RayPath> {
    let indices = model.signed_refractive_indices(wavelength)?;
    let z_dirs = model.z_directions();
    trace_with_indices(model, origin, direction, wavelength, &indices, &z_dirs, config)
}

fn trace_with_indices(
    model: &SequentialModel,
    origin: Point3<Length>,
    direction: Vector3<f64>,
    wavelength: Length,
    indices: &[f64],
    z_dirs: &[f64],
    config: &RayTraceConfig,
) -> SeqResult<RayPath> {
    let Some(mut dir) = direction.try_normalize(0.0) else {
        return Err(SeqError::InvalidGeometryRequest(
            "ray direction must not be a zero vector".into(),
        ));
    };
    let mut pos = origin.map(|c| c.value);
    let surfaces = model.surfaces();
    let gaps = model.gaps();
    let mut segments = Vec::with_capacity(surfaces.len());
    segments.push(RaySegment {
        point: origin,
        direction: dir,
        normal: Vector3::z(),
        distance: meter!(0.0),
    });
    let mut path_contributions = Vec::with_capacity(surfaces.len());
    let mut clipped = Vec::new();
    for i in 1..surfaces.len() {
        let step = forward_transform(&surfaces[i - 1], gaps[i - 1].thickness(), &surfaces[i]);
        let local_pos = step.inverse_transform_point_f64(&pos);
        let local_dir = step.inverse_transform_vector_f64(&dir);
        // start from the point closest to the vertex for accuracy with distant start points
        let t0 = -local_pos.coords.dot(&local_dir);
        let pp = local_pos + t0 * local_dir;
        let surface = &surfaces[i];
        let Some((s, hit)) = surface
            .profile()
            .intersect_f64(&pp, &local_dir, z_dirs[i - 1], config)
        else {
            return Err(SeqError::RayBlocked {
                surface: i,
                reason: BlockReason::MissedSurface,
            });
        };
        let distance = t0 + s;
        let n_in = indices[i - 1].abs();
        path_contributions.push(n_in * distance);
        let normal = surface.profile().normal_f64(&hit);
        let clear_aperture = surface.clear_aperture().value;
        if clear_aperture > 0.0 && hit.x.hypot(hit.y) > clear_aperture {
            clipped.push(i);
        }
        let new_dir = if surface.interaction_mode() == InteractionMode::Reflect {
            reflect(&local_dir, &normal)
        } else if let Some(n_out) = indices.get(i) {
            bend(&local_dir, &normal, n_in, n_out.abs()).ok_or(SeqError::RayBlocked {
                surface: i,
                reason: BlockReason::TotalInternalReflection,
            })?
        } else {
            local_dir
        };
        segments.push(RaySegment {
            point: meter!(hit.x, hit.y, hit.z),
            direction: new_dir,
            normal,
            distance: meter!(distance),
        });
        pos = hit;
        dir = new_dir;
    }
    let optical_path_length: f64 = path_contributions.iter().kahan_sum().sum();
    Ok(RayPath {
        segments,
        optical_path_length: meter!(optical_path_length),
        wavelength,
        clipped,
    })
}

/// Determines start points and directions of rays aimed at the entrance pupil of a model.
#[derive(Debug, Clone)]
pub struct RayAiming {
    field_type: FieldType,
    object_distance: Length,
    entrance_pupil_z: Length,
    entrance_pupil_radius: Length,
    to_object_frame: Isometry,
}
impl RayAiming {
    /// Set up the ray aiming for a (refreshed) model and the given specs.
    ///
    /// # Errors
    ///
    /// This function will return an error if the entrance pupil cannot be determined.
    pub fn new(model: &SequentialModel, specs: &OpticalSpecs) -> SeqResult<Self> {
        let lens = sequence_to_paraxial(model, specs)?;
        let surfaces = model.surfaces();
        let object_distance = model.gaps()[0].thickness();
        Ok(Self {
            field_type: specs.field_spec().field_type(),
            object_distance,
            entrance_pupil_z: entrance_pupil_position(model, &lens)?,
            entrance_pupil_radius: specs.pupil_spec().entrance_pupil_radius(),
            to_object_frame: forward_transform(&surfaces[0], object_distance, &surfaces[1]),
        })
    }
    /// Returns the axial position of the entrance pupil relative to surface 1.
    #[must_use]
    pub fn entrance_pupil_z(&self) -> Length {
        self.entrance_pupil_z
    }
    /// Returns start point and direction (in the frame of the object surface) of a ray for the given relative field
    /// and pupil coordinates.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ray is undefined (object point located in the entrance pupil).
    pub fn ray_start(
        &self,
        field: Point2<f64>,
        pupil: Point2<f64>,
    ) -> SeqResult<(Point3<Length>, Vector3<f64>)> {
        let ep_point = Point3::new(
            pupil.x * self.entrance_pupil_radius.value,
            pupil.y * self.entrance_pupil_radius.value,
            self.entrance_pupil_z.value,
        );
        let object_z = -self.object_distance.value;
        let (start, direction) = match self.field_type {
            FieldType::ObjectAngle(max_angle) => {
                let direction = Vector3::new(
                    (field.x * max_angle.value).tan(),
                    (field.y * max_angle.value).tan(),
                    1.0,
                )
                .normalize();
                let t = (ep_point.z - object_z) / direction.z;
                (ep_point - t * direction, direction)
            }
            FieldType::ObjectHeight(max_height) => {
                let object_point = Point3::new(
                    field.x * max_height.value,
                    field.y * max_height.value,
                    object_z,
                );
                let Some(direction) = (ep_point - object_point).try_normalize(f64::EPSILON) else {
                    return Err(SeqError::InvalidGeometryRequest(
                        "object point located in the entrance pupil".into(),
                    ));
                };
                (object_point, direction)
            }
        };
        let start = self.to_object_frame.transform_point_f64(&start);
        let direction = self.to_object_frame.transform_vector_f64(&direction);
        Ok((meter!(start.x, start.y, start.z), direction))
    }
}

/// Trace a single ray given by its field index and relative pupil coordinates.
///
/// # Errors
///
/// This function will return an error if the field does not exist, the ray aiming failed or the ray is blocked.
pub fn trace_ray_from_field(
    model: &SequentialModel,
    specs: &OpticalSpecs,
    config: &RayTraceConfig,
    field_index: usize,
    pupil: Point2<f64>,
    wavelength: Length,
) -> SeqResult<RayPath> {
    let field = specs.field_spec().field(field_index)?;
    let (origin, direction) = RayAiming::new(model, specs)?.ray_start(field, pupil)?;
    trace(model, origin, direction, wavelength, config)
}

fn trace_boundary_rays_with(
    model: &SequentialModel,
    aiming: &RayAiming,
    field: Point2<f64>,
    wavelength: Length,
    indices: &[f64],
    z_dirs: &[f64],
    config: &RayTraceConfig,
) -> SeqResult<RayBundle> {
    BOUNDARY_RAYS
        .iter()
        .map(|(px, py)| {
            let (origin, direction) = aiming.ray_start(field, Point2::new(*px, *py))?;
            Ok(trace_with_indices(
                model, origin, direction, wavelength, indices, z_dirs, config,
            ))
        })
        .collect()
}

/// Trace the boundary rays (see [`BOUNDARY_RAYS`]) of the given field at the reference wavelength.
///
/// # Errors
///
/// This function will return an error if the field does not exist or the ray aiming failed. Blocked rays are
/// reported as errors within the returned [`RayBundle`].
pub fn trace_boundary_rays_at_field(
    model: &SequentialModel,
    specs: &OpticalSpecs,
    config: &RayTraceConfig,
    field_index: usize,
) -> SeqResult<RayBundle> {
    let field = specs.field_spec().field(field_index)?;
    let aiming = RayAiming::new(model, specs)?;
    let wavelength = specs.reference_wavelength();
    let indices = model.signed_refractive_indices(wavelength)?;
    let z_dirs = model.z_directions();
    trace_boundary_rays_with(model, &aiming, field, wavelength, &indices, &z_dirs, config)
}

/// Trace the boundary rays of all fields at the reference wavelength.
///
/// The fields are traced in parallel.
///
/// # Errors
///
/// This function will return an error if the ray aiming failed.
pub fn trace_boundary_rays(
    model: &SequentialModel,
    specs: &OpticalSpecs,
    config: &RayTraceConfig,
) -> SeqResult<Vec<RayBundle>> {
    let aiming = RayAiming::new(model, specs)?;
    let wavelength = specs.reference_wavelength();
    let indices = model.signed_refractive_indices(wavelength)?;
    let z_dirs = model.z_directions();
    specs
        .field_spec()
        .fields()
        .par_iter()
        .map(|field| {
            trace_boundary_rays_with(model, &aiming, *field, wavelength, &indices, &z_dirs, config)
        })
        .collect()
}

/// Direction of a ray fan in the pupil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum FanAxis {
    /// sagittal fan along the x axis
    X,
    /// tangential fan along the y axis
    Y,
}

/// A single point of a ray fan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanPoint {
    /// relative pupil coordinate along the fan axis (-1.0 ..= 1.0)
    pub pupil: f64,
    /// transverse aberration along the fan axis relative to the chief ray at the reference wavelength
    pub aberration: Length,
}

/// Lazy evaluation of a ray fan at one wavelength.
///
/// The tracer is an [`Iterator`] yielding one result per pupil coordinate (see [`FanTracer::pupil_coordinates`]).
/// Blocked rays are returned as errors. The iteration can be restarted with [`FanTracer::restart`].
#[derive(Debug, Clone)]
pub struct FanTracer<'a> {
    model: &'a SequentialModel,
    config: &'a RayTraceConfig,
    aiming: RayAiming,
    field: Point2<f64>,
    axis: FanAxis,
    wavelength: Length,
    indices: Vec<f64>,
    z_dirs: Vec<f64>,
    reference: Point3<Length>,
    pupil_coordinates: Vec<f64>,
    next_ray: usize,
}
impl<'a> FanTracer<'a> {
    /// Prepare a fan of `ray_count` rays of the given field and wavelength.
    ///
    /// The chief ray at the reference wavelength is traced to determine the reference image point.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the field does not exist.
    ///   - the ray count is < 2.
    ///   - the ray aiming failed or the chief ray is blocked.
    pub fn new(
        model: &'a SequentialModel,
        specs: &OpticalSpecs,
        config: &'a RayTraceConfig,
        field_index: usize,
        axis: FanAxis,
        wavelength: Length,
        ray_count: usize,
    ) -> SeqResult<Self> {
        if ray_count < 2 {
            return Err(SeqError::Other("a ray fan needs at least two rays".into()));
        }
        let field = specs.field_spec().field(field_index)?;
        let aiming = RayAiming::new(model, specs)?;
        let (origin, direction) = aiming.ray_start(field, Point2::origin())?;
        let chief = trace(model, origin, direction, specs.reference_wavelength(), config)?;
        let reference = chief
            .image_segment()
            .map_or_else(|| meter!(0.0, 0.0, 0.0), |s| s.point);
        Ok(Self {
            model,
            config,
            aiming,
            field,
            axis,
            wavelength,
            indices: model.signed_refractive_indices(wavelength)?,
            z_dirs: model.z_directions(),
            reference,
            pupil_coordinates: linspace(-1.0, 1.0, ray_count),
            next_ray: 0,
        })
    }
    /// Restart the iteration at the first ray of the fan.
    pub fn restart(&mut self) {
        self.next_ray = 0;
    }
    /// Returns the wavelength of this fan.
    #[must_use]
    pub fn wavelength(&self) -> Length {
        self.wavelength
    }
    /// Returns the relative pupil coordinates of all rays of this fan in the order of iteration.
    #[must_use]
    pub fn pupil_coordinates(&self) -> &[f64] {
        &self.pupil_coordinates
    }
    fn trace_fan_ray(&self, pupil: f64) -> SeqResult<FanPoint> {
        let pupil_point = match self.axis {
            FanAxis::X => Point2::new(pupil, 0.0),
            FanAxis::Y => Point2::new(0.0, pupil),
        };
        let (origin, direction) = self.aiming.ray_start(self.field, pupil_point)?;
        let path = trace_with_indices(
            self.model,
            origin,
            direction,
            self.wavelength,
            &self.indices,
            &self.z_dirs,
            self.config,
        )?;
        let image_point = path
            .image_segment()
            .map_or_else(|| meter!(0.0, 0.0, 0.0), |s| s.point);
        let aberration = match self.axis {
            FanAxis::X => image_point.x - self.reference.x,
            FanAxis::Y => image_point.y - self.reference.y,
        };
        Ok(FanPoint { pupil, aberration })
    }
}
impl Iterator for FanTracer<'_> {
    type Item = SeqResult<FanPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        let pupil = self.pupil_coordinates.get(self.next_ray).copied()?;
        self.next_ray += 1;
        Some(self.trace_fan_ray(pupil))
    }
}

/// The ray fan of one wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthFan {
    /// the wavelength
    pub wavelength: Length,
    /// the render color of the wavelength
    pub color: String,
    /// the traced fan points
    pub points: Vec<FanPoint>,
    /// pupil coordinates of blocked rays together with the cause
    pub blocked: Vec<(f64, SeqError)>,
}

/// Ray fans of one field for all wavelengths of the spectral region.
#[derive(Debug, Clone, PartialEq)]
pub struct RayFan {
    axis: FanAxis,
    field_index: usize,
    fans: Vec<WavelengthFan>,
    max_aberration: Length,
}
impl RayFan {
    /// Returns the fan axis.
    #[must_use]
    pub const fn axis(&self) -> FanAxis {
        self.axis
    }
    /// Returns the field index.
    #[must_use]
    pub const fn field_index(&self) -> usize {
        self.field_index
    }
    /// Returns the fans of all wavelengths.
    #[must_use]
    pub fn fans(&self) -> &[WavelengthFan] {
        &self.fans
    }
    /// Returns the largest absolute transverse aberration of all fans.
    #[must_use]
    pub fn max_aberration(&self) -> Length {
        self.max_aberration
    }
}
impl Display for RayFan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} fan of field {} (max. aberration {:.6} mm)",
            self.axis,
            self.field_index,
            self.max_aberration.get::<millimeter>()
        )?;
        for fan in &self.fans {
            writeln!(f, "wavelength {:.3} nm ({})", fan.wavelength.value * 1.0e9, fan.color)?;
            for point in &fan.points {
                writeln!(
                    f,
                    "  {:>8.4} {:>14.6} mm",
                    point.pupil,
                    point.aberration.get::<millimeter>()
                )?;
            }
            for (pupil, e) in &fan.blocked {
                writeln!(f, "  {pupil:>8.4} blocked ({e})")?;
            }
        }
        Ok(())
    }
}

/// Trace a ray fan of the given field for all wavelengths.
///
/// If no `ray_count` is given, the default of the [`RayTraceConfig`] is used. Blocked rays are collected in
/// [`WavelengthFan::blocked`].
///
/// # Errors
///
/// This function will return an error if the fan could not be set up (see [`FanTracer::new`]).
pub fn trace_fan(
    model: &SequentialModel,
    specs: &OpticalSpecs,
    config: &RayTraceConfig,
    field_index: usize,
    axis: FanAxis,
    ray_count: Option<usize>,
) -> SeqResult<RayFan> {
    let ray_count = ray_count.unwrap_or_else(|| config.fan_ray_count());
    let colors = specs.spectral_region().render_colors();
    let mut fans = Vec::with_capacity(colors.len());
    let mut max_aberration = meter!(0.0);
    for (wavelength, color) in specs.spectral_region().wavelengths().iter().zip(colors) {
        let tracer = FanTracer::new(model, specs, config, field_index, axis, *wavelength, ray_count)?;
        let pupil_coordinates = tracer.pupil_coordinates().to_vec();
        let mut points = Vec::with_capacity(pupil_coordinates.len());
        let mut blocked = Vec::new();
        for (pupil, result) in pupil_coordinates.into_iter().zip(tracer) {
            match result {
                Ok(point) => {
                    if point.aberration.abs() > max_aberration {
                        max_aberration = point.aberration.abs();
                    }
                    points.push(point);
                }
                Err(e) => {
                    warn!("fan ray at pupil coordinate {pupil:.3} blocked: {e}");
                    blocked.push((pupil, e));
                }
            }
        }
        fans.push(WavelengthFan {
            wavelength: *wavelength,
            color,
            points,
            blocked,
        });
    }
    Ok(RayFan {
        axis,
        field_index,
        fans,
        max_aberration,
    })
}

/// Start point and direction of a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayStart {
    /// start point
    pub point: Point3<Length>,
    /// normalized direction
    pub direction: Vector3<f64>,
}

/// Returns the transformation from the frame of surface 1 into a frame located `start_offset` in front of surface 1.
///
/// The frame is oriented like the frame of the object surface.
///
/// # Errors
///
/// This function will return an error if the model has no surface 1 or the offset is not finite.
pub fn setup_shift_of_ray_bundle(model: &SequentialModel, start_offset: Length) -> SeqResult<Isometry> {
    if !start_offset.is_finite() {
        return Err(SeqError::InvalidGeometryRequest("start offset must be finite".into()));
    }
    let surfaces = model.surfaces();
    Ok(forward_transform(&surfaces[0], start_offset, &surfaces[1]))
}

/// Move the start points of a traced ray bundle into a plane located `start_offset` in front of surface 1.
///
/// The ray with index `chief_index` is moved back along its own direction by `start_offset`, starting from its
/// intersection point with surface 1. All other rays are moved onto the plane perpendicular to the chief ray through
/// its shifted start point. Points and directions of the result are given in the shifted frame (see
/// [`setup_shift_of_ray_bundle`]).
///
/// # Errors
///
/// This function will return an error if the chief ray is missing or blocked. Blocked rays in the bundle are
/// reported as errors in the result.
pub fn shift_start_of_ray_bundle(
    model: &SequentialModel,
    bundle: &[SeqResult<RayPath>],
    start_offset: Length,
    chief_index: usize,
) -> SeqResult<Vec<SeqResult<RayStart>>> {
    let shift = setup_shift_of_ray_bundle(model, start_offset)?;
    let surfaces = model.surfaces();
    let object_step = forward_transform(&surfaces[0], model.gaps()[0].thickness(), &surfaces[1]);
    let to_start_frame = |path: &RayPath| -> SeqResult<(Point3<f64>, Vector3<f64>)> {
        let (Some(object), Some(first)) = (path.segments().first(), path.segments().get(1)) else {
            return Err(SeqError::InvalidGeometryRequest(
                "ray path does not reach surface 1".into(),
            ));
        };
        let dir_s1 = object_step.inverse_transform_vector_f64(&object.direction);
        Ok((
            shift.transform_point_f64(&first.point.map(|c| c.value)),
            shift.transform_vector_f64(&dir_s1),
        ))
    };
    let chief = match bundle.get(chief_index) {
        Some(Ok(path)) => path,
        Some(Err(e)) => return Err(e.clone()),
        None => {
            return Err(SeqError::InvalidGeometryRequest(format!(
                "chief ray {chief_index} not part of the bundle"
            )))
        }
    };
    let (cr_point, cr_dir) = to_start_frame(chief)?;
    let cr_start = cr_point - start_offset.value * cr_dir;
    Ok(bundle
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let path = path.as_ref().map_err(Clone::clone)?;
            if i == chief_index {
                return Ok(RayStart {
                    point: meter!(cr_start.x, cr_start.y, cr_start.z),
                    direction: cr_dir,
                });
            }
            let (point, dir) = to_start_frame(path)?;
            let denominator = dir.dot(&cr_dir);
            if denominator == 0.0 {
                return Err(SeqError::InvalidGeometryRequest(
                    "ray perpendicular to chief ray".into(),
                ));
            }
            let start = point - ((point - cr_start).dot(&cr_dir) / denominator) * dir;
            Ok(RayStart {
                point: meter!(start.x, start.y, start.z),
                direction: dir,
            })
        })
        .collect())
}

/// Apply [`shift_start_of_ray_bundle`] to the bundles of all fields (e.g. from [`trace_boundary_rays`]).
///
/// The first ray of each bundle is used as chief ray.
#[must_use]
pub fn shift_start_of_rayset(
    model: &SequentialModel,
    rayset: &[RayBundle],
    start_offset: Length,
) -> Vec<SeqResult<Vec<SeqResult<RayStart>>>> {
    rayset
        .iter()
        .map(|bundle| shift_start_of_ray_bundle(model, bundle, start_offset, 0))
        .collect()
}
