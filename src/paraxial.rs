//! First-order (paraxial) description of a sequential model.
//!
//! A [`ParaxialLens`] reduces a sequential model to the optical power of each surface, the reduced thickness
//! (`tau = t / n`) of each gap, the signed refractive index after each surface and the interaction mode. It is
//! traced with the classical y-nu trace.
use std::fmt::{Display, Write};

use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::millimeter};

use crate::{
    error::{SeqError, SeqResult},
    meter,
    optical_spec::OpticalSpecs,
    sequential_model::SequentialModel,
    surface::{FirstOrderData, InteractionMode},
};

/// The paraxial description of a sequential model.
///
/// All four sequences have the length of the model's surface list. Entry `i` contains the power of surface `i`,
/// the reduced thickness and the signed index of the gap following it, and the interaction mode of surface `i`.
/// The entry of the image surface has zero power and thickness and carries the index of the last gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParaxialLens {
    power: Vec<f64>,
    tau: Vec<Length>,
    index: Vec<f64>,
    mode: Vec<InteractionMode>,
}
impl ParaxialLens {
    /// Creates a new [`ParaxialLens`] from its four sequences.
    ///
    /// # Errors
    ///
    /// This function will return an error if the sequences differ in length or contain non-finite values.
    pub fn new(
        power: Vec<f64>,
        tau: Vec<Length>,
        index: Vec<f64>,
        mode: Vec<InteractionMode>,
    ) -> SeqResult<Self> {
        if tau.len() != power.len() || index.len() != power.len() || mode.len() != power.len() {
            return Err(SeqError::StructuralViolation(
                "paraxial lens sequences must have equal length".into(),
            ));
        }
        if power.iter().any(|p| !p.is_finite())
            || tau.iter().any(|t| !t.is_finite())
            || index.iter().any(|n| !n.is_normal())
        {
            return Err(SeqError::Other(
                "paraxial lens data must be finite (indices non-zero)".into(),
            ));
        }
        Ok(Self {
            power,
            tau,
            index,
            mode,
        })
    }
    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.power.len()
    }
    /// Returns `true` if this lens has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }
    /// Returns the optical powers (1/m).
    #[must_use]
    pub fn power(&self) -> &[f64] {
        &self.power
    }
    /// Returns the reduced thicknesses.
    #[must_use]
    pub fn tau(&self) -> &[Length] {
        &self.tau
    }
    /// Returns the signed refractive indices.
    #[must_use]
    pub fn index(&self) -> &[f64] {
        &self.index
    }
    /// Returns the interaction modes.
    #[must_use]
    pub fn mode(&self) -> &[InteractionMode] {
        &self.mode
    }
    /// Sets the optical power of the given entry.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range or the power is not finite.
    pub fn set_power(&mut self, index: usize, power: f64) -> SeqResult<()> {
        if !power.is_finite() {
            return Err(SeqError::Other("optical power must be finite".into()));
        }
        let len = self.len();
        let entry = self.power.get_mut(index).ok_or_else(|| {
            SeqError::StructuralViolation(format!("paraxial entry {index} out of range ({len})"))
        })?;
        *entry = power;
        Ok(())
    }
    /// Sets the reduced thickness of the given entry.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range or the thickness is not finite.
    pub fn set_tau(&mut self, index: usize, tau: Length) -> SeqResult<()> {
        if !tau.is_finite() {
            return Err(SeqError::Other("reduced thickness must be finite".into()));
        }
        let len = self.len();
        let entry = self.tau.get_mut(index).ok_or_else(|| {
            SeqError::StructuralViolation(format!("paraxial entry {index} out of range ({len})"))
        })?;
        *entry = tau;
        Ok(())
    }
}
impl Display for ParaxialLens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = format!(
            "{:>6} {:>16} {:>14} {:>12} {:>10}\n",
            "surf", "power (1/mm)", "tau (mm)", "index", "mode"
        );
        for i in 0..self.len() {
            let _ = writeln!(
                table,
                "{:>6} {:>16.8} {:>14.6} {:>12.6} {:>10}",
                i,
                self.power[i] / 1000.0,
                self.tau[i].get::<millimeter>(),
                self.index[i],
                self.mode[i]
            );
        }
        write!(f, "{table}")
    }
}

/// Heights and slopes of a paraxial ray at each surface.
///
/// The slope at entry `i` is the (geometric) slope after surface `i`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParaxialRay {
    heights: Vec<Length>,
    slopes: Vec<f64>,
}
impl ParaxialRay {
    /// Returns the ray heights at each surface.
    #[must_use]
    pub fn heights(&self) -> &[Length] {
        &self.heights
    }
    /// Returns the ray slopes after each surface.
    #[must_use]
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }
    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }
    /// Returns `true` if this ray has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

/// Create the [`ParaxialLens`] of a model.
///
/// The powers are taken from the surfaces using the index differences cached by the last refresh. Reduced
/// thicknesses and indices are evaluated at the reference wavelength.
///
/// # Errors
///
/// This function will return an error if the refractive index of a medium could not be determined.
pub fn sequence_to_paraxial(
    model: &SequentialModel,
    specs: &OpticalSpecs,
) -> SeqResult<ParaxialLens> {
    let indices = model.signed_refractive_indices(specs.reference_wavelength())?;
    let nr_of_surfaces = model.surface_count();
    let mut lens = ParaxialLens {
        power: Vec::with_capacity(nr_of_surfaces),
        tau: Vec::with_capacity(nr_of_surfaces),
        index: Vec::with_capacity(nr_of_surfaces),
        mode: Vec::with_capacity(nr_of_surfaces),
    };
    let mut n_before = indices[0];
    for ((surface, gap), n_after) in model.surfaces().iter().zip(model.gaps()).zip(&indices) {
        lens.power.push(surface.optical_power());
        lens.tau.push(gap.thickness() / *n_after);
        lens.index.push(*n_after);
        lens.mode.push(surface.interaction_mode());
        n_before = *n_after;
    }
    let image = &model.surfaces()[model.image_index()];
    lens.power.push(0.0);
    lens.tau.push(meter!(0.0));
    lens.index.push(n_before);
    lens.mode.push(image.interaction_mode());
    Ok(lens)
}

/// Apply a [`ParaxialLens`] to a model.
///
/// Gap thicknesses are set from the reduced thicknesses, surface curvatures from the powers. The profiles may derive
/// further shape parameters from the given axial ray (see
/// [`Profile::derive_from_ray_data`](crate::surface::Profile::derive_from_ray_data)). Shape parameters beyond the
/// vertex curvature are therefore not restored from the paraxial data.
///
/// # Errors
///
/// This function will return an error if the length of the lens or the ray does not match the model.
pub fn paraxial_to_sequence(
    model: &mut SequentialModel,
    lens: &ParaxialLens,
    axial_ray: &ParaxialRay,
) -> SeqResult<()> {
    let nr_of_surfaces = model.surface_count();
    if lens.len() != nr_of_surfaces || axial_ray.len() != nr_of_surfaces {
        return Err(SeqError::StructuralViolation(format!(
            "paraxial data ({} entries, ray {} entries) does not match model with {nr_of_surfaces} surfaces",
            lens.len(),
            axial_ray.len()
        )));
    }
    let mut n_before = lens.index[0];
    let mut slope_before = axial_ray.slopes[0];
    for i in 0..model.gap_count() {
        let n_after = lens.index[i];
        let slope_after = axial_ray.slopes[i];
        let (surface, gap) = model.surface_and_gap_mut(i)?;
        if let Some(gap) = gap {
            gap.set_thickness(lens.tau[i] * n_after)?;
        }
        surface.set_optical_power(lens.power[i], n_before, n_after);
        surface.derive_from_ray_data(&FirstOrderData {
            slope_before,
            slope_after,
            height: axial_ray.heights[i],
            n_before,
            n_after,
        });
        n_before = n_after;
        slope_before = slope_after;
    }
    Ok(())
}

fn trace_from(lens: &ParaxialLens, start: usize, height: f64, slope: f64) -> ParaxialRay {
    let n_before = lens.index[start.saturating_sub(1)];
    let mut y = height;
    let mut nu = n_before * slope;
    let mut ray = ParaxialRay {
        heights: Vec::with_capacity(lens.len() - start),
        slopes: Vec::with_capacity(lens.len() - start),
    };
    for i in start..lens.len() {
        if i > start {
            y = nu.mul_add(lens.tau[i - 1].value, y);
        }
        nu = (-y).mul_add(lens.power[i], nu);
        ray.heights.push(meter!(y));
        ray.slopes.push(nu / lens.index[i]);
    }
    ray
}

/// Trace a paraxial ray through a [`ParaxialLens`] (y-nu trace).
///
/// The ray starts at the object surface with the given height and (geometric) slope in object space.
#[must_use]
pub fn paraxial_trace(lens: &ParaxialLens, height: Length, slope: f64) -> ParaxialRay {
    if lens.is_empty() {
        return ParaxialRay::default();
    }
    trace_from(lens, 0, height.value, slope)
}

/// Returns the axial position of the entrance pupil relative to the vertex of surface 1.
///
/// The entrance pupil is the paraxial image of the aperture stop in object space. A model without stop has its
/// entrance pupil at surface 1.
///
/// # Errors
///
/// This function will return an error if the entrance pupil cannot be determined (stop located in an image plane of
/// the first surface).
pub fn entrance_pupil_position(model: &SequentialModel, lens: &ParaxialLens) -> SeqResult<Length> {
    let Some(stop) = model.stop_surface() else {
        return Ok(meter!(0.0));
    };
    if stop < 1 || stop >= lens.len() {
        return Err(SeqError::InvalidGeometryRequest(format!(
            "stop surface {stop} not part of the paraxial lens"
        )));
    }
    let a = trace_from(lens, 1, 1.0, 0.0).heights[stop - 1].value;
    let b = trace_from(lens, 1, 0.0, 1.0).heights[stop - 1].value;
    if a == 0.0 {
        return Err(SeqError::InvalidGeometryRequest(
            "entrance pupil at infinity (stop in an image plane)".into(),
        ));
    }
    Ok(meter!(b / a))
}

/// Trace the marginal (axial) ray of a model at the reference wavelength.
///
/// The ray starts at the axial object point and passes the edge of the entrance pupil. For an object at infinity
/// (object distance larger than 1e10 m) the ray enters parallel to the axis at the pupil radius.
///
/// # Errors
///
/// This function will return an error if the paraxial lens or the entrance pupil cannot be determined.
pub fn axial_ray(model: &SequentialModel, specs: &OpticalSpecs) -> SeqResult<ParaxialRay> {
    let lens = sequence_to_paraxial(model, specs)?;
    let z_ep = entrance_pupil_position(model, &lens)?;
    let ep_radius = specs.pupil_spec().entrance_pupil_radius();
    let object_distance = model.gaps()[0].thickness() + z_ep;
    if object_distance.value.abs() > 1e10 || object_distance.value == 0.0 {
        let mut ray = trace_from(&lens, 1, ep_radius.value, 0.0);
        ray.heights.insert(0, ep_radius);
        ray.slopes.insert(0, 0.0);
        return Ok(ray);
    }
    Ok(paraxial_trace(
        &lens,
        meter!(0.0),
        (ep_radius / object_distance).value,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        gap::Gap,
        medium::{MediumConst, MediumType},
        millimeter,
        ray_trace_config::RayTraceConfig,
        surface::{Conic, Profile, ProfileType, Spherical, Surface},
    };
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    fn singlet() -> SequentialModel {
        let mut model = SequentialModel::default();
        model.gap_mut(0).unwrap().set_thickness(millimeter!(100.0)).unwrap();
        let glass = MediumType::Const(MediumConst::new(1.5).unwrap());
        let s1 = Surface::new(
            ProfileType::Spherical(Spherical::from_radius(millimeter!(50.0)).unwrap()),
            InteractionMode::Refract,
        );
        let s2 = Surface::new(
            ProfileType::Spherical(Spherical::from_radius(millimeter!(-50.0)).unwrap()),
            InteractionMode::Refract,
        );
        model
            .insert(s1, Gap::new(millimeter!(5.0), glass).unwrap(), 1)
            .unwrap();
        model
            .insert(s2, Gap::new(millimeter!(45.0), MediumType::Air).unwrap(), 2)
            .unwrap();
        model
            .refresh(&OpticalSpecs::default(), &RayTraceConfig::default())
            .unwrap();
        model
    }
    #[test]
    fn lens_new() {
        assert!(ParaxialLens::new(vec![0.0], vec![], vec![1.0], vec![InteractionMode::Refract]).is_err());
        assert!(ParaxialLens::new(
            vec![f64::NAN],
            vec![meter!(0.0)],
            vec![1.0],
            vec![InteractionMode::Refract]
        )
        .is_err());
        let lens = ParaxialLens::new(
            vec![0.0],
            vec![meter!(0.0)],
            vec![1.0],
            vec![InteractionMode::Refract],
        )
        .unwrap();
        assert_eq!(lens.len(), 1);
    }
    #[test]
    fn sequence_to_paraxial_singlet() {
        let model = singlet();
        let lens = sequence_to_paraxial(&model, &OpticalSpecs::default()).unwrap();
        assert_eq!(lens.len(), 4);
        assert_relative_eq!(lens.power()[1], 0.5 / 0.05);
        assert_relative_eq!(lens.power()[2], 0.5 / 0.05);
        assert_relative_eq!(lens.tau()[1].value, 0.005 / 1.5);
        assert_eq!(lens.index(), &[1.0, 1.5, 1.0, 1.0]);
        assert_eq!(lens.power()[3], 0.0);
        assert_eq!(lens.tau()[3], meter!(0.0));
    }
    #[test]
    fn paraxial_round_trip() {
        let mut model = singlet();
        let specs = OpticalSpecs::default();
        let lens = sequence_to_paraxial(&model, &specs).unwrap();
        let ray = axial_ray(&model, &specs).unwrap();
        paraxial_to_sequence(&mut model, &lens, &ray).unwrap();
        let round_trip = sequence_to_paraxial(&model, &specs).unwrap();
        for i in 0..lens.len() {
            assert_relative_eq!(round_trip.power()[i], lens.power()[i], max_relative = 1e-9);
            assert_relative_eq!(
                round_trip.tau()[i].value,
                lens.tau()[i].value,
                max_relative = 1e-9
            );
        }
        assert_relative_eq!(
            model.gaps()[1].thickness().value,
            0.005,
            max_relative = 1e-9
        );
    }
    #[test]
    fn paraxial_round_trip_reshapes_stigmatic_conic() {
        let mut model = SequentialModel::default();
        let glass = MediumType::Const(MediumConst::new(1.5).unwrap());
        let front = Surface::new(
            ProfileType::Conic(Conic::new_stigmatic(20.0).unwrap()),
            InteractionMode::Refract,
        );
        let back = Surface::new(
            ProfileType::Spherical(Spherical::from_radius(millimeter!(-50.0)).unwrap()),
            InteractionMode::Refract,
        );
        model
            .insert(front, Gap::new(millimeter!(5.0), glass).unwrap(), 1)
            .unwrap();
        model
            .insert(back, Gap::new(millimeter!(45.0), MediumType::Air).unwrap(), 2)
            .unwrap();
        let specs = OpticalSpecs::default();
        model.refresh(&specs, &RayTraceConfig::default()).unwrap();
        let conic_constant = |model: &SequentialModel| match model.surfaces()[1].profile() {
            ProfileType::Conic(conic) => conic.conic_constant(),
            _ => panic!("surface 1 is not a conic"),
        };
        assert_eq!(conic_constant(&model), 0.0);
        let lens = sequence_to_paraxial(&model, &specs).unwrap();
        // object surface in contact with surface 1: collimated axial ray
        let ray = axial_ray(&model, &specs).unwrap();
        assert_eq!(ray.slopes()[0], 0.0);
        paraxial_to_sequence(&mut model, &lens, &ray).unwrap();
        let round_trip = sequence_to_paraxial(&model, &specs).unwrap();
        for i in 0..lens.len() {
            assert_relative_eq!(round_trip.power()[i], lens.power()[i], max_relative = 1e-9);
            assert_relative_eq!(
                round_trip.tau()[i].value,
                lens.tau()[i].value,
                max_relative = 1e-9
            );
        }
        assert_relative_eq!(model.surfaces()[1].profile().curvature(), 20.0, max_relative = 1e-9);
        // the shape is not restored but derived from the axial ray
        assert_relative_eq!(conic_constant(&model), -1.0 / 2.25, max_relative = 1e-9);
    }
    #[test]
    fn paraxial_to_sequence_wrong_length() {
        let mut model = singlet();
        let lens = ParaxialLens::new(
            vec![0.0],
            vec![meter!(0.0)],
            vec![1.0],
            vec![InteractionMode::Refract],
        )
        .unwrap();
        assert_matches!(
            paraxial_to_sequence(&mut model, &lens, &ParaxialRay::default()),
            Err(SeqError::StructuralViolation(_))
        );
    }
    #[test]
    fn trace_thin_focus() {
        let model = singlet();
        let lens = sequence_to_paraxial(&model, &OpticalSpecs::default()).unwrap();
        let ray = paraxial_trace(&lens, meter!(0.0), 0.01);
        assert_eq!(ray.len(), 4);
        assert_eq!(ray.heights()[0], meter!(0.0));
        assert_relative_eq!(ray.heights()[1].value, 0.001);
        // object-space slope is preserved by the flat object surface
        assert_relative_eq!(ray.slopes()[0], 0.01);
        // slope inside the glass: nu = 0.01 - 0.001 * 10 = 0.0
        assert_relative_eq!(ray.slopes()[1], 0.0, epsilon = 1e-15);
    }
    #[test]
    fn entrance_pupil() {
        let model = singlet();
        let lens = sequence_to_paraxial(&model, &OpticalSpecs::default()).unwrap();
        assert_eq!(model.stop_surface(), Some(1));
        assert_relative_eq!(
            entrance_pupil_position(&model, &lens).unwrap().value,
            0.0,
            epsilon = 1e-15
        );
        let empty = SequentialModel::default();
        let lens = sequence_to_paraxial(&empty, &OpticalSpecs::default()).unwrap();
        assert_eq!(entrance_pupil_position(&empty, &lens).unwrap(), meter!(0.0));
    }
    #[test]
    fn mirror_flips_index() {
        let mut model = SequentialModel::default();
        let mirror = Surface::new(ProfileType::default(), InteractionMode::Reflect);
        model
            .insert(mirror, Gap::new(millimeter!(-10.0), MediumType::Air).unwrap(), 1)
            .unwrap();
        model
            .refresh(&OpticalSpecs::default(), &RayTraceConfig::default())
            .unwrap();
        let lens = sequence_to_paraxial(&model, &OpticalSpecs::default()).unwrap();
        assert_eq!(lens.index(), &[1.0, -1.0, -1.0]);
        assert_relative_eq!(lens.tau()[1].value, 0.01);
    }
    #[test]
    fn display() {
        let model = singlet();
        let lens = sequence_to_paraxial(&model, &OpticalSpecs::default()).unwrap();
        let table = format!("{lens}");
        assert!(table.starts_with("  surf"));
        assert_eq!(table.lines().count(), 5);
    }
}
