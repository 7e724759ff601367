//! The sequential model: an ordered chain of surfaces separated by gaps.
//!
//! ```text
//!  SObj    S1    S2    S3 ... Si-1    SImg
//!      \  /  \  /  \  /           \  /
//!      GObj   G1    G2             Gi-1
//! ```
//!
//! A model with N surfaces always has N-1 gaps. The first surface is the object surface, the last one the image
//! surface. Both are created with the model and can never be removed.
#![warn(missing_docs)]
use std::fmt::{Display, Write};

use itertools::{EitherOrBoth, Itertools};
use log::info;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::millimeter};

use crate::{
    aperture,
    error::{SeqError, SeqResult},
    gap::Gap,
    medium::Medium,
    optical_spec::OpticalSpecs,
    ray_trace_config::RayTraceConfig,
    surface::{DecenterData, InteractionMode, Profile, Surface},
    transform::compute_global_coords,
    utils::geom_transformation::Isometry,
};

const fn default_global_reference() -> usize {
    1
}

/// Display mode of the surface shape in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// list the vertex curvature (1/mm)
    #[default]
    Curvature,
    /// list the vertex radius (mm, 0.0 for flat surfaces)
    Radius,
}

/// One row of a model listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceListing {
    /// surface label (see [`SequentialModel::surface_label_list`])
    pub label: String,
    /// vertex curvature (1/m)
    pub curvature: f64,
    /// vertex radius (`None` for flat surfaces)
    pub radius: Option<Length>,
    /// thickness of the following gap (`None` for the image surface)
    pub thickness: Option<Length>,
    /// name of the medium of the following gap (`None` for the image surface)
    pub medium: Option<String>,
    /// clear aperture (radius) of the surface
    pub clear_aperture: Length,
}

/// A (non-air) element of a model: a gap filled with a medium and its bounding surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementListing {
    /// index of the first bounding surface
    pub first_surface: usize,
    /// index of the second bounding surface
    pub second_surface: usize,
    /// thickness of the element
    pub thickness: Length,
    /// name of the medium
    pub medium: String,
}

/// An ordered chain of [`Surface`]s separated by [`Gap`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialModel {
    surfaces: Vec<Surface>,
    gaps: Vec<Gap>,
    #[serde(default)]
    stop_surface: Option<usize>,
    #[serde(default = "default_global_reference")]
    global_reference: usize,
    #[serde(skip)]
    transforms: Vec<Isometry>,
}
impl Default for SequentialModel {
    /// Create a model consisting only of an object and an image surface and the object gap.
    fn default() -> Self {
        Self {
            surfaces: vec![Surface::new_labeled("Obj"), Surface::new_labeled("Img")],
            gaps: vec![Gap::default()],
            stop_surface: None,
            global_reference: default_global_reference(),
            transforms: Vec::new(),
        }
    }
}
impl SequentialModel {
    /// Creates a new (empty) [`SequentialModel`].
    ///
    /// See [`SequentialModel::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the number of surfaces (including object and image surface).
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }
    /// Returns the number of gaps.
    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }
    /// Returns the index of the image surface.
    #[must_use]
    pub fn image_index(&self) -> usize {
        self.surfaces.len() - 1
    }
    /// Returns all surfaces.
    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }
    /// Returns all gaps.
    #[must_use]
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }
    fn check_surface_index(&self, index: usize) -> SeqResult<()> {
        if index >= self.surfaces.len() {
            return Err(SeqError::StructuralViolation(format!(
                "surface index {index} out of range (model has {} surfaces)",
                self.surfaces.len()
            )));
        }
        Ok(())
    }
    /// Returns the surface with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn surface(&self, index: usize) -> SeqResult<&Surface> {
        self.check_surface_index(index)?;
        Ok(&self.surfaces[index])
    }
    /// Returns a mutable reference to the surface with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn surface_mut(&mut self, index: usize) -> SeqResult<&mut Surface> {
        self.check_surface_index(index)?;
        self.transforms.clear();
        Ok(&mut self.surfaces[index])
    }
    /// Returns a mutable reference to the gap with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn gap_mut(&mut self, index: usize) -> SeqResult<&mut Gap> {
        let nr_of_gaps = self.gaps.len();
        if index < nr_of_gaps {
            self.transforms.clear();
        }
        self.gaps.get_mut(index).ok_or_else(|| {
            SeqError::StructuralViolation(format!(
                "gap index {index} out of range (model has {nr_of_gaps} gaps)"
            ))
        })
    }
    /// Returns the surface with the given index and the gap following it.
    ///
    /// The image surface has no following gap (`None`).
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn surface_and_gap(&self, index: usize) -> SeqResult<(&Surface, Option<&Gap>)> {
        self.check_surface_index(index)?;
        Ok((&self.surfaces[index], self.gaps.get(index)))
    }
    /// Mutable version of [`SequentialModel::surface_and_gap`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn surface_and_gap_mut(
        &mut self,
        index: usize,
    ) -> SeqResult<(&mut Surface, Option<&mut Gap>)> {
        self.check_surface_index(index)?;
        self.transforms.clear();
        Ok((&mut self.surfaces[index], self.gaps.get_mut(index)))
    }
    /// Insert a surface and the gap following it at the given index.
    ///
    /// All surfaces and gaps from `at_index` onwards are shifted by one. Valid indices range from 1 (directly after
    /// the object surface) to the index of the image surface (directly before the image surface). The first inserted
    /// surface becomes the aperture stop. An existing stop index is shifted along with its surface.
    ///
    /// # Errors
    ///
    /// This function will return an error if the insertion would place data before the object or after the image
    /// surface.
    pub fn insert(&mut self, surface: Surface, gap: Gap, at_index: usize) -> SeqResult<()> {
        if at_index == 0 || at_index > self.image_index() {
            return Err(SeqError::StructuralViolation(format!(
                "cannot insert at index {at_index}: valid range is 1..={}",
                self.image_index()
            )));
        }
        self.surfaces.insert(at_index, surface);
        self.gaps.insert(at_index, gap);
        self.transforms.clear();
        self.stop_surface = match self.stop_surface {
            Some(stop) if stop >= at_index => Some(stop + 1),
            Some(stop) => Some(stop),
            None => Some(at_index),
        };
        Ok(())
    }
    /// Remove the surface with the given index together with its following gap.
    ///
    /// The removed pair is returned. If the stop surface is removed, the stop moves to the surface now occupying its
    /// index (or the last interior surface). Without interior surfaces no stop is defined.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index refers to the object or image surface or is out of range.
    pub fn remove(&mut self, index: usize) -> SeqResult<(Surface, Gap)> {
        if index == 0 || index >= self.image_index() {
            return Err(SeqError::StructuralViolation(format!(
                "cannot remove surface {index}: object and image surfaces are permanent"
            )));
        }
        let surface = self.surfaces.remove(index);
        let gap = self.gaps.remove(index);
        self.transforms.clear();
        let last_interior = self.image_index().checked_sub(1).filter(|i| *i > 0);
        self.stop_surface = match self.stop_surface {
            Some(stop) if stop > index => Some(stop - 1),
            Some(stop) if stop == index => last_interior.map(|last| stop.min(last)),
            other => other,
        };
        self.global_reference = self.global_reference.min(self.image_index());
        Ok((surface, gap))
    }
    /// Check the structure of this model.
    ///
    /// A valid model has an object and an image surface, one gap less than surfaces and (if defined) an aperture stop
    /// on an interior surface. Models read from a file should be checked before any other use.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the conditions above is violated.
    pub fn validate(&self) -> SeqResult<()> {
        if self.surfaces.len() < 2 {
            return Err(SeqError::StructuralViolation(format!(
                "model needs an object and an image surface but has {} surfaces",
                self.surfaces.len()
            )));
        }
        if self.surfaces.len() != self.gaps.len() + 1 {
            return Err(SeqError::StructuralViolation(format!(
                "model with {} surfaces must have {} gaps but has {}",
                self.surfaces.len(),
                self.surfaces.len() - 1,
                self.gaps.len()
            )));
        }
        if let Some(stop) = self.stop_surface {
            if stop == 0 || stop >= self.image_index() {
                return Err(SeqError::StructuralViolation(format!(
                    "stop surface {stop} is not an interior surface"
                )));
            }
        }
        Ok(())
    }
    /// Returns the index of the aperture stop (`None` if the model has no interior surfaces).
    #[must_use]
    pub const fn stop_surface(&self) -> Option<usize> {
        self.stop_surface
    }
    /// Define the aperture stop.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index does not refer to an interior surface.
    pub fn set_stop(&mut self, index: usize) -> SeqResult<()> {
        if index == 0 || index >= self.image_index() {
            return Err(SeqError::StructuralViolation(format!(
                "surface {index} cannot be the stop: only interior surfaces are allowed"
            )));
        }
        self.stop_surface = Some(index);
        Ok(())
    }
    /// Returns the index of the global reference surface.
    #[must_use]
    pub const fn global_reference(&self) -> usize {
        self.global_reference
    }
    /// Set the global reference surface whose frame is used as global coordinate system.
    ///
    /// The transforms are recomputed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface does not exist.
    pub fn set_global_reference(&mut self, index: usize) -> SeqResult<()> {
        self.transforms = compute_global_coords(&self.surfaces, &self.gaps, index)?;
        self.global_reference = index;
        Ok(())
    }
    /// Returns the transformations of all surface frames into the global frame.
    ///
    /// This list is computed during [`SequentialModel::refresh`]. It is empty before the first refresh and after any
    /// change of a surface or gap until the next refresh.
    #[must_use]
    pub fn transforms(&self) -> &[Isometry] {
        &self.transforms
    }
    /// Returns the direction of propagation along the local z axis within each gap (`1.0` or `-1.0`).
    ///
    /// The direction flips after each reflecting surface.
    #[must_use]
    pub fn z_directions(&self) -> Vec<f64> {
        let mut z_dir = 1.0;
        self.surfaces
            .iter()
            .take(self.gaps.len())
            .map(|s| {
                if s.interaction_mode() == InteractionMode::Reflect {
                    z_dir = -z_dir;
                }
                z_dir
            })
            .collect()
    }
    /// Returns the signed refractive indices of all gaps at the given wavelength.
    ///
    /// The sign of the index flips after each reflecting surface and is carried forward. The first entry is the
    /// index of the object space.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index of a medium could not be determined.
    pub fn signed_refractive_indices(&self, wavelength: Length) -> SeqResult<Vec<f64>> {
        let mut n_before = self.gaps[0].refractive_index_or_air(wavelength)?;
        let mut indices = Vec::with_capacity(self.gaps.len());
        for (surface, gap) in self.surfaces.iter().zip(self.gaps.iter()) {
            let mut n_after = gap.refractive_index_or_air(wavelength)?.copysign(n_before);
            if surface.interaction_mode() == InteractionMode::Reflect {
                n_after = -n_after;
            }
            indices.push(n_after);
            n_before = n_after;
        }
        Ok(indices)
    }
    /// Recompute the index difference across each surface at the reference wavelength and update all surfaces.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index of a medium could not be determined.
    pub fn update_index_differences(&mut self, specs: &OpticalSpecs) -> SeqResult<()> {
        let wavelength = specs.reference_wavelength();
        let indices = self.signed_refractive_indices(wavelength)?;
        let mut n_before = self.gaps[0].refractive_index_or_air(wavelength)?;
        for (i, surface) in self.surfaces.iter_mut().enumerate() {
            if let Some(n_after) = indices.get(i) {
                surface.set_delta_n(n_after - n_before);
                n_before = *n_after;
            } else {
                surface.set_delta_n(0.0);
            }
            surface.update();
        }
        Ok(())
    }
    /// Determine the clear aperture of all surfaces by tracing the boundary rays of all fields.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ray aiming failed.
    pub fn set_clear_apertures(
        &mut self,
        specs: &OpticalSpecs,
        config: &RayTraceConfig,
    ) -> SeqResult<()> {
        let apertures = aperture::clear_apertures(self, specs, config)?;
        for (surface, clear_aperture) in self.surfaces.iter_mut().zip(apertures) {
            surface.set_clear_aperture(clear_aperture)?;
        }
        Ok(())
    }
    /// Rebuild all derived data of this model.
    ///
    /// This function
    ///   - computes the index difference across each surface at the reference wavelength and updates all surfaces.
    ///   - recomputes the global transforms.
    ///   - determines the clear apertures from traced boundary rays.
    ///
    /// A model must be refreshed after any change before tracing rays or performing paraxial analysis.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the steps above failed.
    pub fn refresh(&mut self, specs: &OpticalSpecs, config: &RayTraceConfig) -> SeqResult<()> {
        info!(
            "Refreshing sequential model with {} surfaces.",
            self.surfaces.len()
        );
        self.update_index_differences(specs)?;
        self.transforms = compute_global_coords(&self.surfaces, &self.gaps, self.global_reference)?;
        self.set_clear_apertures(specs, config)
    }
    /// Returns the labels of all surfaces.
    ///
    /// A surface is listed by its label. Unlabeled surfaces are listed as `Stop` (for the aperture stop) or by their
    /// index.
    #[must_use]
    pub fn surface_label_list(&self) -> Vec<String> {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if !s.label().is_empty() {
                    s.label().to_string()
                } else if Some(i) == self.stop_surface {
                    "Stop".to_string()
                } else {
                    i.to_string()
                }
            })
            .collect()
    }
    /// Returns the listing of the surface with the given index and the gap following it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn list_surface_and_gap(&self, index: usize) -> SeqResult<SurfaceListing> {
        let (surface, gap) = self.surface_and_gap(index)?;
        let label = self
            .surface_label_list()
            .get(index)
            .cloned()
            .unwrap_or_default();
        Ok(SurfaceListing {
            label,
            curvature: surface.profile().curvature(),
            radius: surface.profile().radius(),
            thickness: gap.map(Gap::thickness),
            medium: gap.map(|g| g.medium().display_name()),
            clear_aperture: surface.clear_aperture(),
        })
    }
    /// Returns the listing of all surfaces and gaps.
    #[must_use]
    pub fn list_model(&self) -> Vec<SurfaceListing> {
        (0..self.surfaces.len())
            .filter_map(|i| self.list_surface_and_gap(i).ok())
            .collect()
    }
    /// Returns all decentered surfaces together with their index.
    #[must_use]
    pub fn list_decenters(&self) -> Vec<(usize, &DecenterData)> {
        self.surfaces
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.decenter().map(|d| (i, d)))
            .collect()
    }
    /// Returns all gaps not filled with air together with their bounding surfaces.
    #[must_use]
    pub fn list_elements(&self) -> Vec<ElementListing> {
        self.gaps
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.medium().is_air())
            .map(|(i, g)| ElementListing {
                first_surface: i,
                second_surface: i + 1,
                thickness: g.thickness(),
                medium: g.medium().display_name(),
            })
            .collect()
    }
    /// Returns a table of all surfaces and gaps.
    #[must_use]
    pub fn listing(&self, mode: ListingMode) -> String {
        let shape_header = match mode {
            ListingMode::Curvature => "curvature (1/mm)",
            ListingMode::Radius => "radius (mm)",
        };
        let mut table = format!(
            "{:>6} {:>18} {:>16} {:>14} {:>12}\n",
            "surf", shape_header, "thickness (mm)", "medium", "CA (mm)"
        );
        for (i, row) in self.list_model().iter().enumerate() {
            let shape = match mode {
                ListingMode::Curvature => row.curvature / 1000.0,
                ListingMode::Radius => row.radius.map_or(0.0, |r| r.get::<millimeter>()),
            };
            let thickness = row
                .thickness
                .map_or_else(String::new, |t| format!("{:.4}", t.get::<millimeter>()));
            let medium = row.medium.clone().unwrap_or_default();
            let mode_marker = if self.surfaces[i].interaction_mode() == InteractionMode::Reflect {
                " REFL"
            } else {
                ""
            };
            let _ = writeln!(
                table,
                "{:>6} {:>18.6} {:>16} {:>14} {:>12.4}{mode_marker}",
                row.label,
                shape,
                thickness,
                medium,
                row.clear_aperture.get::<millimeter>()
            );
        }
        table
    }
    /// Iterate over all surfaces paired with their following gap (`None` for the image surface).
    pub fn iter(&self) -> impl Iterator<Item = (&Surface, Option<&Gap>)> {
        self.surfaces
            .iter()
            .zip_longest(self.gaps.iter())
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(s, g) => Some((s, Some(g))),
                EitherOrBoth::Left(s) => Some((s, None)),
                EitherOrBoth::Right(_) => None,
            })
    }
}
impl Display for SequentialModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.listing(ListingMode::Curvature))?;
        match self.stop_surface {
            Some(stop) => writeln!(f, "stop surface: {stop}"),
            None => writeln!(f, "stop surface: none"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        degree,
        medium::{MediumConst, MediumType},
        millimeter,
        surface::{DecenterType, ProfileType, Spherical},
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;
    use nalgebra::Vector3;

    fn lens_surface(radius: f64) -> Surface {
        Surface::new(
            ProfileType::Spherical(Spherical::from_radius(millimeter!(radius)).unwrap()),
            InteractionMode::Refract,
        )
    }
    fn glass_gap(thickness: f64) -> Gap {
        Gap::new(
            millimeter!(thickness),
            MediumType::Const(MediumConst::new(1.5).unwrap()),
        )
        .unwrap()
    }
    fn singlet() -> SequentialModel {
        let mut model = SequentialModel::new();
        model.gap_mut(0).unwrap().set_thickness(millimeter!(100.0)).unwrap();
        model.insert(lens_surface(50.0), glass_gap(5.0), 1).unwrap();
        model
            .insert(
                lens_surface(-50.0),
                Gap::new(millimeter!(45.0), MediumType::Air).unwrap(),
                2,
            )
            .unwrap();
        model
    }
    #[test]
    fn default() {
        let model = SequentialModel::default();
        assert_eq!(model.surface_count(), 2);
        assert_eq!(model.gap_count(), 1);
        assert_eq!(model.stop_surface(), None);
        assert_eq!(model.global_reference(), 1);
        assert!(model.transforms().is_empty());
        assert_eq!(model.surface_label_list(), vec!["Obj", "Img"]);
    }
    #[test]
    fn validate() {
        assert!(SequentialModel::default().validate().is_ok());
        assert!(singlet().validate().is_ok());
        let mut model = SequentialModel::default();
        model.surfaces.pop();
        model.gaps.clear();
        assert_matches!(model.validate(), Err(SeqError::StructuralViolation(_)));
        let mut model = SequentialModel::default();
        model.gaps.clear();
        assert_matches!(model.validate(), Err(SeqError::StructuralViolation(_)));
        let mut model = singlet();
        model.stop_surface = Some(3);
        assert_matches!(model.validate(), Err(SeqError::StructuralViolation(_)));
        model.stop_surface = Some(0);
        assert_matches!(model.validate(), Err(SeqError::StructuralViolation(_)));
        model.stop_surface = None;
        assert!(model.validate().is_ok());
    }
    #[test]
    fn edits_invalidate_transforms() {
        let specs = OpticalSpecs::default();
        let config = RayTraceConfig::default();
        let mut model = singlet();
        model.refresh(&specs, &config).unwrap();
        assert_eq!(model.transforms().len(), 4);
        model.insert(lens_surface(100.0), glass_gap(2.0), 3).unwrap();
        assert!(model.transforms().is_empty());
        model.refresh(&specs, &config).unwrap();
        assert_eq!(model.transforms().len(), 5);
        model.remove(3).unwrap();
        assert!(model.transforms().is_empty());
        model.refresh(&specs, &config).unwrap();
        model.gap_mut(1).unwrap().set_thickness(millimeter!(6.0)).unwrap();
        assert!(model.transforms().is_empty());
        model.refresh(&specs, &config).unwrap();
        assert!(model.gap_mut(7).is_err());
        assert_eq!(model.transforms().len(), 4);
        model.surface_mut(1).unwrap().set_label("front");
        assert!(model.transforms().is_empty());
        model.refresh(&specs, &config).unwrap();
        model.surface_and_gap_mut(2).unwrap();
        assert!(model.transforms().is_empty());
    }
    #[test]
    fn insert_and_remove_keep_counts() {
        let mut model = SequentialModel::default();
        for i in 1..=4 {
            model.insert(Surface::default(), Gap::default(), i).unwrap();
            assert_eq!(model.surface_count(), model.gap_count() + 1);
        }
        model.insert(Surface::default(), Gap::default(), 2).unwrap();
        assert_eq!(model.surface_count(), model.gap_count() + 1);
        while model.surface_count() > 2 {
            model.remove(1).unwrap();
            assert_eq!(model.surface_count(), model.gap_count() + 1);
        }
        assert_eq!(model.surface_label_list(), vec!["Obj", "Img"]);
    }
    #[test]
    fn insert_out_of_range() {
        let mut model = SequentialModel::default();
        assert_matches!(
            model.insert(Surface::default(), Gap::default(), 0),
            Err(SeqError::StructuralViolation(_))
        );
        assert_matches!(
            model.insert(Surface::default(), Gap::default(), 2),
            Err(SeqError::StructuralViolation(_))
        );
        assert_eq!(model.surface_count(), 2);
    }
    #[test]
    fn remove_endpoints() {
        let mut model = singlet();
        assert_matches!(model.remove(0), Err(SeqError::StructuralViolation(_)));
        assert_matches!(model.remove(3), Err(SeqError::StructuralViolation(_)));
        assert_matches!(model.remove(4), Err(SeqError::StructuralViolation(_)));
        let (surface, gap) = model.remove(2).unwrap();
        assert_relative_eq!(surface.profile().curvature(), -20.0);
        assert!(gap.medium().is_air());
        assert_eq!(model.surface_count(), 3);
    }
    #[test]
    fn stop_follows_surfaces() {
        let mut model = singlet();
        assert_eq!(model.stop_surface(), Some(1));
        model.set_stop(2).unwrap();
        model.insert(Surface::default(), Gap::default(), 1).unwrap();
        assert_eq!(model.stop_surface(), Some(3));
        model.insert(Surface::default(), Gap::default(), 4).unwrap();
        assert_eq!(model.stop_surface(), Some(3));
        model.remove(1).unwrap();
        assert_eq!(model.stop_surface(), Some(2));
        model.remove(2).unwrap();
        assert_eq!(model.stop_surface(), Some(2));
        model.remove(2).unwrap();
        assert_eq!(model.stop_surface(), Some(1));
        model.remove(1).unwrap();
        assert_eq!(model.stop_surface(), None);
        assert!(model.set_stop(1).is_err());
    }
    #[test]
    fn set_stop_endpoints() {
        let mut model = singlet();
        assert!(model.set_stop(0).is_err());
        assert!(model.set_stop(3).is_err());
        assert!(model.set_stop(2).is_ok());
        assert_eq!(model.surface_label_list(), vec!["Obj", "1", "Stop", "Img"]);
    }
    #[test]
    fn surface_and_gap() {
        let model = singlet();
        let (surface, gap) = model.surface_and_gap(1).unwrap();
        assert_relative_eq!(surface.profile().curvature(), 20.0);
        assert_relative_eq!(gap.unwrap().thickness().value, 0.005);
        let (_, gap) = model.surface_and_gap(3).unwrap();
        assert!(gap.is_none());
        assert!(model.surface_and_gap(4).is_err());
        assert!(model.surface(4).is_err());
        let pairs: Vec<_> = model.iter().collect();
        assert_eq!(pairs.len(), 4);
        assert!(pairs[3].1.is_none());
    }
    #[test]
    fn refresh_delta_n() {
        let mut model = singlet();
        model
            .refresh(&OpticalSpecs::default(), &RayTraceConfig::default())
            .unwrap();
        let delta_n: Vec<f64> = model.surfaces().iter().map(Surface::delta_n).collect();
        assert_eq!(delta_n, vec![0.0, 0.5, -0.5, 0.0]);
        assert_eq!(model.transforms().len(), 4);
        assert_abs_diff_eq!(
            model.transforms()[3].translation_vec_in_m(),
            Vector3::new(0.0, 0.0, 0.05),
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            model.transforms()[0].translation_vec_in_m(),
            Vector3::new(0.0, 0.0, -0.1),
            epsilon = 1e-15
        );
    }
    #[test]
    fn refresh_is_idempotent() {
        let mut model = singlet();
        model
            .surface_mut(2)
            .unwrap()
            .set_decenter(Some(
                DecenterData::new(
                    DecenterType::Local,
                    Vector3::new(millimeter!(0.0), millimeter!(0.5), millimeter!(0.0)),
                    degree!(1.0),
                    degree!(0.0),
                    degree!(0.0),
                )
                .unwrap(),
            ));
        let specs = OpticalSpecs::default();
        let config = RayTraceConfig::default();
        model.refresh(&specs, &config).unwrap();
        let first = model.clone();
        model.refresh(&specs, &config).unwrap();
        assert_eq!(model, first);
        assert!(model.surfaces()[1].clear_aperture() > crate::meter!(0.0));
    }
    #[test]
    fn mirror_flips_index_sign() {
        let mut model = SequentialModel::default();
        model
            .insert(
                Surface::new(ProfileType::default(), InteractionMode::Reflect),
                Gap::new(millimeter!(-10.0), MediumType::Air).unwrap(),
                1,
            )
            .unwrap();
        model
            .insert(
                Surface::new(ProfileType::default(), InteractionMode::Reflect),
                Gap::new(millimeter!(10.0), MediumType::Air).unwrap(),
                2,
            )
            .unwrap();
        let wavelength = OpticalSpecs::default().reference_wavelength();
        assert_eq!(
            model.signed_refractive_indices(wavelength).unwrap(),
            vec![1.0, -1.0, 1.0]
        );
        assert_eq!(model.z_directions(), vec![1.0, -1.0, 1.0]);
        model
            .refresh(&OpticalSpecs::default(), &RayTraceConfig::default())
            .unwrap();
        let delta_n: Vec<f64> = model.surfaces().iter().map(Surface::delta_n).collect();
        assert_eq!(delta_n, vec![0.0, -2.0, 2.0, 0.0]);
    }
    #[test]
    fn global_reference() {
        let mut model = singlet();
        assert_matches!(
            model.set_global_reference(4),
            Err(SeqError::InvalidGeometryRequest(_))
        );
        model.set_global_reference(0).unwrap();
        assert_eq!(model.global_reference(), 0);
        assert_abs_diff_eq!(
            model.transforms()[1].translation_vec_in_m(),
            Vector3::new(0.0, 0.0, 0.1),
            epsilon = 1e-15
        );
        model.remove(2).unwrap();
        model.set_global_reference(2).unwrap();
        model.remove(1).unwrap();
        assert_eq!(model.global_reference(), 1);
    }
    #[test]
    fn listings() {
        let mut model = singlet();
        model
            .refresh(&OpticalSpecs::default(), &RayTraceConfig::default())
            .unwrap();
        let row = model.list_surface_and_gap(1).unwrap();
        assert_eq!(row.label, "Stop");
        assert_relative_eq!(row.radius.unwrap().value, 0.05);
        assert_eq!(row.medium.as_deref(), Some("1.5000"));
        let image = model.list_surface_and_gap(3).unwrap();
        assert!(image.thickness.is_none());
        assert!(image.medium.is_none());
        assert_eq!(model.list_model().len(), 4);
        let elements = model.list_elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].first_surface, 1);
        assert_eq!(elements[0].second_surface, 2);
        assert!(model.list_decenters().is_empty());
        let listing = model.listing(ListingMode::Radius);
        assert_eq!(listing.lines().count(), 5);
        assert!(listing.lines().nth(2).unwrap().contains("50.000000"));
        assert!(format!("{model}").ends_with("stop surface: 1\n"));
    }
}
