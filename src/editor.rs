//! Interactive editing of a [`SequentialModel`].
//!
//! A [`SequenceEditor`] holds the edit cursor (the "current surface"). New surfaces are inserted after the cursor,
//! which then advances to the new surface. Surfaces are usually entered from a prescription
//! (`[curvature or radius, thickness, medium]`) as found in lens data tables.
use log::warn;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::{
    error::{SeqError, SeqResult},
    gap::Gap,
    medium::{model_glass_from_code, MediumType},
    sequential_model::SequentialModel,
    surface::{DecenterData, InteractionMode, Profile, ProfileKind, Surface},
};

/// Keyword of the medium column marking a reflecting surface.
pub const REFLECT_KEYWORD: &str = "REFL";

/// Shape input of a prescription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurvatureInput {
    /// vertex curvature in 1/m
    Curvature(f64),
    /// vertex radius (a radius of zero denotes a flat surface)
    Radius(Length),
}
impl CurvatureInput {
    fn curvature(self) -> SeqResult<f64> {
        let cv = match self {
            Self::Curvature(cv) => cv,
            Self::Radius(r) if r.value == 0.0 => 0.0,
            Self::Radius(r) => 1.0 / r.value,
        };
        if cv.is_finite() {
            Ok(cv)
        } else {
            Err(SeqError::Other("curvature must be finite".into()))
        }
    }
}

/// One row of a lens prescription.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePrescription {
    /// shape of the surface
    pub curvature: CurvatureInput,
    /// thickness of the following gap (defocus for the image surface)
    pub thickness: Length,
    /// medium of the following gap
    ///
    /// - `None`: air
    /// - `"REFL"`: reflecting surface, the medium of the preceding gap is continued
    /// - a numeric glass code (e.g. `"517642"` or `"517.642"`): model glass
    /// - a glass name with optional catalog (e.g. `"N-BK7"` or `"N-BK7_Schott"`)
    pub medium: Option<String>,
}
impl SurfacePrescription {
    /// Creates a new [`SurfacePrescription`].
    #[must_use]
    pub fn new(curvature: CurvatureInput, thickness: Length, medium: Option<&str>) -> Self {
        Self {
            curvature,
            thickness,
            medium: medium.map(ToString::to_string),
        }
    }
    /// Returns the vertex curvature after checking curvature and thickness.
    fn checked_curvature(&self) -> SeqResult<f64> {
        let curvature = self.curvature.curvature()?;
        if !self.thickness.is_finite() {
            return Err(SeqError::Other("thickness must be finite".into()));
        }
        Ok(curvature)
    }
}

/// Editing session of a [`SequentialModel`] holding the edit cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequenceEditor {
    cursor: usize,
}
impl SequenceEditor {
    /// Creates a new [`SequenceEditor`] with the cursor at the object surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the index of the current surface.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
    /// Move the cursor to the given surface.
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface does not exist.
    pub fn set_cursor(&mut self, model: &SequentialModel, index: usize) -> SeqResult<()> {
        if index >= model.surface_count() {
            return Err(SeqError::StructuralViolation(format!(
                "cursor {index} out of range (model has {} surfaces)",
                model.surface_count()
            )));
        }
        self.cursor = index;
        Ok(())
    }
    /// Insert a surface and its following gap after the current surface and advance the cursor to it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the cursor is located at the image surface.
    pub fn insert(&mut self, model: &mut SequentialModel, surface: Surface, gap: Gap) -> SeqResult<()> {
        model.insert(surface, gap, self.cursor + 1)?;
        self.cursor += 1;
        Ok(())
    }
    /// Add a new surface defined by a prescription after the current surface.
    ///
    /// # Errors
    ///
    /// This function will return an error if the insertion is not possible or the prescription is invalid. In this
    /// case, model and cursor remain unchanged.
    pub fn add_surface(
        &mut self,
        model: &mut SequentialModel,
        prescription: &SurfacePrescription,
    ) -> SeqResult<()> {
        prescription.checked_curvature()?;
        self.insert(model, Surface::default(), Gap::default())?;
        if let Err(e) = self.update_surface_and_gap(model, prescription, None) {
            self.remove(model, None)?;
            return Err(e);
        }
        Ok(())
    }
    /// Update a surface and its following gap from a prescription.
    ///
    /// If no index is given, the current surface is updated. Applied to the image surface, the thickness is added
    /// to the preceding gap (defocus).
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface does not exist or the prescription is invalid.
    pub fn update_surface_and_gap(
        &self,
        model: &mut SequentialModel,
        prescription: &SurfacePrescription,
        index: Option<usize>,
    ) -> SeqResult<()> {
        let index = index.unwrap_or(self.cursor);
        let curvature = prescription.checked_curvature()?;
        let previous_medium = index
            .checked_sub(1)
            .and_then(|i| model.gaps().get(i))
            .map(|g| g.medium().clone())
            .unwrap_or_default();
        let (surface, gap) = model.surface_and_gap_mut(index)?;
        surface.profile_mut().set_curvature(curvature);
        if let Some(gap) = gap {
            gap.set_thickness(prescription.thickness)?;
            let medium = match prescription.medium.as_deref() {
                Some(m) if m.eq_ignore_ascii_case(REFLECT_KEYWORD) => {
                    surface.set_interaction_mode(InteractionMode::Reflect);
                    previous_medium
                }
                Some(m) => {
                    surface.set_interaction_mode(InteractionMode::Refract);
                    medium_from_input(m)
                }
                None => {
                    surface.set_interaction_mode(InteractionMode::Refract);
                    MediumType::Air
                }
            };
            gap.set_medium(medium);
        } else {
            let defocus_gap = model.gap_mut(index - 1)?;
            let thickness = defocus_gap.thickness() + prescription.thickness;
            defocus_gap.set_thickness(thickness)?;
        }
        Ok(())
    }
    /// Change the profile kind of a surface (current surface if no index is given).
    ///
    /// The vertex curvature is kept.
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface does not exist.
    pub fn update_profile(
        &self,
        model: &mut SequentialModel,
        kind: ProfileKind,
        index: Option<usize>,
    ) -> SeqResult<()> {
        let surface = model.surface_mut(index.unwrap_or(self.cursor))?;
        let profile = surface.profile().mutate(kind);
        surface.set_profile(profile);
        Ok(())
    }
    /// Set the decenter / tilt of a surface (current surface if no index is given).
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface does not exist.
    pub fn update_decenter(
        &self,
        model: &mut SequentialModel,
        decenter: DecenterData,
        index: Option<usize>,
    ) -> SeqResult<()> {
        model
            .surface_mut(index.unwrap_or(self.cursor))?
            .set_decenter(Some(decenter));
        Ok(())
    }
    /// Remove a surface and its following gap (current surface if no index is given).
    ///
    /// The cursor is moved back if it referred to the removed surface or a surface behind it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the object or image surface should be removed.
    pub fn remove(
        &mut self,
        model: &mut SequentialModel,
        index: Option<usize>,
    ) -> SeqResult<(Surface, Gap)> {
        let index = index.unwrap_or(self.cursor);
        let removed = model.remove(index)?;
        if self.cursor >= index {
            self.cursor -= 1;
        }
        Ok(removed)
    }
}

/// Resolve the medium column of a prescription: a numeric glass code or a catalog glass name.
///
/// Unresolvable inputs are replaced by air (with a warning).
fn medium_from_input(input: &str) -> MediumType {
    match input.trim().parse::<f64>() {
        Ok(code) => model_glass_from_code(code).unwrap_or_else(|e| {
            warn!("{e}");
            warn!("Replacing material with air.");
            MediumType::Air
        }),
        Err(_) => MediumType::from_catalog_or_air(input.trim()),
    }
}
