//! Module for handling the optical surfaces of a sequential model.
//!
//! A [`Surface`] combines a [`Profile`] (the shape), an optional [`DecenterData`] (position / tilt), the
//! [`InteractionMode`] (refraction or reflection) and the data derived during a model refresh.
#![warn(missing_docs)]
use std::fmt::Display;

use nalgebra::{Point3, Vector3};
use num::Zero;
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use uom::si::{f64::Length, length::millimeter};

pub mod conic;
pub mod decenter;
pub mod even_polynomial;
pub mod profile;
pub mod spherical;

pub use conic::Conic;
pub use decenter::{DecenterData, DecenterType};
pub use even_polynomial::EvenPolynomial;
pub use profile::{FirstOrderData, Profile, ProfileKind, ProfileType};
pub use spherical::Spherical;

use crate::{
    error::{SeqError, SeqResult},
    ray_trace_config::RayTraceConfig,
};

/// The way light interacts with a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
pub enum InteractionMode {
    /// Light is refracted (transmitted) by the surface.
    #[default]
    Refract,
    /// Light is reflected by the surface.
    Reflect,
}
impl Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refract => write!(f, "transmit"),
            Self::Reflect => write!(f, "reflect"),
        }
    }
}

/// An optical surface of a sequential model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    #[serde(default)]
    label: String,
    profile: ProfileType,
    #[serde(default)]
    decenter: Option<DecenterData>,
    #[serde(default)]
    interaction_mode: InteractionMode,
    #[serde(skip)]
    delta_n: f64,
    #[serde(skip, default = "Length::zero")]
    clear_aperture: Length,
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            label: String::new(),
            profile: ProfileType::default(),
            decenter: None,
            interaction_mode: InteractionMode::default(),
            delta_n: 0.0,
            clear_aperture: Length::zero(),
        }
    }
}
impl Surface {
    /// Creates a new [`Surface`] with the given profile and interaction mode.
    #[must_use]
    pub fn new(profile: ProfileType, interaction_mode: InteractionMode) -> Self {
        Self {
            profile,
            interaction_mode,
            ..Default::default()
        }
    }
    /// Creates a new flat, refracting [`Surface`] with the given label.
    #[must_use]
    pub fn new_labeled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }
    /// Returns the label of this [`Surface`].
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Sets the label of this [`Surface`].
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }
    /// Returns a reference to the profile of this [`Surface`].
    #[must_use]
    pub const fn profile(&self) -> &ProfileType {
        &self.profile
    }
    /// Returns a mutable reference to the profile of this [`Surface`].
    pub fn profile_mut(&mut self) -> &mut ProfileType {
        &mut self.profile
    }
    /// Sets the profile of this [`Surface`].
    pub fn set_profile(&mut self, profile: ProfileType) {
        self.profile = profile;
    }
    /// Returns the decenter of this [`Surface`] (if any).
    #[must_use]
    pub const fn decenter(&self) -> Option<&DecenterData> {
        self.decenter.as_ref()
    }
    /// Returns a mutable reference to the decenter of this [`Surface`]. A default decenter is created if none exists.
    pub fn decenter_mut(&mut self) -> &mut DecenterData {
        self.decenter.get_or_insert_with(DecenterData::default)
    }
    /// Sets (or removes) the decenter of this [`Surface`].
    pub fn set_decenter(&mut self, decenter: Option<DecenterData>) {
        self.decenter = decenter;
    }
    /// Returns the [`InteractionMode`] of this [`Surface`].
    #[must_use]
    pub const fn interaction_mode(&self) -> InteractionMode {
        self.interaction_mode
    }
    /// Sets the [`InteractionMode`] of this [`Surface`].
    pub fn set_interaction_mode(&mut self, interaction_mode: InteractionMode) {
        self.interaction_mode = interaction_mode;
    }
    /// Returns the (signed) refractive index difference across this [`Surface`] at the reference wavelength.
    ///
    /// This value is computed during a model refresh.
    #[must_use]
    pub const fn delta_n(&self) -> f64 {
        self.delta_n
    }
    /// Sets the (signed) refractive index difference across this [`Surface`].
    pub fn set_delta_n(&mut self, delta_n: f64) {
        self.delta_n = delta_n;
    }
    /// Returns the clear aperture (radius) of this [`Surface`].
    #[must_use]
    pub fn clear_aperture(&self) -> Length {
        self.clear_aperture
    }
    /// Sets the clear aperture (radius) of this [`Surface`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given value is negative or not finite.
    pub fn set_clear_aperture(&mut self, clear_aperture: Length) -> SeqResult<()> {
        if clear_aperture.is_sign_negative() || !clear_aperture.is_finite() {
            return Err(SeqError::Other(
                "clear aperture must be >= 0.0 and finite".into(),
            ));
        }
        self.clear_aperture = clear_aperture;
        Ok(())
    }
    /// Returns the optical power (in 1/m) of this [`Surface`] based on the cached index difference.
    #[must_use]
    pub fn optical_power(&self) -> f64 {
        self.profile.optical_power(self.delta_n)
    }
    /// Set the optical power of this [`Surface`] for the given (signed) indices before and after the surface.
    ///
    /// The index difference is cached and the profile curvature adjusted accordingly.
    pub fn set_optical_power(&mut self, power: f64, n_before: f64, n_after: f64) {
        self.delta_n = n_after - n_before;
        self.profile.set_optical_power(power, self.delta_n);
    }
    /// Let the profile derive higher-order shape parameters from first-order ray data.
    pub fn derive_from_ray_data(&mut self, data: &FirstOrderData) {
        self.profile.derive_from_ray_data(data);
    }
    /// Recompute data derived from the surface parameters.
    pub fn update(&mut self) {
        if let Some(decenter) = &mut self.decenter {
            decenter.update();
        }
    }
    /// Calculate the intersection of a ray (given in the local surface frame) with this [`Surface`].
    ///
    /// See [`Profile::intersect`].
    #[must_use]
    pub fn intersect(
        &self,
        origin: &Point3<Length>,
        direction: &Vector3<f64>,
        z_dir: f64,
        config: &RayTraceConfig,
    ) -> Option<(Length, Point3<Length>)> {
        self.profile.intersect(origin, direction, z_dir, config)
    }
    /// Returns the normalized surface normal at the given point (in the local surface frame).
    #[must_use]
    pub fn normal(&self, point: &Point3<Length>) -> Vector3<f64> {
        self.profile.normal(point)
    }
}
impl Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.label.is_empty() {
            write!(f, "{} ", self.label)?;
        }
        write!(
            f,
            "{} ({}), clear aperture {:.4} mm",
            self.profile,
            self.interaction_mode,
            self.clear_aperture.get::<millimeter>()
        )?;
        if let Some(decenter) = &self.decenter {
            write!(f, ", {decenter}")?;
        }
        Ok(())
    }
}
