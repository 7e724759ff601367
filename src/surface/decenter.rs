//! Decenter and tilt of a surface
use std::fmt::Display;

use nalgebra::{Rotation3, Vector3};
use num::Zero;
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use uom::si::{
    angle::degree,
    f64::{Angle, Length},
    length::millimeter,
};

use crate::{
    error::{SeqError, SeqResult},
    utils::geom_transformation::Isometry,
};

/// The way a decenter / tilt is applied to the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
pub enum DecenterType {
    /// The decenter is applied before the surface and kept for all following surfaces.
    #[default]
    Local,
    /// The decenter is undone after the surface.
    Reverse,
    /// The decenter is applied before the surface and undone after it.
    DecenterAndReturn,
    /// The rotation is applied before and again after the surface (fold mirror).
    Bend,
}

/// Decenter (translation) and tilt (Euler angles) of a surface.
///
/// The tilt is given by the rotation angles `alpha`, `beta` and `gamma` about the x, y and z axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecenterData {
    dtype: DecenterType,
    dec: Vector3<Length>,
    alpha: Angle,
    beta: Angle,
    gamma: Angle,
    #[serde(skip)]
    rotation: Option<Rotation3<f64>>,
}
impl Default for DecenterData {
    fn default() -> Self {
        Self {
            dtype: DecenterType::default(),
            dec: Vector3::from_element(Length::zero()),
            alpha: Angle::zero(),
            beta: Angle::zero(),
            gamma: Angle::zero(),
            rotation: None,
        }
    }
}
impl DecenterData {
    /// Creates a new [`DecenterData`].
    ///
    /// # Errors
    ///
    /// This function will return an error if any of the given values is not finite.
    pub fn new(
        dtype: DecenterType,
        dec: Vector3<Length>,
        alpha: Angle,
        beta: Angle,
        gamma: Angle,
    ) -> SeqResult<Self> {
        if dec.iter().any(|d| !d.is_finite()) {
            return Err(SeqError::InvalidGeometryRequest(
                "decenter must be finite".into(),
            ));
        }
        if !alpha.is_finite() || !beta.is_finite() || !gamma.is_finite() {
            return Err(SeqError::InvalidGeometryRequest(
                "tilt angles must be finite".into(),
            ));
        }
        let mut decenter = Self {
            dtype,
            dec,
            alpha,
            beta,
            gamma,
            rotation: None,
        };
        decenter.update();
        Ok(decenter)
    }
    /// Returns the [`DecenterType`].
    #[must_use]
    pub const fn dtype(&self) -> DecenterType {
        self.dtype
    }
    /// Sets the [`DecenterType`].
    pub fn set_dtype(&mut self, dtype: DecenterType) {
        self.dtype = dtype;
    }
    /// Returns the decenter vector.
    #[must_use]
    pub const fn dec(&self) -> Vector3<Length> {
        self.dec
    }
    /// Returns the tilt angles (alpha, beta, gamma).
    #[must_use]
    pub const fn euler(&self) -> (Angle, Angle, Angle) {
        (self.alpha, self.beta, self.gamma)
    }
    /// Recompute the cached rotation matrix from the tilt angles.
    pub fn update(&mut self) {
        self.rotation = Some(Rotation3::from_euler_angles(
            self.alpha.value,
            self.beta.value,
            self.gamma.value,
        ));
    }
    fn rotation(&self) -> Rotation3<f64> {
        self.rotation.unwrap_or_else(|| {
            Rotation3::from_euler_angles(self.alpha.value, self.beta.value, self.gamma.value)
        })
    }
    fn dec_in_m(&self) -> Vector3<f64> {
        self.dec.map(|d| d.value)
    }
    /// Returns the transformation applied before the surface.
    ///
    /// The returned [`Isometry`] describes the local surface frame within the frame preceding the surface.
    #[must_use]
    pub fn transform_before_surface(&self) -> Isometry {
        match self.dtype {
            DecenterType::Reverse => Isometry::identity(),
            _ => Isometry::from_parts(&self.dec_in_m(), &self.rotation()),
        }
    }
    /// Returns the transformation applied after the surface.
    ///
    /// The returned [`Isometry`] describes the frame following the surface within the local surface frame. The
    /// translation of a returning decenter is applied before its rotation, so that [`DecenterType::DecenterAndReturn`]
    /// restores the frame preceding the surface exactly.
    #[must_use]
    pub fn transform_after_surface(&self) -> Isometry {
        match self.dtype {
            DecenterType::Reverse | DecenterType::DecenterAndReturn => {
                let inv_rotation = self.rotation().inverse();
                Isometry::from_parts(&-(inv_rotation * self.dec_in_m()), &inv_rotation)
            }
            DecenterType::Bend => Isometry::from_parts(&Vector3::zeros(), &self.rotation()),
            DecenterType::Local => Isometry::identity(),
        }
    }
}
impl Display for DecenterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}: decenter ({:.6}, {:.6}, {:.6}) mm, tilt ({:.6}, {:.6}, {:.6}) deg",
            self.dtype,
            self.dec.x.get::<millimeter>(),
            self.dec.y.get::<millimeter>(),
            self.dec.z.get::<millimeter>(),
            self.alpha.get::<degree>(),
            self.beta.get::<degree>(),
            self.gamma.get::<degree>()
        )
    }
}
