//! The gap between two consecutive surfaces of a sequential model.
use std::fmt::Display;

use log::warn;
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::millimeter};

use crate::{
    error::{SeqError, SeqResult},
    medium::{Medium, MediumType},
};

/// A homogeneous gap between two surfaces.
///
/// The gap is given by its (signed) axial thickness and the medium filling it. A negative thickness is used for gaps
/// following a mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    thickness: Length,
    #[serde(default)]
    medium: MediumType,
}
impl Default for Gap {
    fn default() -> Self {
        Self {
            thickness: Length::zero(),
            medium: MediumType::Air,
        }
    }
}
impl Gap {
    /// Creates a new [`Gap`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the thickness is not finite.
    pub fn new(thickness: Length, medium: MediumType) -> SeqResult<Self> {
        if !thickness.is_finite() {
            return Err(SeqError::Other("gap thickness must be finite".into()));
        }
        Ok(Self { thickness, medium })
    }
    /// Returns the (signed) thickness of this [`Gap`].
    #[must_use]
    pub fn thickness(&self) -> Length {
        self.thickness
    }
    /// Sets the (signed) thickness of this [`Gap`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the thickness is not finite.
    pub fn set_thickness(&mut self, thickness: Length) -> SeqResult<()> {
        if !thickness.is_finite() {
            return Err(SeqError::Other("gap thickness must be finite".into()));
        }
        self.thickness = thickness;
        Ok(())
    }
    /// Returns a reference to the medium of this [`Gap`].
    #[must_use]
    pub const fn medium(&self) -> &MediumType {
        &self.medium
    }
    /// Sets the medium of this [`Gap`].
    pub fn set_medium(&mut self, medium: MediumType) {
        self.medium = medium;
    }
    /// Returns the (unsigned) refractive index of the medium at the given wavelength.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index cannot be determined.
    pub fn refractive_index(&self, wavelength: Length) -> SeqResult<f64> {
        self.medium.refractive_index(wavelength)
    }
    /// Returns the (unsigned) refractive index of the medium at the given wavelength or the index of air (1.0) if
    /// the medium data is missing.
    ///
    /// A substitution is logged as warning.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index calculation failed for another reason.
    pub fn refractive_index_or_air(&self, wavelength: Length) -> SeqResult<f64> {
        match self.medium.refractive_index(wavelength) {
            Err(SeqError::MissingMediumData(msg)) => {
                warn!("{msg}");
                warn!("Using refractive index of air instead.");
                Ok(1.0)
            }
            result => result,
        }
    }
}
impl Display for Gap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "thickness {:.4} mm, medium {}",
            self.thickness.get::<millimeter>(),
            self.medium
        )
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        medium::{MediumConst, ModelGlass},
        millimeter, nanometer,
    };
    #[test]
    fn default() {
        let g = Gap::default();
        assert_eq!(g.thickness(), millimeter!(0.0));
        assert!(g.medium().is_air());
    }
    #[test]
    fn new() {
        assert!(Gap::new(millimeter!(f64::NAN), MediumType::Air).is_err());
        assert!(Gap::new(millimeter!(f64::INFINITY), MediumType::Air).is_err());
        let g = Gap::new(millimeter!(-5.0), MediumType::Air).unwrap();
        assert_eq!(g.thickness(), millimeter!(-5.0));
    }
    #[test]
    fn set_thickness() {
        let mut g = Gap::default();
        assert!(g.set_thickness(millimeter!(f64::NEG_INFINITY)).is_err());
        assert!(g.set_thickness(millimeter!(3.0)).is_ok());
        assert_eq!(g.thickness(), millimeter!(3.0));
    }
    #[test]
    fn refractive_index() {
        let mut g = Gap::default();
        g.set_medium(MediumType::Const(MediumConst::new(1.5).unwrap()));
        assert_eq!(g.refractive_index(nanometer!(587.0)).unwrap(), 1.5);
    }
    #[test]
    fn refractive_index_or_air() {
        testing_logger::setup();
        let g = Gap::new(
            millimeter!(1.0),
            MediumType::ModelGlass(ModelGlass::new(1.01, 0.5, "").unwrap()),
        )
        .unwrap();
        // the steep dispersion model drops below 1.0 in the infrared
        assert_eq!(g.refractive_index_or_air(nanometer!(2000.0)).unwrap(), 1.0);
        testing_logger::validate(|captured_logs| {
            assert_eq!(captured_logs.len(), 2);
            assert_eq!(
                captured_logs[1].body,
                "Using refractive index of air instead."
            );
        });
    }
    #[test]
    fn display() {
        let g = Gap::new(millimeter!(5.0), MediumType::Air).unwrap();
        assert_eq!(format!("{g}"), "thickness 5.0000 mm, medium air");
    }
}
