//! Module for handling the media filling the gaps between optical surfaces.
#![warn(missing_docs)]
use std::fmt::Display;

use log::warn;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::nanometer};

pub mod catalog;
pub mod medium_const;
pub mod model_glass;
pub mod schott;
pub mod sellmeier1;

pub use catalog::{create_glass, glass_decode, model_glass_from_code};
pub use medium_const::MediumConst;
pub use model_glass::ModelGlass;
pub use schott::SchottGlass;
pub use sellmeier1::Sellmeier1Glass;

use crate::error::{SeqError, SeqResult};

/// All media filling a [`Gap`](crate::gap::Gap) must implement this trait.
pub trait Medium {
    /// Get the refractive index of this medium for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function returns an error if the the refractive index could not be calculated e.g.:
    ///   - the given wavelength is <= 0.0 or not finite.
    ///   - the model would calculate a value below 1.0, NaN or infinity
    fn refractive_index(&self, wavelength: Length) -> SeqResult<f64>;
    /// Human readable name of the medium (e.g. the glass name).
    fn display_name(&self) -> String;
    /// Create a corresponding [`MediumType`] value (e.g. for serialization).
    fn to_enum(&self) -> MediumType;
}

/// The available media.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub enum MediumType {
    /// Air (refractive index 1.0 for all wavelengths)
    #[default]
    Air,
    /// Wavelength-independent refractive index
    Const(MediumConst),
    /// Model glass defined by its d-line index and Abbe number
    ModelGlass(ModelGlass),
    /// Catalog glass using the Sellmeier 1 dispersion formula
    Sellmeier1(Sellmeier1Glass),
    /// Catalog glass using the Schott dispersion formula
    Schott(SchottGlass),
}

impl MediumType {
    /// Resolve a glass by its catalog name.
    ///
    /// The name has the form `"<glass>"` or `"<glass>_<catalog>"` (e.g. `"N-BK7"` or `"NBK7_Schott"`). If the glass cannot be
    /// found, a warning is logged and [`MediumType::Air`] is returned instead.
    #[must_use]
    pub fn from_catalog_or_air(glass_spec: &str) -> Self {
        let (name, catalog) = glass_spec
            .split_once('_')
            .unwrap_or((glass_spec, catalog::DEFAULT_CATALOG));
        match create_glass(catalog, name) {
            Ok(glass) => glass,
            Err(e) => {
                warn!("{e}");
                warn!("Replacing material with air.");
                Self::Air
            }
        }
    }
    /// Returns true if this medium is [`MediumType::Air`].
    #[must_use]
    pub const fn is_air(&self) -> bool {
        matches!(self, Self::Air)
    }
}

impl Medium for MediumType {
    fn refractive_index(&self, wavelength: Length) -> SeqResult<f64> {
        if !wavelength.is_finite() || wavelength.value <= 0.0 {
            return Err(SeqError::MissingMediumData(
                "wavelength must be > 0.0 and finite".into(),
            ));
        }
        let refr_index = match self {
            Self::Air => 1.0,
            Self::Const(m) => m.refractive_index(wavelength)?,
            Self::ModelGlass(m) => m.refractive_index(wavelength)?,
            Self::Sellmeier1(m) => m.refractive_index(wavelength)?,
            Self::Schott(m) => m.refractive_index(wavelength)?,
        };
        if refr_index < 1.0 || !refr_index.is_finite() {
            return Err(SeqError::MissingMediumData(format!(
                "refractive index of {} at {:.3} nm is <1.0 or not finite",
                self.display_name(),
                wavelength.get::<nanometer>()
            )));
        }
        Ok(refr_index)
    }
    fn display_name(&self) -> String {
        match self {
            Self::Air => "air".into(),
            Self::Const(m) => m.display_name(),
            Self::ModelGlass(m) => m.display_name(),
            Self::Sellmeier1(m) => m.display_name(),
            Self::Schott(m) => m.display_name(),
        }
    }
    fn to_enum(&self) -> MediumType {
        self.clone()
    }
}

impl Display for MediumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
