//! Medium with a wavelength-independent refractive index
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::{Medium, MediumType};
use crate::error::{SeqError, SeqResult};

/// A medium with a constant refractive index.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MediumConst {
    refractive_index: f64,
}
impl MediumConst {
    /// Creates a new [`MediumConst`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index is < 1.0 or not finite.
    pub fn new(refractive_index: f64) -> SeqResult<Self> {
        if refractive_index < 1.0 || !refractive_index.is_finite() {
            return Err(SeqError::Other(
                "refractive index must be >=1.0 and finite.".into(),
            ));
        }
        Ok(Self { refractive_index })
    }
}
impl Medium for MediumConst {
    fn refractive_index(&self, _wavelength: Length) -> SeqResult<f64> {
        Ok(self.refractive_index)
    }
    fn display_name(&self) -> String {
        format!("{:.4}", self.refractive_index)
    }
    fn to_enum(&self) -> MediumType {
        MediumType::Const(self.clone())
    }
}
