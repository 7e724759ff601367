//! Model glass defined by its refractive index at the d line and its Abbe number
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

use super::{Medium, MediumType};
use crate::error::{SeqError, SeqResult};

/// Helium d line (µm)
const LAMBDA_D: f64 = 0.587_561_8;
/// Hydrogen F line (µm)
const LAMBDA_F: f64 = 0.486_132_7;
/// Hydrogen C line (µm)
const LAMBDA_C: f64 = 0.656_272_5;

/// A glass described by `nd` and `vd`.
///
/// The dispersion is modelled by a two-term Cauchy formula `n = A + B / λ²` which reproduces `nd` at the d line and
/// the principal dispersion `nF - nC = (nd - 1) / vd`. A `vd` of 0.0 denotes a dispersion-free glass.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ModelGlass {
    nd: f64,
    vd: f64,
    name: String,
}
impl ModelGlass {
    /// Creates a new [`ModelGlass`].
    ///
    /// # Errors
    ///
    /// This function will return an error if `nd` is < 1.0 or not finite or `vd` is negative or not finite.
    pub fn new(nd: f64, vd: f64, name: &str) -> SeqResult<Self> {
        if nd < 1.0 || !nd.is_finite() {
            return Err(SeqError::Other("nd must be >=1.0 and finite".into()));
        }
        if vd.is_sign_negative() || !vd.is_finite() {
            return Err(SeqError::Other("vd must be >=0.0 and finite".into()));
        }
        Ok(Self {
            nd,
            vd,
            name: name.to_string(),
        })
    }
    /// Returns the refractive index at the d line.
    #[must_use]
    pub const fn nd(&self) -> f64 {
        self.nd
    }
    /// Returns the Abbe number.
    #[must_use]
    pub const fn vd(&self) -> f64 {
        self.vd
    }
    fn cauchy_coefficients(&self) -> (f64, f64) {
        if self.vd == 0.0 {
            return (self.nd, 0.0);
        }
        let b = (self.nd - 1.0) / self.vd
            / (LAMBDA_F.powi(-2) - LAMBDA_C.powi(-2));
        (b.mul_add(-LAMBDA_D.powi(-2), self.nd), b)
    }
}
impl Medium for ModelGlass {
    fn refractive_index(&self, wavelength: Length) -> SeqResult<f64> {
        let (a, b) = self.cauchy_coefficients();
        let lambda = wavelength.get::<micrometer>();
        Ok(b.mul_add(lambda.powi(-2), a))
    }
    fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("{:.0}.{:.0}", (self.nd - 1.0) * 1000.0, self.vd * 10.0)
        } else {
            self.name.clone()
        }
    }
    fn to_enum(&self) -> MediumType {
        MediumType::ModelGlass(self.clone())
    }
}
