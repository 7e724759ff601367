//! Glass following the Sellmeier 1 dispersion formula
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

use super::{Medium, MediumType};
use crate::error::{SeqError, SeqResult};

/// Catalog glass using the Sellmeier 1 formula
///
/// `n² = 1 + k1 λ²/(λ² - l1) + k2 λ²/(λ² - l2) + k3 λ²/(λ² - l3)` with λ in µm.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Sellmeier1Glass {
    name: String,
    k1: f64,
    k2: f64,
    k3: f64,
    l1: f64,
    l2: f64,
    l3: f64,
}
impl Sellmeier1Glass {
    /// Create a new glass following the Sellmeier 1 equation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given coefficients are not finite.
    pub fn new(name: &str, k: [f64; 3], l: [f64; 3]) -> SeqResult<Self> {
        if k.iter().chain(l.iter()).any(|c| !c.is_finite()) {
            return Err(SeqError::Other("all coefficients must be finite.".into()));
        }
        Ok(Self {
            name: name.to_string(),
            k1: k[0],
            k2: k[1],
            k3: k[2],
            l1: l[0],
            l2: l[1],
            l3: l[2],
        })
    }
}
impl Medium for Sellmeier1Glass {
    fn refractive_index(&self, wavelength: Length) -> SeqResult<f64> {
        let lambda = wavelength.get::<micrometer>();
        let l_sq = lambda * lambda;
        Ok(f64::sqrt(
            1.0 + self.k1 * l_sq / (l_sq - self.l1)
                + self.k2 * l_sq / (l_sq - self.l2)
                + self.k3 * l_sq / (l_sq - self.l3),
        ))
    }
    fn display_name(&self) -> String {
        self.name.clone()
    }
    fn to_enum(&self) -> MediumType {
        MediumType::Sellmeier1(self.clone())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::nanometer;
    use approx::assert_relative_eq;
    #[test]
    fn new() {
        assert!(Sellmeier1Glass::new("", [1.0, f64::NAN, 1.0], [1.0, 1.0, 1.0]).is_err());
        assert!(Sellmeier1Glass::new("", [1.0, 1.0, 1.0], [1.0, f64::INFINITY, 1.0]).is_err());
        assert!(Sellmeier1Glass::new("", [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]).is_ok());
    }
    #[test]
    fn refractive_index() {
        let nbk7 = Sellmeier1Glass::new(
            "N-BK7",
            [1.039_612_12, 0.231_792_344, 1.010_469_45],
            [0.006_000_698_67, 0.020_017_914_4, 103.560_653],
        )
        .unwrap();
        assert_relative_eq!(
            nbk7.refractive_index(nanometer!(1064.0)).unwrap(),
            1.5066,
            epsilon = 1e-4
        );
        assert_eq!(nbk7.display_name(), "N-BK7");
    }
}
