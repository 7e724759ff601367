//! Glass following the (legacy) Schott dispersion formula
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

use super::{Medium, MediumType};
use crate::error::{SeqError, SeqResult};

/// Catalog glass using the Schott formula
///
/// `n² = a0 + a1 λ² + a2 λ⁻² + a3 λ⁻⁴ + a4 λ⁻⁶ + a5 λ⁻⁸` with λ in µm.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SchottGlass {
    name: String,
    a: [f64; 6],
}
impl SchottGlass {
    /// Create a new glass following the Schott equation.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given coefficients are not finite.
    pub fn new(name: &str, a: [f64; 6]) -> SeqResult<Self> {
        if a.iter().any(|c| !c.is_finite()) {
            return Err(SeqError::Other("all coefficients must be finite.".into()));
        }
        Ok(Self {
            name: name.to_string(),
            a,
        })
    }
}
impl Medium for SchottGlass {
    fn refractive_index(&self, wavelength: Length) -> SeqResult<f64> {
        let lambda = wavelength.get::<micrometer>();
        let a = &self.a;
        Ok(f64::sqrt(a[5].mul_add(
            lambda.powi(-8),
            a[4].mul_add(
                lambda.powi(-6),
                a[3].mul_add(
                    lambda.powi(-4),
                    a[2].mul_add(lambda.powi(-2), a[1].mul_add(lambda.powi(2), a[0])),
                ),
            ),
        )))
    }
    fn display_name(&self) -> String {
        self.name.clone()
    }
    fn to_enum(&self) -> MediumType {
        MediumType::Schott(self.clone())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::nanometer;
    use approx::assert_relative_eq;
    #[test]
    fn new() {
        assert!(SchottGlass::new("", [1.0, 1.0, 1.0, 1.0, 1.0, f64::NAN]).is_err());
        assert!(SchottGlass::new("", [f64::INFINITY, 1.0, 1.0, 1.0, 1.0, 1.0]).is_err());
    }
    #[test]
    fn refractive_index() {
        let g = SchottGlass::new("flat", [2.25, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(g.refractive_index(nanometer!(500.0)).unwrap(), 1.5);
        assert_eq!(g.to_enum(), MediumType::Schott(g.clone()));
    }
}
