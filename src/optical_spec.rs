//! Usage specifications of a sequential model: spectrum, field of view and pupil.
#![warn(missing_docs)]
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::degree,
    f64::{Angle, Length},
    length::{millimeter, nanometer},
};

use crate::{
    error::{SeqError, SeqResult},
    millimeter, nanometer,
};

/// Lower end of the wavelength range mapped onto the render color gradient
const COLOR_WVL_START_NM: f64 = 380.0;
/// Upper end of the wavelength range mapped onto the render color gradient
const COLOR_WVL_END_NM: f64 = 780.0;

/// The wavelengths used for analyzing a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralRegion {
    wavelengths: Vec<Length>,
    reference_index: usize,
    #[serde(default)]
    render_colors: Vec<String>,
}
impl Default for SpectralRegion {
    /// A single wavelength at the helium d line (587.5618 nm).
    fn default() -> Self {
        Self {
            wavelengths: vec![nanometer!(587.5618)],
            reference_index: 0,
            render_colors: Vec::new(),
        }
    }
}
impl SpectralRegion {
    /// Creates a new [`SpectralRegion`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the list of wavelengths is empty.
    ///   - one of the wavelengths is <= 0.0 or not finite.
    ///   - the reference index is out of range.
    pub fn new(wavelengths: Vec<Length>, reference_index: usize) -> SeqResult<Self> {
        if wavelengths.is_empty() {
            return Err(SeqError::Other("at least one wavelength is required".into()));
        }
        if wavelengths
            .iter()
            .any(|w| !w.is_finite() || w.value <= 0.0)
        {
            return Err(SeqError::Other(
                "wavelengths must be > 0.0 and finite".into(),
            ));
        }
        if reference_index >= wavelengths.len() {
            return Err(SeqError::Other(format!(
                "reference index {reference_index} out of range"
            )));
        }
        Ok(Self {
            wavelengths,
            reference_index,
            render_colors: Vec::new(),
        })
    }
    /// Returns the wavelengths of this [`SpectralRegion`].
    #[must_use]
    pub fn wavelengths(&self) -> &[Length] {
        &self.wavelengths
    }
    /// Returns the index of the reference (central) wavelength.
    #[must_use]
    pub const fn reference_index(&self) -> usize {
        self.reference_index
    }
    /// Returns the reference (central) wavelength.
    #[must_use]
    pub fn reference_wavelength(&self) -> Length {
        self.wavelengths[self.reference_index]
    }
    /// Set explicit render colors (e.g. `#ff0000`) for the wavelengths.
    ///
    /// # Errors
    ///
    /// This function will return an error if the number of colors does not match the number of wavelengths.
    pub fn set_render_colors(&mut self, render_colors: Vec<String>) -> SeqResult<()> {
        if render_colors.len() != self.wavelengths.len() {
            return Err(SeqError::Other(
                "number of render colors must match the number of wavelengths".into(),
            ));
        }
        self.render_colors = render_colors;
        Ok(())
    }
    /// Returns the display colors of the wavelengths as hex strings.
    ///
    /// If no explicit colors were set, they are derived from the wavelength using the `TURBO` color gradient.
    #[must_use]
    pub fn render_colors(&self) -> Vec<String> {
        if self.render_colors.len() == self.wavelengths.len() {
            return self.render_colors.clone();
        }
        let gradient = colorous::TURBO;
        self.wavelengths
            .iter()
            .map(|w| {
                let pos = (w.get::<nanometer>() - COLOR_WVL_START_NM)
                    / (COLOR_WVL_END_NM - COLOR_WVL_START_NM);
                format!("#{:x}", gradient.eval_continuous(pos.clamp(0.0, 1.0)))
            })
            .collect()
    }
}

/// The way field points are specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    /// field given by the angle of the chief ray in object space (maximum field angle)
    ObjectAngle(Angle),
    /// field given by the height of the object point (maximum object height)
    ObjectHeight(Length),
}

/// The field of view: a list of field points relative to the maximum field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    field_type: FieldType,
    fields: Vec<Point2<f64>>,
}
impl Default for FieldSpec {
    /// A single on-axis field point of an object at infinity.
    fn default() -> Self {
        Self {
            field_type: FieldType::ObjectAngle(Angle::new::<degree>(0.0)),
            fields: vec![Point2::origin()],
        }
    }
}
impl FieldSpec {
    /// Creates a new [`FieldSpec`].
    ///
    /// The field points are given relative to the maximum field (e.g. `(0.0, 1.0)` is the full field in y direction).
    ///
    /// # Errors
    ///
    /// This function will return an error if the maximum field or a field point is not finite.
    pub fn new(field_type: FieldType, fields: Vec<Point2<f64>>) -> SeqResult<Self> {
        let max_finite = match field_type {
            FieldType::ObjectAngle(a) => a.is_finite() && a.get::<degree>().abs() < 90.0,
            FieldType::ObjectHeight(h) => h.is_finite(),
        };
        if !max_finite {
            return Err(SeqError::Other(
                "maximum field must be finite (and < 90° for angles)".into(),
            ));
        }
        if fields.iter().any(|f| !f.x.is_finite() || !f.y.is_finite()) {
            return Err(SeqError::Other("field points must be finite".into()));
        }
        Ok(Self { field_type, fields })
    }
    /// Returns the [`FieldType`] of this [`FieldSpec`].
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }
    /// Returns the relative field points.
    #[must_use]
    pub fn fields(&self) -> &[Point2<f64>] {
        &self.fields
    }
    /// Returns the relative field point with the given index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the field index is out of range.
    pub fn field(&self, index: usize) -> SeqResult<Point2<f64>> {
        self.fields.get(index).copied().ok_or_else(|| {
            SeqError::InvalidGeometryRequest(format!("field {index} does not exist"))
        })
    }
}

/// Specification of the system aperture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PupilSpec {
    /// diameter of the entrance pupil
    EntrancePupilDiameter(Length),
}
impl Default for PupilSpec {
    fn default() -> Self {
        Self::EntrancePupilDiameter(millimeter!(10.0))
    }
}
impl PupilSpec {
    /// Returns the radius of the entrance pupil.
    #[must_use]
    pub fn entrance_pupil_radius(&self) -> Length {
        match self {
            Self::EntrancePupilDiameter(d) => *d / 2.0,
        }
    }
}

/// The complete usage specification (spectrum, field of view and pupil) of a sequential model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpticalSpecs {
    #[serde(default)]
    spectral_region: SpectralRegion,
    #[serde(default)]
    field_spec: FieldSpec,
    #[serde(default)]
    pupil_spec: PupilSpec,
}
impl OpticalSpecs {
    /// Creates new [`OpticalSpecs`].
    #[must_use]
    pub const fn new(
        spectral_region: SpectralRegion,
        field_spec: FieldSpec,
        pupil_spec: PupilSpec,
    ) -> Self {
        Self {
            spectral_region,
            field_spec,
            pupil_spec,
        }
    }
    /// Returns the [`SpectralRegion`].
    #[must_use]
    pub const fn spectral_region(&self) -> &SpectralRegion {
        &self.spectral_region
    }
    /// Returns the [`FieldSpec`].
    #[must_use]
    pub const fn field_spec(&self) -> &FieldSpec {
        &self.field_spec
    }
    /// Returns the [`PupilSpec`].
    #[must_use]
    pub const fn pupil_spec(&self) -> &PupilSpec {
        &self.pupil_spec
    }
    /// Sets the [`SpectralRegion`].
    pub fn set_spectral_region(&mut self, spectral_region: SpectralRegion) {
        self.spectral_region = spectral_region;
    }
    /// Sets the [`FieldSpec`].
    pub fn set_field_spec(&mut self, field_spec: FieldSpec) {
        self.field_spec = field_spec;
    }
    /// Sets the [`PupilSpec`].
    pub fn set_pupil_spec(&mut self, pupil_spec: PupilSpec) {
        self.pupil_spec = pupil_spec;
    }
    /// Returns the reference (central) wavelength.
    #[must_use]
    pub fn reference_wavelength(&self) -> Length {
        self.spectral_region.reference_wavelength()
    }
    /// Returns a short summary of these specs.
    #[must_use]
    pub fn summary(&self) -> String {
        let wavelengths = self
            .spectral_region
            .wavelengths()
            .iter()
            .map(|w| format!("{:.4}", w.get::<nanometer>()))
            .collect::<Vec<_>>()
            .join(", ");
        let field = match self.field_spec.field_type() {
            FieldType::ObjectAngle(a) => format!("object angle {:.4} deg", a.get::<degree>()),
            FieldType::ObjectHeight(h) => format!("object height {:.4} mm", h.get::<millimeter>()),
        };
        let PupilSpec::EntrancePupilDiameter(epd) = self.pupil_spec;
        format!(
            "wavelengths [{wavelengths}] nm (reference {}), {} field(s) with max. {field}, entrance pupil diameter {:.4} mm",
            self.spectral_region.reference_index(),
            self.field_spec.fields().len(),
            epd.get::<millimeter>()
        )
    }
}
