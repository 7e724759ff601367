//! Lookup of catalog glasses and decoding of numeric glass codes
use super::{MediumType, ModelGlass, Sellmeier1Glass};
use crate::error::{SeqError, SeqResult};

/// Catalog used if a glass name does not specify one.
pub const DEFAULT_CATALOG: &str = "Schott";

struct CatalogEntry {
    name: &'static str,
    k: [f64; 3],
    l: [f64; 3],
}

const SCHOTT: [CatalogEntry; 6] = [
    CatalogEntry {
        name: "N-BK7",
        k: [1.039_612_12, 0.231_792_344, 1.010_469_45],
        l: [0.006_000_698_67, 0.020_017_914_4, 103.560_653],
    },
    CatalogEntry {
        name: "N-SF11",
        k: [1.737_596_95, 0.313_747_346, 1.898_781_01],
        l: [0.013_188_707, 0.062_306_814_2, 155.236_29],
    },
    CatalogEntry {
        name: "F2",
        k: [1.345_333_59, 0.209_073_176, 0.937_357_162],
        l: [0.009_977_438_71, 0.047_045_076_7, 111.886_764],
    },
    CatalogEntry {
        name: "N-SK16",
        k: [1.343_177_74, 0.241_144_399, 0.994_317_969],
        l: [0.007_046_873_39, 0.022_900_5, 92.750_852_6],
    },
    CatalogEntry {
        name: "N-F2",
        k: [1.397_570_37, 0.159_201_403, 1.268_654_3],
        l: [0.009_959_061_43, 0.054_693_175_2, 119.248_346],
    },
    CatalogEntry {
        name: "N-SF5",
        k: [1.524_818_89, 0.187_085_527, 1.427_290_15],
        l: [0.011_254_756, 0.058_899_539_2, 129.141_675],
    },
];

const MISC: [CatalogEntry; 2] = [
    CatalogEntry {
        name: "FUSED-SILICA",
        k: [0.696_166_3, 0.407_942_6, 0.897_479_4],
        l: [0.004_679_148, 0.013_512_06, 97.934],
    },
    CatalogEntry {
        name: "CAF2",
        k: [0.567_588_8, 0.471_091_4, 3.848_472_3],
        l: [0.002_526_43, 0.010_078_33, 1_200.556],
    },
];

/// Bring a glass name into the canonical catalog spelling.
///
/// Names are matched case-insensitively. For the Schott catalog a missing hyphen after the leading `N` of the
/// lead-free glasses is inserted (`NBK7` -> `N-BK7`).
fn normalize_name(catalog: &str, name: &str) -> String {
    let mut normalized = name.trim().to_uppercase().replace(' ', "-");
    if catalog.eq_ignore_ascii_case("schott")
        && normalized.len() > 1
        && normalized.starts_with('N')
        && !normalized.starts_with("N-")
    {
        normalized.insert(1, '-');
    }
    normalized
}

/// Create a glass from the given catalog.
///
/// Available catalogs are `Schott` and `Misc` (fused silica, calcium fluoride).
///
/// # Errors
///
/// This function will return a [`SeqError::MissingMediumData`] if the catalog or the glass is not known.
pub fn create_glass(catalog: &str, name: &str) -> SeqResult<MediumType> {
    let entries: &[CatalogEntry] = if catalog.eq_ignore_ascii_case("schott") {
        &SCHOTT
    } else if catalog.eq_ignore_ascii_case("misc") {
        &MISC
    } else {
        return Err(SeqError::MissingMediumData(format!(
            "glass catalog '{catalog}' not available"
        )));
    };
    let normalized = normalize_name(catalog, name);
    let Some(entry) = entries.iter().find(|e| e.name == normalized) else {
        return Err(SeqError::MissingMediumData(format!(
            "glass '{name}' not found in catalog '{catalog}'"
        )));
    };
    Ok(MediumType::Sellmeier1(Sellmeier1Glass::new(
        entry.name, entry.k, entry.l,
    )?))
}

/// Decode a numeric glass code into `(nd, vd)`.
///
/// Two forms are accepted: the dotted form `517.642` and the six-digit form `517642`. Both give `nd = 1.517` and
/// `vd = 64.2`.
///
/// # Errors
///
/// This function will return an error if the code is negative or not finite.
pub fn glass_decode(code: f64) -> SeqResult<(f64, f64)> {
    if !code.is_finite() || code.is_sign_negative() {
        return Err(SeqError::MissingMediumData(format!(
            "invalid glass code {code}"
        )));
    }
    if code >= 100_000.0 && code.fract() == 0.0 {
        let index_part = (code / 1000.0).trunc();
        let dispersion_part = code - index_part * 1000.0;
        Ok((1.0 + index_part / 1000.0, dispersion_part / 10.0))
    } else {
        let index_part = code.trunc();
        Ok((1.0 + index_part / 1000.0, 100.0 * (code - index_part)))
    }
}

/// Create a [`ModelGlass`] medium from a numeric glass code.
///
/// # Errors
///
/// This function will return an error if the code cannot be decoded into a valid glass.
pub fn model_glass_from_code(code: f64) -> SeqResult<MediumType> {
    let (nd, vd) = glass_decode(code)?;
    Ok(MediumType::ModelGlass(ModelGlass::new(nd, vd, "")?))
}
