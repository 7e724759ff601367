//! Coordinate transformations between the surfaces of a sequential model.
//!
//! Each surface has its own local coordinate frame with the vertex of the surface profile at the origin. The
//! functions in this module chain the transformations between consecutive frames (gap thickness plus decenters / tilts)
//! and express all surface frames within the frame of a global reference surface.
use nalgebra::{Rotation3, Vector3};
use uom::si::f64::Length;

use crate::{
    error::{SeqError, SeqResult},
    gap::Gap,
    surface::Surface,
    utils::geom_transformation::Isometry,
};

/// Returns the transformation from the frame of `s2` into the frame of the preceding surface `s1`.
///
/// `thickness` is the axial separation of both surfaces. The transformation accounts for the decenter "after" `s1`
/// and the decenter "before" `s2`.
#[must_use]
pub fn forward_transform(s1: &Surface, thickness: Length, s2: &Surface) -> Isometry {
    let after_s1 = s1
        .decenter()
        .map_or_else(Isometry::identity, |d| d.transform_after_surface());
    let before_s2 = s2
        .decenter()
        .map_or_else(Isometry::identity, |d| d.transform_before_surface());
    let gap = Isometry::from_parts(&Vector3::new(0.0, 0.0, thickness.value), &Rotation3::identity());
    after_s1.append(&gap).append(&before_s2)
}

/// Returns the transformation from the frame of `s1` into the frame of the following surface `s2`.
///
/// This is the inverse of [`forward_transform`].
#[must_use]
pub fn reverse_transform(s1: &Surface, thickness: Length, s2: &Surface) -> Isometry {
    forward_transform(s1, thickness, s2).inverse()
}

/// Compute the transformations of all surface frames into the frame of the surface `global_ref`.
///
/// The frame of the reference surface is the identity. Surfaces before the reference are chained backwards using
/// [`reverse_transform`], surfaces after it forward using [`forward_transform`].
///
/// # Errors
///
/// This function will return an error if
///   - `global_ref` is not a valid surface index.
///   - the number of gaps does not match the number of surfaces.
pub fn compute_global_coords(
    surfaces: &[Surface],
    gaps: &[Gap],
    global_ref: usize,
) -> SeqResult<Vec<Isometry>> {
    if global_ref >= surfaces.len() {
        return Err(SeqError::InvalidGeometryRequest(format!(
            "global reference surface {global_ref} does not exist ({} surfaces)",
            surfaces.len()
        )));
    }
    if gaps.len() + 1 != surfaces.len() {
        return Err(SeqError::StructuralViolation(format!(
            "{} surfaces require {} gaps, found {}",
            surfaces.len(),
            surfaces.len() - 1,
            gaps.len()
        )));
    }
    let mut transforms = vec![Isometry::identity(); surfaces.len()];
    for i in (0..global_ref).rev() {
        let step = reverse_transform(&surfaces[i], gaps[i].thickness(), &surfaces[i + 1]);
        transforms[i] = transforms[i + 1].append(&step);
    }
    for i in global_ref + 1..surfaces.len() {
        let step = forward_transform(&surfaces[i - 1], gaps[i - 1].thickness(), &surfaces[i]);
        transforms[i] = transforms[i - 1].append(&step);
    }
    Ok(transforms)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        degree,
        medium::MediumType,
        millimeter,
        surface::{DecenterData, DecenterType},
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;
    use nalgebra::Point3;

    fn tilted(dtype: DecenterType) -> Surface {
        let mut s = Surface::default();
        s.set_decenter(Some(
            DecenterData::new(
                dtype,
                Vector3::new(millimeter!(0.0), millimeter!(1.0), millimeter!(0.0)),
                degree!(45.0),
                degree!(0.0),
                degree!(0.0),
            )
            .unwrap(),
        ));
        s
    }
    fn gap(thickness: f64) -> Gap {
        Gap::new(millimeter!(thickness), MediumType::Air).unwrap()
    }
    #[test]
    fn forward_plain() {
        let t = forward_transform(&Surface::default(), millimeter!(10.0), &Surface::default());
        assert_relative_eq!(t.translation_vec_in_m(), Vector3::new(0.0, 0.0, 0.01));
        assert_eq!(t.rotation(), Rotation3::identity());
    }
    #[test]
    fn reverse_is_inverse() {
        let s1 = tilted(DecenterType::Bend);
        let s2 = tilted(DecenterType::Local);
        let f = forward_transform(&s1, millimeter!(5.0), &s2);
        let r = reverse_transform(&s1, millimeter!(5.0), &s2);
        assert_relative_eq!(f.append(&r), Isometry::identity(), epsilon = 1e-12);
    }
    #[test]
    fn global_coords_plain() {
        let surfaces = vec![Surface::default(); 4];
        let gaps = vec![gap(100.0), gap(5.0), gap(20.0)];
        let t = compute_global_coords(&surfaces, &gaps, 1).unwrap();
        assert_eq!(t.len(), 4);
        assert_abs_diff_eq!(t[0].translation_vec_in_m().z, -0.1, epsilon = 1e-15);
        assert_eq!(t[1], Isometry::identity());
        assert_abs_diff_eq!(t[2].translation_vec_in_m().z, 0.005, epsilon = 1e-15);
        assert_abs_diff_eq!(t[3].translation_vec_in_m().z, 0.025, epsilon = 1e-15);
        let t0 = compute_global_coords(&surfaces, &gaps, 0).unwrap();
        assert_eq!(t0[0], Isometry::identity());
        assert_abs_diff_eq!(t0[3].translation_vec_in_m().z, 0.125, epsilon = 1e-15);
    }
    #[test]
    fn global_coords_invalid_reference() {
        let surfaces = vec![Surface::default(); 2];
        let gaps = vec![gap(1.0)];
        assert_matches!(
            compute_global_coords(&surfaces, &gaps, 2),
            Err(SeqError::InvalidGeometryRequest(_))
        );
        assert_matches!(
            compute_global_coords(&surfaces, &[], 0),
            Err(SeqError::StructuralViolation(_))
        );
    }
    #[test]
    fn global_coords_consistency() {
        let surfaces = vec![
            Surface::default(),
            tilted(DecenterType::Bend),
            tilted(DecenterType::DecenterAndReturn),
            tilted(DecenterType::Reverse),
            Surface::default(),
        ];
        let gaps = vec![gap(50.0), gap(-10.0), gap(5.0), gap(7.0)];
        for global_ref in 0..surfaces.len() {
            let t = compute_global_coords(&surfaces, &gaps, global_ref).unwrap();
            assert_relative_eq!(t[global_ref], Isometry::identity());
            for i in 0..surfaces.len() - 1 {
                // frame i expressed in frame i+1 from global transforms and directly
                let chained = t[i + 1].inverse().append(&t[i]);
                let direct = reverse_transform(&surfaces[i], gaps[i].thickness(), &surfaces[i + 1]);
                assert_relative_eq!(chained, direct, epsilon = 1e-9);
            }
            // non-adjacent frames
            let chained = t[4].inverse().append(&t[0]);
            let direct = (0..4).rev().fold(Isometry::identity(), |acc, i| {
                acc.append(&reverse_transform(
                    &surfaces[i],
                    gaps[i].thickness(),
                    &surfaces[i + 1],
                ))
            });
            let p = Point3::new(0.001, -0.002, 0.003);
            assert_abs_diff_eq!(
                chained.transform_point_f64(&p),
                direct.transform_point_f64(&p),
                epsilon = 1e-9
            );
        }
    }
}
