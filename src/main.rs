use std::path::Path;

use clap::Parser;
use log::info;
use seqoptics::{
    console::{Args, PartialArgs},
    degree,
    editor::{CurvatureInput, SequenceEditor, SurfacePrescription},
    error::SeqResult,
    millimeter,
    optical_spec::{FieldSpec, FieldType, OpticalSpecs},
    paraxial::{axial_ray, sequence_to_paraxial},
    ray_trace_config::RayTraceConfig,
    get_version,
    raytrace::trace_fan,
    sequential_model::SequentialModel,
    surface::Surface,
    LensDocument,
};
use nalgebra::Point2;
use uom::si::length::millimeter;

/// A cemented achromatic doublet (f = 100 mm) for an object at infinity.
fn demo_doublet() -> SeqResult<LensDocument> {
    let mut model = SequentialModel::new();
    let mut editor = SequenceEditor::new();
    model.gap_mut(0)?.set_thickness(millimeter!(1e10))?;
    for (radius, thickness, medium) in [
        (61.07, 4.0, Some("N-BK7")),
        (-44.03, 2.5, Some("F2")),
        (-128.2, 97.0, None),
    ] {
        editor.add_surface(
            &mut model,
            &SurfacePrescription::new(
                CurvatureInput::Radius(millimeter!(radius)),
                millimeter!(thickness),
                medium,
            ),
        )?;
    }
    let field_spec = FieldSpec::new(
        FieldType::ObjectAngle(degree!(1.0)),
        vec![Point2::new(0.0, 0.0), Point2::new(0.0, 0.7), Point2::new(0.0, 1.0)],
    )?;
    let mut specs = OpticalSpecs::default();
    specs.set_field_spec(field_spec);
    LensDocument::new(model, editor, specs, RayTraceConfig::default())
}

fn load_document(path: Option<&Path>) -> SeqResult<LensDocument> {
    path.map_or_else(demo_doublet, LensDocument::from_file)
}

fn main() -> SeqResult<()> {
    env_logger::init();
    info!("seqoptics version {}", get_version());
    //parse CLI arguments
    let args = Args::try_from(PartialArgs::parse())?;

    //read lens document or create the demo lens
    let document = load_document(args.file_path.as_deref())?;
    let model = document.model();
    let specs = document.specs();
    let config = document.config();
    info!("{}", specs.summary());

    println!("{}", model.listing(args.listing_mode));

    let lens = sequence_to_paraxial(model, specs)?;
    println!("paraxial model\n{lens}");
    let marginal = axial_ray(model, specs)?;
    if let Some(image_slope) = marginal.slopes().iter().rev().nth(1) {
        println!("image space marginal ray slope: {image_slope:.6}\n");
    }

    println!("clear apertures (mm)");
    for (label, radius) in model
        .surface_label_list()
        .iter()
        .zip(model.surfaces().iter().map(Surface::clear_aperture))
    {
        println!("{label:>6} {:>12.4}", radius.get::<millimeter>());
    }

    //trace a ray fan
    if let Some(axis) = args.fan {
        let fan = trace_fan(model, specs, config, args.field, axis, None)?;
        println!("\n{fan}");
    }

    if let Some(save_path) = args.save_path {
        document.save_to_file(&save_path)?;
        println!("lens document written to {}", save_path.display());
    }
    Ok(())
}
