//! This is the documentation for the **seqoptics** package, the core of a sequential optical design program.
//!
//! A [`SequentialModel`](sequential_model::SequentialModel) describes an optical system as an ordered chain of
//! refracting or reflecting surfaces separated by gaps filled with homogeneous media. The crate provides
//!   - the editing of such a model ([`editor`]),
//!   - the transformation of all surface frames into a global frame ([`transform`]),
//!   - real ray tracing ([`raytrace`]) and the determination of clear apertures ([`aperture`]),
//!   - a paraxial (first-order) description of the model ([`paraxial`]),
//!   - the persistence of models as lens documents ([`lens_document`]).
#![allow(clippy::module_name_repetitions)]

pub mod aperture;
pub mod console;
pub mod editor;
pub mod error;
pub mod gap;
pub mod lens_document;
pub mod medium;
pub mod optical_spec;
pub mod paraxial;
pub mod ray_trace_config;
pub mod raytrace;
pub mod sequential_model;
pub mod surface;
pub mod transform;
pub mod utils;

pub use lens_document::LensDocument;
pub use sequential_model::SequentialModel;

/// Return the version information of the currently built executable.
#[must_use]
pub fn get_version() -> String {
    format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_NAME"))
}
