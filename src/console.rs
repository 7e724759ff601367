//! Handling the command line interface
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version
//! information, etc.).
use std::path::{Path, PathBuf};

use clap::{builder::Str, Parser};
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::{
    error::{SeqError, SeqResult},
    get_version,
    raytrace::FanAxis,
    sequential_model::ListingMode,
};

/// Command line arguments for the `seqoptics` application.
#[derive(Debug)]
pub struct Args {
    /// file path of the lens document (`None`: built-in demo lens)
    pub file_path: Option<PathBuf>,
    /// axis of a ray fan which should be traced
    pub fan: Option<FanAxis>,
    /// field index of the ray fan
    pub field: usize,
    /// list vertex radii or curvatures
    pub listing_mode: ListingMode,
    /// path where the lens document should be saved to
    pub save_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(author, version = Str::from(&get_version()), about, long_about = None)]
pub struct PartialArgs {
    /// file path of the lens document (.ron) to read in. if not defined, a demo lens is used
    #[arg(short, long)]
    file_path: Option<String>,

    /// trace a ray fan along the given pupil axis (x or y)
    #[arg(long)]
    fan: Option<String>,

    /// field index of the ray fan
    #[arg(long, default_value_t = 0)]
    field: usize,

    /// list vertex radii instead of curvatures
    #[arg(short, long)]
    radius: bool,

    /// save the lens document to the given file path
    #[arg(short, long)]
    save: Option<String>,
}

/// Checks if the passed file path points to an existing `.ron` file.
fn file_path_is_valid(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|e| e == "ron")
}

fn eval_fan_input(fan: &str) -> SeqResult<FanAxis> {
    fan.parse::<FanAxis>().map_err(|_| {
        SeqError::Other(format!(
            "invalid fan axis '{fan}', valid axes are: {}",
            FanAxis::iter().join(", ")
        ))
    })
}

impl TryFrom<PartialArgs> for Args {
    type Error = SeqError;

    fn try_from(part_args: PartialArgs) -> SeqResult<Self> {
        let file_path = match part_args.file_path {
            Some(f) => {
                let path = PathBuf::from(&f);
                if !file_path_is_valid(&path) {
                    return Err(SeqError::Document(format!(
                        "invalid lens document path: {f}"
                    )));
                }
                Some(path)
            }
            None => None,
        };
        let fan = part_args.fan.as_deref().map(eval_fan_input).transpose()?;
        let listing_mode = if part_args.radius {
            ListingMode::Radius
        } else {
            ListingMode::Curvature
        };
        Ok(Self {
            file_path,
            fan,
            field: part_args.field,
            listing_mode,
            save_path: part_args.save.map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::Builder;

    #[test]
    fn defaults() {
        let args = Args::try_from(PartialArgs::try_parse_from(["seqoptics"]).unwrap()).unwrap();
        assert!(args.file_path.is_none());
        assert!(args.fan.is_none());
        assert_eq!(args.field, 0);
        assert_eq!(args.listing_mode, ListingMode::Curvature);
        assert!(args.save_path.is_none());
    }
    #[test]
    fn fan_and_radius() {
        let args = Args::try_from(
            PartialArgs::try_parse_from(["seqoptics", "--fan", "y", "--field", "2", "-r"]).unwrap(),
        )
        .unwrap();
        assert_eq!(args.fan, Some(FanAxis::Y));
        assert_eq!(args.field, 2);
        assert_eq!(args.listing_mode, ListingMode::Radius);
        let result =
            Args::try_from(PartialArgs::try_parse_from(["seqoptics", "--fan", "z"]).unwrap());
        assert_matches!(result, Err(SeqError::Other(msg)) if msg.contains("X, Y"));
    }
    #[test]
    fn file_path() {
        let result = Args::try_from(
            PartialArgs::try_parse_from(["seqoptics", "-f", "./not_existing.ron"]).unwrap(),
        );
        assert_matches!(result, Err(SeqError::Document(_)));
        let file = Builder::new().suffix(".ron").tempfile().unwrap();
        let path = file.path().to_str().unwrap();
        let args =
            Args::try_from(PartialArgs::try_parse_from(["seqoptics", "-f", path]).unwrap()).unwrap();
        assert_eq!(args.file_path.as_deref(), Some(file.path()));
    }
}
