#![warn(missing_docs)]
//! The persistent form of a sequential lens model.
//!
//! A [`LensDocument`] bundles the [`SequentialModel`] with the state of its editing session, the usage
//! specification ([`OpticalSpecs`]) and the [`RayTraceConfig`]. This module also handles reading and writing of
//! these documents as `.ron` files.
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    editor::SequenceEditor,
    error::{SeqError, SeqResult},
    optical_spec::OpticalSpecs,
    ray_trace_config::RayTraceConfig,
    sequential_model::SequentialModel,
};

/// Version tag written into each lens document.
pub const FILE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A lens model together with its editing state, specification and trace configuration.
pub struct LensDocument {
    file_version: String,
    #[serde(default)]
    model: SequentialModel,
    #[serde(default)]
    editor: SequenceEditor,
    #[serde(default)]
    specs: OpticalSpecs,
    #[serde(default)]
    config: RayTraceConfig,
}
impl Default for LensDocument {
    fn default() -> Self {
        Self {
            file_version: FILE_VERSION.to_string(),
            model: SequentialModel::default(),
            editor: SequenceEditor::default(),
            specs: OpticalSpecs::default(),
            config: RayTraceConfig::default(),
        }
    }
}
impl LensDocument {
    /// Creates a new [`LensDocument`] and refreshes the model.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refresh of the model failed.
    pub fn new(
        model: SequentialModel,
        editor: SequenceEditor,
        specs: OpticalSpecs,
        config: RayTraceConfig,
    ) -> SeqResult<Self> {
        let mut document = Self {
            model,
            editor,
            specs,
            config,
            ..Default::default()
        };
        document.refresh()?;
        Ok(document)
    }
    /// Create a new [`LensDocument`] from a `.ron` file at the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the given path is not found or readable.
    ///   - the parsing / deserialization of the file failed.
    ///   - the refresh of the model failed.
    pub fn from_file(path: &Path) -> SeqResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SeqError::Document(format!("cannot read file {} : {}", path.display(), e))
        })?;
        info!("Loading lens document {}", path.display());
        Self::from_string(&contents)
    }
    /// Create a new [`LensDocument`] from the given `.ron` string.
    ///
    /// All derived data of the model is rebuilt.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the parsing of the string failed.
    ///   - the model is structurally invalid (see [`SequentialModel::validate`]).
    ///   - the refresh of the model failed.
    pub fn from_string(file_string: &str) -> SeqResult<Self> {
        let mut document: Self = ron::from_str(file_string)
            .map_err(|e| SeqError::Document(format!("parsing of lens document failed: {e}")))?;
        if document.file_version != FILE_VERSION {
            warn!(
                "read version '{}' <-> program file version '{FILE_VERSION}'",
                document.file_version
            );
            warn!("This file might have been written by an older or newer version. The model import might not be correct.");
        }
        document.model.validate()?;
        document.editor.set_cursor(&document.model, document.editor.cursor())?;
        document.refresh()?;
        Ok(document)
    }
    /// Save this [`LensDocument`] to a `.ron` file with the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the serialization of the document failed.
    ///   - the file path cannot be created.
    ///   - it cannot write into the file (e.g. no space).
    pub fn save_to_file(&self, path: &Path) -> SeqResult<()> {
        let serialized = self.to_ron_string()?;
        let mut output = File::create(path).map_err(|e| {
            SeqError::Document(format!(
                "could not create file path: {}: {}",
                path.display(),
                e
            ))
        })?;
        write!(output, "{serialized}").map_err(|e| {
            SeqError::Document(format!(
                "writing to file path {} failed: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
    /// Return the `.ron` representation of this [`LensDocument`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization of the internal structures fails.
    pub fn to_ron_string(&self) -> SeqResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SeqError::Document(format!("serialization of lens document failed: {e}")))
    }
    /// Rebuild all derived data of the model (see [`SequentialModel::refresh`]).
    ///
    /// # Errors
    ///
    /// This function will return an error if the refresh of the model failed.
    pub fn refresh(&mut self) -> SeqResult<()> {
        self.model.refresh(&self.specs, &self.config)
    }
    /// Returns the file version this document was read with.
    #[must_use]
    pub fn file_version(&self) -> &str {
        &self.file_version
    }
    /// Returns a reference to the [`SequentialModel`].
    #[must_use]
    pub const fn model(&self) -> &SequentialModel {
        &self.model
    }
    /// Returns the [`SequenceEditor`] (edit cursor).
    #[must_use]
    pub const fn editor(&self) -> &SequenceEditor {
        &self.editor
    }
    /// Returns mutable references to the model and its editor.
    ///
    /// The model must be refreshed after editing.
    pub fn edit(&mut self) -> (&mut SequentialModel, &mut SequenceEditor) {
        (&mut self.model, &mut self.editor)
    }
    /// Returns the [`OpticalSpecs`].
    #[must_use]
    pub const fn specs(&self) -> &OpticalSpecs {
        &self.specs
    }
    /// Sets the [`OpticalSpecs`] and refreshes the model.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refresh of the model failed.
    pub fn set_specs(&mut self, specs: OpticalSpecs) -> SeqResult<()> {
        self.specs = specs;
        self.refresh()
    }
    /// Returns the [`RayTraceConfig`].
    #[must_use]
    pub const fn config(&self) -> &RayTraceConfig {
        &self.config
    }
    /// Sets the [`RayTraceConfig`] and refreshes the model.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refresh of the model failed.
    pub fn set_config(&mut self, config: RayTraceConfig) -> SeqResult<()> {
        self.config = config;
        self.refresh()
    }
}
