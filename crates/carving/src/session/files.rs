//! Reset, project files and export for the carving session

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::codec;
use crate::error::ChiselResult;
use crate::field::MaterialField;
use crate::saves::{SaveOutput, SaveTarget};

use super::ChiselSession;

impl ChiselSession {
    /// Restore the rock to its pristine state
    pub fn reset_field(&mut self) {
        self.finish_open_stroke();
        self.field.reset();
    }

    /// Write the field as a project file
    pub fn save_project(&self, path: impl AsRef<Path>) -> ChiselResult<()> {
        codec::save(&self.field, path)
    }

    pub fn save_project_cancellable(
        &self,
        path: impl AsRef<Path>,
        cancel: &CancelToken,
    ) -> ChiselResult<()> {
        codec::save_cancellable(&self.field, path, cancel)
    }

    /// Replace the field with a saved project for the same rock.
    ///
    /// On any failure the live field is left as it was.
    pub fn load_project(&mut self, path: impl AsRef<Path>) -> ChiselResult<()> {
        let path = path.as_ref();
        match codec::load(path, self.field.silhouette()) {
            Ok(field) => {
                self.install(field);
                Ok(())
            }
            Err(err) => {
                warn!("Could not load {}: {}", path.display(), err);
                Err(err)
            }
        }
    }

    pub fn load_project_cancellable(
        &mut self,
        path: impl AsRef<Path>,
        cancel: &CancelToken,
    ) -> ChiselResult<()> {
        let field = codec::load_cancellable(path, self.field.silhouette(), cancel)?;
        self.install(field);
        Ok(())
    }

    /// Export a PNG. Non-transparent export uses the session background.
    pub fn export_image(&self, path: impl AsRef<Path>, transparent: bool) -> ChiselResult<()> {
        self.exporter
            .export_image(&self.field, path, transparent, self.background.as_ref())
    }

    pub fn export_image_cancellable(
        &self,
        path: impl AsRef<Path>,
        transparent: bool,
        cancel: &CancelToken,
    ) -> ChiselResult<()> {
        self.exporter.export_image_cancellable(
            &self.field,
            path,
            transparent,
            self.background.as_ref(),
            cancel,
        )
    }

    /// Export the stone composited over `background`
    pub fn export_image_over(
        &self,
        path: impl AsRef<Path>,
        background: &RgbaImage,
    ) -> ChiselResult<()> {
        self.exporter
            .export_image(&self.field, path, false, Some(background))
    }

    /// Write every output of a save target. Returns the files written.
    ///
    /// Outputs are written in order; a failure stops the save and earlier
    /// files stay on disk.
    pub fn save_as(&self, target: &SaveTarget) -> ChiselResult<Vec<PathBuf>> {
        self.save_outputs(target, None)
    }

    pub fn save_as_cancellable(
        &self,
        target: &SaveTarget,
        cancel: &CancelToken,
    ) -> ChiselResult<Vec<PathBuf>> {
        self.save_outputs(target, Some(cancel))
    }

    fn save_outputs(
        &self,
        target: &SaveTarget,
        cancel: Option<&CancelToken>,
    ) -> ChiselResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for output in target.outputs() {
            match (&output, cancel) {
                (SaveOutput::Background(path), None) => self.export_image(path, false)?,
                (SaveOutput::Background(path), Some(cancel)) => {
                    self.export_image_cancellable(path, false, cancel)?
                }
                (SaveOutput::Transparent(path), None) => self.export_image(path, true)?,
                (SaveOutput::Transparent(path), Some(cancel)) => {
                    self.export_image_cancellable(path, true, cancel)?
                }
                (SaveOutput::Project(path), None) => self.save_project(path)?,
                (SaveOutput::Project(path), Some(cancel)) => {
                    self.save_project_cancellable(path, cancel)?
                }
            }
            written.push(output.path().to_path_buf());
        }
        info!("Saved {} as {:?} ({} files)", target.name(), target.kind(), written.len());
        Ok(written)
    }

    fn install(&mut self, mut field: MaterialField) {
        self.finish_open_stroke();
        field.mark_all_dirty();
        self.field = field;
    }
}
