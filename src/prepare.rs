//! Temporary workspace holding resized copies of the template set.
//!
//! The workspace owns a [`tempfile::TempDir`]; the directory and everything in
//! it is removed when the workspace is dropped, whether the run that used it
//! succeeded or failed.

use crate::image::io::{load_gray_image, resize_cover_and_save};
use crate::template::Template;
use crate::trace::{trace_event, trace_span};
use crate::util::{IconMatchError, IconMatchResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A template resized into the workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedTemplate {
    /// Source file name; used as the template id.
    pub id: String,
    /// Path of the resized copy.
    pub path: PathBuf,
}

/// Lists template files in `dir`, sorted by file name.
pub fn list_templates<P: AsRef<Path>>(dir: P) -> IconMatchResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|err| IconMatchError::filesystem(dir, err))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| IconMatchError::filesystem(dir, err))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Resized template set backed by a temporary directory.
#[derive(Debug)]
pub struct TemplateWorkspace {
    dir: TempDir,
    templates: Vec<PreparedTemplate>,
}

impl TemplateWorkspace {
    /// Resizes every file in `template_dir` to `width x height` into a fresh
    /// temporary directory under `work_dir` (system temp when `None`).
    ///
    /// With the `rayon` feature and `parallel`, resizes run concurrently and
    /// all of them finish before this returns. Any failure aborts preparation
    /// and removes the directory.
    pub fn prepare<P: AsRef<Path>>(
        template_dir: P,
        width: u32,
        height: u32,
        work_dir: Option<&Path>,
        parallel: bool,
    ) -> IconMatchResult<Self> {
        let _span = trace_span!("prepare_templates").entered();

        let sources = list_templates(template_dir.as_ref())?;
        if sources.is_empty() {
            return Err(IconMatchError::InvalidInput("template directory has no files"));
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("iconmatch-templates-");
        let parent = work_dir.map_or_else(std::env::temp_dir, Path::to_path_buf);
        let dir = builder
            .tempdir_in(&parent)
            .map_err(|err| IconMatchError::filesystem(&parent, err))?;

        let mut templates = Vec::with_capacity(sources.len());
        for src in &sources {
            let id = src
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or(IconMatchError::InvalidInput("template path has no file name"))?;
            let path = dir.path().join(&id);
            templates.push(PreparedTemplate { id, path });
        }

        resize_all(&sources, &templates, width, height, parallel)?;
        trace_event!("prepare_templates.done", templates = templates.len());
        Ok(Self { dir, templates })
    }

    /// Returns the temporary directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the prepared templates in id order.
    pub fn templates(&self) -> &[PreparedTemplate] {
        &self.templates
    }

    /// Returns the template ids in id order.
    pub fn ids(&self) -> Vec<String> {
        self.templates.iter().map(|tpl| tpl.id.clone()).collect()
    }

    /// Decodes the resized templates as grayscale images.
    pub fn load_templates(&self) -> IconMatchResult<Vec<Template>> {
        self.templates
            .iter()
            .map(|tpl| load_gray_image(&tpl.path).map(Template::from_image))
            .collect()
    }

    /// Removes the directory now, reporting removal errors.
    pub fn close(self) -> IconMatchResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|err| IconMatchError::filesystem(&path, err))?;
        trace_event!("prepare_templates.cleaned", templates = self.templates.len());
        Ok(())
    }
}

fn resize_all(
    sources: &[PathBuf],
    templates: &[PreparedTemplate],
    width: u32,
    height: u32,
    parallel: bool,
) -> IconMatchResult<()> {
    #[cfg(feature = "rayon")]
    if parallel {
        use rayon::prelude::*;
        return sources
            .par_iter()
            .zip(templates.par_iter())
            .try_for_each(|(src, tpl)| resize_cover_and_save(src, width, height, &tpl.path));
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    for (src, tpl) in sources.iter().zip(templates) {
        resize_cover_and_save(src, width, height, &tpl.path)?;
    }
    Ok(())
}
