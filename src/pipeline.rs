//! End-to-end run: prepare templates, match, detect, write artifacts.

use crate::detect::{DetectConfig, Detection, Detector};
use crate::image::io::load_gray_image;
use crate::prepare::TemplateWorkspace;
use crate::render::{compose_annotations, overlay_document};
use crate::report::{write_results, RunSummary};
use crate::search::{CorrelationMatcher, MatchConfig, TemplateMatcher};
use crate::trace::{trace_event, trace_span};
use crate::util::{IconMatchError, IconMatchResult};
use crate::OwnedImage;
use std::path::PathBuf;

/// Inputs and outputs of a run. Outputs set to `None` are not written.
#[derive(Clone, Debug, Default)]
pub struct PipelinePaths {
    /// Reference image searched for icons.
    pub image: PathBuf,
    /// Directory with one file per template.
    pub template_dir: PathBuf,
    /// Reference image with rectangles drawn on it.
    pub output_image: Option<PathBuf>,
    /// SVG overlay with rectangles and labels.
    pub overlay_svg: Option<PathBuf>,
    /// JSON results artifact.
    pub results: Option<PathBuf>,
    /// Parent for the temporary template directory; system temp when `None`.
    pub work_dir: Option<PathBuf>,
}

/// Configuration for [`run_pipeline`].
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Size every template is resized to before matching.
    pub template_width: u32,
    pub template_height: u32,
    pub matching: MatchConfig,
    pub detect: DetectConfig,
    /// Templates whose best score is below this are listed in the summary.
    pub report_peak_below: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            template_width: 50,
            template_height: 35,
            matching: MatchConfig::default(),
            detect: DetectConfig::default(),
            report_peak_below: 0.88,
        }
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub detection: Detection,
    pub summary: RunSummary,
}

/// Runs the pipeline with the bundled [`CorrelationMatcher`].
pub fn run_pipeline(paths: &PipelinePaths, cfg: &PipelineConfig) -> IconMatchResult<RunReport> {
    let matcher = CorrelationMatcher::new(cfg.matching.clone());
    run_pipeline_with(&matcher, paths, cfg)
}

/// Runs the pipeline with any matcher.
///
/// The temporary template directory is removed before this returns, on every
/// path. When both the run and the removal fail, the run error is returned.
pub fn run_pipeline_with<M>(
    matcher: &M,
    paths: &PipelinePaths,
    cfg: &PipelineConfig,
) -> IconMatchResult<RunReport>
where
    M: TemplateMatcher + ?Sized,
{
    let _span = trace_span!("run_pipeline").entered();

    let image = load_gray_image(&paths.image)?;
    trace_event!(
        "run_pipeline.image",
        width = image.width(),
        height = image.height(),
    );

    let workspace = TemplateWorkspace::prepare(
        &paths.template_dir,
        cfg.template_width,
        cfg.template_height,
        paths.work_dir.as_deref(),
        cfg.matching.parallel,
    )?;
    let outcome = detect_prepared(matcher, &image, &workspace, &cfg.detect);
    let cleanup = workspace.close();
    let detection = outcome?;
    cleanup?;

    write_outputs(paths, &image, &detection)?;

    let summary = RunSummary::new(
        &detection,
        (image.width(), image.height()),
        cfg.report_peak_below,
    );
    Ok(RunReport { detection, summary })
}

fn detect_prepared<M>(
    matcher: &M,
    image: &OwnedImage,
    workspace: &TemplateWorkspace,
    cfg: &DetectConfig,
) -> IconMatchResult<Detection>
where
    M: TemplateMatcher + ?Sized,
{
    let templates = workspace.load_templates()?;
    let results = matcher.match_templates(image.view(), &templates)?;
    let ids = workspace.ids();
    Detector::new(cfg.clone()).detect(ids.as_slice(), results)
}

fn write_outputs(
    paths: &PipelinePaths,
    image: &OwnedImage,
    detection: &Detection,
) -> IconMatchResult<()> {
    if let Some(path) = &paths.output_image {
        compose_annotations(&paths.image, &detection.annotations, path)?;
    }
    if let Some(path) = &paths.overlay_svg {
        let svg = overlay_document(&detection.annotations, image.width(), image.height());
        std::fs::write(path, svg).map_err(|err| IconMatchError::filesystem(path, err))?;
    }
    if let Some(path) = &paths.results {
        write_results(path, &detection.selected)?;
    }
    Ok(())
}
