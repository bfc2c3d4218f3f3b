//! IconMatch locates many instances of small icon templates in one reference
//! image and reduces the raw hits to a clean set of labeled detections.
//!
//! The core is matcher-agnostic: per-template results are pooled
//! ([`aggregate`]), pruned with an asymmetric non-maximum suppression
//! ([`suppress_with`]) and turned into styled overlays ([`classify`]).
//! A normalized-correlation matcher is bundled, and the `image-io` feature
//! adds template preparation, compositing and an end-to-end [`run_pipeline`].

mod candidate;
pub mod classify;
pub mod detect;
pub mod geometry;
pub mod image;
pub mod kernel;
pub mod render;
pub mod report;
pub mod search;
pub mod template;
pub(crate) mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub mod pipeline;
#[cfg(feature = "image-io")]
pub mod prepare;

pub use candidate::{
    aggregate, suppress, suppress_with, Aggregation, Candidate, CandidatePool, RawMatch,
    SuppressionConfig, TemplatePeak, TemplateResult,
};
pub use classify::{
    classify, AnnotationDescriptor, BandTally, Classification, ConfidenceBand, LabelPolicy,
    Stroke,
};
pub use detect::{DetectConfig, Detection, Detector};
pub use geometry::{iou, BBox};
pub use crate::image::{ImageView, OwnedImage};
pub use report::{results_json, write_results, ResultRecord, RunSummary};
pub use search::{CorrelationMatcher, MatchConfig, Metric, TemplateMatcher};
pub use template::{Template, TemplatePlan};
pub use util::{IconMatchError, IconMatchResult};

#[cfg(feature = "image-io")]
pub use pipeline::{run_pipeline, run_pipeline_with, PipelineConfig, PipelinePaths, RunReport};
#[cfg(feature = "image-io")]
pub use prepare::{PreparedTemplate, TemplateWorkspace};
