use clap::Parser;
use iconmatch::{
    run_pipeline, DetectConfig, LabelPolicy, MatchConfig, Metric, PipelineConfig, PipelinePaths,
    SuppressionConfig,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "IconMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Log pipeline stages at info level.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    Zncc,
    Ncc,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Zncc => Metric::Zncc,
            MetricConfig::Ncc => Metric::Ncc,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    metric: MetricConfig,
    threshold: f32,
    min_var_i: f32,
    parallel: bool,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            metric: MetricConfig::Zncc,
            threshold: cfg.threshold,
            min_var_i: cfg.min_var_i,
            parallel: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NmsConfigJson {
    same_template_iou: f32,
    cross_template_iou: f32,
    confidence_ratio: f32,
}

impl Default for NmsConfigJson {
    fn default() -> Self {
        let cfg = SuppressionConfig::default();
        Self {
            same_template_iou: cfg.same_template_iou,
            cross_template_iou: cfg.cross_template_iou,
            confidence_ratio: cfg.confidence_ratio,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LabelConfigJson {
    strip_token: String,
    max_chars: usize,
}

impl Default for LabelConfigJson {
    fn default() -> Self {
        let cfg = LabelPolicy::default();
        Self {
            strip_token: cfg.strip_token,
            max_chars: cfg.max_chars,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    template_dir: String,
    output_image: Option<String>,
    overlay_svg: Option<String>,
    results_path: Option<String>,
    work_dir: Option<String>,
    template_width: u32,
    template_height: u32,
    report_peak_below: f32,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
    nms: NmsConfigJson,
    label: LabelConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = PipelineConfig::default();
        Self {
            image_path: String::new(),
            template_dir: String::new(),
            output_image: Some("output_with_rectangles.png".to_string()),
            overlay_svg: None,
            results_path: Some("results.json".to_string()),
            work_dir: None,
            template_width: cfg.template_width,
            template_height: cfg.template_height,
            report_peak_below: cfg.report_peak_below,
            match_cfg: MatchConfigJson::default(),
            nms: NmsConfigJson::default(),
            label: LabelConfigJson::default(),
        }
    }
}

impl Config {
    fn paths(&self) -> PipelinePaths {
        PipelinePaths {
            image: PathBuf::from(&self.image_path),
            template_dir: PathBuf::from(&self.template_dir),
            output_image: self.output_image.as_ref().map(PathBuf::from),
            overlay_svg: self.overlay_svg.as_ref().map(PathBuf::from),
            results: self.results_path.as_ref().map(PathBuf::from),
            work_dir: self.work_dir.as_ref().map(PathBuf::from),
        }
    }

    fn pipeline(self) -> PipelineConfig {
        PipelineConfig {
            template_width: self.template_width,
            template_height: self.template_height,
            matching: MatchConfig {
                metric: self.match_cfg.metric.into(),
                threshold: self.match_cfg.threshold,
                min_var_i: self.match_cfg.min_var_i,
                parallel: self.match_cfg.parallel,
            },
            detect: DetectConfig {
                suppression: SuppressionConfig {
                    same_template_iou: self.nms.same_template_iou,
                    cross_template_iou: self.nms.cross_template_iou,
                    confidence_ratio: self.nms.confidence_ratio,
                },
                labels: LabelPolicy {
                    strip_token: self.label.strip_token,
                    max_chars: self.label.max_chars,
                },
            },
            report_peak_below: self.report_peak_below,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.trace { "iconmatch=info" } else { "iconmatch=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.template_dir.is_empty() {
        return Err("image_path and template_dir must be set in the config".into());
    }
    if config.template_width == 0 || config.template_height == 0 {
        return Err("template_width and template_height must be positive".into());
    }

    let paths = config.paths();
    let report = run_pipeline(&paths, &config.pipeline())?;
    println!("{}", report.summary);
    if let Some(path) = &paths.output_image {
        println!("Annotated image saved to {}", path.display());
    }
    if let Some(path) = &paths.results {
        println!("Results saved to {}", path.display());
    }

    Ok(())
}
