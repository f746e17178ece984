use crate::config::toml_config::TomlConfig;
use crate::domain::services::balancer::SplitStrategy;
use crate::domain::services::sequencer::InterpolationMode;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extensions, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "stickbug")]
#[command(about = "Extract wall and stick lines from drawings and morph one set into another")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the output directory from the config
    #[arg(long, global = true)]
    pub output_path: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Extract the wall and stick lines of an SVG drawing into a JSON file
    Extract {
        /// Input SVG drawing
        svg: String,

        #[arg(long, default_value = "lines.json")]
        output_file: String,

        /// Stroke width for paths whose style declares none
        #[arg(long)]
        default_stroke_width: Option<f64>,
    },

    /// Balance two line files and write the morph plan and frames
    Morph {
        /// Line JSON of the drawing to start from
        source: String,

        /// Line JSON of the drawing to end at
        reference: String,

        #[arg(long)]
        steps: Option<usize>,

        /// positional | longest_first
        #[arg(long)]
        split_strategy: Option<SplitStrategy>,

        /// additive | closed_form
        #[arg(long)]
        mode: Option<InterpolationMode>,
    },
}

impl CliConfig {
    /// 把命令列參數覆蓋到設定檔上
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(output_path) = &self.output_path {
            config.load.output_path = output_path.clone();
        }

        match &self.command {
            Command::Extract {
                default_stroke_width,
                ..
            } => {
                if let Some(width) = default_stroke_width {
                    config.extract.default_stroke_width = Some(*width);
                }
            }
            Command::Morph {
                steps,
                split_strategy,
                mode,
                ..
            } => {
                if let Some(steps) = steps {
                    config.animation.steps = Some(*steps);
                }
                if let Some(strategy) = split_strategy {
                    config.balance.split_strategy = *strategy;
                }
                if let Some(mode) = mode {
                    config.animation.mode = *mode;
                }
            }
        }
    }

    /// 載入設定檔（若有）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Extract { svg, .. } => {
                validate_file_extensions("svg", std::slice::from_ref(svg), &["svg"])
            }
            Command::Morph {
                source, reference, ..
            } => validate_file_extensions(
                "lines",
                &[source.clone(), reference.clone()],
                &["json"],
            ),
        }
    }
}
