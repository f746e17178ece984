use crate::core::{ConfigProvider, OutputFormat};
use crate::domain::services::balancer::SplitStrategy;
use crate::domain::services::morph::StrokeDefaults;
use crate::domain::services::sequencer::{InterpolationMode, DEFAULT_STEPS, MAX_STEPS};
use crate::utils::error::{Result, StickbugError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const VALID_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub balance: BalanceConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    pub render: Option<RenderConfig>,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// 路徑沒有宣告 stroke-width 時使用
    pub default_stroke_width: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceConfig {
    #[serde(default)]
    pub split_strategy: SplitStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub steps: Option<usize>,
    #[serde(default)]
    pub mode: InterpolationMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(flatten)]
    pub strokes: StrokeDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    VALID_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StickbugError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StickbugError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StickbugError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(steps) = self.animation.steps {
            validation::validate_range("animation.steps", steps, 1, MAX_STEPS)?;
        }

        if let Some(width) = self.extract.default_stroke_width {
            validation::validate_positive_float("extract.default_stroke_width", width)?;
        }

        if let Some(render) = &self.render {
            validation::validate_positive_float("render.canvas_width", render.canvas_width)?;
            validation::validate_positive_float("render.canvas_height", render.canvas_height)?;
            validation::validate_range(
                "render.stick_width_ratio",
                render.strokes.stick_width_ratio,
                0.0,
                1.0,
            )?;
            validation::validate_range(
                "render.wall_width_ratio",
                render.strokes.wall_width_ratio,
                0.0,
                1.0,
            )?;
        }

        if self.load.output_formats.is_empty() {
            return Err(StickbugError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }
        for format in &self.load.output_formats {
            if !VALID_FORMATS.contains(&format.as_str()) {
                return Err(StickbugError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        VALID_FORMATS.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.load
            .output_formats
            .iter()
            .filter_map(|format| match format.as_str() {
                "json" => Some(OutputFormat::Json),
                "csv" => Some(OutputFormat::Csv),
                _ => None,
            })
            .collect()
    }

    fn default_stroke_width(&self) -> Option<f64> {
        self.extract.default_stroke_width
    }

    fn split_strategy(&self) -> SplitStrategy {
        self.balance.split_strategy
    }

    fn steps(&self) -> usize {
        self.animation.steps.unwrap_or(DEFAULT_STEPS)
    }

    fn interpolation_mode(&self) -> InterpolationMode {
        self.animation.mode
    }

    fn canvas_size(&self) -> Option<(f64, f64)> {
        self.render
            .as_ref()
            .map(|render| (render.canvas_width, render.canvas_height))
    }

    fn stroke_defaults(&self) -> StrokeDefaults {
        self.render
            .as_ref()
            .map(|render| render.strokes)
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
