use crate::core::{output_location, ConfigProvider, LineSet, Pipeline, Storage};
use crate::domain::model::StrokeWidth;
use crate::domain::services::svg::SvgDocument;
use crate::utils::error::{Result, StickbugError};

pub const DEFAULT_LINES_FILE: &str = "lines.json";

/// SVG 繪圖 -> wall/stick 線段 JSON
pub struct ExtractPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    svg_path: String,
    output_file: String,
}

impl<S: Storage, C: ConfigProvider> ExtractPipeline<S, C> {
    pub fn new(storage: S, config: C, svg_path: impl Into<String>) -> Self {
        Self {
            storage,
            config,
            svg_path: svg_path.into(),
            output_file: DEFAULT_LINES_FILE.to_string(),
        }
    }

    pub fn with_output_file(mut self, output_file: impl Into<String>) -> Self {
        self.output_file = output_file.into();
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ExtractPipeline<S, C> {
    type Extracted = SvgDocument;
    type Transformed = LineSet;

    async fn extract(&self) -> Result<SvgDocument> {
        tracing::debug!("Reading SVG drawing from: {}", self.svg_path);
        let bytes = self.storage.read_file(&self.svg_path).await?;
        let content = String::from_utf8(bytes).map_err(|e| StickbugError::SvgError {
            message: format!("{} is not UTF-8: {}", self.svg_path, e),
        })?;

        let document = SvgDocument::parse(&content)?;
        tracing::info!("Found {} paths in {}", document.paths.len(), self.svg_path);
        Ok(document)
    }

    async fn transform(&self, document: SvgDocument) -> Result<LineSet> {
        let default_width = self.config.default_stroke_width().map(StrokeWidth);
        let lines = document.extract_lines(default_width)?;

        tracing::info!(
            "Classified 1 wall line and {} stick lines",
            lines.stick_lines.len()
        );
        Ok(lines)
    }

    async fn load(&self, lines: LineSet) -> Result<String> {
        let output_path = output_location(self.config.output_path(), &self.output_file);
        let json = serde_json::to_vec_pretty(&lines)?;

        tracing::debug!("Writing {} bytes of line data", json.len());
        self.storage.write_file(&output_path, &json).await?;
        Ok(output_path)
    }
}
