use crate::core::{output_location, ConfigProvider, LineSet, Morph, OutputFormat, Pipeline, Storage};
use crate::domain::model::{MatchedPair, Segment};
use crate::domain::services::balancer::SplitStrategy;
use crate::domain::services::morph::{plan_morph, StrokeStyle};
use crate::domain::services::sequencer::{InterpolationMode, MorphAnimation};
use crate::utils::error::{Result, StickbugError};
use serde::{Deserialize, Serialize};

pub const PLAN_FILE: &str = "morph.json";
pub const FRAMES_FILE: &str = "frames.csv";

/// Everything a renderer needs to drive the animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphPlan {
    pub steps: usize,
    pub mode: InterpolationMode,
    pub split_strategy: SplitStrategy,
    pub stroke_style: Option<StrokeStyle>,
    pub wall: MatchedPair,
    pub sticks: Vec<MatchedPair>,
}

#[derive(Debug, Clone)]
pub struct MorphOutput {
    pub plan: MorphPlan,
    pub frames_csv: Option<String>,
}

#[derive(Debug, Serialize)]
struct FrameRow {
    frame: usize,
    kind: &'static str,
    index: usize,
    start_x: f64,
    start_y: f64,
    end_x: f64,
    end_y: f64,
}

impl FrameRow {
    fn new(frame: usize, kind: &'static str, index: usize, segment: Segment) -> Self {
        Self {
            frame,
            kind,
            index,
            start_x: segment.start.x,
            start_y: segment.start.y,
            end_x: segment.end.x,
            end_y: segment.end.y,
        }
    }
}

/// 每一格輸出一行牆與每根 stick 的位置
pub fn frames_to_csv(animation: &MorphAnimation, canvas: Option<(f64, f64)>) -> Result<String> {
    let place = |segment: Segment| match canvas {
        Some((width, height)) => segment.scaled(width, height),
        None => segment,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    for frame in animation.frames() {
        writer.serialize(FrameRow::new(frame.index, "wall", 0, place(frame.wall)))?;
        for (index, stick) in frame.sticks.iter().enumerate() {
            writer.serialize(FrameRow::new(frame.index, "stick", index, place(*stick)))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StickbugError::IoError(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| StickbugError::IoError(std::io::Error::other(e)))
}

/// 來源線段 + 參考線段 -> 對應計畫與逐格位置
pub struct MorphPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    source_path: String,
    reference_path: String,
}

impl<S: Storage, C: ConfigProvider> MorphPipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        source_path: impl Into<String>,
        reference_path: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            config,
            source_path: source_path.into(),
            reference_path: reference_path.into(),
        }
    }

    async fn read_lines(&self, path: &str) -> Result<LineSet> {
        let bytes = self.storage.read_file(path).await?;
        let lines: LineSet = serde_json::from_slice(&bytes)?;
        tracing::debug!("Loaded {} stick lines from {}", lines.stick_lines.len(), path);
        Ok(lines)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MorphPipeline<S, C> {
    type Extracted = (LineSet, LineSet);
    type Transformed = MorphOutput;

    async fn extract(&self) -> Result<(LineSet, LineSet)> {
        let source = self.read_lines(&self.source_path).await?;
        let reference = self.read_lines(&self.reference_path).await?;
        Ok((source, reference))
    }

    async fn transform(&self, data: (LineSet, LineSet)) -> Result<MorphOutput> {
        let (source, reference) = data;
        let strategy = self.config.split_strategy();
        let steps = self.config.steps();
        let mode = self.config.interpolation_mode();

        tracing::info!(
            "Balancing sticks: {} source vs {} reference",
            source.stick_lines.len(),
            reference.stick_lines.len()
        );
        let Morph { wall, sticks } = plan_morph(&source, &reference, strategy)?;

        let canvas = self.config.canvas_size();
        let stroke_style = canvas.map(|(width, _)| self.config.stroke_defaults().for_canvas(width));

        let plan = MorphPlan {
            steps,
            mode,
            split_strategy: strategy,
            stroke_style,
            wall,
            sticks,
        };

        let frames_csv = if self.config.output_formats().contains(&OutputFormat::Csv) {
            let morph = Morph {
                wall: plan.wall,
                sticks: plan.sticks.clone(),
            };
            let animation = MorphAnimation::new(&morph, steps, mode)?;
            tracing::info!("Rendering {} frames", animation.frame_count());
            Some(frames_to_csv(&animation, canvas)?)
        } else {
            None
        };

        Ok(MorphOutput { plan, frames_csv })
    }

    async fn load(&self, output: MorphOutput) -> Result<String> {
        let formats = self.config.output_formats();

        if formats.contains(&OutputFormat::Json) {
            let path = output_location(self.config.output_path(), PLAN_FILE);
            let json = serde_json::to_vec_pretty(&output.plan)?;
            self.storage.write_file(&path, &json).await?;
            tracing::debug!("Morph plan written to {}", path);
        }

        if let Some(frames) = output.frames_csv {
            let path = output_location(self.config.output_path(), FRAMES_FILE);
            self.storage.write_file(&path, frames.as_bytes()).await?;
            tracing::debug!("Frames written to {}", path);
        }

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Point;
    use crate::domain::services::morph::StrokeDefaults;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put_json(&self, path: &str, lines: &LineSet) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), serde_json::to_vec(lines).unwrap());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                StickbugError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        formats: Vec<OutputFormat>,
        steps: usize,
        canvas: Option<(f64, f64)>,
    }

    impl MockConfig {
        fn new(steps: usize) -> Self {
            Self {
                formats: vec![OutputFormat::Json, OutputFormat::Csv],
                steps,
                canvas: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            self.formats.clone()
        }

        fn default_stroke_width(&self) -> Option<f64> {
            None
        }

        fn split_strategy(&self) -> SplitStrategy {
            SplitStrategy::Positional
        }

        fn steps(&self) -> usize {
            self.steps
        }

        fn interpolation_mode(&self) -> InterpolationMode {
            InterpolationMode::Additive
        }

        fn canvas_size(&self) -> Option<(f64, f64)> {
            self.canvas
        }

        fn stroke_defaults(&self) -> StrokeDefaults {
            StrokeDefaults::default()
        }
    }

    fn stick(y: f64, length: f64) -> Segment {
        Segment::new(Point::new(0.0, y), Point::new(length, y))
    }

    fn source() -> LineSet {
        LineSet {
            wall_line: Segment::new(Point::new(0.0, 1.0), Point::new(1.0, 1.0)),
            stick_lines: vec![stick(0.1, 0.5)],
        }
    }

    fn reference() -> LineSet {
        LineSet {
            wall_line: Segment::new(Point::new(0.5, 0.0), Point::new(0.5, 1.0)),
            stick_lines: vec![stick(0.2, 0.25), stick(0.3, 0.5)],
        }
    }

    #[tokio::test]
    async fn test_extract_reads_both_files() {
        let storage = MockStorage::default();
        storage.put_json("source.json", &source()).await;
        storage.put_json("reference.json", &reference()).await;

        let pipeline =
            MorphPipeline::new(storage, MockConfig::new(4), "source.json", "reference.json");
        let (src, reference_lines) = pipeline.extract().await.unwrap();

        assert_eq!(src, source());
        assert_eq!(reference_lines.stick_lines.len(), 2);
    }

    #[tokio::test]
    async fn test_extract_rejects_bad_json() {
        let storage = MockStorage::default();
        storage
            .write_file("source.json", br#"{"wall_line": 3}"#)
            .await
            .unwrap();
        storage.put_json("reference.json", &reference()).await;

        let pipeline =
            MorphPipeline::new(storage, MockConfig::new(4), "source.json", "reference.json");
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, StickbugError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_transform_balances_and_renders_frames() {
        let pipeline = MorphPipeline::new(MockStorage::default(), MockConfig::new(4), "a", "b");
        let output = pipeline.transform((source(), reference())).await.unwrap();

        assert_eq!(output.plan.sticks.len(), 2);
        assert_eq!(output.plan.wall.source, source().wall_line);
        assert_eq!(output.plan.wall.destination, reference().wall_line);
        assert!(output.plan.stroke_style.is_none());

        let csv = output.frames_csv.unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "frame,kind,index,start_x,start_y,end_x,end_y");
        // 5 frames x (1 wall + 2 sticks)
        assert_eq!(lines.len(), 1 + 5 * 3);
        assert_eq!(lines[1], "0,wall,0,0.0,1.0,1.0,1.0");
        assert_eq!(lines[13], "4,wall,0,0.5,0.0,0.5,1.0");
    }

    #[tokio::test]
    async fn test_transform_scales_to_canvas() {
        let mut config = MockConfig::new(2);
        config.canvas = Some((1920.0, 1080.0));
        let pipeline = MorphPipeline::new(MockStorage::default(), config, "a", "b");

        let output = pipeline.transform((source(), reference())).await.unwrap();
        let style = output.plan.stroke_style.unwrap();
        assert_eq!(style.wall_width, 60.0);

        let csv = output.frames_csv.unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("0,wall,0,0.0,1080.0,1920.0,1080.0"));
    }

    #[tokio::test]
    async fn test_load_respects_formats() {
        let storage = MockStorage::default();
        let mut config = MockConfig::new(4);
        config.formats = vec![OutputFormat::Json];
        let pipeline = MorphPipeline::new(storage.clone(), config, "a", "b");

        let output = pipeline.transform((source(), reference())).await.unwrap();
        assert!(output.frames_csv.is_none());

        let output_path = pipeline.load(output).await.unwrap();
        assert_eq!(output_path, "out");

        let plan: MorphPlan =
            serde_json::from_slice(&storage.get_file("out/morph.json").await.unwrap()).unwrap();
        assert_eq!(plan.steps, 4);
        assert_eq!(plan.sticks.len(), 2);
        assert!(storage.get_file("out/frames.csv").await.is_none());
    }
}
